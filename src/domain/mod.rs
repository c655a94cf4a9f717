//! Domain logic and core data structures
//!
//! This module contains pure placement logic that is independent
//! of Win32 APIs and platform-specific implementations.

pub mod alignment;
pub mod core;
pub mod dpi;
pub mod maximize;
pub mod process;
pub mod screen;
pub mod topology;

pub use alignment::{Alignment, ParseAlignmentError, resolve_offset};
pub use self::core::{MonitorId, Offset, Rect, Size, WindowId};
pub use dpi::{Dpi, DpiBand, DpiRatio};
pub use maximize::{MaximizeBounds, maximize_bounds};
pub use screen::{Screen, WindowGeometry};
pub use topology::Topology;
