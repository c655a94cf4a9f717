//! Application orchestration layer
//!
//! Ties domain geometry to the platform traits: window placement, topology
//! control, availability notifications and the CLI commands built on them.

pub mod commands;
pub mod events;
pub mod idle;
pub mod locks;
pub mod placement;
#[cfg(test)]
pub mod testing;
pub mod topology;

pub use events::{AvailabilityChanged, SecondaryScreenWatcher, Subscription};
pub use idle::{IdleJob, IdleQueue, IdleSender};
pub use placement::{Placement, PlacementError, ScreenManager};
