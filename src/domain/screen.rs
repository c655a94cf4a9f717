//! Screens and window geometry as reported by the display subsystem
//!
//! The selection rules here ("secondary" is the first non-primary screen,
//! screens compare by device name) are heuristics inherited from two-monitor
//! setups. With three or more displays the secondary screen is whichever
//! non-primary monitor the OS enumerates first.

use crate::domain::core::{MonitorId, Rect, Size};

/// A monitor with its geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// OS handle of the monitor
    pub id: MonitorId,
    /// Device name, unique per attached display (e.g. `\\.\DISPLAY1`)
    pub device_name: String,
    /// Whether this is the primary monitor
    pub is_primary: bool,
    /// Full monitor bounds
    pub bounds: Rect,
    /// Usable area excluding taskbars and docked bars
    pub work_area: Rect,
    /// Effective per-monitor DPI (informational only)
    pub dpi: (u32, u32),
}

impl Screen {
    /// Two screens are the same display when their device names match
    pub fn same_device(&self, other: &Screen) -> bool {
        self.device_name == other.device_name
    }
}

/// Returns the primary screen, if the OS flagged one
pub fn primary(screens: &[Screen]) -> Option<&Screen> {
    screens.iter().find(|s| s.is_primary)
}

/// Returns the first enumerated screen that is not primary
pub fn secondary(screens: &[Screen]) -> Option<&Screen> {
    screens.iter().find(|s| !s.is_primary)
}

/// Picks the screen a window on `current` should be swapped to
///
/// A window on the primary screen goes to the secondary one; a window
/// anywhere else goes to the primary screen.
pub fn other<'a>(screens: &'a [Screen], current: &Screen) -> Option<&'a Screen> {
    if current.is_primary {
        secondary(screens)
    } else {
        primary(screens)
    }
}

/// Current geometry of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Outer window rectangle in screen coordinates
    pub bounds: Rect,
    /// Border thickness (width, height) in pixels
    pub borders: (i32, i32),
    /// Whether the window is currently maximized
    pub is_maximized: bool,
}

impl WindowGeometry {
    pub fn size(&self) -> Size {
        self.bounds.size()
    }
}
