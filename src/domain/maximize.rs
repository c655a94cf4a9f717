//! Maximized-state geometry for windows that must cover a whole monitor
//!
//! When the OS asks a window for its min/max tracking information the
//! answer below makes the maximized window cover the monitor's full bounds
//! (not just the work area), with the borders pushed just off-screen.

use crate::domain::core::Rect;

/// Values reported in response to a min/max info request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaximizeBounds {
    /// Top-left of the maximized window relative to the monitor
    pub position: (i32, i32),
    /// Size of the maximized window
    pub size: (i32, i32),
    /// Minimum tracking size (pinned to the maximized size)
    pub min_track: (i32, i32),
    /// Maximum tracking size (pinned to the maximized size)
    pub max_track: (i32, i32),
}

/// Computes the maximize bounds for a window with `borders` on `monitor`
pub fn maximize_bounds(monitor: &Rect, borders: (i32, i32)) -> MaximizeBounds {
    let (border_w, border_h) = borders;
    let size = (monitor.w + 2 * border_w, monitor.h + 2 * border_h);

    MaximizeBounds {
        position: (-border_w, -border_h),
        size,
        min_track: size,
        max_track: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borders_are_pushed_off_screen() {
        let bounds = maximize_bounds(&Rect::new(1920, 0, 1280, 1024), (8, 8));
        assert_eq!(bounds.position, (-8, -8));
        assert_eq!(bounds.size, (1296, 1040));
        assert_eq!(bounds.min_track, bounds.size);
        assert_eq!(bounds.max_track, bounds.size);
    }

    #[test]
    fn borderless_window_matches_monitor() {
        let bounds = maximize_bounds(&Rect::new(0, 0, 1920, 1080), (0, 0));
        assert_eq!(bounds.position, (0, 0));
        assert_eq!(bounds.size, (1920, 1080));
    }
}
