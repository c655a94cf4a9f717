//! Platform-specific implementations
//!
//! The engine reaches the OS only through the two traits below. The Win32
//! implementation lives in the submodules, which are compiled on Windows
//! only; everything else in the crate builds and tests on any host.

use std::sync::Arc;

use crate::domain::{Dpi, Rect, Screen, Topology, WindowGeometry, WindowId};
use thiserror::Error;

#[cfg(windows)]
pub mod backend;
#[cfg(windows)]
pub mod display_events;
#[cfg(windows)]
pub mod dpi;
#[cfg(windows)]
pub mod monitors;
#[cfg(windows)]
pub mod processes;
#[cfg(windows)]
pub mod topology;
#[cfg(windows)]
pub mod window;
#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use backend::Win32Platform;
#[cfg(windows)]
pub use display_events::DisplayChangeListener;

/// Invoked for every display-settings change, on the notifying thread
pub type DisplayChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Error types for OS calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// An OS call reported failure
    #[error("{call} failed{}", detail_suffix(.detail))]
    CallFailed { call: &'static str, detail: String },
    /// Window handle is not (or no longer) a window
    #[error("invalid window handle {0}")]
    InvalidWindow(WindowId),
    /// The monitor for a window could not be resolved
    #[error("no monitor found for window {0}")]
    MonitorNotFound(WindowId),
    /// Display topology control cannot be used on this system
    #[error("display topology control unavailable: {0}")]
    TopologyUnavailable(String),
    /// The display-change listener could not be started or stopped
    #[error("display change listener: {0}")]
    Listener(String),
}

impl PlatformError {
    pub fn call(call: &'static str) -> Self {
        PlatformError::CallFailed {
            call,
            detail: String::new(),
        }
    }

    pub fn call_with(call: &'static str, detail: impl std::fmt::Display) -> Self {
        PlatformError::CallFailed {
            call,
            detail: detail.to_string(),
        }
    }
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

/// Outcome of probing the display-configuration API once at start-up
///
/// Computed explicitly and handed to the backend, so every topology call
/// knows up front whether the API is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologySupport {
    Available,
    Unavailable(String),
}

impl TopologySupport {
    pub fn is_available(&self) -> bool {
        matches!(self, TopologySupport::Available)
    }
}

/// Monitor, DPI and topology queries
pub trait DisplayBackend: Send + Sync {
    /// All attached monitors in enumeration order
    fn screens(&self) -> Result<Vec<Screen>, PlatformError>;

    /// The monitor nearest to `window`
    fn screen_of_window(&self, window: WindowId) -> Result<Screen, PlatformError>;

    /// Number of active displays (mirroring pseudo-devices excluded)
    fn display_count(&self) -> u32;

    /// System-wide DPI of the default device context
    fn system_dpi(&self) -> Dpi;

    /// Raw topology id currently active; zero when the OS could not tell
    fn read_topology(&self) -> Result<u32, PlatformError>;

    /// Requests a topology change; the OS may refuse silently
    fn apply_topology(&self, topology: Topology) -> Result<(), PlatformError>;
}

/// Window queries and the move command
pub trait WindowBackend: Send + Sync {
    /// Current geometry of `window`
    fn geometry(&self, window: WindowId) -> Result<WindowGeometry, PlatformError>;

    /// Maximizes (`true`) or restores (`false`) `window`
    fn set_maximized(&self, window: WindowId, maximized: bool) -> Result<(), PlatformError>;

    /// Moves and resizes `window` to `target`
    fn move_window(&self, window: WindowId, target: Rect) -> Result<(), PlatformError>;

    /// The window that currently has the user's focus
    fn foreground_window(&self) -> Option<WindowId>;

    /// All top-level windows on the desktop
    fn top_level_windows(&self) -> Vec<WindowId>;

    /// Main window of every process whose executable matches `program`
    fn program_main_windows(&self, program: &str) -> Vec<WindowId>;

    /// Every top-level window owned by processes whose executable matches `program`
    fn program_windows(&self, program: &str) -> Vec<WindowId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_failed_formats_detail() {
        assert_eq!(PlatformError::call("MoveWindow").to_string(), "MoveWindow failed");
        assert_eq!(
            PlatformError::call_with("SetDisplayConfig", "code 87").to_string(),
            "SetDisplayConfig failed: code 87"
        );
    }

    #[test]
    fn topology_support_flag() {
        assert!(TopologySupport::Available.is_available());
        assert!(!TopologySupport::Unavailable("no api".into()).is_available());
    }
}
