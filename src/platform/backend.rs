//! Win32 implementation of the platform traits

use super::{DisplayBackend, PlatformError, TopologySupport, WindowBackend};
use super::{dpi, monitors, processes, topology, window};
use crate::domain::{Dpi, Rect, Screen, Topology, WindowGeometry, WindowId};
use tracing::warn;

/// Talks to the live Windows desktop
///
/// Holds the result of the one-time display-config probe so topology calls
/// fail fast when the API is missing.
#[derive(Debug, Clone)]
pub struct Win32Platform {
    topology_support: TopologySupport,
}

impl Win32Platform {
    pub fn new(topology_support: TopologySupport) -> Self {
        Self { topology_support }
    }

    pub fn topology_support(&self) -> &TopologySupport {
        &self.topology_support
    }

    fn require_topology(&self) -> Result<(), PlatformError> {
        match &self.topology_support {
            TopologySupport::Available => Ok(()),
            TopologySupport::Unavailable(reason) => {
                Err(PlatformError::TopologyUnavailable(reason.clone()))
            }
        }
    }
}

impl DisplayBackend for Win32Platform {
    fn screens(&self) -> Result<Vec<Screen>, PlatformError> {
        monitors::enumerate_screens()
    }

    fn screen_of_window(&self, window: WindowId) -> Result<Screen, PlatformError> {
        monitors::screen_of_window(window)
    }

    fn display_count(&self) -> u32 {
        topology::display_count()
    }

    fn system_dpi(&self) -> Dpi {
        dpi::system_dpi()
    }

    fn read_topology(&self) -> Result<u32, PlatformError> {
        self.require_topology()?;
        topology::read_topology()
    }

    fn apply_topology(&self, target: Topology) -> Result<(), PlatformError> {
        self.require_topology()?;
        topology::apply_topology(target)
    }
}

impl WindowBackend for Win32Platform {
    fn geometry(&self, window: WindowId) -> Result<WindowGeometry, PlatformError> {
        window::window_geometry(window)
    }

    fn set_maximized(&self, window: WindowId, maximized: bool) -> Result<(), PlatformError> {
        window::set_maximized(window, maximized)
    }

    fn move_window(&self, window: WindowId, target: Rect) -> Result<(), PlatformError> {
        window::move_window(window, target)
    }

    fn foreground_window(&self) -> Option<WindowId> {
        window::foreground_window()
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        window::top_level_windows()
    }

    fn program_main_windows(&self, program: &str) -> Vec<WindowId> {
        processes::program_main_windows(program).unwrap_or_else(|e| {
            warn!(program, "could not list main windows: {e}");
            Vec::new()
        })
    }

    fn program_windows(&self, program: &str) -> Vec<WindowId> {
        processes::program_windows(program).unwrap_or_else(|e| {
            warn!(program, "could not list windows: {e}");
            Vec::new()
        })
    }
}
