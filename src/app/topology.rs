//! Display topology control
//!
//! Reads and writes of the topology are serialized within this process.
//! Nothing stops another process from switching topology concurrently.

use std::sync::PoisonError;

use super::placement::{PlacementError, ScreenManager, report};
use crate::domain::Topology;
use crate::platform::{DisplayBackend, WindowBackend};
use tracing::{debug, info, warn};

/// Switching needs at least this many active displays
const MIN_DISPLAYS: u32 = 2;

impl<P> ScreenManager<P>
where
    P: DisplayBackend + WindowBackend,
{
    /// Active displays, mirroring pseudo-devices excluded
    pub fn display_count(&self) -> u32 {
        self.platform.display_count()
    }

    /// The topology currently active
    ///
    /// Fails when the OS reports zero or a value outside the four known modes.
    pub fn current_topology(&self) -> Result<Topology, PlacementError> {
        let _guard = self
            .topology_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.read_topology_unlocked()
    }

    fn read_topology_unlocked(&self) -> Result<Topology, PlacementError> {
        let raw = self.platform.read_topology()?;
        Topology::from_raw(raw).ok_or(PlacementError::UnknownTopology(raw))
    }

    /// Switches to `target` and reports whether it is active afterwards
    pub fn switch_topology(&self, target: Topology) -> bool {
        report("switch topology", self.try_switch_topology(target))
    }

    /// Switches to `target`, requesting the change only if it is not active
    ///
    /// The OS may accept the request and still keep the old mode, so the
    /// result comes from re-reading the topology, not from the request.
    pub fn try_switch_topology(&self, target: Topology) -> Result<(), PlacementError> {
        let count = self.display_count();
        if count < MIN_DISPLAYS {
            return Err(PlacementError::NotEnoughDisplays { count });
        }

        let _guard = self
            .topology_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.read_topology_unlocked()?;
        if current == target {
            debug!(%target, "topology already active");
            return Ok(());
        }

        info!(from = %current, to = %target, "switching display topology");
        if let Err(e) = self.platform.apply_topology(target) {
            warn!(%target, "topology request failed: {e}");
        }

        let actual = self.read_topology_unlocked()?;
        if actual == target {
            Ok(())
        } else {
            Err(PlacementError::TopologyUnsupported {
                requested: target,
                actual,
            })
        }
    }

    /// Extends the desktop across all displays
    pub fn extend_screens(&self) -> bool {
        self.switch_topology(Topology::Extend)
    }

    /// Mirrors the primary display on all displays
    pub fn clone_screens(&self) -> bool {
        self.switch_topology(Topology::Clone)
    }

    /// Shows the desktop on the internal display only
    pub fn set_internal(&self) -> bool {
        self.switch_topology(Topology::Internal)
    }

    /// Shows the desktop on the external display only
    pub fn set_external(&self) -> bool {
        self.switch_topology(Topology::External)
    }

    /// True when the desktop is extended, switching to Extend first if `force`
    pub fn ensure_extended(&self, force: bool) -> bool {
        match self.current_topology() {
            Ok(Topology::Extend) => true,
            Ok(current) if force => {
                debug!(%current, "forcing extended topology");
                self.extend_screens()
            }
            Ok(current) => {
                debug!(%current, "desktop is not extended");
                false
            }
            Err(e) if force => {
                warn!("{e}; trying to extend anyway");
                self.extend_screens()
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}
