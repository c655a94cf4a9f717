//! Window placement across screens
//!
//! `ScreenManager` combines monitor queries, DPI correction and alignment
//! geometry and issues the move command. Every public operation reports a
//! plain `bool`; the `try_*` forms return the underlying error instead.

use std::sync::{Arc, Mutex, PoisonError};

use crate::app::locks::WindowLocks;
use crate::domain::{self, Alignment, Dpi, DpiBand, DpiRatio, Offset, Rect, Screen, Topology, WindowId};
use crate::platform::{DisplayBackend, PlatformError, WindowBackend};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where a window should land inside the target work area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Resolve the offset from alignment flags
    Align(Alignment),
    /// Use a fixed offset from the work area's top-left corner
    Offset(Offset),
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Offset(Offset::ZERO)
    }
}

impl From<Alignment> for Placement {
    fn from(alignment: Alignment) -> Self {
        Placement::Align(alignment)
    }
}

impl From<Offset> for Placement {
    fn from(offset: Offset) -> Self {
        Placement::Offset(offset)
    }
}

/// Reasons a placement or topology request did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The requested target screen does not exist
    #[error("target screen is not available")]
    NoSecondaryDisplay,
    /// Topology changes need at least two displays
    #[error("need at least 2 displays, found {count}")]
    NotEnoughDisplays { count: u32 },
    /// The OS accepted or refused the request but the topology did not change
    #[error("display hardware did not switch to {requested} topology (still {actual})")]
    TopologyUnsupported { requested: Topology, actual: Topology },
    /// The OS reported a topology id that is zero or unknown
    #[error("display subsystem reported unrecognized topology {0:#x}")]
    UnknownTopology(u32),
    /// The target position does not fit in screen coordinates
    #[error("offset {offset} moves the window outside the coordinate range")]
    OffsetOutOfRange { offset: Offset },
    /// No windows matched the request
    #[error("no windows found")]
    NoWindows,
    /// Some of the windows in a batch could not be moved
    #[error("{failed} of {total} windows could not be moved")]
    PartialMove { failed: usize, total: usize },
    /// An OS call failed
    #[error(transparent)]
    Os(#[from] PlatformError),
}

/// Places windows on screens and controls the display topology
pub struct ScreenManager<P> {
    pub(crate) platform: Arc<P>,
    dpi_band: DpiBand,
    window_locks: WindowLocks,
    pub(crate) topology_lock: Mutex<()>,
}

impl<P> ScreenManager<P>
where
    P: DisplayBackend + WindowBackend,
{
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            dpi_band: DpiBand::default(),
            window_locks: WindowLocks::new(),
            topology_lock: Mutex::new(()),
        }
    }

    /// Overrides the ratio band inside which window sizes are DPI-corrected
    pub fn with_dpi_band(mut self, band: DpiBand) -> Self {
        self.dpi_band = band;
        self
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    pub fn dpi_band(&self) -> DpiBand {
        self.dpi_band
    }

    // ── Screens ──────────────────────────────────────────────────────────────

    /// All monitors; empty when enumeration fails
    pub fn screens(&self) -> Vec<Screen> {
        self.platform.screens().unwrap_or_else(|e| {
            warn!("monitor enumeration failed: {e}");
            Vec::new()
        })
    }

    pub fn primary_screen(&self) -> Option<Screen> {
        domain::screen::primary(&self.screens()).cloned()
    }

    /// The first enumerated screen that is not primary
    pub fn secondary_screen(&self) -> Option<Screen> {
        domain::screen::secondary(&self.screens()).cloned()
    }

    /// The screen `window` is (mostly) on
    pub fn screen_of(&self, window: WindowId) -> Option<Screen> {
        self.platform
            .screen_of_window(window)
            .map_err(|e| debug!(%window, "no screen for window: {e}"))
            .ok()
    }

    /// Secondary screen for a window on the primary one, primary otherwise
    pub fn other_screen(&self, window: WindowId) -> Option<Screen> {
        let current = self.screen_of(window)?;
        domain::screen::other(&self.screens(), &current).cloned()
    }

    // ── DPI ──────────────────────────────────────────────────────────────────

    pub fn dpi(&self) -> Dpi {
        self.platform.system_dpi()
    }

    pub fn dpi_ratio(&self) -> DpiRatio {
        self.dpi().ratio()
    }

    // ── Offsets ──────────────────────────────────────────────────────────────

    /// Offset that aligns `window` inside `screen`'s work area
    ///
    /// `None` when the screen is absent or the window cannot be read.
    pub fn alignment_to_offset(
        &self,
        window: WindowId,
        screen: Option<&Screen>,
        alignment: Alignment,
    ) -> Option<Offset> {
        let screen = screen?;
        let geometry = self
            .platform
            .geometry(window)
            .map_err(|e| debug!(%window, "cannot read window geometry: {e}"))
            .ok()?;
        Some(self.offset_for(geometry.bounds, &screen.work_area, alignment))
    }

    fn offset_for(&self, window_bounds: Rect, work_area: &Rect, alignment: Alignment) -> Offset {
        let size = self
            .dpi_band
            .correct_size(window_bounds.size(), self.dpi_ratio());
        alignment.resolve(size, work_area)
    }

    // ── Placement ────────────────────────────────────────────────────────────

    /// Moves `window` into `screen`'s work area
    ///
    /// Returns false when the screen is absent or the OS rejected the move.
    pub fn send_to_screen(
        &self,
        window: WindowId,
        screen: Option<&Screen>,
        placement: impl Into<Placement>,
    ) -> bool {
        report(
            "send to screen",
            self.try_send_to_screen(window, screen, placement.into()),
        )
    }

    /// Moves `window` into `screen`'s work area, keeping its size
    ///
    /// A maximized window is restored for the move and maximized again
    /// afterwards. The whole sequence holds the window's lock.
    pub fn try_send_to_screen(
        &self,
        window: WindowId,
        screen: Option<&Screen>,
        placement: Placement,
    ) -> Result<(), PlacementError> {
        let screen = screen.ok_or(PlacementError::NoSecondaryDisplay)?;

        let lock = self.window_locks.lock_for(window);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let geometry = self.platform.geometry(window)?;
        let was_maximized = geometry.is_maximized;
        if !was_maximized {
            return self.move_restored(window, geometry.bounds, screen, placement);
        }

        self.platform.set_maximized(window, false)?;
        // Once restored, the window is maximized again whatever happens next
        let moved = self
            .platform
            .geometry(window)
            .map_err(PlacementError::from)
            .and_then(|restored| self.move_restored(window, restored.bounds, screen, placement));
        if let Err(e) = self.platform.set_maximized(window, true) {
            warn!(%window, "could not re-maximize window: {e}");
        }
        moved
    }

    /// Moves a non-maximized window whose outer rectangle is `bounds`
    fn move_restored(
        &self,
        window: WindowId,
        bounds: Rect,
        screen: &Screen,
        placement: Placement,
    ) -> Result<(), PlacementError> {
        let offset = match placement {
            Placement::Align(alignment) => self.offset_for(bounds, &screen.work_area, alignment),
            Placement::Offset(offset) => offset,
        };
        let (x, y) = screen
            .work_area
            .offset_origin(offset)
            .ok_or(PlacementError::OffsetOutOfRange { offset })?;
        let target = Rect::new(x, y, bounds.w, bounds.h);

        debug!(%window, screen = %screen.device_name, ?target, "moving window");
        self.platform.move_window(window, target)?;
        Ok(())
    }

    pub fn send_to_primary(&self, window: WindowId, placement: impl Into<Placement>) -> bool {
        self.send_to_screen(window, self.primary_screen().as_ref(), placement)
    }

    pub fn send_to_secondary(&self, window: WindowId, placement: impl Into<Placement>) -> bool {
        self.send_to_screen(window, self.secondary_screen().as_ref(), placement)
    }

    /// Moves `window` to the other screen of a primary/secondary pair
    pub fn swap_screen(&self, window: WindowId, placement: impl Into<Placement>) -> bool {
        self.send_to_screen(window, self.other_screen(window).as_ref(), placement)
    }

    // ── Batches ──────────────────────────────────────────────────────────────

    /// Every top-level window whose monitor is `screen`
    pub fn windows_on_screen(&self, screen: Option<&Screen>) -> Vec<WindowId> {
        let Some(screen) = screen else {
            return Vec::new();
        };
        self.platform
            .top_level_windows()
            .into_iter()
            .filter(|window| {
                self.platform
                    .screen_of_window(*window)
                    .is_ok_and(|s| s.same_device(screen))
            })
            .collect()
    }

    /// Moves the main window of each process running `program`
    ///
    /// Succeeds if at least one main window moved.
    pub fn send_program_main_windows_to_screen(
        &self,
        program: &str,
        screen: Option<&Screen>,
        placement: impl Into<Placement>,
    ) -> bool {
        let Some(screen) = screen else {
            return report("send program main windows", Err(PlacementError::NoSecondaryDisplay));
        };
        let placement = placement.into();
        let windows = self.platform.program_main_windows(program);
        debug!(program, count = windows.len(), "main windows found");

        let mut success = false;
        for window in windows {
            success |= self.send_to_screen(window, Some(screen), placement);
        }
        success
    }

    /// Moves every top-level window of each process running `program`
    ///
    /// Fails when no window is found or any single move fails.
    pub fn send_program_windows_to_screen(
        &self,
        program: &str,
        screen: Option<&Screen>,
        placement: impl Into<Placement>,
    ) -> bool {
        report(
            "send program windows",
            self.try_send_program_windows_to_screen(program, screen, placement.into()),
        )
    }

    pub fn try_send_program_windows_to_screen(
        &self,
        program: &str,
        screen: Option<&Screen>,
        placement: Placement,
    ) -> Result<(), PlacementError> {
        let screen = screen.ok_or(PlacementError::NoSecondaryDisplay)?;
        let windows = self.platform.program_windows(program);
        if windows.is_empty() {
            return Err(PlacementError::NoWindows);
        }
        self.send_all(&windows, screen, placement)
    }

    /// Moves every window on `from` over to `to`
    ///
    /// Succeeds only if every window moved; an empty source screen counts as success.
    pub fn gather_windows(
        &self,
        from: Option<&Screen>,
        to: Option<&Screen>,
        placement: impl Into<Placement>,
    ) -> bool {
        report("gather windows", self.try_gather_windows(from, to, placement.into()))
    }

    pub fn try_gather_windows(
        &self,
        from: Option<&Screen>,
        to: Option<&Screen>,
        placement: Placement,
    ) -> Result<(), PlacementError> {
        let from = from.ok_or(PlacementError::NoSecondaryDisplay)?;
        let to = to.ok_or(PlacementError::NoSecondaryDisplay)?;
        let windows = self.windows_on_screen(Some(from));
        info!(
            count = windows.len(),
            from = %from.device_name,
            to = %to.device_name,
            "gathering windows"
        );
        self.send_all(&windows, to, placement)
    }

    fn send_all(
        &self,
        windows: &[WindowId],
        screen: &Screen,
        placement: Placement,
    ) -> Result<(), PlacementError> {
        let failed = windows
            .iter()
            .filter(|window| !self.send_to_screen(**window, Some(screen), placement))
            .count();
        if failed == 0 {
            Ok(())
        } else {
            Err(PlacementError::PartialMove {
                failed,
                total: windows.len(),
            })
        }
    }
}

/// Collapses a result to the boolean contract, logging the failure
pub(crate) fn report(operation: &str, result: Result<(), PlacementError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(operation, "{e}");
            false
        }
    }
}
