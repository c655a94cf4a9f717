//! Monitor enumeration
//!
//! This module is responsible for:
//! - Enumerating all connected monitors with their device names
//! - Reading bounds and work area (excluding taskbar) for each monitor
//! - Resolving the monitor a window lives on
//!
//! Secondary monitors can sit at negative coordinates in the virtual
//! desktop; rectangles are passed through unchanged.

use super::windows::{monitor_id, wide_to_string, win32_rect_to_rect};
use super::PlatformError;
use crate::domain::{Screen, WindowId};
use tracing::{debug, warn};
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::HiDpi::*;

const MONITORINFOF_PRIMARY: u32 = 1;

/// Context for monitor enumeration callback
struct EnumContext {
    screens: Vec<Screen>,
}

/// Reads one monitor's information
///
/// Returns `None` when the monitor info cannot be read; a failing DPI query
/// falls back to 96 DPI.
unsafe fn read_screen(hmonitor: HMONITOR) -> Option<Screen> {
    unsafe {
        let mut monitor_info = MONITORINFOEXW {
            monitorInfo: MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
                ..Default::default()
            },
            ..Default::default()
        };

        if GetMonitorInfoW(hmonitor, &mut monitor_info.monitorInfo) == FALSE {
            return None;
        }

        let mut dpi_x: u32 = 96;
        let mut dpi_y: u32 = 96;
        if GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_err() {
            dpi_x = 96;
            dpi_y = 96;
        }

        let info = &monitor_info.monitorInfo;
        Some(Screen {
            id: monitor_id(hmonitor),
            device_name: wide_to_string(&monitor_info.szDevice),
            is_primary: (info.dwFlags & MONITORINFOF_PRIMARY) != 0,
            bounds: win32_rect_to_rect(&info.rcMonitor),
            work_area: win32_rect_to_rect(&info.rcWork),
            dpi: (dpi_x, dpi_y),
        })
    }
}

/// Callback function for monitor enumeration
///
/// Enumeration continues past monitors whose information cannot be read;
/// partial data beats no data.
unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let context = &mut *(lparam.0 as *mut EnumContext);
        match read_screen(hmonitor) {
            Some(screen) => context.screens.push(screen),
            None => warn!("skipping monitor {:?}: GetMonitorInfoW failed", hmonitor),
        }
        TRUE
    }
}

/// Enumerates all monitors in the order the OS reports them
pub fn enumerate_screens() -> Result<Vec<Screen>, PlatformError> {
    let mut context = EnumContext {
        screens: Vec::new(),
    };

    unsafe {
        if EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_proc),
            LPARAM(&mut context as *mut _ as isize),
        ) == FALSE
        {
            return Err(PlatformError::call("EnumDisplayMonitors"));
        }
    }

    debug!(count = context.screens.len(), "enumerated monitors");
    Ok(context.screens)
}

/// Gets the monitor nearest to the specified window
pub fn screen_of_window(window: WindowId) -> Result<Screen, PlatformError> {
    unsafe {
        let hmonitor = MonitorFromWindow(super::windows::hwnd(window), MONITOR_DEFAULTTONEAREST);
        if hmonitor.is_invalid() {
            return Err(PlatformError::MonitorNotFound(window));
        }
        read_screen(hmonitor).ok_or_else(|| PlatformError::call("GetMonitorInfoW"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_enumerate_screens() {
        let screens = enumerate_screens().expect("Should be able to enumerate monitors");
        assert!(!screens.is_empty(), "Should find at least one monitor");
        assert!(
            screens.iter().any(|s| s.is_primary),
            "Should have a primary monitor"
        );
        assert!(screens.iter().all(|s| !s.device_name.is_empty()));
    }
}
