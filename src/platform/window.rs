//! Window geometry and positioning
//!
//! This module handles:
//! - Reading a window's outer rectangle, border size and maximized state
//! - Restoring and re-maximizing windows
//! - Moving windows without changing their Z-order or focus
//! - Answering `WM_GETMINMAXINFO` so a window maximizes over its whole monitor

use super::PlatformError;
use super::windows::{hwnd, win32_rect_to_rect, window_id};
use crate::domain::{Rect, WindowGeometry, WindowId, maximize_bounds};
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
};
use windows::Win32::UI::WindowsAndMessaging::*;

/// Reads the geometry of the specified window
pub fn window_geometry(window: WindowId) -> Result<WindowGeometry, PlatformError> {
    unsafe {
        let handle = hwnd(window);
        if !IsWindow(handle).as_bool() {
            return Err(PlatformError::InvalidWindow(window));
        }

        let mut info = WINDOWINFO {
            cbSize: std::mem::size_of::<WINDOWINFO>() as u32,
            ..Default::default()
        };
        GetWindowInfo(handle, &mut info).map_err(|e| PlatformError::call_with("GetWindowInfo", e))?;

        Ok(WindowGeometry {
            bounds: win32_rect_to_rect(&info.rcWindow),
            borders: (info.cxWindowBorders as i32, info.cyWindowBorders as i32),
            is_maximized: is_maximized(handle),
        })
    }
}

fn is_maximized(handle: HWND) -> bool {
    let mut placement = WINDOWPLACEMENT {
        length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
        ..Default::default()
    };

    unsafe {
        if GetWindowPlacement(handle, &mut placement).is_ok() {
            placement.showCmd == (SW_SHOWMAXIMIZED.0 as u32)
        } else {
            false
        }
    }
}

/// Maximizes or restores the specified window
///
/// `ShowWindow` reports the previous visibility rather than success, so only
/// an invalid handle is treated as an error.
pub fn set_maximized(window: WindowId, maximized: bool) -> Result<(), PlatformError> {
    unsafe {
        let handle = hwnd(window);
        if !IsWindow(handle).as_bool() {
            return Err(PlatformError::InvalidWindow(window));
        }
        let command = if maximized { SW_MAXIMIZE } else { SW_RESTORE };
        let _ = ShowWindow(handle, command);
    }
    Ok(())
}

/// Moves and resizes a window to the specified rectangle
///
/// The window's Z-order and focus are left untouched.
pub fn move_window(window: WindowId, target: Rect) -> Result<(), PlatformError> {
    unsafe {
        let handle = hwnd(window);
        if !IsWindow(handle).as_bool() {
            return Err(PlatformError::InvalidWindow(window));
        }

        // SWP_NOZORDER makes the insert-after handle irrelevant
        SetWindowPos(
            handle,
            HWND(0),
            target.x,
            target.y,
            target.w,
            target.h,
            SWP_NOACTIVATE | SWP_NOZORDER,
        )
        .map_err(|e| PlatformError::call_with("SetWindowPos", e))
    }
}

/// Gets the currently active (foreground) window
pub fn foreground_window() -> Option<WindowId> {
    let handle = unsafe { GetForegroundWindow() };
    if handle.0 == 0 {
        None
    } else {
        Some(window_id(handle))
    }
}

unsafe extern "system" fn collect_window_proc(handle: HWND, lparam: LPARAM) -> BOOL {
    unsafe {
        let windows = &mut *(lparam.0 as *mut Vec<WindowId>);
        windows.push(window_id(handle));
        TRUE
    }
}

/// Lists every top-level window on the desktop
pub fn top_level_windows() -> Vec<WindowId> {
    let mut windows: Vec<WindowId> = Vec::new();
    unsafe {
        let _ = EnumWindows(
            Some(collect_window_proc),
            LPARAM(&mut windows as *mut _ as isize),
        );
    }
    windows
}

/// Lists the top-level windows created by one thread
pub fn thread_windows(thread_id: u32) -> Vec<WindowId> {
    let mut windows: Vec<WindowId> = Vec::new();
    unsafe {
        let _ = EnumThreadWindows(
            thread_id,
            Some(collect_window_proc),
            LPARAM(&mut windows as *mut _ as isize),
        );
    }
    windows
}

/// A visible window with no owner is what users see as an application's main window
pub fn is_main_window(window: WindowId) -> bool {
    unsafe {
        let handle = hwnd(window);
        IsWindowVisible(handle).as_bool() && GetWindow(handle, GW_OWNER).0 == 0
    }
}

/// Fills the `MINMAXINFO` of a `WM_GETMINMAXINFO` message for `handle`
///
/// Call from a window procedure; `lparam` must be the message's `LPARAM`.
/// The window then maximizes over the full bounds of its nearest monitor.
///
/// # Safety
/// `lparam` must point to a valid `MINMAXINFO`, as it does for
/// `WM_GETMINMAXINFO`.
pub unsafe fn apply_monitor_min_max_info(handle: HWND, lparam: LPARAM) {
    unsafe {
        let monitor = MonitorFromWindow(handle, MONITOR_DEFAULTTONEAREST);
        if monitor.is_invalid() {
            return;
        }

        let mut monitor_info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if !GetMonitorInfoW(monitor, &mut monitor_info).as_bool() {
            return;
        }

        let borders = window_geometry(window_id(handle))
            .map(|g| g.borders)
            .unwrap_or((0, 0));
        let bounds = maximize_bounds(&win32_rect_to_rect(&monitor_info.rcMonitor), borders);

        let mmi = &mut *(lparam.0 as *mut MINMAXINFO);
        mmi.ptMaxPosition = POINT {
            x: bounds.position.0,
            y: bounds.position.1,
        };
        mmi.ptMaxSize = POINT {
            x: bounds.size.0,
            y: bounds.size.1,
        };
        mmi.ptMinTrackSize = POINT {
            x: bounds.min_track.0,
            y: bounds.min_track.1,
        };
        mmi.ptMaxTrackSize = POINT {
            x: bounds.max_track.0,
            y: bounds.max_track.1,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_handle_is_rejected() {
        let invalid = WindowId(999_999);
        assert_eq!(
            window_geometry(invalid),
            Err(PlatformError::InvalidWindow(invalid))
        );
        assert_eq!(
            move_window(invalid, Rect::new(0, 0, 100, 100)),
            Err(PlatformError::InvalidWindow(invalid))
        );
    }

    #[test]
    fn foreground_window_has_geometry() {
        // Only meaningful on an interactive desktop
        if let Some(window) = foreground_window() {
            let geometry = window_geometry(window).expect("foreground window geometry");
            assert!(geometry.bounds.w >= 0);
            assert!(geometry.bounds.h >= 0);
        }
    }
}
