//! General Windows platform utilities
//!
//! Conversions between domain types and Win32 structures that don't fit
//! into the more specialized platform modules.

use crate::domain::{MonitorId, Rect, WindowId};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Gdi::HMONITOR;

/// Converts a Windows RECT to domain rectangle
pub fn win32_rect_to_rect(rect: &RECT) -> Rect {
    Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

pub fn hwnd(window: WindowId) -> HWND {
    HWND(window.0)
}

pub fn window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0)
}

pub fn monitor_id(hmonitor: HMONITOR) -> MonitorId {
    MonitorId(hmonitor.0)
}

/// Decodes a NUL-terminated UTF-16 buffer
pub fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
