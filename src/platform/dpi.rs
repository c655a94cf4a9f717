//! System DPI of the default device context
//!
//! This is a single, global reading. On mixed-DPI setups it matches
//! whichever scale the process was started under, not any particular monitor.

use crate::domain::Dpi;
use tracing::warn;
use windows::Win32::Graphics::Gdi::{GetDC, GetDeviceCaps, LOGPIXELSX, LOGPIXELSY, ReleaseDC};

/// Reads horizontal/vertical DPI from the screen device context
///
/// Falls back to 96 DPI when no device context is available.
pub fn system_dpi() -> Dpi {
    unsafe {
        let hdc = GetDC(None);
        if hdc.is_invalid() {
            warn!("GetDC failed; assuming 96 DPI");
            return Dpi::default();
        }
        let x = GetDeviceCaps(hdc, LOGPIXELSX);
        let y = GetDeviceCaps(hdc, LOGPIXELSY);
        ReleaseDC(None, hdc);
        Dpi::new(x as f64, y as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_dpi_is_positive() {
        let dpi = system_dpi();
        assert!(dpi.x > 0.0);
        assert!(dpi.y > 0.0);
    }
}
