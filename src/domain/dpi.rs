//! DPI ratio and the narrow size correction applied to window geometry
//!
//! The correction only kicks in for the 150% scaling factor: both axes of the
//! ratio must fall inside an open band (1.45, 1.55 by default). Every other
//! scale factor passes through untouched.

use crate::domain::core::Size;

/// Reference DPI that corresponds to 100% scaling
pub const REFERENCE_DPI: f64 = 96.0;

/// Dots per inch reported by the display subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Dpi {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts to a scale factor relative to 96 DPI
    pub fn ratio(&self) -> DpiRatio {
        DpiRatio {
            x: self.x / REFERENCE_DPI,
            y: self.y / REFERENCE_DPI,
        }
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::new(REFERENCE_DPI, REFERENCE_DPI)
    }
}

/// Scale factor between logical and physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiRatio {
    pub x: f64,
    pub y: f64,
}

impl DpiRatio {
    pub const IDENTITY: DpiRatio = DpiRatio { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Open interval of ratios for which window sizes get corrected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiBand {
    pub min: f64,
    pub max: f64,
}

impl DpiBand {
    pub const DEFAULT_MIN: f64 = 1.45;
    pub const DEFAULT_MAX: f64 = 1.55;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both axes must lie strictly inside the band
    pub fn contains(&self, ratio: DpiRatio) -> bool {
        self.min < ratio.x && ratio.x < self.max && self.min < ratio.y && ratio.y < self.max
    }

    /// Scales `size` by `ratio` when the ratio is inside the band; identity otherwise
    ///
    /// Scaled sides are truncated toward zero.
    pub fn correct_size(&self, size: Size, ratio: DpiRatio) -> Size {
        if !self.contains(ratio) {
            return size;
        }
        Size::new(
            (size.w as f64 * ratio.x) as i32,
            (size.h as f64 * ratio.y) as i32,
        )
    }
}

impl Default for DpiBand {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_relative_to_96() {
        let ratio = Dpi::new(144.0, 144.0).ratio();
        assert_eq!(ratio, DpiRatio::new(1.5, 1.5));
        assert_eq!(Dpi::default().ratio(), DpiRatio::IDENTITY);
    }

    #[test]
    fn band_is_open_on_both_ends() {
        let band = DpiBand::default();
        assert!(band.contains(DpiRatio::new(1.5, 1.5)));
        assert!(!band.contains(DpiRatio::new(1.45, 1.5)));
        assert!(!band.contains(DpiRatio::new(1.5, 1.55)));
    }

    #[test]
    fn both_axes_must_be_in_band() {
        let band = DpiBand::default();
        assert!(!band.contains(DpiRatio::new(1.5, 1.0)));
        assert!(!band.contains(DpiRatio::new(1.25, 1.5)));
    }

    #[test]
    fn correction_scales_at_150_percent() {
        let band = DpiBand::default();
        let corrected = band.correct_size(Size::new(800, 601), DpiRatio::new(1.5, 1.5));
        // 601 * 1.5 = 901.5, truncated
        assert_eq!(corrected, Size::new(1200, 901));
    }

    #[test]
    fn correction_is_identity_outside_band() {
        let band = DpiBand::default();
        let size = Size::new(800, 600);
        for ratio in [1.0, 1.25, 1.75, 2.0] {
            let ratio = DpiRatio::new(ratio, ratio);
            assert_eq!(band.correct_size(size, ratio), size);
            // applying twice changes nothing either
            assert_eq!(band.correct_size(band.correct_size(size, ratio), ratio), size);
        }
    }

    #[test]
    fn custom_band() {
        let band = DpiBand::new(1.2, 1.3);
        assert_eq!(
            band.correct_size(Size::new(100, 100), DpiRatio::new(1.25, 1.25)),
            Size::new(125, 125)
        );
        assert_eq!(
            band.correct_size(Size::new(100, 100), DpiRatio::new(1.5, 1.5)),
            Size::new(100, 100)
        );
    }
}
