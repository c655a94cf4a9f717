//! Alignment flags and offset resolution
//!
//! Converts a set of alignment directives into the offset of a window's
//! top-left corner from a work area's top-left corner. Pure arithmetic; the
//! window size passed in is expected to be DPI-corrected already.

use crate::domain::core::{Offset, Rect, Size};
use bitflags::bitflags;
use serde::Deserialize;

bitflags! {
    /// Symmetric positioning directives, combinable per axis
    ///
    /// `LEFT | RIGHT` centers horizontally and `TOP | BOTTOM` centers
    /// vertically. `CENTER` centers both axes unless an explicit flag on
    /// that axis is also present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
    #[serde(try_from = "String")]
    pub struct Alignment: u32 {
        const CENTER = 0x01;
        const LEFT = 0x02;
        const RIGHT = 0x04;
        const TOP = 0x08;
        const BOTTOM = 0x10;
    }
}

/// Placement along a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisPlacement {
    Start,
    Middle,
    End,
}

impl AxisPlacement {
    fn resolve(start: bool, end: bool, center: bool) -> Self {
        match (start, end) {
            (true, true) => AxisPlacement::Middle,
            (true, false) => AxisPlacement::Start,
            (false, true) => AxisPlacement::End,
            (false, false) if center => AxisPlacement::Middle,
            // No directive on this axis: stick to the start edge
            (false, false) => AxisPlacement::Start,
        }
    }

    /// Halves never overflow; the far edge saturates at the `i32` range
    fn offset(self, available: i32, extent: i32) -> i32 {
        match self {
            AxisPlacement::Start => 0,
            AxisPlacement::Middle => (available / 2) - (extent / 2),
            AxisPlacement::End => available.saturating_sub(extent),
        }
    }
}

impl Alignment {
    /// Resolves this alignment to an offset inside `area` for a window of `window` size
    pub fn resolve(self, window: Size, area: &Rect) -> Offset {
        resolve_offset(window, area, self)
    }
}

/// Computes the offset from `area`'s top-left corner that satisfies `alignment`
///
/// Divisions truncate toward zero, each operand separately. No clamping is
/// applied: a window larger than the area yields negative offsets. A window
/// with a non-positive side is a contract violation and resolves to the
/// area's origin.
pub fn resolve_offset(window: Size, area: &Rect, alignment: Alignment) -> Offset {
    if window.is_degenerate() || alignment.is_empty() {
        return Offset::ZERO;
    }

    let center = alignment.contains(Alignment::CENTER);
    let horizontal = AxisPlacement::resolve(
        alignment.contains(Alignment::LEFT),
        alignment.contains(Alignment::RIGHT),
        center,
    );
    let vertical = AxisPlacement::resolve(
        alignment.contains(Alignment::TOP),
        alignment.contains(Alignment::BOTTOM),
        center,
    );

    Offset::new(
        horizontal.offset(area.w, window.w),
        vertical.offset(area.h, window.h),
    )
}

/// Error returned when alignment text cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alignment '{0}' (expected none, center, left, right, top or bottom)")]
pub struct ParseAlignmentError(pub String);

impl std::str::FromStr for Alignment {
    type Err = ParseAlignmentError;

    /// Parses names separated by `|`, `,` or `+`, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alignment = Alignment::empty();
        for part in s.split(['|', ',', '+']) {
            let flag = match part.trim().to_ascii_lowercase().as_str() {
                "none" | "" => Alignment::empty(),
                "center" | "centre" => Alignment::CENTER,
                "left" => Alignment::LEFT,
                "right" => Alignment::RIGHT,
                "top" => Alignment::TOP,
                "bottom" => Alignment::BOTTOM,
                _ => return Err(ParseAlignmentError(part.trim().to_string())),
            };
            alignment |= flag;
        }
        Ok(alignment)
    }
}

impl TryFrom<String> for Alignment {
    type Error = ParseAlignmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        f.write_str(&names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Size = Size { w: 800, h: 600 };
    const FULL_HD: Rect = Rect { x: 0, y: 0, w: 1920, h: 1080 };

    #[test]
    fn center_centers_both_axes() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::CENTER),
            Offset::new(560, 240)
        );
    }

    #[test]
    fn left_top_is_origin() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::LEFT | Alignment::TOP),
            Offset::new(0, 0)
        );
    }

    #[test]
    fn right_bottom_hugs_far_corner() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::RIGHT | Alignment::BOTTOM),
            Offset::new(1120, 480)
        );
    }

    #[test]
    fn left_and_right_center_horizontally_only() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::LEFT | Alignment::RIGHT),
            Offset::new(560, 0)
        );
    }

    #[test]
    fn top_and_bottom_center_vertically_only() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::TOP | Alignment::BOTTOM),
            Offset::new(0, 240)
        );
    }

    #[test]
    fn explicit_axis_flag_overrides_center() {
        let offset = resolve_offset(WINDOW, &FULL_HD, Alignment::CENTER | Alignment::RIGHT);
        assert_eq!(offset, Offset::new(1120, 240));

        let offset = resolve_offset(WINDOW, &FULL_HD, Alignment::CENTER | Alignment::TOP);
        assert_eq!(offset, Offset::new(560, 0));
    }

    #[test]
    fn none_is_origin() {
        assert_eq!(
            resolve_offset(WINDOW, &FULL_HD, Alignment::empty()),
            Offset::ZERO
        );
    }

    #[test]
    fn halves_truncate_independently() {
        // 1281/2 = 640, 801/2 = 400
        let area = Rect::new(0, 0, 1281, 721);
        let offset = resolve_offset(Size::new(801, 401), &area, Alignment::CENTER);
        assert_eq!(offset, Offset::new(240, 160));
    }

    #[test]
    fn oversized_window_yields_negative_offsets() {
        let area = Rect::new(0, 0, 1280, 720);
        let offset = resolve_offset(Size::new(1920, 1080), &area, Alignment::CENTER);
        assert_eq!(offset, Offset::new(-320, -180));

        let offset = resolve_offset(Size::new(1920, 1080), &area, Alignment::RIGHT | Alignment::BOTTOM);
        assert_eq!(offset, Offset::new(-640, -360));
    }

    #[test]
    fn extreme_sizes_saturate() {
        let offset = resolve_offset(Size::new(i32::MAX, 10), &Rect::new(0, 0, -10, 10), Alignment::RIGHT);
        assert_eq!(offset, Offset::new(i32::MIN, 0));

        let offset = resolve_offset(Size::new(i32::MAX, i32::MAX), &Rect::new(0, 0, i32::MIN, 10), Alignment::CENTER);
        assert_eq!(offset, Offset::new(i32::MIN / 2 - i32::MAX / 2, 5 - i32::MAX / 2));
    }

    #[test]
    fn offset_ignores_area_origin() {
        let secondary = Rect::new(1920, 0, 1920, 1040);
        assert_eq!(
            resolve_offset(WINDOW, &secondary, Alignment::CENTER),
            Offset::new(560, 220)
        );
    }

    #[test]
    fn degenerate_window_resolves_to_origin() {
        assert_eq!(
            resolve_offset(Size::new(0, 600), &FULL_HD, Alignment::CENTER),
            Offset::ZERO
        );
        assert_eq!(
            resolve_offset(Size::new(800, -1), &FULL_HD, Alignment::RIGHT),
            Offset::ZERO
        );
    }

    #[test]
    fn resolution_is_repeatable() {
        for bits in 0..=Alignment::all().bits() {
            let alignment = Alignment::from_bits_truncate(bits);
            let first = resolve_offset(WINDOW, &FULL_HD, alignment);
            let second = resolve_offset(WINDOW, &FULL_HD, alignment);
            assert_eq!(first, second, "alignment {alignment} is not stable");
        }
    }

    #[test]
    fn parse_alignment_text() {
        assert_eq!("center".parse(), Ok(Alignment::CENTER));
        assert_eq!(
            "Left|Top".parse(),
            Ok(Alignment::LEFT | Alignment::TOP)
        );
        assert_eq!(
            "right, bottom".parse(),
            Ok(Alignment::RIGHT | Alignment::BOTTOM)
        );
        assert_eq!("none".parse(), Ok(Alignment::empty()));
        assert!("middle".parse::<Alignment>().is_err());
    }

    #[test]
    fn display_lists_flag_names() {
        assert_eq!(Alignment::empty().to_string(), "none");
        assert_eq!((Alignment::CENTER | Alignment::TOP).to_string(), "center|top");
    }
}
