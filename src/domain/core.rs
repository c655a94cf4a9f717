//! Core domain types and operations
//!
//! This module defines pure geometric types and the opaque handles the
//! engine passes around. Nothing here knows about Win32.

/// Rectangle in pixel coordinates
///
/// Stored as origin plus size. The right and bottom edges are exclusive,
/// matching the `RECT` convention of the display subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle from origin and size
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle from its four edges (right/bottom exclusive)
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Returns the size of the rectangle
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the point reached by moving `offset` away from the top-left corner
    ///
    /// `None` when the point falls outside the `i32` coordinate range.
    pub fn offset_origin(&self, offset: Offset) -> Option<(i32, i32)> {
        Some((self.x.checked_add(offset.x)?, self.y.checked_add(offset.y)?))
    }
}

/// Integer width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// A size is degenerate when either side is not positive
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Displacement from a rectangle's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl std::str::FromStr for Offset {
    type Err = String;

    /// Parses `"X,Y"`; whitespace around either number is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
        let x = x
            .trim()
            .parse()
            .map_err(|_| format!("invalid horizontal offset '{}'", x.trim()))?;
        let y = y
            .trim()
            .parse()
            .map_err(|_| format!("invalid vertical offset '{}'", y.trim()))?;
        Ok(Offset::new(x, y))
    }
}

/// Opaque window handle owned by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub isize);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl std::str::FromStr for WindowId {
    type Err = String;

    /// Accepts decimal or `0x`-prefixed hexadecimal handles
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => isize::from_str_radix(hex, 16),
            None => s.parse(),
        };
        parsed
            .map(WindowId)
            .map_err(|_| format!("invalid window handle '{s}'"))
    }
}

/// Opaque monitor handle owned by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(pub isize);
