//! Turning declared positions and sizes into terminal cells.
//!
//! A bar declares where it wants to be with a [`Position`] and how big with a
//! [`Size`]. Both are symbolic: coordinates can be absolute, counted from the
//! far edge, centered on the screen or relative to the cursor, and sizes can
//! stretch to the screen edge. [`Bounds`] resolves them against the live
//! terminal into a [`Geometry`], clamped so the whole footprint (frame and
//! side labels included) stays on screen.
//!
//! All coordinates are 1-based, like the terminal's own.
//!
//! ```rust
//! use pbar::geometry::{Bounds, Coord, Margins, Position, Size};
//! use pbar::term::TermSize;
//!
//! let bounds = Bounds::new(TermSize::new(80, 24), None, Margins::frame());
//! let geometry = bounds.resolve(&Position::default(), &Size::new(-1, 1), true);
//!
//! assert_eq!(geometry.width, 78);
//! assert_eq!((geometry.x, geometry.y), (2, 12));
//! assert_eq!("center+3".parse::<Coord>().unwrap(), Coord::Center(3));
//! ```

use crate::error::{Error, Result};
use crate::term::TermSize;
use std::fmt;
use std::str::FromStr;

/// Smallest width or height a bar resolves to.
pub const MIN_SIZE: i32 = 1;

/// One declared coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coord {
    /// A cell index. Negative values count from the far edge, `-1` being the
    /// last cell.
    Abs(i32),
    /// The middle of the screen plus an offset. Parsed from `"center[±n]"` or
    /// `"c[±n]"`.
    Center(i32),
    /// The cursor position plus an offset. Parsed from `"r[±n]"`.
    Relative(i32),
}

impl Coord {
    /// Parses `"12"`, `"-3"`, `"center"`, `"c+2"`, `"r"` or `"r-1"`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCoordinate(s.to_string());
        let trimmed = s.trim().to_ascii_lowercase();

        let offset = |rest: &str| -> Result<i32> {
            if rest.is_empty() {
                Ok(0)
            } else {
                rest.parse::<i32>().map_err(|_| invalid())
            }
        };

        if let Some(rest) = trimmed.strip_prefix("center") {
            Ok(Coord::Center(offset(rest)?))
        } else if let Some(rest) = trimmed.strip_prefix('c') {
            Ok(Coord::Center(offset(rest)?))
        } else if let Some(rest) = trimmed.strip_prefix('r') {
            Ok(Coord::Relative(offset(rest)?))
        } else {
            trimmed.parse::<i32>().map(Coord::Abs).map_err(|_| invalid())
        }
    }

    /// The target cell on an axis of length `extent`, before centering and
    /// clamping.
    fn target(&self, extent: i32, cursor: Option<i32>) -> i32 {
        match *self {
            Coord::Abs(v) if v < 0 => extent.saturating_add(v).saturating_add(1),
            Coord::Abs(v) => v,
            Coord::Center(offset) => (extent / 2).saturating_add(offset),
            Coord::Relative(offset) => cursor.unwrap_or(1).saturating_add(offset),
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Coord::Center(0)
    }
}

impl FromStr for Coord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<i32> for Coord {
    fn from(value: i32) -> Self {
        Coord::Abs(value)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Coord::Abs(v) => write!(f, "{v}"),
            Coord::Center(0) => f.write_str("center"),
            Coord::Center(o) => write!(f, "center{o:+}"),
            Coord::Relative(0) => f.write_str("r"),
            Coord::Relative(o) => write!(f, "r{o:+}"),
        }
    }
}

/// Declared position of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Column.
    pub x: Coord,
    /// Row.
    pub y: Coord,
}

impl Position {
    /// Creates a position from anything convertible to coordinates.
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Whether either coordinate follows the cursor.
    pub fn is_relative(&self) -> bool {
        matches!(self.x, Coord::Relative(_)) || matches!(self.y, Coord::Relative(_))
    }

    /// Parses both coordinates.
    pub fn parse(x: &str, y: &str) -> Result<Self> {
        Ok(Self {
            x: x.parse()?,
            y: y.parse()?,
        })
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Declared size of a bar's content area, excluding the frame.
///
/// Negative values stretch towards the screen edge: `-1` reaches it exactly,
/// `-2` stops one cell short, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Columns.
    pub width: i32,
    /// Rows.
    pub height: i32,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(20, 1)
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// Cells a bar's footprint occupies outside its content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    /// Columns left of the content.
    pub left: i32,
    /// Columns right of the content.
    pub right: i32,
    /// Rows above the content.
    pub top: i32,
    /// Rows below the content.
    pub bottom: i32,
}

impl Margins {
    /// Just the frame: one cell on every side.
    pub const fn frame() -> Self {
        Self {
            left: 1,
            right: 1,
            top: 1,
            bottom: 1,
        }
    }

    /// The frame plus side labels of the given display widths, each separated
    /// from the frame by one blank cell.
    pub fn with_labels(left_width: usize, right_width: usize) -> Self {
        let side = |width: usize| match width {
            0 => 1,
            w => 2 + i32::try_from(w).unwrap_or(i32::MAX - 2),
        };
        Self {
            left: side(left_width),
            right: side(right_width),
            ..Self::frame()
        }
    }

    fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// A resolved content area in terminal cells.
///
/// The frame is drawn one cell outside it on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    /// First column of the content.
    pub x: i32,
    /// First row of the content.
    pub y: i32,
    /// Content columns.
    pub width: i32,
    /// Content rows.
    pub height: i32,
}

impl Geometry {
    /// Creates a geometry.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same area moved up by `rows`.
    pub fn shifted_up(&self, rows: i32) -> Self {
        Self {
            y: self.y - rows,
            ..*self
        }
    }
}

/// Everything the resolver needs to know about the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Screen size.
    pub terminal: TermSize,
    /// Cursor position, 1-based, when known.
    pub cursor: Option<(i32, i32)>,
    /// Space the footprint needs around the content.
    pub margins: Margins,
}

impl Bounds {
    /// Creates the bounds.
    pub fn new(terminal: TermSize, cursor: Option<(i32, i32)>, margins: Margins) -> Self {
        Self {
            terminal,
            cursor,
            margins,
        }
    }

    fn cols(&self) -> i32 {
        i32::from(self.terminal.cols)
    }

    fn rows(&self) -> i32 {
        i32::from(self.terminal.rows)
    }

    /// Resolves a declared size to `(width, height)`.
    pub fn resolve_size(&self, size: &Size) -> (i32, i32) {
        (
            resolve_extent(size.width, self.cols(), self.margins.horizontal()),
            resolve_extent(size.height, self.rows(), self.margins.vertical()),
        )
    }

    /// Resolves a declared position for content of an already resolved size.
    ///
    /// With `centered`, the position names the middle of the content rather
    /// than its top-left cell.
    pub fn resolve_position(&self, position: &Position, size: (i32, i32), centered: bool) -> (i32, i32) {
        let (width, height) = size;
        let x = resolve_axis(
            position.x.target(self.cols(), self.cursor.map(|c| c.0)),
            width,
            centered,
            self.cols(),
            self.margins.left,
            self.margins.right,
        );
        let y = resolve_axis(
            position.y.target(self.rows(), self.cursor.map(|c| c.1)),
            height,
            centered,
            self.rows(),
            self.margins.top,
            self.margins.bottom,
        );
        (x, y)
    }

    /// Resolves size, then position.
    pub fn resolve(&self, position: &Position, size: &Size, centered: bool) -> Geometry {
        let (width, height) = self.resolve_size(size);
        let (x, y) = self.resolve_position(position, (width, height), centered);
        Geometry::new(x, y, width, height)
    }
}

fn resolve_extent(declared: i32, extent: i32, margin: i32) -> i32 {
    let available = (extent - margin).max(MIN_SIZE);
    let value = if declared < 0 {
        (extent - margin).saturating_add(declared).saturating_add(1)
    } else {
        declared
    };
    value.clamp(MIN_SIZE, available)
}

fn resolve_axis(target: i32, size: i32, centered: bool, extent: i32, before: i32, after: i32) -> i32 {
    let start = if centered {
        target.saturating_sub(size / 2)
    } else {
        target
    };
    let low = 1 + before;
    let high = extent - size - after + 1;
    // the lower bound wins on screens too small for the footprint
    start.min(high).max(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(cols: u16, rows: u16) -> Bounds {
        Bounds::new(TermSize::new(cols, rows), None, Margins::frame())
    }

    #[test]
    fn test_parse_coords() {
        assert_eq!(Coord::parse("12").unwrap(), Coord::Abs(12));
        assert_eq!(Coord::parse("-3").unwrap(), Coord::Abs(-3));
        assert_eq!(Coord::parse("center").unwrap(), Coord::Center(0));
        assert_eq!(Coord::parse("Center-4").unwrap(), Coord::Center(-4));
        assert_eq!(Coord::parse("c").unwrap(), Coord::Center(0));
        assert_eq!(Coord::parse("c+2").unwrap(), Coord::Center(2));
        assert_eq!(Coord::parse("r").unwrap(), Coord::Relative(0));
        assert_eq!(Coord::parse("r1").unwrap(), Coord::Relative(1));
        assert_eq!(Coord::parse("r-2").unwrap(), Coord::Relative(-2));
        assert!(matches!(Coord::parse("middle"), Err(Error::InvalidCoordinate(_))));
        assert!(Coord::parse("cx").is_err());
        assert!(Coord::parse("").is_err());
    }

    #[test]
    fn test_coord_display_parses_back() {
        for coord in [Coord::Abs(-2), Coord::Center(0), Coord::Center(-3), Coord::Relative(4)] {
            assert_eq!(coord.to_string().parse::<Coord>().unwrap(), coord);
        }
    }

    #[test]
    fn test_negative_size_reaches_the_edge() {
        let b = bounds(80, 24);
        assert_eq!(b.resolve_size(&Size::new(-1, -1)), (78, 22));
        assert_eq!(b.resolve_size(&Size::new(-3, 1)), (76, 1));
    }

    #[test]
    fn test_size_is_clamped() {
        let b = bounds(80, 24);
        assert_eq!(b.resolve_size(&Size::new(500, 0)), (78, MIN_SIZE));
        assert_eq!(b.resolve_size(&Size::new(-500, -500)), (MIN_SIZE, MIN_SIZE));
        // a screen smaller than the frame still yields a drawable size
        assert_eq!(bounds(1, 1).resolve_size(&Size::new(10, 10)), (MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn test_size_accounts_for_label_margins() {
        let b = Bounds::new(TermSize::new(80, 24), None, Margins::with_labels(3, 10));
        assert_eq!(b.margins.left, 5);
        assert_eq!(b.margins.right, 12);
        assert_eq!(b.resolve_size(&Size::new(-1, 1)).0, 80 - 17);
    }

    #[test]
    fn test_center_resolves_before_centering_offset() {
        let b = bounds(80, 24);
        let pos = Position::default();
        assert_eq!(b.resolve_position(&pos, (20, 1), true), (40 - 10, 12));
        assert_eq!(b.resolve_position(&pos, (20, 1), false), (40, 12));
    }

    #[test]
    fn test_negative_position_counts_from_the_far_edge() {
        let b = bounds(80, 24);
        let pos = Position::new(-30, -5);
        assert_eq!(b.resolve_position(&pos, (10, 1), false), (51, 20));
    }

    #[test]
    fn test_position_keeps_footprint_on_screen() {
        let b = bounds(80, 24);
        let geometry = b.resolve(&Position::new(1, 1), &Size::new(10, 2), false);
        assert_eq!((geometry.x, geometry.y), (2, 2));
        let geometry = b.resolve(&Position::new(80, 24), &Size::new(10, 2), false);
        assert_eq!((geometry.x, geometry.y), (80 - 10, 24 - 2));
        assert_eq!(geometry.x + geometry.width, 80);
    }

    #[test]
    fn test_relative_position_uses_cursor() {
        let mut b = bounds(80, 24);
        b.cursor = Some((10, 5));
        let pos = Position::new(Coord::Relative(3), Coord::Relative(1));
        assert_eq!(b.resolve_position(&pos, (5, 1), false), (13, 6));

        b.cursor = None;
        assert_eq!(b.resolve_position(&pos, (5, 1), false), (4, 2));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let b = bounds(100, 40);
        let pos = Position::parse("c-7", "r+2").unwrap();
        let size = Size::new(-10, 3);
        assert_eq!(b.resolve(&pos, &size, true), b.resolve(&pos, &size, true));
    }

    #[test]
    fn test_tiny_screen_prefers_lower_bound() {
        let b = bounds(5, 3);
        let geometry = b.resolve(&Position::new(4, 3), &Size::new(20, 5), false);
        assert_eq!(geometry, Geometry::new(2, 2, 3, 1));
    }

    #[test]
    fn test_extreme_offsets_saturate() {
        let mut b = bounds(80, 24);
        b.cursor = Some((10, 5));
        let pos = Position::parse("center+2147483647", "r+2147483647").unwrap();
        let geometry = b.resolve(&pos, &Size::new(10, 1), true);
        assert_eq!((geometry.x, geometry.y), (70, 23));

        let pos = Position::new(i32::MIN, Coord::Center(i32::MIN));
        let geometry = b.resolve(&pos, &Size::new(i32::MIN, 1), true);
        assert_eq!(geometry, Geometry::new(2, 2, MIN_SIZE, 1));
    }
}
