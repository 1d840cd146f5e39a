//! Fill generators: what the inside of a bar looks like at a given ratio.
//!
//! A generator receives the content area, the glyphs and colors of both
//! halves, and the completed ratio, and answers with a list of [`Span`]s to
//! paint. Spans are painted in order, so a generator may lay down a
//! background first and overlay the filled part on top of it.
//!
//! The twelve built-in fills are the [`Direction`] variants. Others can be
//! added at runtime through a [`Registry`].
//!
//! ```rust
//! use pbar::content::{ContentGenerator, Direction, FillStyle};
//! use pbar::geometry::Geometry;
//!
//! let style = FillStyle::new('#', '.');
//! let content = Direction::Left.generate(Geometry::new(1, 1, 10, 1), &style, 0.3);
//!
//! assert_eq!((content.full, content.empty), (3, 7));
//! ```

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::sets::{CharSet, ColorSet};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// A horizontal run of one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Glyph repeated along the run.
    pub glyph: char,
    /// Foreground color; `None` is the terminal default.
    pub color: Option<Rgb>,
    /// Number of cells.
    pub len: usize,
}

/// Glyphs and colors of the two halves of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStyle {
    /// Glyph of the completed part.
    pub full: char,
    /// Glyph of the remaining part.
    pub empty: char,
    /// Color of the completed part.
    pub full_color: Option<Rgb>,
    /// Color of the remaining part.
    pub empty_color: Option<Rgb>,
}

impl FillStyle {
    /// An uncolored style.
    pub fn new(full: char, empty: char) -> Self {
        Self {
            full,
            empty,
            full_color: None,
            empty_color: None,
        }
    }

    /// The fill halves of a char set and a color set.
    pub fn from_sets(charset: &CharSet, colorset: &ColorSet) -> Self {
        Self {
            full: charset.full,
            empty: charset.empty,
            full_color: colorset.full,
            empty_color: colorset.empty,
        }
    }

    /// The same style with the halves swapped.
    pub fn inverted(&self) -> Self {
        Self {
            full: self.empty,
            empty: self.full,
            full_color: self.empty_color,
            empty_color: self.full_color,
        }
    }
}

/// What a generator paints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    /// Runs to paint, in order.
    pub spans: Vec<Span>,
    /// Cells along the axis the fill measures.
    pub extent: usize,
    /// Completed cells along that axis.
    pub full: usize,
    /// Remaining cells along that axis.
    pub empty: usize,
}

/// Turns a ratio into something to paint.
pub trait ContentGenerator {
    /// Paints `area` for a completed `ratio` in `[0, 1]`.
    ///
    /// Ratios outside the interval are clamped.
    fn generate(&self, area: Geometry, style: &FillStyle, ratio: f64) -> Content;
}

impl<F> ContentGenerator for F
where
    F: Fn(Geometry, &FillStyle, f64) -> Content,
{
    fn generate(&self, area: Geometry, style: &FillStyle, ratio: f64) -> Content {
        self(area, style, ratio)
    }
}

/// The built-in fills, named after where the completed part grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Left to right.
    Left,
    /// Right to left.
    Right,
    /// Top to bottom.
    Top,
    /// Bottom to top.
    Bottom,
    /// From the middle column outwards.
    CenterX,
    /// From the middle row outwards.
    CenterY,
    /// A rectangle growing from the top-left corner.
    CornerTl,
    /// A rectangle growing from the top-right corner.
    CornerTr,
    /// A rectangle growing from the bottom-left corner.
    CornerBl,
    /// A rectangle growing from the bottom-right corner.
    CornerBr,
    /// A rectangle growing from the middle.
    Center,
    /// [`Direction::Left`] for wide areas, [`Direction::Bottom`] otherwise.
    #[default]
    Auto,
}

impl Direction {
    /// Every direction.
    pub const ALL: [Direction; 12] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
        Direction::CenterX,
        Direction::CenterY,
        Direction::CornerTl,
        Direction::CornerTr,
        Direction::CornerBl,
        Direction::CornerBr,
        Direction::Center,
        Direction::Auto,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::CenterX => "center_x",
            Direction::CenterY => "center_y",
            Direction::CornerTl => "corner_tl",
            Direction::CornerTr => "corner_tr",
            Direction::CornerBl => "corner_bl",
            Direction::CornerBr => "corner_br",
            Direction::Center => "center",
            Direction::Auto => "auto",
        }
    }

    /// What `auto` settles on for an area.
    fn settle(self, area: &Geometry) -> Direction {
        match self {
            Direction::Auto if area.width > area.height * 2 => Direction::Left,
            Direction::Auto => Direction::Bottom,
            other => other,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| Error::UnknownFill(s.to_string()))
    }
}

impl ContentGenerator for Direction {
    fn generate(&self, area: Geometry, style: &FillStyle, ratio: f64) -> Content {
        let w = usize::try_from(area.width).unwrap_or(0);
        let h = usize::try_from(area.height).unwrap_or(0);
        let mut painter = Painter::new(area, style);

        match self.settle(&area) {
            Direction::Left => {
                let f = filled(ratio, w);
                painter.full(0, 0, f, h);
                painter.empty(f, 0, w - f, h);
                painter.finish(w, f)
            }
            Direction::Right => {
                let f = filled(ratio, w);
                painter.empty(0, 0, w - f, h);
                painter.full(w - f, 0, f, h);
                painter.finish(w, f)
            }
            Direction::Top => {
                let f = filled(ratio, h);
                painter.full(0, 0, w, f);
                painter.empty(0, f, w, h - f);
                painter.finish(h, f)
            }
            Direction::Bottom => {
                let f = filled(ratio, h);
                painter.empty(0, 0, w, h - f);
                painter.full(0, h - f, w, f);
                painter.finish(h, f)
            }
            Direction::CenterX => {
                let f = filled(ratio, w);
                painter.empty(0, 0, w, h);
                painter.full((w - f) / 2, 0, f, h);
                painter.finish(w, f)
            }
            Direction::CenterY => {
                let f = filled(ratio, h);
                painter.empty(0, 0, w, h);
                painter.full(0, (h - f) / 2, w, f);
                painter.finish(h, f)
            }
            corner => {
                let fx = filled(ratio, w);
                let fy = if fx == 0 { 0 } else { filled_up(ratio, h).max(1).min(h) };
                let (dx, dy) = match corner {
                    Direction::CornerTl => (0, 0),
                    Direction::CornerTr => (w - fx, 0),
                    Direction::CornerBl => (0, h - fy),
                    Direction::CornerBr => (w - fx, h - fy),
                    _ => ((w - fx) / 2, (h - fy) / 2),
                };
                painter.empty(0, 0, w, h);
                painter.full(dx, dy, fx, fy);
                painter.finish(w, fx)
            }
        }
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// `floor(ratio * extent)`, immune to float noise like `0.29 * 100`.
fn filled(ratio: f64, extent: usize) -> usize {
    let cells = (clamp_ratio(ratio) * extent as f64 + 1e-9).floor() as usize;
    cells.min(extent)
}

fn filled_up(ratio: f64, extent: usize) -> usize {
    let cells = (clamp_ratio(ratio) * extent as f64 - 1e-9).ceil().max(0.0) as usize;
    cells.min(extent)
}

/// Collects spans relative to the top-left cell of an area.
struct Painter<'a> {
    area: Geometry,
    style: &'a FillStyle,
    spans: Vec<Span>,
}

impl<'a> Painter<'a> {
    fn new(area: Geometry, style: &'a FillStyle) -> Self {
        Self {
            area,
            style,
            spans: Vec::new(),
        }
    }

    fn rect(&mut self, dx: usize, dy: usize, w: usize, h: usize, glyph: char, color: Option<Rgb>) {
        if w == 0 {
            return;
        }
        let x = self.area.x + dx as i32;
        for row in 0..h {
            self.spans.push(Span {
                x,
                y: self.area.y + (dy + row) as i32,
                glyph,
                color,
                len: w,
            });
        }
    }

    fn full(&mut self, dx: usize, dy: usize, w: usize, h: usize) {
        self.rect(dx, dy, w, h, self.style.full, self.style.full_color);
    }

    fn empty(&mut self, dx: usize, dy: usize, w: usize, h: usize) {
        self.rect(dx, dy, w, h, self.style.empty, self.style.empty_color);
    }

    fn finish(self, extent: usize, full: usize) -> Content {
        Content {
            spans: self.spans,
            extent,
            full,
            empty: extent - full,
        }
    }
}

/// A fill: one of the built-in directions or a named custom generator.
#[derive(Clone)]
pub enum Fill {
    /// A built-in direction.
    Builtin(Direction),
    /// A generator added through a [`Registry`].
    Custom(String, Rc<dyn ContentGenerator>),
}

impl Fill {
    /// Name the fill is registered under.
    pub fn name(&self) -> &str {
        match self {
            Fill::Builtin(direction) => direction.name(),
            Fill::Custom(name, _) => name,
        }
    }

    /// Paints `area`, see [`ContentGenerator::generate`].
    pub fn generate(&self, area: Geometry, style: &FillStyle, ratio: f64) -> Content {
        match self {
            Fill::Builtin(direction) => direction.generate(area, style, ratio),
            Fill::Custom(_, generator) => generator.generate(area, style, ratio),
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Builtin(Direction::Auto)
    }
}

impl From<Direction> for Fill {
    fn from(direction: Direction) -> Self {
        Fill::Builtin(direction)
    }
}

impl fmt::Debug for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Builtin(direction) => f.debug_tuple("Builtin").field(direction).finish(),
            Fill::Custom(name, _) => f.debug_tuple("Custom").field(name).finish(),
        }
    }
}

/// Fills by name.
#[derive(Debug, Clone)]
pub struct Registry {
    fills: HashMap<String, Fill>,
}

impl Registry {
    /// A registry holding the built-in directions.
    pub fn new() -> Self {
        let fills = Direction::ALL
            .into_iter()
            .map(|d| (d.name().to_string(), Fill::Builtin(d)))
            .collect();
        Self { fills }
    }

    /// Adds a generator, replacing any fill of the same name.
    pub fn register(&mut self, name: impl Into<String>, generator: impl ContentGenerator + 'static) {
        let name = name.into().to_ascii_lowercase();
        let fill = Fill::Custom(name.clone(), Rc::new(generator));
        self.fills.insert(name, fill);
    }

    /// Looks a fill up by name, case-insensitively.
    pub fn get(&self, name: &str) -> Result<Fill> {
        self.fills
            .get(&name.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownFill(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> FillStyle {
        FillStyle::new('#', '.')
    }

    fn cells(content: &Content, glyph: char) -> usize {
        content.spans.iter().filter(|s| s.glyph == glyph).map(|s| s.len).sum()
    }

    /// Paints spans onto a grid the size of `area`.
    fn paint(area: Geometry, content: &Content) -> Vec<String> {
        let mut grid = vec![vec![' '; area.width as usize]; area.height as usize];
        for span in &content.spans {
            for i in 0..span.len {
                let x = (span.x - area.x) as usize + i;
                let y = (span.y - area.y) as usize;
                grid[y][x] = span.glyph;
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    #[test]
    fn test_segments_add_up_for_every_direction() {
        for direction in Direction::ALL {
            for ratio in [0.0, 0.25, 0.5, 0.75, 1.0] {
                for extent in [1, 5, 50] {
                    for area in [Geometry::new(1, 1, extent, 3), Geometry::new(1, 1, 3, extent)] {
                        let content = direction.generate(area, &style(), ratio);
                        assert_eq!(
                            content.full + content.empty,
                            content.extent,
                            "{direction} {ratio} {area:?}"
                        );
                        if ratio == 0.0 {
                            assert_eq!(content.full, 0, "{direction} {area:?}");
                        }
                        if ratio == 1.0 {
                            assert_eq!(content.full, content.extent, "{direction} {area:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_cell_is_painted() {
        let area = Geometry::new(4, 2, 9, 5);
        for direction in Direction::ALL {
            for ratio in [0.0, 0.4, 1.0] {
                let grid = paint(area, &direction.generate(area, &style(), ratio));
                assert!(grid.iter().all(|row| !row.contains(' ')), "{direction} {ratio}");
            }
        }
    }

    #[test]
    fn test_left_and_right() {
        let area = Geometry::new(1, 1, 10, 1);
        let left = Direction::Left.generate(area, &style(), 0.3);
        assert_eq!(paint(area, &left), vec!["###......."]);
        let right = Direction::Right.generate(area, &style(), 0.3);
        assert_eq!(paint(area, &right), vec![".......###"]);
    }

    #[test]
    fn test_vertical_fills() {
        let area = Geometry::new(1, 1, 2, 4);
        let bottom = Direction::Bottom.generate(area, &style(), 0.5);
        assert_eq!(paint(area, &bottom), vec!["..", "..", "##", "##"]);
        let top = Direction::Top.generate(area, &style(), 0.25);
        assert_eq!(paint(area, &top), vec!["##", "..", "..", ".."]);
    }

    #[test]
    fn test_center_x_overlays_a_centered_run() {
        let area = Geometry::new(1, 1, 10, 1);
        let content = Direction::CenterX.generate(area, &style(), 0.4);
        assert_eq!(paint(area, &content), vec!["...####..."]);
        assert_eq!((content.full, content.empty), (4, 6));
    }

    #[test]
    fn test_corner_rectangle() {
        let area = Geometry::new(1, 1, 4, 2);
        let content = Direction::CornerBr.generate(area, &style(), 0.5);
        assert_eq!(paint(area, &content), vec!["....", "..##"]);
        let content = Direction::CornerTl.generate(area, &style(), 0.5);
        assert_eq!(paint(area, &content), vec!["##..", "...."]);
        assert_eq!(cells(&content, '#'), 2);
    }

    #[test]
    fn test_auto_picks_by_shape() {
        let wide = Geometry::new(1, 1, 20, 1);
        assert_eq!(Direction::Auto.settle(&wide), Direction::Left);
        let tall = Geometry::new(1, 1, 2, 5);
        assert_eq!(Direction::Auto.settle(&tall), Direction::Bottom);
    }

    #[test]
    fn test_float_noise_does_not_lose_a_cell() {
        let content = Direction::Left.generate(Geometry::new(1, 1, 100, 1), &style(), 0.29);
        assert_eq!(content.full, 29);
    }

    #[test]
    fn test_out_of_range_ratio_is_clamped() {
        let area = Geometry::new(1, 1, 5, 1);
        assert_eq!(Direction::Left.generate(area, &style(), 1.7).full, 5);
        assert_eq!(Direction::Left.generate(area, &style(), -0.2).full, 0);
        assert_eq!(Direction::Left.generate(area, &style(), f64::NAN).full, 0);
    }

    #[test]
    fn test_inverted_style_swaps_halves() {
        let style = FillStyle {
            full_color: Some(Rgb::new(1, 2, 3)),
            ..style()
        };
        let inverted = style.inverted();
        assert_eq!((inverted.full, inverted.empty), ('.', '#'));
        assert_eq!(inverted.empty_color, Some(Rgb::new(1, 2, 3)));
        assert_eq!(inverted.full_color, None);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("center_x".parse::<Direction>().unwrap(), Direction::CenterX);
        assert_eq!("Corner_BR".parse::<Direction>().unwrap(), Direction::CornerBr);
        assert!(matches!("diagonal".parse::<Direction>(), Err(Error::UnknownFill(_))));
    }

    #[test]
    fn test_registry() {
        let mut registry = Registry::new();
        assert_eq!(registry.names().len(), Direction::ALL.len());
        assert!(matches!(registry.get("spiral"), Err(Error::UnknownFill(name)) if name == "spiral"));

        registry.register("solid", |area: Geometry, style: &FillStyle, _ratio: f64| Content {
            spans: vec![Span {
                x: area.x,
                y: area.y,
                glyph: style.full,
                color: None,
                len: area.width as usize,
            }],
            extent: area.width as usize,
            full: area.width as usize,
            empty: 0,
        });

        let fill = registry.get("Solid").unwrap();
        assert_eq!(fill.name(), "solid");
        let content = fill.generate(Geometry::new(1, 1, 3, 1), &style(), 0.0);
        assert_eq!(content.full, 3);
        assert_eq!(registry.get("bottom").unwrap().name(), "bottom");
    }
}
