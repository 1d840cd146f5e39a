//! Composing frames into strings of escape sequences.
//!
//! Everything here is pure: given a geometry, styles, content and labels, it
//! returns the bytes to write. Writing, and deciding when to, is the bar's job.

use crate::color::Rgb;
use crate::content::Content;
use crate::geometry::Geometry;
use crate::runeutil::{display_width, truncate};
use crate::sets::{CharSet, ColorSet, Labels, TEXT_KEYS};
use crate::template;
use crate::term::seq;

/// A label placed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLabel {
    /// Slot name, one of `inside`, `right`, `left`, `title` or `subtitle`.
    pub slot: &'static str,
    /// First column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Text as drawn, after truncation.
    pub text: String,
}

/// Where each non-empty label lands around `geometry`.
///
/// Labels on the frame or inside the content area are cut to the content
/// width. Side labels sit one blank cell away from the frame on the middle
/// row; their room is reserved by the geometry margins.
pub fn place_labels(geometry: &Geometry, labels: &Labels) -> Vec<PlacedLabel> {
    let width = usize::try_from(geometry.width).unwrap_or(0);
    let middle = geometry.y + (geometry.height - 1) / 2;
    let cells = |text: &str| i32::try_from(display_width(text)).unwrap_or(i32::MAX);

    let mut placed = Vec::new();
    for &slot in TEXT_KEYS {
        let Some(raw) = labels.get(slot) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let (x, y, text) = match slot {
            "inside" => {
                let text = truncate(raw, width);
                (geometry.x + (geometry.width - cells(&text)) / 2, middle, text)
            }
            "title" => (geometry.x, geometry.y - 1, truncate(raw, width)),
            "subtitle" => {
                let text = truncate(raw, width);
                (
                    geometry.x + geometry.width - cells(&text),
                    geometry.y + geometry.height,
                    text,
                )
            }
            "right" => (geometry.x + geometry.width + 2, middle, raw.clone()),
            _ => (geometry.x - 2 - cells(raw), middle, raw.clone()),
        };
        placed.push(PlacedLabel { slot, x, y, text });
    }
    placed
}

/// A string of positioned, colored runs.
#[derive(Debug, Default)]
struct Canvas {
    out: String,
}

impl Canvas {
    /// Cells left of the first column or above the first row are off screen.
    fn put(&mut self, x: i32, y: i32, text: &str, color: Option<Rgb>) {
        if x < 1 || y < 1 || text.is_empty() {
            return;
        }
        self.out.push_str(&seq::set_pos(x, y));
        self.out.push_str(&seq::color(color, false));
        self.out.push_str(text);
    }

    fn run(&mut self, x: i32, y: i32, glyph: char, len: usize, color: Option<Rgb>) {
        self.put(x, y, &glyph.to_string().repeat(len), color);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Draws a complete frame: border, content, then labels.
pub fn compose(
    geometry: &Geometry,
    charset: &CharSet,
    colorset: &ColorSet,
    content: &Content,
    labels: &Labels,
) -> String {
    let mut canvas = Canvas::default();
    let Geometry { x, y, width, height } = *geometry;
    let inner = usize::try_from(width).unwrap_or(0);
    let (left, right) = (x - 1, x + width);
    let (top, bottom) = (y - 1, y + height);

    canvas.run(left, top, charset.corner.tleft, 1, colorset.corner.tleft);
    canvas.run(x, top, charset.horiz.top, inner, colorset.horiz.top);
    canvas.run(right, top, charset.corner.tright, 1, colorset.corner.tright);
    for row in y..bottom {
        canvas.run(left, row, charset.vert.left, 1, colorset.vert.left);
        canvas.run(right, row, charset.vert.right, 1, colorset.vert.right);
    }
    canvas.run(left, bottom, charset.corner.bleft, 1, colorset.corner.bleft);
    canvas.run(x, bottom, charset.horiz.bottom, inner, colorset.horiz.bottom);
    canvas.run(right, bottom, charset.corner.bright, 1, colorset.corner.bright);

    for span in &content.spans {
        canvas.run(span.x, span.y, span.glyph, span.len, span.color);
    }

    for label in place_labels(geometry, labels) {
        let color = colorset.text.get(label.slot).copied().flatten();
        canvas.put(label.x, label.y, &label.text, color);
    }

    canvas.finish()
}

/// Spaces over everything [`compose`] would draw for `geometry` and `labels`.
pub fn erase(geometry: &Geometry, labels: &Labels) -> String {
    let mut canvas = Canvas::default();
    let Geometry { x, y, width, height } = *geometry;
    let outer = usize::try_from(width + 2).unwrap_or(0);

    for row in y - 1..=y + height {
        canvas.run(x - 1, row, ' ', outer, None);
    }
    // only side labels reach outside the frame
    for label in place_labels(geometry, labels) {
        if matches!(label.slot, "left" | "right") {
            canvas.put(label.x, label.y, &template::blank(&label.text), None);
        }
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentGenerator, Direction, FillStyle};
    use crate::sets::{charset, colorset, TextSlots};

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        let mut labels = TextSlots::all(String::new());
        for (slot, text) in pairs {
            if let Some(value) = labels.get_mut(slot) {
                *value = text.to_string();
            }
        }
        labels
    }

    #[test]
    fn test_place_labels() {
        let geometry = Geometry::new(10, 5, 8, 3);
        let placed = place_labels(
            &geometry,
            &labels(&[
                ("inside", "50%"),
                ("right", "ok"),
                ("left", "abc"),
                ("title", "A long title"),
                ("subtitle", "sub"),
            ]),
        );
        let at = |slot: &str| placed.iter().find(|p| p.slot == slot).unwrap();

        assert_eq!((at("inside").x, at("inside").y), (12, 6));
        assert_eq!((at("right").x, at("right").y), (20, 6));
        assert_eq!((at("left").x, at("left").y), (5, 6));
        assert_eq!((at("title").x, at("title").y), (10, 4));
        assert_eq!(at("title").text, "A long …");
        assert_eq!((at("subtitle").x, at("subtitle").y), (15, 8));
    }

    #[test]
    fn test_empty_labels_are_not_placed() {
        let placed = place_labels(&Geometry::new(2, 2, 5, 1), &labels(&[("inside", "x")]));
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn test_compose_border_and_content() {
        let geometry = Geometry::new(2, 2, 4, 1);
        let style = FillStyle::from_sets(&charset::BASIC2, &colorset::BLANK);
        let content = Direction::Left.generate(geometry, &style, 0.5);
        let out = compose(
            &geometry,
            &charset::BASIC2,
            &colorset::BLANK,
            &content,
            &labels(&[]),
        );

        assert!(out.starts_with("\x1b[1;1f\x1b[0m+\x1b[1;2f\x1b[0m----"));
        assert!(out.contains("\x1b[2;1f\x1b[0m|"));
        assert!(out.contains("\x1b[2;6f\x1b[0m|"));
        assert!(out.contains("\x1b[2;2f\x1b[0m##"));
        assert!(out.contains("\x1b[2;4f\x1b[0m.."));
        assert!(out.contains("\x1b[3;2f\x1b[0m----"));
    }

    #[test]
    fn test_compose_colors_text() {
        let geometry = Geometry::new(2, 2, 6, 1);
        let out = compose(
            &geometry,
            &charset::DEFAULT,
            &colorset::DEFAULT,
            &Content::default(),
            &labels(&[("inside", "hi")]),
        );
        assert!(out.ends_with("\x1b[2;4f\x1b[38;2;255;255;255mhi"));
    }

    #[test]
    fn test_offscreen_cells_are_skipped() {
        let geometry = Geometry::new(1, 1, 3, 1);
        let out = compose(
            &geometry,
            &charset::DEFAULT,
            &colorset::BLANK,
            &Content::default(),
            &labels(&[("title", "t")]),
        );
        assert!(!out.contains("\x1b[0;"));
        assert!(!out.contains(";0f"));
    }

    #[test]
    fn test_erase_covers_footprint() {
        let geometry = Geometry::new(6, 3, 4, 1);
        let out = erase(&geometry, &labels(&[("left", "ab"), ("right", "xyz"), ("title", "t")]));
        assert_eq!(
            out,
            [
                "\x1b[2;5f\x1b[0m      ",
                "\x1b[3;5f\x1b[0m      ",
                "\x1b[4;5f\x1b[0m      ",
                "\x1b[3;12f\x1b[0m   ",
                "\x1b[3;2f\x1b[0m  ",
            ]
            .concat()
        );
    }
}
