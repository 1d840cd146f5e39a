//! Glyphs of the frame and the fill.
//!
//! Every leaf holds exactly one `char`. Values are normalized on the way in:
//!
//! - longer strings keep only their first character,
//! - an empty string becomes a space,
//! - control and zero-width characters become [`FALLBACK_GLYPH`], since they
//!   would not occupy the one cell the frame layout assumes.

use super::{unknown_leaf, Corner, Horiz, Slot, StyleSet, Vert, FRAME_SCHEMA};
use crate::error::Result;
use once_cell::sync::Lazy;
use unicode_width::UnicodeWidthChar;

/// Glyph substituted for characters that cannot be drawn in a single cell.
pub const FALLBACK_GLYPH: char = '?';

/// Glyphs of every part of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    /// Unfilled part of the bar.
    pub empty: char,
    /// Filled part of the bar.
    pub full: char,
    /// Left and right edges.
    pub vert: Vert<char>,
    /// Top and bottom edges.
    pub horiz: Horiz<char>,
    /// Corners.
    pub corner: Corner<char>,
}

/// Normalizes a leaf value to a single drawable glyph.
///
/// Every glyph occupies exactly one cell; wide and zero-width characters are
/// replaced with [`FALLBACK_GLYPH`].
pub fn glyph(raw: &str) -> char {
    match raw.chars().next() {
        None => ' ',
        Some(c) if c.is_control() => FALLBACK_GLYPH,
        Some(c) if UnicodeWidthChar::width(c) != Some(1) => FALLBACK_GLYPH,
        Some(c) => c,
    }
}

impl CharSet {
    fn glyph_mut(&mut self, key: &str, sub: Option<&str>) -> Option<&mut char> {
        match (key, sub) {
            ("empty", None) => Some(&mut self.empty),
            ("full", None) => Some(&mut self.full),
            ("vert", Some(sub)) => self.vert.get_mut(sub),
            ("horiz", Some(sub)) => self.horiz.get_mut(sub),
            ("corner", Some(sub)) => self.corner.get_mut(sub),
            _ => None,
        }
    }

    fn glyph_at(&self, key: &str, sub: Option<&str>) -> Option<char> {
        match (key, sub) {
            ("empty", None) => Some(self.empty),
            ("full", None) => Some(self.full),
            ("vert", Some(sub)) => self.vert.get(sub).copied(),
            ("horiz", Some(sub)) => self.horiz.get(sub).copied(),
            ("corner", Some(sub)) => self.corner.get(sub).copied(),
            _ => None,
        }
    }

    const fn frame(
        empty: char,
        full: char,
        vert: char,
        horiz: char,
        corner: [char; 4],
    ) -> Self {
        Self {
            empty,
            full,
            vert: Vert { left: vert, right: vert },
            horiz: Horiz { top: horiz, bottom: horiz },
            corner: Corner {
                tleft: corner[0],
                tright: corner[1],
                bleft: corner[2],
                bright: corner[3],
            },
        }
    }

    const fn fill(empty: char, full: char) -> Self {
        Self::frame(empty, full, ' ', ' ', [' '; 4])
    }
}

impl Default for CharSet {
    fn default() -> Self {
        *DEFAULT
    }
}

impl StyleSet for CharSet {
    const NAME: &'static str = "CharSet";
    const SCHEMA: &'static [Slot] = &FRAME_SCHEMA;

    fn blank() -> Self {
        *BLANK
    }

    fn set_leaf(&mut self, key: &str, sub: Option<&str>, raw: &str) -> Result<()> {
        let slot = self
            .glyph_mut(key, sub)
            .ok_or_else(|| unknown_leaf(Self::NAME, key, sub))?;
        *slot = glyph(raw);
        Ok(())
    }

    fn leaf(&self, key: &str, sub: Option<&str>) -> String {
        self.glyph_at(key, sub).map(String::from).unwrap_or_default()
    }
}

// Presets

/// Spaces everywhere.
pub static BLANK: Lazy<CharSet> = Lazy::new(|| CharSet::fill(' ', ' '));

/// Shaded fill inside a single-line box.
pub static DEFAULT: Lazy<CharSet> =
    Lazy::new(|| CharSet::frame('░', '█', '│', '─', ['┌', '┐', '└', '┘']));

/// ASCII fill between square brackets: `[###...]`.
pub static BASIC: Lazy<CharSet> = Lazy::new(|| CharSet {
    vert: Vert { left: '[', right: ']' },
    ..CharSet::fill('.', '#')
});

/// Shaded fill with no frame.
pub static SLIM: Lazy<CharSet> = Lazy::new(|| CharSet::fill('░', '█'));

/// Filled and hollow circles.
pub static CIRCLES: Lazy<CharSet> = Lazy::new(|| CharSet::fill('○', '●'));

/// ASCII fill inside an ASCII box.
pub static BASIC2: Lazy<CharSet> = Lazy::new(|| CharSet::frame('.', '#', '|', '-', ['+'; 4]));

/// Solid blocks for both halves; tell them apart with colors.
pub static FULL: Lazy<CharSet> = Lazy::new(|| CharSet::fill('█', '█'));

/// Plus and minus signs.
pub static DIFF: Lazy<CharSet> = Lazy::new(|| CharSet::fill('-', '+'));

/// Braille dots.
pub static DOTS: Lazy<CharSet> = Lazy::new(|| CharSet::fill('⢸', '⣿'));

/// Triangles pointing at each other.
pub static TRIANGLES: Lazy<CharSet> = Lazy::new(|| CharSet::fill('◁', '▶'));

/// Solid fill over a diagonal pattern, dashed sides.
pub static BRICKS: Lazy<CharSet> = Lazy::new(|| CharSet {
    vert: Vert::all('┋'),
    ..CharSet::fill('▞', '█')
});

/// Solid fill inside a box with rounded corners.
pub static ROUNDED: Lazy<CharSet> =
    Lazy::new(|| CharSet::frame('▁', '█', '│', '─', ['╭', '╮', '╰', '╯']));

/// Shaded fill inside a double-line box.
pub static DOUBLE: Lazy<CharSet> =
    Lazy::new(|| CharSet::frame('░', '█', '║', '═', ['╔', '╗', '╚', '╝']));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sets::SetTree;

    #[test]
    fn test_glyph_normalization() {
        assert_eq!(glyph("abc"), 'a');
        assert_eq!(glyph(""), ' ');
        assert_eq!(glyph("\t"), FALLBACK_GLYPH);
        assert_eq!(glyph("\x1b[0m"), FALLBACK_GLYPH);
        assert_eq!(glyph("\u{200b}"), FALLBACK_GLYPH);
        assert_eq!(glyph("日"), FALLBACK_GLYPH);
        assert_eq!(glyph("🚀"), FALLBACK_GLYPH);
        assert_eq!(glyph("█"), '█');
    }

    #[test]
    fn test_from_tree_fills_missing_slots_with_blanks() {
        let set = CharSet::from_tree(&SetTree::from([("full", "#")])).unwrap();
        assert_eq!(set.full, '#');
        assert_eq!(set.empty, ' ');
        assert_eq!(set.corner, Corner::all(' '));
    }

    #[test]
    fn test_merge_over_preset() {
        let set = DEFAULT
            .merged(&SetTree::new().with("corner", SetTree::new().with("bright", "x")))
            .unwrap();
        assert_eq!(set.corner.bright, 'x');
        assert_eq!(set.corner.tleft, '┌');
        assert_eq!(set.full, '█');
    }

    #[test]
    fn test_long_values_are_truncated() {
        let set = CharSet::from_tree(&SetTree::from([("vert", "||||")])).unwrap();
        assert_eq!(set.vert, Vert::all('|'));
    }

    #[test]
    fn test_to_tree_lists_every_slot() {
        let tree = BASIC.to_tree();
        assert_eq!(tree.get("full").and_then(SetTree::as_leaf), Some("#"));
        assert_eq!(
            tree.get("vert").and_then(|v| v.get("left")).and_then(SetTree::as_leaf),
            Some("[")
        );
        assert_eq!(
            tree.get("corner").and_then(|v| v.get("bright")).and_then(SetTree::as_leaf),
            Some(" ")
        );
    }

    #[test]
    fn test_unknown_key_message_lists_valid_keys() {
        let err = CharSet::from_tree(&SetTree::from([("text", "x")])).unwrap_err();
        assert!(matches!(err, Error::UnknownKey { .. }));
        assert!(err.to_string().contains("empty, full, vert, horiz, corner"));
    }

    #[test]
    fn test_presets_are_single_width() {
        for set in [
            &*DEFAULT, &*BLANK, &*BASIC, &*SLIM, &*CIRCLES, &*BASIC2, &*FULL, &*DIFF, &*DOTS,
            &*TRIANGLES, &*BRICKS, &*ROUNDED, &*DOUBLE,
        ] {
            for c in [set.empty, set.full, set.vert.left, set.horiz.top, set.corner.bright] {
                assert_eq!(UnicodeWidthChar::width(c), Some(1), "{c:?}");
            }
        }
    }
}
