//! Colors of the frame, the fill and the text slots.
//!
//! Leaves are `Option<Rgb>`: `None` draws with the terminal's default color.
//! Leaf values accept every form [`Rgb::parse`] does, and an empty string
//! for `None`.
//!
//! ```rust
//! use pbar::color::Rgb;
//! use pbar::sets::{colorset, SetTree, StyleSet};
//!
//! let set = colorset::DEFAULT
//!     .merged(&SetTree::new().with("full", "springGreen").with("text", ""))
//!     .unwrap();
//! assert_eq!(set.full, Some(Rgb::new(0, 255, 127)));
//! assert_eq!(set.text.title, None);
//! ```

use super::{unknown_leaf, Corner, Horiz, Slot, StyleSet, TextSlots, Vert, FRAME_SCHEMA, TEXT_KEYS};
use crate::color::Rgb;
use crate::error::Result;
use once_cell::sync::Lazy;

/// Colors of every part of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSet {
    /// Unfilled part of the bar.
    pub empty: Option<Rgb>,
    /// Filled part of the bar.
    pub full: Option<Rgb>,
    /// Left and right edges.
    pub vert: Vert<Option<Rgb>>,
    /// Top and bottom edges.
    pub horiz: Horiz<Option<Rgb>>,
    /// Corners.
    pub corner: Corner<Option<Rgb>>,
    /// The five text slots.
    pub text: TextSlots<Option<Rgb>>,
}

const COLOR_SCHEMA: [Slot; 6] = [
    FRAME_SCHEMA[0],
    FRAME_SCHEMA[1],
    FRAME_SCHEMA[2],
    FRAME_SCHEMA[3],
    FRAME_SCHEMA[4],
    Slot::group("text", TEXT_KEYS),
];

impl ColorSet {
    fn color_mut(&mut self, key: &str, sub: Option<&str>) -> Option<&mut Option<Rgb>> {
        match (key, sub) {
            ("empty", None) => Some(&mut self.empty),
            ("full", None) => Some(&mut self.full),
            ("vert", Some(sub)) => self.vert.get_mut(sub),
            ("horiz", Some(sub)) => self.horiz.get_mut(sub),
            ("corner", Some(sub)) => self.corner.get_mut(sub),
            ("text", Some(sub)) => self.text.get_mut(sub),
            _ => None,
        }
    }

    fn color_at(&self, key: &str, sub: Option<&str>) -> Option<Option<Rgb>> {
        match (key, sub) {
            ("empty", None) => Some(self.empty),
            ("full", None) => Some(self.full),
            ("vert", Some(sub)) => self.vert.get(sub).copied(),
            ("horiz", Some(sub)) => self.horiz.get(sub).copied(),
            ("corner", Some(sub)) => self.corner.get(sub).copied(),
            ("text", Some(sub)) => self.text.get(sub).copied(),
            _ => None,
        }
    }

    /// A set with one color for the fill halves and one for everything else.
    fn uniform(empty: Rgb, full: Rgb, frame: Rgb) -> Self {
        let frame = Some(frame);
        Self {
            empty: Some(empty),
            full: Some(full),
            vert: Vert::all(frame),
            horiz: Horiz::all(frame),
            corner: Corner::all(frame),
            text: TextSlots::all(frame),
        }
    }
}

/// Parses a color leaf; blank input means the terminal default.
pub fn parse_leaf(raw: &str) -> Result<Option<Rgb>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Rgb::parse(raw).map(Some)
}

impl StyleSet for ColorSet {
    const NAME: &'static str = "ColorSet";
    const SCHEMA: &'static [Slot] = &COLOR_SCHEMA;

    fn blank() -> Self {
        Self::default()
    }

    fn set_leaf(&mut self, key: &str, sub: Option<&str>, raw: &str) -> Result<()> {
        let color = parse_leaf(raw)?;
        let slot = self
            .color_mut(key, sub)
            .ok_or_else(|| unknown_leaf(Self::NAME, key, sub))?;
        *slot = color;
        Ok(())
    }

    fn leaf(&self, key: &str, sub: Option<&str>) -> String {
        self.color_at(key, sub)
            .flatten()
            .map(|rgb| rgb.to_hex())
            .unwrap_or_default()
    }
}

const WHITE: Rgb = Rgb::new(255, 255, 255);
const PURE_RED: Rgb = Rgb::new(255, 0, 0);
const PURE_YELLOW: Rgb = Rgb::new(255, 255, 0);
const SPRING_GREEN: Rgb = Rgb::new(0, 255, 127);

/// No colors at all: every part uses the terminal default.
pub static BLANK: Lazy<ColorSet> = Lazy::new(ColorSet::default);

/// Green fill over a red background, white frame and text.
pub static DEFAULT: Lazy<ColorSet> = Lazy::new(|| {
    ColorSet::uniform(Rgb::new(0xff, 0x4d, 0x4d), Rgb::new(0x15, 0xf2, 0x8d), WHITE)
});

/// Spring green over blue, pink frame.
pub static DARVIL: Lazy<ColorSet> = Lazy::new(|| {
    let pink = Rgb::new(0xf7, 0x6f, 0x98);
    ColorSet {
        text: TextSlots {
            title: Some(pink),
            subtitle: Some(pink),
            ..TextSlots::all(Some(SPRING_GREEN))
        },
        ..ColorSet::uniform(Rgb::new(0x00, 0x67, 0xc2), SPRING_GREEN, pink)
    }
});

/// Red over dark red, salmon frame.
pub static RED: Lazy<ColorSet> =
    Lazy::new(|| ColorSet::uniform(Rgb::new(139, 0, 0), PURE_RED, Rgb::new(0xff, 0x64, 0x64)));

/// Lime over green, pale green frame.
pub static GREEN: Lazy<ColorSet> = Lazy::new(|| {
    let lime = Rgb::new(0, 255, 0);
    ColorSet {
        text: TextSlots::all(Some(lime)),
        ..ColorSet::uniform(Rgb::new(0, 128, 0), lime, Rgb::new(152, 251, 152))
    }
});

/// Yellow over brown, sand frame.
pub static YELLOW: Lazy<ColorSet> = Lazy::new(|| {
    ColorSet::uniform(Rgb::new(0xa7, 0x72, 0x27), PURE_YELLOW, Rgb::new(0xda, 0xb7, 0x7b))
});

/// Red and yellow, like the flag of Spain.
pub static FLAG_ES: Lazy<ColorSet> = Lazy::new(|| ColorSet {
    vert: Vert::all(Some(PURE_YELLOW)),
    text: TextSlots {
        title: Some(PURE_RED),
        subtitle: Some(PURE_RED),
        ..TextSlots::all(Some(PURE_YELLOW))
    },
    ..ColorSet::uniform(Rgb::new(0x9a, 0x76, 0x00), PURE_YELLOW, PURE_RED)
});

/// Orange to pink stripes.
pub static FLAG_LESBIAN: Lazy<ColorSet> = Lazy::new(|| {
    let top = Some(Rgb::new(0xff, 0x98, 0x79));
    let bottom = Some(Rgb::new(0xe5, 0x7b, 0xb9));
    ColorSet {
        horiz: Horiz { top, bottom },
        corner: Corner {
            tleft: top,
            tright: top,
            bleft: bottom,
            bright: bottom,
        },
        text: TextSlots {
            title: top,
            subtitle: bottom,
            ..TextSlots::all(Some(WHITE))
        },
        ..ColorSet::uniform(Rgb::new(0x77, 0x77, 0x77), WHITE, WHITE)
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sets::SetTree;

    #[test]
    fn test_parse_leaf_forms() {
        assert_eq!(parse_leaf("").unwrap(), None);
        assert_eq!(parse_leaf("  ").unwrap(), None);
        assert_eq!(parse_leaf("#0f0").unwrap(), Some(Rgb::new(0, 255, 0)));
        assert_eq!(parse_leaf("paleGreen").unwrap(), Some(Rgb::new(152, 251, 152)));
        assert_eq!(parse_leaf("1,2,3").unwrap(), Some(Rgb::new(1, 2, 3)));
        assert!(matches!(parse_leaf("nope"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_group_scalar_broadcast() {
        let set = ColorSet::from_tree(&SetTree::from([("text", "red")])).unwrap();
        assert_eq!(set.text, TextSlots::all(Some(PURE_RED)));
        assert_eq!(set.full, None);
    }

    #[test]
    fn test_text_is_not_a_charset_key() {
        // text exists only in the color schema
        let tree = SetTree::new().with("text", SetTree::new().with("title", "#fff"));
        let set = ColorSet::from_tree(&tree).unwrap();
        assert_eq!(set.text.title, Some(WHITE));
        assert!(crate::sets::CharSet::from_tree(&tree).is_err());
    }

    #[test]
    fn test_invalid_color_propagates() {
        let tree = SetTree::new().with("corner", SetTree::new().with("tleft", "#12345"));
        assert!(matches!(
            DEFAULT.merged(&tree),
            Err(Error::InvalidColor(value)) if value == "#12345"
        ));
    }

    #[test]
    fn test_to_tree_uses_hex_and_blank() {
        let tree = DEFAULT.to_tree();
        assert_eq!(tree.get("full").and_then(SetTree::as_leaf), Some("#15f28d"));
        let tree = BLANK.to_tree();
        assert_eq!(tree.get("empty").and_then(SetTree::as_leaf), Some(""));
    }

    #[test]
    fn test_preset_shapes() {
        assert_eq!(FLAG_ES.vert.left, Some(PURE_YELLOW));
        assert_eq!(FLAG_ES.horiz.top, Some(PURE_RED));
        assert_eq!(FLAG_ES.text.subtitle, Some(PURE_RED));
        assert_eq!(DARVIL.text.inside, Some(SPRING_GREEN));
        assert_eq!(FLAG_LESBIAN.corner.bleft, Some(Rgb::new(0xe5, 0x7b, 0xb9)));
        assert_eq!(GREEN.text.left, Some(Rgb::new(0, 255, 0)));
    }
}
