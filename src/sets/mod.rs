//! Style sets: the glyphs, colors and text templates a bar is drawn with.
//!
//! A bar carries three sets:
//!
//! - [`CharSet`]: the glyph of every part of the frame and the fill.
//! - [`ColorSet`]: the color of every part of the frame, the fill and the
//!   text around it.
//! - [`FormatSet`]: the templates of the five text slots.
//!
//! Each set is a closed struct with a fixed tree of named slots:
//!
//! ```text
//! CharSet / ColorSet:
//!   empty, full
//!   vert   { left, right }
//!   horiz  { top, bottom }
//!   corner { tleft, tright, bleft, bright }
//! ColorSet only:
//!   text   { inside, right, left, title, subtitle }
//! FormatSet:
//!   inside, right, left, title, subtitle
//! ```
//!
//! # Partial trees
//!
//! Callers describe sets, or changes to them, with a [`SetTree`]: a partial,
//! dynamically shaped tree of string values. It is merged slot by slot over a
//! base set:
//!
//! - a value given for a group of slots applies to every slot in the group,
//! - a value given at the root applies to every slot of the set,
//! - a group given for a group merges key by key, unnamed slots keep their
//!   base value,
//! - a group given for a single slot is [`Error::ExpectedValue`],
//! - any key missing from the schema is [`Error::UnknownKey`].
//!
//! ```rust
//! use pbar::sets::{CharSet, SetTree, StyleSet};
//!
//! let set = CharSet::from_tree(
//!     &SetTree::new()
//!         .with("full", "#")
//!         .with("vert", "|")
//!         .with("corner", SetTree::new().with("tleft", "+")),
//! ).unwrap();
//!
//! assert_eq!(set.full, '#');
//! assert_eq!(set.vert.left, '|');
//! assert_eq!(set.vert.right, '|');
//! assert_eq!(set.corner.tleft, '+');
//! assert_eq!(set.corner.tright, ' ');
//!
//! assert!(CharSet::from_tree(&SetTree::new().with("fill", "#")).is_err());
//! ```
//!
//! Merging never modifies the base set; it returns a new one, so a failed
//! merge leaves the caller's set intact.

pub mod charset;
pub mod colorset;
pub mod formatset;

pub use charset::CharSet;
pub use colorset::ColorSet;
pub use formatset::{FormatSet, Labels};

use crate::color::Rgb;
use crate::error::{Error, Result};

/// A partial description of a style set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetTree {
    /// A single value, applied to every slot below the point where it sits.
    Leaf(String),
    /// Named children, in insertion order.
    Group(Vec<(String, SetTree)>),
}

impl SetTree {
    /// An empty group. Merging it changes nothing.
    pub fn new() -> Self {
        SetTree::Group(Vec::new())
    }

    /// Adds (or replaces) the child `key`.
    ///
    /// Calling it on a leaf turns the leaf into a group.
    pub fn with(self, key: impl Into<String>, value: impl Into<SetTree>) -> Self {
        let key = key.into();
        let value = value.into();
        match self {
            SetTree::Group(mut children) => {
                match children.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => children.push((key, value)),
                }
                SetTree::Group(children)
            }
            SetTree::Leaf(_) => SetTree::Group(vec![(key, value)]),
        }
    }

    /// Looks up a direct child.
    pub fn get(&self, key: &str) -> Option<&SetTree> {
        match self {
            SetTree::Group(children) => children.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            SetTree::Leaf(_) => None,
        }
    }

    /// The value of a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            SetTree::Leaf(value) => Some(value),
            SetTree::Group(_) => None,
        }
    }
}

impl Default for SetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SetTree {
    fn from(value: &str) -> Self {
        SetTree::Leaf(value.to_string())
    }
}

impl From<String> for SetTree {
    fn from(value: String) -> Self {
        SetTree::Leaf(value)
    }
}

impl From<char> for SetTree {
    fn from(value: char) -> Self {
        SetTree::Leaf(value.to_string())
    }
}

impl From<Rgb> for SetTree {
    fn from(value: Rgb) -> Self {
        SetTree::Leaf(value.to_hex())
    }
}

impl From<Option<Rgb>> for SetTree {
    fn from(value: Option<Rgb>) -> Self {
        SetTree::Leaf(value.map(|rgb| rgb.to_hex()).unwrap_or_default())
    }
}

impl<K: Into<String>, V: Into<SetTree>, const N: usize> From<[(K, V); N]> for SetTree {
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .fold(SetTree::new(), |tree, (k, v)| tree.with(k, v))
    }
}

/// One top-level slot of a set schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Name of the slot.
    pub key: &'static str,
    /// Names of the sub-slots. Empty for a single-value slot.
    pub children: &'static [&'static str],
}

impl Slot {
    /// A single-value slot.
    pub const fn leaf(key: &'static str) -> Self {
        Self { key, children: &[] }
    }

    /// A slot grouping several sub-slots.
    pub const fn group(key: &'static str, children: &'static [&'static str]) -> Self {
        Self { key, children }
    }

    /// Whether the slot holds a single value.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Behavior shared by [`CharSet`], [`ColorSet`] and [`FormatSet`].
///
/// Implementors describe their schema and how to read and write one leaf as
/// a string; merging and conversion to a [`SetTree`] come for free.
pub trait StyleSet: Sized + Clone {
    /// Type name used in error messages.
    const NAME: &'static str;
    /// Top-level slots, in display order.
    const SCHEMA: &'static [Slot];

    /// The set with every slot blank.
    fn blank() -> Self;

    /// Writes one leaf from its string form. `sub` is `None` for top-level
    /// single-value slots.
    fn set_leaf(&mut self, key: &str, sub: Option<&str>, raw: &str) -> Result<()>;

    /// Reads one leaf in string form.
    fn leaf(&self, key: &str, sub: Option<&str>) -> String;

    /// Builds a set by merging `tree` over [`StyleSet::blank`].
    fn from_tree(tree: &SetTree) -> Result<Self> {
        Self::blank().merged(tree)
    }

    /// Returns a copy of `self` with `tree` merged over it.
    fn merged(&self, tree: &SetTree) -> Result<Self> {
        let mut set = self.clone();
        merge_into(&mut set, tree)?;
        Ok(set)
    }

    /// The full tree of the set, every leaf in string form.
    fn to_tree(&self) -> SetTree {
        let children = Self::SCHEMA
            .iter()
            .map(|slot| {
                let value = if slot.is_leaf() {
                    SetTree::Leaf(self.leaf(slot.key, None))
                } else {
                    SetTree::Group(
                        slot.children
                            .iter()
                            .map(|sub| (sub.to_string(), SetTree::Leaf(self.leaf(slot.key, Some(sub)))))
                            .collect(),
                    )
                };
                (slot.key.to_string(), value)
            })
            .collect();
        SetTree::Group(children)
    }
}

fn allowed(keys: impl Iterator<Item = &'static str>) -> String {
    keys.collect::<Vec<_>>().join(", ")
}

fn merge_into<S: StyleSet>(set: &mut S, tree: &SetTree) -> Result<()> {
    match tree {
        SetTree::Leaf(value) => {
            for slot in S::SCHEMA {
                set_slot(set, slot, value)?;
            }
            Ok(())
        }
        SetTree::Group(children) => {
            for (key, value) in children {
                let slot = S::SCHEMA
                    .iter()
                    .find(|slot| slot.key == key.as_str())
                    .ok_or_else(|| Error::UnknownKey {
                        set: S::NAME,
                        key: key.clone(),
                        allowed: allowed(S::SCHEMA.iter().map(|s| s.key)),
                    })?;
                merge_slot(set, slot, value)?;
            }
            Ok(())
        }
    }
}

fn merge_slot<S: StyleSet>(set: &mut S, slot: &Slot, value: &SetTree) -> Result<()> {
    match value {
        SetTree::Leaf(raw) => set_slot(set, slot, raw),
        SetTree::Group(_) if slot.is_leaf() => Err(Error::ExpectedValue {
            set: S::NAME,
            key: slot.key.to_string(),
        }),
        SetTree::Group(children) => {
            for (sub, value) in children {
                let path = format!("{}.{}", slot.key, sub);
                let sub = slot
                    .children
                    .iter()
                    .copied()
                    .find(|name| *name == sub.as_str())
                    .ok_or_else(|| Error::UnknownKey {
                        set: S::NAME,
                        key: path.clone(),
                        allowed: allowed(slot.children.iter().copied()),
                    })?;
                match value {
                    SetTree::Leaf(raw) => set.set_leaf(slot.key, Some(sub), raw)?,
                    SetTree::Group(_) => {
                        return Err(Error::ExpectedValue { set: S::NAME, key: path })
                    }
                }
            }
            Ok(())
        }
    }
}

fn set_slot<S: StyleSet>(set: &mut S, slot: &Slot, raw: &str) -> Result<()> {
    if slot.is_leaf() {
        return set.set_leaf(slot.key, None, raw);
    }
    for sub in slot.children {
        set.set_leaf(slot.key, Some(sub), raw)?;
    }
    Ok(())
}

pub(crate) fn unknown_leaf(set: &'static str, key: &str, sub: Option<&str>) -> Error {
    let key = match sub {
        Some(sub) => format!("{key}.{sub}"),
        None => key.to_string(),
    };
    Error::UnknownKey {
        set,
        key,
        allowed: String::new(),
    }
}

/// The left and right frame edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vert<T> {
    /// Left edge.
    pub left: T,
    /// Right edge.
    pub right: T,
}

/// The top and bottom frame edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Horiz<T> {
    /// Top edge.
    pub top: T,
    /// Bottom edge.
    pub bottom: T,
}

/// The four frame corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Corner<T> {
    /// Top-left corner.
    pub tleft: T,
    /// Top-right corner.
    pub tright: T,
    /// Bottom-left corner.
    pub bleft: T,
    /// Bottom-right corner.
    pub bright: T,
}

/// The five text slots around and inside a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSlots<T> {
    /// Centered inside the bar.
    pub inside: T,
    /// Right of the frame.
    pub right: T,
    /// Left of the frame.
    pub left: T,
    /// On the top edge of the frame.
    pub title: T,
    /// On the bottom edge of the frame.
    pub subtitle: T,
}

macro_rules! slot_group {
    ($ty:ident, $keys:ident, [$($field:ident),+]) => {
        impl<T> $ty<T> {
            /// Creates the group with the same value in every sub-slot.
            pub fn all(value: T) -> Self
            where
                T: Clone,
            {
                Self { $($field: value.clone()),+ }
            }

            /// Looks up a sub-slot by name.
            pub fn get(&self, name: &str) -> Option<&T> {
                match name {
                    $(stringify!($field) => Some(&self.$field),)+
                    _ => None,
                }
            }

            /// Looks up a sub-slot by name, mutably.
            pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }

        /// Sub-slot names, in schema order.
        pub(crate) const $keys: &[&str] = &[$(stringify!($field)),+];
    };
}

slot_group!(Vert, VERT_KEYS, [left, right]);
slot_group!(Horiz, HORIZ_KEYS, [top, bottom]);
slot_group!(Corner, CORNER_KEYS, [tleft, tright, bleft, bright]);
slot_group!(TextSlots, TEXT_KEYS, [inside, right, left, title, subtitle]);

/// Slots shared by [`CharSet`] and [`ColorSet`].
pub(crate) const FRAME_SCHEMA: [Slot; 5] = [
    Slot::leaf("empty"),
    Slot::leaf("full"),
    Slot::group("vert", VERT_KEYS),
    Slot::group("horiz", HORIZ_KEYS),
    Slot::group("corner", CORNER_KEYS),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_replaces_existing_key() {
        let tree = SetTree::new().with("full", "a").with("full", "b");
        assert_eq!(tree.get("full").and_then(SetTree::as_leaf), Some("b"));
    }

    #[test]
    fn test_array_conversion() {
        let tree = SetTree::from([("full", "#"), ("empty", ".")]);
        assert_eq!(tree, SetTree::new().with("full", "#").with("empty", "."));
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = CharSet::from_tree(&SetTree::new().with("fill", "#")).unwrap_err();
        match err {
            Error::UnknownKey { set, key, allowed } => {
                assert_eq!(set, "CharSet");
                assert_eq!(key, "fill");
                assert_eq!(allowed, "empty, full, vert, horiz, corner");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_nested_key_reports_path() {
        let tree = SetTree::new().with("corner", SetTree::new().with("top", "+"));
        let err = CharSet::from_tree(&tree).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownKey { ref key, ref allowed, .. }
                if key == "corner.top" && allowed == "tleft, tright, bleft, bright"
        ));
    }

    #[test]
    fn test_group_on_leaf_slot() {
        let tree = SetTree::new().with("full", SetTree::new().with("left", "x"));
        assert!(matches!(
            CharSet::from_tree(&tree),
            Err(Error::ExpectedValue { ref key, .. }) if key == "full"
        ));
    }

    #[test]
    fn test_root_scalar_broadcasts() {
        let set = CharSet::from_tree(&SetTree::from("*")).unwrap();
        assert_eq!(set.full, '*');
        assert_eq!(set.empty, '*');
        assert_eq!(set.horiz.bottom, '*');
        assert_eq!(set.corner.bright, '*');
    }

    #[test]
    fn test_failed_merge_leaves_base_untouched() {
        let base = charset::DEFAULT.clone();
        let tree = SetTree::new().with("full", "x").with("bogus", "y");
        assert!(base.merged(&tree).is_err());
        assert_eq!(base, *charset::DEFAULT);
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        for set in [&*charset::DEFAULT, &*charset::ROUNDED, &*charset::BASIC] {
            let again = CharSet::from_tree(&set.to_tree()).unwrap();
            assert_eq!(&again, set);
            assert_eq!(CharSet::from_tree(&again.to_tree()).unwrap(), again);
        }
        for set in [&*colorset::DEFAULT, &*colorset::BLANK, &*colorset::FLAG_ES] {
            assert_eq!(&ColorSet::from_tree(&set.to_tree()).unwrap(), set);
        }
        for set in [&*formatset::DEFAULT, &*formatset::CLASSIC] {
            assert_eq!(&FormatSet::from_tree(&set.to_tree()).unwrap(), set);
        }
    }

    #[test]
    fn test_slot_group_lookup() {
        let mut corner = Corner::all('+');
        assert_eq!(corner.get("bleft"), Some(&'+'));
        assert_eq!(corner.get("middle"), None);
        if let Some(c) = corner.get_mut("tright") {
            *c = '#';
        }
        assert_eq!(corner.tright, '#');
    }
}
