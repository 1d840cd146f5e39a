//! Templates of the five text slots.
//!
//! Leaves are template strings (see [`crate::template`]). They are stored
//! verbatim and only checked when rendered, so a bad placeholder surfaces on
//! the first draw.

use super::{unknown_leaf, Slot, StyleSet, TextSlots, TEXT_KEYS};
use crate::error::Result;
use crate::template::{self, Attributes};
use once_cell::sync::Lazy;

/// Rendered text of the five slots.
pub type Labels = TextSlots<String>;

impl Labels {
    /// The same labels with every character replaced by a space.
    pub fn blanked(&self) -> Labels {
        TextSlots {
            inside: template::blank(&self.inside),
            right: template::blank(&self.right),
            left: template::blank(&self.left),
            title: template::blank(&self.title),
            subtitle: template::blank(&self.subtitle),
        }
    }
}

/// Templates of the text around and inside a bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatSet {
    /// Centered inside the bar.
    pub inside: String,
    /// Right of the frame.
    pub right: String,
    /// Left of the frame.
    pub left: String,
    /// On the top edge of the frame.
    pub title: String,
    /// On the bottom edge of the frame.
    pub subtitle: String,
}

const FORMAT_SCHEMA: [Slot; 5] = [
    Slot::leaf(TEXT_KEYS[0]),
    Slot::leaf(TEXT_KEYS[1]),
    Slot::leaf(TEXT_KEYS[2]),
    Slot::leaf(TEXT_KEYS[3]),
    Slot::leaf(TEXT_KEYS[4]),
];

impl FormatSet {
    fn template_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "inside" => Some(&mut self.inside),
            "right" => Some(&mut self.right),
            "left" => Some(&mut self.left),
            "title" => Some(&mut self.title),
            "subtitle" => Some(&mut self.subtitle),
            _ => None,
        }
    }

    fn template_at(&self, key: &str) -> Option<&str> {
        match key {
            "inside" => Some(&self.inside),
            "right" => Some(&self.right),
            "left" => Some(&self.left),
            "title" => Some(&self.title),
            "subtitle" => Some(&self.subtitle),
            _ => None,
        }
    }

    /// Renders every slot.
    pub fn render(&self, attrs: &Attributes) -> Result<Labels> {
        Ok(TextSlots {
            inside: template::render(&self.inside, attrs)?,
            right: template::render(&self.right, attrs)?,
            left: template::render(&self.left, attrs)?,
            title: template::render(&self.title, attrs)?,
            subtitle: template::render(&self.subtitle, attrs)?,
        })
    }

    fn with(slots: &[(&str, &str)]) -> Self {
        let mut set = Self::default();
        for (key, value) in slots {
            if let Some(slot) = set.template_mut(key) {
                *slot = value.to_string();
            }
        }
        set
    }
}

impl StyleSet for FormatSet {
    const NAME: &'static str = "FormatSet";
    const SCHEMA: &'static [Slot] = &FORMAT_SCHEMA;

    fn blank() -> Self {
        Self::default()
    }

    fn set_leaf(&mut self, key: &str, sub: Option<&str>, raw: &str) -> Result<()> {
        let slot = match sub {
            None => self.template_mut(key),
            Some(_) => None,
        }
        .ok_or_else(|| unknown_leaf(Self::NAME, key, sub))?;
        *slot = raw.to_string();
        Ok(())
    }

    fn leaf(&self, key: &str, _sub: Option<&str>) -> String {
        self.template_at(key).unwrap_or_default().to_string()
    }
}

/// Every slot empty.
pub static BLANK: Lazy<FormatSet> = Lazy::new(FormatSet::default);

/// Text as the title, percentage inside.
pub static DEFAULT: Lazy<FormatSet> =
    Lazy::new(|| FormatSet::with(&[("title", "<text>"), ("inside", "<percentage>%")]));

/// Title, percentage, range below and elapsed time on the right.
pub static DESCRIPTIVE: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[
        ("right", "E. Time: <etime>s."),
        ("title", "<text>"),
        ("subtitle", "<prange1> of <prange2>"),
        ("inside", "<percentage>%"),
    ])
});

/// Range on the left, text and percentage on the right.
pub static LEFT_RIGHT: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[
        ("left", "<prange1>/<prange2>"),
        ("right", "<text>: <percentage>%"),
    ])
});

/// Just the percentage, inside.
pub static ONLY_PERCENTAGE: Lazy<FormatSet> =
    Lazy::new(|| FormatSet::with(&[("inside", "<percentage>%")]));

/// Text above, range below.
pub static SIMPLE: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[("title", "<text>"), ("subtitle", "<prange1>/<prange2>")])
});

/// Text above, elapsed seconds below.
pub static E_TIME: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[("title", "<text>"), ("subtitle", "Elapsed <etime> seconds")])
});

/// Text and range above, percentage and elapsed time below.
pub static TITLE_SUBTITLE: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[
        ("title", "<text> (<prange1>/<prange2>)"),
        ("subtitle", "<percentage>%, (<etime>s)"),
    ])
});

/// Everything on one line, right of the bar.
pub static CLASSIC: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[("right", "<text>: <percentage>% (<prange1>/<prange2>) [<etime>s]")])
});

/// Each slot shows its own name; handy to see where text lands.
pub static PLACEHOLDER: Lazy<FormatSet> = Lazy::new(|| {
    FormatSet::with(&[
        ("inside", "inside"),
        ("right", "right"),
        ("left", "left"),
        ("title", "title"),
        ("subtitle", "subtitle"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sets::SetTree;

    #[test]
    fn test_render_default() {
        let labels = DEFAULT.render(&Attributes::new((3, 4), "Files")).unwrap();
        assert_eq!(labels.title, "Files");
        assert_eq!(labels.inside, "75%");
        assert_eq!(labels.right, "");
        assert_eq!(labels.left, "");
        assert_eq!(labels.subtitle, "");
    }

    #[test]
    fn test_bad_template_fails_on_render_only() {
        let set = FormatSet::from_tree(&SetTree::from([("right", "<nope>")])).unwrap();
        assert!(matches!(
            set.render(&Attributes::new((0, 1), "")),
            Err(Error::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let tree = SetTree::new().with("title", SetTree::new().with("left", "x"));
        assert!(matches!(
            FormatSet::from_tree(&tree),
            Err(Error::ExpectedValue { ref key, .. }) if key == "title"
        ));
    }

    #[test]
    fn test_root_value_fills_every_slot() {
        let set = FormatSet::from_tree(&SetTree::from("<percentage>")).unwrap();
        assert_eq!(set.inside, "<percentage>");
        assert_eq!(set.subtitle, "<percentage>");
    }

    #[test]
    fn test_blanked_labels() {
        let labels = CLASSIC.render(&Attributes::new((1, 2), "ab")).unwrap();
        let blank = labels.blanked();
        assert_eq!(blank.right.len(), labels.right.len());
        assert!(blank.right.chars().all(|c| c == ' '));
        assert_eq!(blank.inside, "");
    }

    #[test]
    fn test_placeholder_preset_renders_names() {
        let labels = PLACEHOLDER.render(&Attributes::new((0, 1), "")).unwrap();
        assert_eq!(labels.left, "left");
        assert_eq!(labels.subtitle, "subtitle");
    }
}
