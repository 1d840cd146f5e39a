//! Text sanitization and measuring.
//!
//! Text that ends up inside a frame must occupy a known number of cells, or
//! the footprint tracking that erases old frames falls out of step with the
//! screen. The [`Sanitizer`] removes everything that would move the cursor or
//! change the terminal state on its own: ANSI escape sequences, line breaks
//! and other control characters. Tabs are expanded to spaces since their width
//! depends on the cursor column.
//!
//! # Quick Start
//!
//! ```rust
//! use pbar::runeutil::{new_sanitizer, replace_newlines, replace_tabs};
//!
//! // Defaults: tabs become 4 spaces, line breaks are dropped
//! let sanitizer = new_sanitizer(vec![]);
//! assert_eq!(sanitizer.sanitize_str("a\tb\n\x1b[31mc"), "a    bc");
//!
//! // Custom replacements
//! let custom = new_sanitizer(vec![replace_tabs(" "), replace_newlines(" | ")]);
//! assert_eq!(custom.sanitize_str("Line 1\nLine 2\tEnd"), "Line 1 | Line 2 End");
//! ```
//!
//! The module also measures and cuts text by display width:
//!
//! ```rust
//! use pbar::runeutil::{display_width, truncate};
//!
//! assert_eq!(display_width("日本"), 4);
//! assert_eq!(truncate("Downloading", 6), "Downl…");
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Marker appended by [`truncate`] to text that was cut.
pub const ELLIPSIS: &str = "…";

/// A configurable text sanitizer.
///
/// # Default Behavior
///
/// - **ANSI escape sequences**: Removed, including their parameters
/// - **Newlines** (`\n`, `\r`): Removed
/// - **Tabs** (`\t`): Replaced with `"    "` (4 spaces)
/// - **Other control characters** (`\x08`, `\x07`, `\x0c`, `\x0b`, ...): Removed
/// - **Printable characters**: Preserved unchanged
///
/// Use [`new_sanitizer`] with [`replace_tabs`] and [`replace_newlines`] to
/// change the replacements.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    replace_newline: String,
    replace_tab: String,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            replace_newline: String::new(),
            replace_tab: "    ".to_string(),
        }
    }
}

/// Configuration option applied by [`new_sanitizer`].
///
/// ```rust
/// use pbar::runeutil::{new_sanitizer, replace_tabs};
///
/// let sanitizer = new_sanitizer(vec![
///     replace_tabs("  "),  // 2 spaces instead of 4
/// ]);
/// assert_eq!(sanitizer.sanitize_str("a\tb"), "a  b");
/// ```
pub type SanitizerOpt = Box<dyn FnOnce(&mut Sanitizer)>;

/// Creates a sanitizer from the default settings and the given options.
///
/// Options are applied in order, so when two options touch the same setting
/// the last one wins:
///
/// ```rust
/// use pbar::runeutil::{new_sanitizer, replace_tabs};
///
/// let sanitizer = new_sanitizer(vec![
///     replace_tabs("FIRST"),
///     replace_tabs("SECOND"),
/// ]);
/// assert_eq!(sanitizer.sanitize_str("a\tb"), "aSECONDb");
/// ```
pub fn new_sanitizer(opts: Vec<SanitizerOpt>) -> Sanitizer {
    let mut s = Sanitizer::default();
    for opt in opts {
        opt(&mut s);
    }
    s
}

/// Option replacing each tab with `tab_repl`.
pub fn replace_tabs(tab_repl: &str) -> SanitizerOpt {
    let repl = tab_repl.to_string();
    Box::new(move |s: &mut Sanitizer| {
        s.replace_tab = repl;
    })
}

/// Option replacing each newline (`\n` and `\r`) with `nl_repl`.
///
/// Both characters are replaced on their own, so `\r\n` yields two copies of
/// the replacement.
pub fn replace_newlines(nl_repl: &str) -> SanitizerOpt {
    let repl = nl_repl.to_string();
    Box::new(move |s: &mut Sanitizer| {
        s.replace_newline = repl;
    })
}

impl Sanitizer {
    /// Sanitizes a string.
    ///
    /// Escape sequences are stripped first so their parameter bytes do not
    /// survive as printable garbage, then every remaining character is
    /// replaced, dropped or kept.
    ///
    /// ```rust
    /// use pbar::runeutil::new_sanitizer;
    ///
    /// let sanitizer = new_sanitizer(vec![]);
    /// assert_eq!(sanitizer.sanitize_str("Text\x00\x07\x1b[2J\x7f"), "Text");
    /// ```
    pub fn sanitize_str(&self, input: &str) -> String {
        let stripped = if input.contains('\x1b') {
            strip_ansi_escapes::strip_str(input)
        } else {
            input.to_string()
        };

        let mut out = String::with_capacity(stripped.len());
        for ch in stripped.chars() {
            match ch {
                '\r' | '\n' => out.push_str(&self.replace_newline),
                '\t' => out.push_str(&self.replace_tab),
                c if c.is_control() => {}
                c => out.push(c),
            }
        }
        out
    }
}

/// Sanitizes `input` with the default settings.
pub fn sanitize(input: &str) -> String {
    Sanitizer::default().sanitize_str(input)
}

/// Number of terminal cells `s` occupies.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cuts `s` to at most `max_width` cells, ending cut text with [`ELLIPSIS`].
///
/// Cuts happen on grapheme boundaries. A width too small to hold even the
/// ellipsis yields an empty string.
pub fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let ellipsis_width = display_width(ELLIPSIS);
    if max_width < ellipsis_width {
        return String::new();
    }

    let budget = max_width - ellipsis_width;
    let mut used = 0;
    let mut out = String::with_capacity(s.len());
    for grapheme in s.graphemes(true) {
        let w = display_width(grapheme);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sanitizer() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize_str("Hello\tworld\n"), "Hello    world");
        assert_eq!(s.sanitize_str("a\x08b\x07c\x0cd\x0be"), "abcde");
        assert_eq!(s.sanitize_str("\x1b[38;2;255;0;0mred\x1b[0m"), "red");
        assert_eq!(s.sanitize_str("plain"), "plain");
    }

    #[test]
    fn test_custom_newline_replacement() {
        let s = new_sanitizer(vec![replace_newlines(" | ")]);
        assert_eq!(s.sanitize_str("Line1\r\nLine2"), "Line1 |  | Line2");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("Downloading", 5), "Down…");
        assert_eq!(truncate("Downloading", 1), "…");
        assert_eq!(truncate("Downloading", 0), "");
        // a wide glyph never gets split across the limit
        assert_eq!(truncate("日本語", 4), "日…");
    }
}
