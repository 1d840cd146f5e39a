//! The placeholder mini-language used by format sets.
//!
//! A template is literal text with `<name>` placeholders. Each placeholder is
//! replaced by the display value of a bar [`Attribute`]; names are matched
//! case-insensitively. A backslash emits the following character literally,
//! which is how a `<` gets into the output.
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `<percentage>` | progress percentage, rounded down |
//! | `<prange1>` | current range value |
//! | `<prange2>` | range total |
//! | `<text>` | the bar's text |
//! | `<etime>` | elapsed seconds, two decimals |
//! | `<rtime>` | estimated remaining seconds, two decimals |
//! | `<etimef>` | elapsed time as `mm:ss` or `h:mm:ss` |
//! | `<rtimef>` | remaining time as `mm:ss` or `h:mm:ss` |
//!
//! ```rust
//! use pbar::template::{render, Attributes};
//!
//! let attrs = Attributes::new((42, 100), "Copying");
//! assert_eq!(render("<text>: <percentage>%", &attrs).unwrap(), "Copying: 42%");
//! assert_eq!(render(r"\<percentage> <PRANGE1>", &attrs).unwrap(), "<percentage> 42");
//! ```
//!
//! Literal text and the `text` attribute are sanitized, so a template can never
//! move the cursor or change colors on its own.

use crate::error::{Error, Result};
use crate::runeutil::{display_width, sanitize};
use crate::stopwatch::{format_duration, round_secs};
use std::fmt;
use std::ops::Range;
use std::time::Duration;

/// A value a template placeholder or a condition can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `percentage`
    Percentage,
    /// `prange1`
    RangeStart,
    /// `prange2`
    RangeEnd,
    /// `text`
    Text,
    /// `etime`
    ElapsedTime,
    /// `rtime`
    RemainingTime,
    /// `etimef`
    ElapsedTimeFormatted,
    /// `rtimef`
    RemainingTimeFormatted,
}

impl Attribute {
    /// Every attribute, in documentation order.
    pub const ALL: [Attribute; 8] = [
        Attribute::Percentage,
        Attribute::RangeStart,
        Attribute::RangeEnd,
        Attribute::Text,
        Attribute::ElapsedTime,
        Attribute::RemainingTime,
        Attribute::ElapsedTimeFormatted,
        Attribute::RemainingTimeFormatted,
    ];

    /// The placeholder name.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Percentage => "percentage",
            Attribute::RangeStart => "prange1",
            Attribute::RangeEnd => "prange2",
            Attribute::Text => "text",
            Attribute::ElapsedTime => "etime",
            Attribute::RemainingTime => "rtime",
            Attribute::ElapsedTimeFormatted => "etimef",
            Attribute::RemainingTimeFormatted => "rtimef",
        }
    }

    /// Looks an attribute up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(name))
    }

    /// Whether the attribute holds a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Attribute::Percentage
                | Attribute::RangeStart
                | Attribute::RangeEnd
                | Attribute::ElapsedTime
                | Attribute::RemainingTime
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of an attribute at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Whole numbers: percentage and range values.
    Int(u64),
    /// Seconds, displayed with two decimals.
    Float(f64),
    /// Text and formatted durations.
    Text(String),
}

impl Value {
    /// The numeric value, if the value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:.2}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A snapshot of everything templates and conditions can read from a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    /// Percentage of the range covered, rounded down.
    pub percentage: u64,
    /// `(current, total)`.
    pub range: (u64, u64),
    /// The bar's text, unsanitized.
    pub text: String,
    /// Time since the bar was created or its clock was last reset.
    pub elapsed: Duration,
}

impl Attributes {
    /// Attributes for a range and text, with no elapsed time.
    ///
    /// The percentage is derived from the range.
    pub fn new(range: (u64, u64), text: impl Into<String>) -> Self {
        let (current, total) = range;
        let total = total.max(1);
        let current = current.min(total);
        Self {
            percentage: (u128::from(current) * 100 / u128::from(total)) as u64,
            range: (current, total),
            text: text.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Estimated time left, extrapolated from the pace so far.
    ///
    /// Zero while nothing has been done yet.
    pub fn remaining(&self) -> Duration {
        let (current, total) = self.range;
        if current == 0 {
            return Duration::ZERO;
        }
        let left = total.saturating_sub(current) as f64;
        Duration::from_secs_f64(self.elapsed.as_secs_f64() * left / current as f64)
    }

    /// The current value of `attr`.
    pub fn get(&self, attr: Attribute) -> Value {
        match attr {
            Attribute::Percentage => Value::Int(self.percentage),
            Attribute::RangeStart => Value::Int(self.range.0),
            Attribute::RangeEnd => Value::Int(self.range.1),
            Attribute::Text => Value::Text(sanitize(&self.text)),
            Attribute::ElapsedTime => Value::Float(round_secs(self.elapsed)),
            Attribute::RemainingTime => Value::Float(round_secs(self.remaining())),
            Attribute::ElapsedTimeFormatted => Value::Text(format_duration(self.elapsed)),
            Attribute::RemainingTimeFormatted => Value::Text(format_duration(self.remaining())),
        }
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text emitted as is (after sanitizing), escapes already resolved.
    Literal(String),
    /// A placeholder and its byte range in the template, brackets included.
    Placeholder {
        /// The attribute it stands for.
        attr: Attribute,
        /// Byte range of `<name>`.
        span: Range<usize>,
    },
}

/// Splits a template into literals and placeholders.
///
/// # Errors
///
/// - [`Error::UnterminatedPlaceholder`] for a `<` with no closing `>`.
/// - [`Error::UnknownPlaceholder`] for a name that is not an [`Attribute`].
pub fn parse(template: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices();

    while let Some((start, c)) = chars.next() {
        match c {
            '\\' => {
                // a trailing backslash escapes nothing and is dropped
                if let Some((_, escaped)) = chars.next() {
                    literal.push(escaped);
                }
            }
            '<' => {
                let close = template[start..].find('>').map(|i| start + i).ok_or_else(|| {
                    Error::UnterminatedPlaceholder {
                        template: template.to_string(),
                        span: start..template.len(),
                    }
                })?;
                let name = template[start + 1..close].to_lowercase();
                let span = start..close + 1;
                let attr = Attribute::from_name(&name).ok_or_else(|| Error::UnknownPlaceholder {
                    name,
                    template: template.to_string(),
                    span: span.clone(),
                })?;

                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder { attr, span });

                // skip to the closing bracket
                for (i, _) in chars.by_ref() {
                    if i == close {
                        break;
                    }
                }
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Renders `template` with the values in `attrs`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn render(template: &str, attrs: &Attributes) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    for token in parse(template)? {
        match token {
            Token::Literal(text) => out.push_str(&sanitize(&text)),
            Token::Placeholder { attr, .. } => out.push_str(&attrs.get(attr).to_string()),
        }
    }
    Ok(out)
}

/// Spaces covering the same number of cells as `rendered`.
pub fn blank(rendered: &str) -> String {
    " ".repeat(display_width(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Attributes {
        Attributes::new((42, 100), "Working")
    }

    #[test]
    fn test_render_examples() {
        assert_eq!(render("<percentage>%", &attrs()).unwrap(), "42%");
        assert_eq!(render("a\\<b", &attrs()).unwrap(), "a<b");
        assert_eq!(render("<prange1>/<prange2>", &attrs()).unwrap(), "42/100");
        assert_eq!(render("<TEXT>", &attrs()).unwrap(), "Working");
        assert_eq!(render("", &attrs()).unwrap(), "");
        assert_eq!(render("trailing\\", &attrs()).unwrap(), "trailing");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = render("x<foo>y", &attrs()).unwrap_err();
        match err {
            Error::UnknownPlaceholder { name, template, span } => {
                assert_eq!(name, "foo");
                assert_eq!(template, "x<foo>y");
                assert_eq!(span, 1..6);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = render("abc<perc", &attrs()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnterminatedPlaceholder { ref span, .. } if *span == (3..8)
        ));
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = parse("é<text>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal("é".to_string()),
                Token::Placeholder { attr: Attribute::Text, span: 2..8 },
            ]
        );
    }

    #[test]
    fn test_literals_and_text_are_sanitized() {
        let a = Attributes::new((1, 2), "bad\x1b[31m\ttext\n");
        assert_eq!(render("\x1b[2J<text>", &a).unwrap(), "bad    text");
    }

    #[test]
    fn test_time_attributes() {
        let a = Attributes::new((25, 100), "").with_elapsed(Duration::from_millis(10_500));
        assert_eq!(render("<etime>", &a).unwrap(), "10.50");
        assert_eq!(render("<rtime>", &a).unwrap(), "31.50");
        assert_eq!(render("<etimef> <rtimef>", &a).unwrap(), "00:10 00:31");
    }

    #[test]
    fn test_percentage_of_huge_range() {
        let a = Attributes::new((u64::MAX / 2, u64::MAX), "");
        assert_eq!(a.percentage, 49);
        assert_eq!(Attributes::new((u64::MAX, u64::MAX), "").percentage, 100);
    }

    #[test]
    fn test_remaining_is_zero_before_progress() {
        let a = Attributes::new((0, 10), "").with_elapsed(Duration::from_secs(5));
        assert_eq!(a.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_blank_matches_display_width() {
        assert_eq!(blank("42%"), "   ");
        assert_eq!(blank("日本"), "    ");
        assert_eq!(blank(""), "");
    }

    #[test]
    fn test_attribute_names() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
        assert_eq!(Attribute::from_name("PercentAge"), Some(Attribute::Percentage));
        assert_eq!(Attribute::from_name("percent"), None);
        assert!(Attribute::Percentage.is_numeric());
        assert!(!Attribute::Text.is_numeric());
        assert!(!Attribute::ElapsedTimeFormatted.is_numeric());
    }
}
