//! Conditions: swap a bar's style when its attributes reach some value.
//!
//! A condition is written as three tokens, `attribute operator value`, e.g.
//! `percentage >= 50` or `text contains "almost done"`. The attribute is any
//! template placeholder name. When the expression holds at draw time, the
//! condition replaces the bar's sets and fill with the ones it carries and
//! calls its callback, at most `max_uses` times.
//!
//! ```rust
//! use pbar::condition::Condition;
//! use pbar::sets::colorset;
//!
//! let cond = Condition::new("percentage >= 50")
//!     .unwrap()
//!     .with_colorset(*colorset::GREEN)
//!     .with_max_uses(-1);
//! assert_eq!(cond.remaining_uses(), None);
//! ```

use crate::content::Fill;
use crate::error::{Error, Result};
use crate::progress::Bar;
use crate::sets::{CharSet, ColorSet, FormatSet};
use crate::template::{Attribute, Attributes, Value};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Comparison between an attribute and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `contains`, or `<-`. Substring match, or membership in a range.
    Contains,
}

impl Operator {
    /// Parses an operator token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            "<-" => Some(Operator::Contains),
            t if t.eq_ignore_ascii_case("contains") => Some(Operator::Contains),
            _ => None,
        }
    }

    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => matches!(self, Operator::Ne),
            (Operator::Eq, Some(o)) => o == Ordering::Equal,
            (Operator::Ne, Some(o)) => o != Ordering::Equal,
            (Operator::Gt, Some(o)) => o == Ordering::Greater,
            (Operator::Ge, Some(o)) => o != Ordering::Less,
            (Operator::Lt, Some(o)) => o == Ordering::Less,
            (Operator::Le, Some(o)) => o != Ordering::Greater,
            (Operator::Contains, Some(_)) => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Contains => "contains",
        })
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A number, with the text it was written as.
    Number(f64, String),
    /// Anything else, lower-cased.
    Text(String),
    /// `{start..end}` or `{start..end..step}`. The end is excluded.
    Range {
        /// First value.
        start: i64,
        /// One past the last value.
        end: i64,
        /// Distance between values, always positive.
        step: i64,
    },
}

impl Literal {
    fn parse(token: &str, expr: &str) -> Result<Self> {
        if let Some(inner) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
            return parse_range(inner, expr);
        }
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Literal::Number(n, token.to_string())),
            _ => Ok(Literal::Text(token.to_lowercase())),
        }
    }

    fn contains(&self, n: f64) -> bool {
        match *self {
            Literal::Range { start, end, step } => {
                if n.fract() != 0.0 {
                    return false;
                }
                let n = n as i64;
                n >= start && n < end && (n - start) % step == 0
            }
            _ => false,
        }
    }
}

fn parse_range(inner: &str, expr: &str) -> Result<Literal> {
    let invalid = |reason: &str| Error::InvalidCondition {
        expr: expr.to_string(),
        reason: reason.to_string(),
    };
    let bounds = inner
        .split("..")
        .map(|part| part.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid("range bounds must be integers"))?;

    let (start, end, step) = match bounds.as_slice() {
        [start, end] => (*start, *end, 1),
        [start, end, step] => (*start, *end, *step),
        _ => return Err(invalid("ranges look like {start..end} or {start..end..step}")),
    };
    if step <= 0 {
        return Err(invalid("range step must be positive"));
    }
    Ok(Literal::Range { start, end, step })
}

/// Splits on whitespace, keeping single- or double-quoted groups together.
fn tokenize(expr: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in expr.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::InvalidCondition {
            expr: expr.to_string(),
            reason: "unterminated quote".to_string(),
        });
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

type Callback = Box<dyn FnMut(&mut Bar)>;

/// A style change triggered by a bar's attributes.
pub struct Condition {
    expr: String,
    attribute: Attribute,
    operator: Operator,
    value: Literal,
    charset: Option<CharSet>,
    colorset: Option<ColorSet>,
    formatset: Option<FormatSet>,
    fill: Option<Fill>,
    callback: Option<Callback>,
    uses_left: i64,
}

impl Condition {
    /// Parses `attribute operator value`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCondition`] when the expression does not have
    ///   exactly three tokens, names an unknown attribute, or uses a range
    ///   where one is not allowed.
    /// - [`Error::UnknownOperator`] for an operator that is not recognized.
    pub fn new(expr: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidCondition {
            expr: expr.to_string(),
            reason,
        };

        let tokens = tokenize(expr)?;
        let [attribute, operator, value] = tokens.as_slice() else {
            return Err(invalid(format!("expected 3 tokens, found {}", tokens.len())));
        };

        let attribute = Attribute::from_name(attribute)
            .ok_or_else(|| invalid(format!("unknown attribute {attribute:?}")))?;
        let operator = Operator::parse(operator).ok_or_else(|| Error::UnknownOperator {
            expr: expr.to_string(),
            operator: operator.clone(),
        })?;
        let value = Literal::parse(value, expr)?;

        if let Literal::Range { .. } = value {
            if operator != Operator::Contains {
                return Err(invalid("ranges only work with contains".to_string()));
            }
            if !attribute.is_numeric() {
                return Err(invalid(format!("{attribute} is not numeric")));
            }
        }

        Ok(Self {
            expr: expr.to_string(),
            attribute,
            operator,
            value,
            charset: None,
            colorset: None,
            formatset: None,
            fill: None,
            callback: None,
            uses_left: 1,
        })
    }

    /// Char set to switch to.
    pub fn with_charset(mut self, charset: CharSet) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Color set to switch to.
    pub fn with_colorset(mut self, colorset: ColorSet) -> Self {
        self.colorset = Some(colorset);
        self
    }

    /// Format set to switch to.
    pub fn with_formatset(mut self, formatset: FormatSet) -> Self {
        self.formatset = Some(formatset);
        self
    }

    /// Fill to switch to.
    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Function called with the bar each time the condition fires.
    pub fn with_callback(mut self, callback: impl FnMut(&mut Bar) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// How many times the condition may fire. Negative means no limit.
    pub fn with_max_uses(mut self, uses: i64) -> Self {
        self.uses_left = uses;
        self
    }

    /// The expression as written.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The attribute the condition reads.
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// The comparison.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The right-hand side.
    pub fn value(&self) -> &Literal {
        &self.value
    }

    /// Uses left; `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<u64> {
        u64::try_from(self.uses_left).ok()
    }

    /// Evaluates the expression against a set of attributes.
    pub fn matches(&self, attrs: &Attributes) -> bool {
        let actual = attrs.get(self.attribute);

        match (&self.value, self.operator) {
            (Literal::Range { .. }, _) => actual
                .as_number()
                .is_some_and(|n| self.value.contains(n)),
            (Literal::Number(expected, _), op) if op != Operator::Contains => {
                match actual.as_number() {
                    Some(n) => op.holds(n.partial_cmp(expected)),
                    None => self.compare_text(&actual),
                }
            }
            _ => self.compare_text(&actual),
        }
    }

    fn compare_text(&self, actual: &Value) -> bool {
        let actual = actual.to_string().to_lowercase();
        let expected = match &self.value {
            Literal::Number(_, raw) => raw.to_lowercase(),
            Literal::Text(text) => text.clone(),
            Literal::Range { .. } => return false,
        };
        match self.operator {
            Operator::Contains => actual.contains(&expected),
            op => op.holds(Some(actual.as_str().cmp(expected.as_str()))),
        }
    }

    /// Evaluates the expression against a bar.
    pub fn test(&self, bar: &Bar) -> bool {
        self.matches(&bar.attributes())
    }

    /// Fires the condition if it has uses left and holds for `bar`.
    ///
    /// Returns whether it fired.
    pub fn apply(&mut self, bar: &mut Bar) -> bool {
        if self.uses_left == 0 || !self.test(bar) {
            return false;
        }
        debug!(condition = %self.expr, uses_left = self.uses_left, "condition fired");

        if let Some(charset) = self.charset {
            bar.set_charset(charset);
        }
        if let Some(colorset) = self.colorset {
            bar.set_colorset(colorset);
        }
        if let Some(formatset) = &self.formatset {
            bar.set_formatset(formatset.clone());
        }
        if let Some(fill) = &self.fill {
            bar.set_fill(fill.clone());
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(bar);
        }
        if self.uses_left > 0 {
            self.uses_left -= 1;
        }
        true
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("expr", &self.expr)
            .field("charset", &self.charset.is_some())
            .field("colorset", &self.colorset.is_some())
            .field("formatset", &self.formatset.is_some())
            .field("fill", &self.fill)
            .field("callback", &self.callback.is_some())
            .field("uses_left", &self.uses_left)
            .finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Direction;
    use crate::progress::{with_range, with_text};
    use crate::sets::charset;
    use crate::term::BufferTerminal;
    use std::cell::Cell;
    use std::rc::Rc;

    fn bar_at(current: u64, total: u64) -> Bar {
        Bar::new(
            Rc::new(BufferTerminal::new(80, 24)),
            vec![with_range(current, total), with_text("Copying files")],
        )
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"text contains "two words""#).unwrap(),
            vec!["text", "contains", "two words"]
        );
        assert_eq!(tokenize("text == ''").unwrap(), vec!["text", "==", ""]);
        assert!(tokenize("text == 'open").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Condition::new("percentage >="),
            Err(Error::InvalidCondition { .. })
        ));
        assert!(matches!(
            Condition::new("percentage >= 1 2"),
            Err(Error::InvalidCondition { .. })
        ));
        assert!(matches!(
            Condition::new("speed > 3"),
            Err(Error::InvalidCondition { .. })
        ));
        assert!(matches!(
            Condition::new("percentage => 3"),
            Err(Error::UnknownOperator { ref operator, .. }) if operator == "=>"
        ));
        assert!(matches!(
            Condition::new("percentage == {1..5}"),
            Err(Error::InvalidCondition { .. })
        ));
        assert!(matches!(
            Condition::new("text contains {1..5}"),
            Err(Error::InvalidCondition { .. })
        ));
        assert!(Condition::new("percentage contains {1..5..0}").is_err());
        assert!(Condition::new("percentage contains {a..b}").is_err());
    }

    #[test]
    fn test_threshold() {
        let cond = Condition::new("percentage >= 50").unwrap();
        assert!(!cond.test(&bar_at(49, 100)));
        assert!(cond.test(&bar_at(50, 100)));
        assert!(cond.test(&bar_at(100, 100)));
    }

    #[test]
    fn test_every_operator() {
        let attrs = Attributes::new((30, 100), "");
        let holds = |expr: &str| Condition::new(expr).unwrap().matches(&attrs);
        assert!(holds("percentage == 30"));
        assert!(holds("percentage != 31"));
        assert!(holds("percentage > 29.5"));
        assert!(holds("percentage < 31"));
        assert!(holds("percentage <= 30"));
        assert!(!holds("percentage > 30"));
        assert!(holds("prange2 == 100"));
        assert!(holds("PRANGE1 >= 30"));
    }

    #[test]
    fn test_text_comparisons_ignore_case() {
        let attrs = Attributes::new((0, 1), "Copying Files");
        let holds = |expr: &str| Condition::new(expr).unwrap().matches(&attrs);
        assert!(holds("text == 'copying files'"));
        assert!(holds("text contains FILES"));
        assert!(holds("text <- copy"));
        assert!(!holds("text contains folders"));
        assert!(holds("text != done"));
    }

    #[test]
    fn test_range_membership() {
        let cond = Condition::new("percentage contains {10..50..10}").unwrap();
        let at = |p: u64| cond.matches(&Attributes::new((p, 100), ""));
        assert!(at(10));
        assert!(at(40));
        assert!(!at(50));
        assert!(!at(15));
        assert!(!at(0));
    }

    #[test]
    fn test_max_uses() {
        let mut bar = bar_at(60, 100);
        let mut cond = Condition::new("percentage >= 50")
            .unwrap()
            .with_charset(*charset::BASIC);
        assert!(cond.apply(&mut bar));
        assert_eq!(bar.charset(), &*charset::BASIC);
        assert_eq!(cond.remaining_uses(), Some(0));

        bar.set_charset(*charset::DEFAULT);
        assert!(cond.test(&bar));
        assert!(!cond.apply(&mut bar));
        assert_eq!(bar.charset(), &*charset::DEFAULT);
    }

    #[test]
    fn test_unlimited_uses_and_callback() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut cond = Condition::new("percentage > 0")
            .unwrap()
            .with_fill(Direction::Right)
            .with_callback(move |bar| {
                seen.set(seen.get() + 1);
                bar.set_text("halfway");
            })
            .with_max_uses(-1);

        let mut bar = bar_at(1, 2);
        for _ in 0..3 {
            assert!(cond.apply(&mut bar));
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(bar.text(), "halfway");
        assert_eq!(bar.fill().name(), "right");
        assert_eq!(cond.remaining_uses(), None);
    }

    #[test]
    fn test_failed_test_keeps_uses() {
        let mut cond = Condition::new("percentage == 100").unwrap();
        let mut bar = bar_at(1, 2);
        assert!(!cond.apply(&mut bar));
        assert_eq!(cond.remaining_uses(), Some(1));
    }
}
