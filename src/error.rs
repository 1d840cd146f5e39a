//! Error handling for the pbar library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! is the [`Error`] enum below. Validation errors (bad set keys, colors,
//! templates or condition expressions) are caller bugs and always propagate;
//! the library never retries or swallows them.

use std::io;
use std::ops::Range;
use thiserror::Error;

/// Errors that can happen when building or drawing a progress bar.
#[derive(Error, Debug)]
pub enum Error {
    /// A key supplied in a [`SetTree`](crate::sets::SetTree) does not exist in the
    /// schema of the set that is being resolved.
    ///
    /// `key` is the full dotted path of the offending key and `allowed` lists
    /// the keys that are valid at that depth.
    #[error("unknown key {key:?} for {set}. Available valid keys: {allowed}")]
    UnknownKey {
        /// Name of the set type (`CharSet`, `ColorSet` or `FormatSet`).
        set: &'static str,
        /// Dotted path of the unknown key.
        key: String,
        /// Comma separated list of the valid keys at that depth.
        allowed: String,
    },

    /// A group of values was given for a slot that only holds a single value.
    #[error("key {key:?} of {set} expects a single value, not a group")]
    ExpectedValue {
        /// Name of the set type.
        set: &'static str,
        /// Dotted path of the slot.
        key: String,
    },

    /// The value could not be parsed as a color.
    ///
    /// Accepted forms are color names (`"springgreen"`), hex strings
    /// (`"#0f0"`, `"#00ff00"`) and comma separated channels (`"0,255,0"`).
    #[error("invalid color value {0:?}")]
    InvalidColor(String),

    /// A `<` placeholder opener was never closed with `>`.
    #[error("unexpected end of template {template:?}: expected '>' to close the placeholder at {span:?}")]
    UnterminatedPlaceholder {
        /// The template being rendered.
        template: String,
        /// Byte range from the opening `<` to the end of the template.
        span: Range<usize>,
    },

    /// A placeholder names an attribute that does not exist.
    #[error("unknown placeholder {name:?} at {span:?} in template {template:?}")]
    UnknownPlaceholder {
        /// The (lower-cased) placeholder name.
        name: String,
        /// The template being rendered.
        template: String,
        /// Byte range of the whole `<name>` token.
        span: Range<usize>,
    },

    /// A condition expression is malformed.
    #[error("invalid condition {expr:?}: {reason}")]
    InvalidCondition {
        /// The expression as given by the caller.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A condition expression uses an operator that is not supported.
    #[error("unknown operator {operator:?} in condition {expr:?}")]
    UnknownOperator {
        /// The expression as given by the caller.
        expr: String,
        /// The offending operator token.
        operator: String,
    },

    /// A position coordinate string could not be parsed.
    #[error("invalid coordinate {0:?}: expected an integer, \"center[+n]\" or \"r[+n]\"")]
    InvalidCoordinate(String),

    /// A fill direction name is not registered.
    #[error("unknown fill direction {0:?}")]
    UnknownFill(String),

    /// I/O error while writing to the terminal or reading input.
    #[error("I/O error")]
    Io {
        /// The underlying error.
        #[from]
        source: io::Error,
    },
}

/// Result type alias for operations that can fail with a pbar [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
