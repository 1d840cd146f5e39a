#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/pbar/")]

//! # pbar
//!
//! Progress bars that live anywhere on the terminal.
//!
//! Unlike line-based progress indicators, a pbar [`Bar`] is drawn at absolute
//! screen coordinates with VT100 escape sequences. It can be framed, filled
//! from any side, labelled on all four edges, recolored when its progress
//! crosses a threshold, and moved or resized while on screen without leaving
//! stale glyphs behind.
//!
//! ## Overview
//!
//! A bar is made of:
//!
//! - a numeric range `(current, total)` and a free-form text,
//! - a declared [`Position`](geometry::Position) and [`Size`](geometry::Size),
//!   which may be centered, counted from the far edge or relative to the
//!   cursor,
//! - three style sets: a [`CharSet`] for glyphs, a [`ColorSet`] for colors and
//!   a [`FormatSet`] of text templates such as `"<percentage>%"`,
//! - a [`Fill`](content::Fill) deciding which way the bar grows,
//! - optional [`Condition`]s swapping styles when an attribute reaches a value.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbar::prelude::*;
//!
//! fn main() -> pbar::Result<()> {
//!     let mut bar = Bar::stdout(vec![
//!         with_range(0, 50),
//!         with_text("Downloading"),
//!         with_size((-10, 1)),
//!         with_formatset(formatset::DESCRIPTIVE.clone()),
//!         with_condition(
//!             Condition::new("percentage >= 80")?.with_colorset(*colorset::GREEN),
//!         ),
//!     ]);
//!
//!     for _ in 0..50 {
//!         bar.step(1)?;
//!     }
//!     bar.clear()
//! }
//! ```
//!
//! ## Style sets
//!
//! Sets are plain structs with presets, and can be built or patched from a
//! partial [`SetTree`]. Unknown keys are rejected with the list of valid ones:
//!
//! ```rust
//! use pbar::prelude::*;
//!
//! let set = charset::ROUNDED
//!     .merged(&SetTree::new().with("full", "#").with("corner", "+"))
//!     .unwrap();
//! assert_eq!(set.corner.tleft, '+');
//!
//! assert!(CharSet::from_tree(&SetTree::from([("fil", "#")])).is_err());
//! ```
//!
//! ## Terminals
//!
//! Bars draw through the [`Terminal`] trait. [`CrosstermTerminal`] writes to
//! standard output; [`BufferTerminal`] records writes in memory. On a
//! terminal that is not interactive every draw is a silent no-op, so output
//! redirected to a file stays free of escape sequences.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for condition firings and
//! clears, `trace` for suppressed writes) and never installs a subscriber.

pub mod color;
pub mod condition;
pub mod content;
pub mod error;
pub mod geometry;
pub mod progress;
pub mod runeutil;
pub mod sets;
pub mod stopwatch;
pub mod template;
pub mod term;

pub use color::Rgb;
pub use condition::{Condition, Operator};
pub use content::{ContentGenerator, Direction, Fill, Registry};
pub use error::{Error, Result};
pub use geometry::{Coord, Geometry, Position, Size};
pub use progress::{Bar, BarOption, BarState};
pub use sets::{CharSet, ColorSet, FormatSet, SetTree, StyleSet};
pub use template::{Attribute, Attributes};
pub use term::{BufferTerminal, CrosstermTerminal, SequenceGuard, SequenceModes, Terminal};

/// Prelude module for convenient imports.
///
/// Brings in the bar, its options, the style sets and their presets, and the
/// terminal adapters:
///
/// ```rust
/// use pbar::prelude::*;
///
/// let terminal = std::rc::Rc::new(BufferTerminal::new(80, 24));
/// let bar = Bar::new(terminal, vec![with_charset(*charset::DOUBLE)]);
/// assert_eq!(bar.charset().corner.tleft, '╔');
/// ```
pub mod prelude {
    pub use crate::color::Rgb;
    pub use crate::condition::Condition;
    pub use crate::content::{Direction, Fill, Registry};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Coord, Position, Size};
    pub use crate::progress::{
        animate, disabled, inverted, iter, with_centered, with_charset, with_colorset,
        with_condition, with_conditions, with_fill, with_formatset, with_position, with_range,
        with_size, with_text, Bar, BarOption, BarState,
    };
    pub use crate::sets::{charset, colorset, formatset, CharSet, ColorSet, FormatSet, SetTree, StyleSet};
    pub use crate::term::{BufferTerminal, CrosstermTerminal, Terminal};
}
