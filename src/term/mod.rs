//! Terminal adapters.
//!
//! Bars never talk to stdout directly. They go through the [`Terminal`] trait,
//! which reports the screen size and cursor position, accepts escape-sequence
//! strings, and tells subscribers when the screen content scrolls.
//!
//! Two adapters ship with the crate:
//!
//! - [`CrosstermTerminal`] drives the real terminal attached to stdout.
//! - [`BufferTerminal`] records every write in memory. Tests use it as a mock,
//!   and it also serves for off-screen rendering.
//!
//! # Scroll tracking
//!
//! A bar remembers where it last drew itself so the next draw can erase that
//! footprint. When the screen scrolls, the glyphs move up and the remembered
//! footprint is wrong. Adapters therefore notify subscribed listeners with the
//! number of lines scrolled, and bars shift their footprint accordingly.
//!
//! ```rust
//! use pbar::term::{BufferTerminal, Terminal};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let term = BufferTerminal::new(80, 24);
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! term.subscribe_scroll(Box::new(move |lines| {
//!     sink.set(sink.get() + lines);
//!     true
//! }));
//! term.scroll(3);
//! assert_eq!(seen.get(), 3);
//! ```

mod buffer;
mod crossterm;
pub mod seq;

pub use self::buffer::BufferTerminal;
pub use self::crossterm::CrosstermTerminal;

use std::io;
use std::rc::Rc;

/// Size of the terminal screen in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermSize {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl TermSize {
    /// Creates a new size.
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for TermSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Callback invoked with the number of lines the screen scrolled.
///
/// Returning `false` unsubscribes the listener. Adapters call it with `0` to
/// find out whether it is still alive.
pub type ScrollListener = Box<dyn FnMut(u16) -> bool>;

/// The seam between bars and the screen they draw on.
///
/// Methods take `&self` because a single terminal is shared by every bar
/// through an `Rc<dyn Terminal>`; implementations use interior mutability.
pub trait Terminal {
    /// Current screen size.
    fn size(&self) -> TermSize;

    /// Current cursor position as 1-based `(column, row)`, if it can be queried.
    fn cursor_pos(&self) -> Option<(i32, i32)>;

    /// Writes an already composed string of text and escape sequences.
    fn write(&self, s: &str) -> io::Result<()>;

    /// Whether the terminal understands VT100 sequences. Bars draw nothing
    /// on unsupported terminals.
    fn supported(&self) -> bool;

    /// Registers a scroll listener. Adapters that never scroll may ignore it.
    fn subscribe_scroll(&self, _listener: ScrollListener) {}
}

/// Sequences a [`SequenceGuard`] toggles on creation and restores on drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceModes {
    /// Switch to the alternate screen buffer.
    pub new_buffer: bool,
    /// Hide the cursor.
    pub hide_cursor: bool,
    /// Move the cursor to the top-left cell on entry.
    pub home_cursor: bool,
    /// Save the cursor position on entry and restore it on exit.
    pub save_cursor: bool,
}

/// RAII guard for temporary terminal modes.
///
/// The entry sequences are written when the guard is created and the matching
/// exit sequences when it is dropped, so the terminal is restored on every
/// exit path including `?` and panics.
///
/// ```rust
/// use pbar::term::{seq, BufferTerminal, SequenceGuard, SequenceModes};
/// use std::rc::Rc;
///
/// let term = Rc::new(BufferTerminal::new(80, 24));
/// {
///     let modes = SequenceModes { new_buffer: true, hide_cursor: true, ..Default::default() };
///     let _guard = SequenceGuard::new(term.clone(), modes).unwrap();
/// }
/// assert_eq!(term.output(), format!(
///     "{}{}{}{}",
///     seq::BUFFER_NEW, seq::CURSOR_HIDE, seq::BUFFER_OLD, seq::CURSOR_SHOW
/// ));
/// ```
pub struct SequenceGuard {
    terminal: Rc<dyn Terminal>,
    modes: SequenceModes,
}

impl SequenceGuard {
    /// Writes the entry sequences for `modes` and returns the guard.
    pub fn new(terminal: Rc<dyn Terminal>, modes: SequenceModes) -> io::Result<Self> {
        let mut enter = String::new();
        if modes.new_buffer {
            enter.push_str(seq::BUFFER_NEW);
        }
        if modes.hide_cursor {
            enter.push_str(seq::CURSOR_HIDE);
        }
        if modes.save_cursor {
            enter.push_str(seq::CURSOR_SAVE);
        }
        if modes.home_cursor {
            enter.push_str(seq::CURSOR_HOME);
        }
        if !enter.is_empty() {
            terminal.write(&enter)?;
        }
        Ok(Self { terminal, modes })
    }

    fn exit_sequence(&self) -> String {
        let mut exit = String::new();
        if self.modes.new_buffer {
            exit.push_str(seq::BUFFER_OLD);
        }
        if self.modes.hide_cursor {
            exit.push_str(seq::CURSOR_SHOW);
        }
        if self.modes.save_cursor {
            exit.push_str(seq::CURSOR_LOAD);
        }
        exit
    }
}

impl Drop for SequenceGuard {
    fn drop(&mut self) {
        let exit = self.exit_sequence();
        if !exit.is_empty() {
            let _ = self.terminal.write(&exit);
        }
    }
}

impl std::fmt::Debug for SequenceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceGuard")
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}
