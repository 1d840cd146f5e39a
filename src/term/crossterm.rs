use super::{seq, ScrollListener, TermSize, Terminal};
use ::crossterm::style::Print;
use ::crossterm::tty::IsTty;
use ::crossterm::{cursor, queue, terminal};
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use tracing::debug;

/// Terminal adapter for the real terminal on stdout.
///
/// Size and cursor queries go through crossterm. Support is decided once, at
/// construction: stdout must be a tty whose size can be queried.
///
/// Text the program prints while bars are on screen should go through
/// [`CrosstermTerminal::print`], which notices when the output scrolls the
/// screen and tells the subscribed bars about it.
pub struct CrosstermTerminal {
    supported: bool,
    scroll_limit: Cell<u16>,
    listeners: RefCell<Vec<ScrollListener>>,
}

impl CrosstermTerminal {
    /// Probes stdout and creates the adapter.
    pub fn new() -> Self {
        let is_tty = io::stdout().is_tty();
        let has_size = terminal::size().is_ok();
        let supported = is_tty && has_size;
        debug!(is_tty, has_size, supported, "probed stdout terminal");

        Self {
            supported,
            scroll_limit: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Number of rows kept free at the bottom of the screen.
    pub fn scroll_limit(&self) -> u16 {
        self.scroll_limit.get()
    }

    /// Reserves `limit` rows at the bottom of the screen.
    ///
    /// Printed text that reaches the reserved area scrolls the screen early so
    /// bars drawn there are not overwritten.
    pub fn set_scroll_limit(&self, limit: u16) {
        self.scroll_limit.set(limit);
    }

    /// Writes caller text to stdout, notifying scroll listeners when the text
    /// makes the screen scroll.
    pub fn print(&self, text: &str) -> io::Result<()> {
        let newlines = text
            .chars()
            .filter(|c| matches!(c, '\n' | '\x0b' | '\x0c'))
            .count();

        if newlines > 0 && self.supported && !self.listeners.borrow().is_empty() {
            if let Some((_, row)) = self.cursor_pos() {
                self.scroll_from(row, newlines)?;
            }
        }

        self.write_raw(text)
    }

    fn scroll_from(&self, row: i32, newlines: usize) -> io::Result<()> {
        let rows = i32::from(self.size().rows);
        let offset = i32::from(self.scroll_limit.get()) + 1;
        let threshold = rows - offset;
        if row < threshold {
            return Ok(());
        }

        // make room for the reserved rows before the caller's text lands
        let reserve = format!("{}{}", "\x0b".repeat(offset as usize), seq::move_vert(-offset, false));
        self.write_raw(&reserve)?;

        let lines = newlines as i64 + i64::from(row - threshold) - 1;
        let lines = u16::try_from(lines.max(0)).unwrap_or(u16::MAX);
        if lines > 0 {
            debug!(lines, row, rows, "screen scrolled");
            self.listeners
                .borrow_mut()
                .retain_mut(|listener| listener(lines));
        }
        Ok(())
    }

    fn write_raw(&self, s: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(out, Print(s))?;
        out.flush()
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> TermSize {
        terminal::size()
            .map(|(cols, rows)| TermSize::new(cols, rows))
            .unwrap_or_default()
    }

    fn cursor_pos(&self) -> Option<(i32, i32)> {
        cursor::position()
            .ok()
            .map(|(col, row)| (i32::from(col) + 1, i32::from(row) + 1))
    }

    fn write(&self, s: &str) -> io::Result<()> {
        self.write_raw(s)
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn subscribe_scroll(&self, listener: ScrollListener) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain_mut(|listener| listener(0));
        listeners.push(listener);
    }
}

impl std::fmt::Debug for CrosstermTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermTerminal")
            .field("supported", &self.supported)
            .field("scroll_limit", &self.scroll_limit.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
