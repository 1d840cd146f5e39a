use super::{ScrollListener, TermSize, Terminal};
use std::cell::{Cell, RefCell};
use std::io;

/// In-memory terminal that records every write.
///
/// Size, cursor position and VT100 support are plain settable values, and
/// [`BufferTerminal::scroll`] simulates the screen scrolling.
#[derive(Default)]
pub struct BufferTerminal {
    size: Cell<TermSize>,
    cursor: Cell<Option<(i32, i32)>>,
    unsupported: Cell<bool>,
    writes: RefCell<Vec<String>>,
    listeners: RefCell<Vec<ScrollListener>>,
}

impl BufferTerminal {
    /// Creates a supported terminal of the given size with no cursor position.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Cell::new(TermSize::new(cols, rows)),
            ..Self::default()
        }
    }

    /// Resizes the screen.
    pub fn set_size(&self, cols: u16, rows: u16) {
        self.size.set(TermSize::new(cols, rows));
    }

    /// Sets the 1-based cursor position reported by [`Terminal::cursor_pos`].
    pub fn set_cursor(&self, pos: Option<(i32, i32)>) {
        self.cursor.set(pos);
    }

    /// Toggles VT100 support.
    pub fn set_supported(&self, supported: bool) {
        self.unsupported.set(!supported);
    }

    /// Every write so far, one entry per [`Terminal::write`] call.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// Returns the recorded writes and forgets them.
    pub fn take_writes(&self) -> Vec<String> {
        std::mem::take(&mut *self.writes.borrow_mut())
    }

    /// All writes concatenated.
    pub fn output(&self) -> String {
        self.writes.borrow().concat()
    }

    /// Number of subscribed scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Notifies the scroll listeners that the screen scrolled `lines` lines.
    pub fn scroll(&self, lines: u16) {
        if lines == 0 {
            return;
        }
        self.listeners
            .borrow_mut()
            .retain_mut(|listener| listener(lines));
    }
}

impl Terminal for BufferTerminal {
    fn size(&self) -> TermSize {
        self.size.get()
    }

    fn cursor_pos(&self) -> Option<(i32, i32)> {
        self.cursor.get()
    }

    fn write(&self, s: &str) -> io::Result<()> {
        self.writes.borrow_mut().push(s.to_string());
        Ok(())
    }

    fn supported(&self) -> bool {
        !self.unsupported.get()
    }

    fn subscribe_scroll(&self, listener: ScrollListener) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain_mut(|listener| listener(0));
        listeners.push(listener);
    }
}

impl std::fmt::Debug for BufferTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferTerminal")
            .field("size", &self.size.get())
            .field("cursor", &self.cursor.get())
            .field("supported", &self.supported())
            .field("writes", &self.writes.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
