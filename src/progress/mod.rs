//! Progress bars drawn straight onto the terminal.
//!
//! A [`Bar`] owns a numeric range, a text, three style sets and a declared
//! position and size. Every [`Bar::draw`] resolves all of those against the
//! live terminal and paints a complete frame at absolute coordinates, so bars
//! can sit anywhere on screen, next to ordinary program output.
//!
//! A bar remembers the footprint of its last frame. When the next frame
//! lands elsewhere or covers different cells, the old footprint is blanked
//! first, so no stale glyph survives a move or a resize.
//!
//! # Basic Usage
//!
//! ```rust
//! use pbar::progress::{with_range, with_text, Bar};
//! use pbar::term::BufferTerminal;
//! use std::rc::Rc;
//!
//! let terminal = Rc::new(BufferTerminal::new(80, 24));
//! let mut bar = Bar::new(terminal.clone(), vec![with_range(0, 4), with_text("Copying")]);
//!
//! bar.draw().unwrap();
//! for _ in 0..4 {
//!     bar.step(1).unwrap();
//! }
//!
//! assert_eq!(bar.percentage(), 100);
//! assert_eq!(terminal.writes().len(), 5);
//! ```
//!
//! # Options
//!
//! Bars are configured with functional options, applied in order:
//!
//! ```rust
//! use pbar::content::Direction;
//! use pbar::geometry::Position;
//! use pbar::progress::{inverted, with_fill, with_position, with_size, Bar};
//! use pbar::sets::charset;
//! use pbar::term::BufferTerminal;
//! use std::rc::Rc;
//!
//! let bar = Bar::new(
//!     Rc::new(BufferTerminal::new(80, 24)),
//!     vec![
//!         with_size((-1, 3)),
//!         with_position(Position::parse("center", "r+1").unwrap()),
//!         with_fill(Direction::CenterX),
//!         inverted(),
//!     ],
//! );
//! assert_eq!(bar.charset(), &*charset::DEFAULT);
//! ```

pub mod helpers;
pub mod range;
pub mod render;


pub use helpers::{animate, iter, Steps};
pub use range::ProgressRange;

use crate::condition::Condition;
use crate::content::{Fill, FillStyle};
use crate::error::Result;
use crate::geometry::{Bounds, Geometry, Margins, Position, Size};
use crate::runeutil::display_width;
use crate::sets::{charset, colorset, formatset, CharSet, ColorSet, FormatSet, Labels, SetTree, StyleSet};
use crate::stopwatch::Stopwatch;
use crate::template::Attributes;
use crate::term::{seq, CrosstermTerminal, Terminal};
use std::cell::Cell;
use std::fmt;
use std::io::BufRead;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace};

/// Whether a bar has glyphs on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    /// Never drawn, or cleared since.
    Idle,
    /// The last frame is on screen.
    OnScreen,
}

/// What the last frame covered, captured right after it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSnapshot {
    /// Content area of the frame.
    pub geometry: Geometry,
    /// Format set the labels were rendered from.
    pub formatset: FormatSet,
    /// Labels as drawn.
    pub labels: Labels,
}

impl DrawSnapshot {
    /// Whether a frame at `geometry` with `labels` would leave some of this
    /// frame's cells uncovered.
    ///
    /// Everything inside the border is repainted by every frame, so only a
    /// different box, a different format set or side labels of a different
    /// width count.
    fn needs_clear(&self, geometry: &Geometry, formatset: &FormatSet, labels: &Labels) -> bool {
        self.geometry != *geometry
            || self.formatset != *formatset
            || display_width(&self.labels.left) != display_width(&labels.left)
            || display_width(&self.labels.right) != display_width(&labels.right)
    }
}

/// Configuration options for a [`Bar`], applied in order by [`Bar::new`].
///
/// Each variant has a matching constructor function, e.g.
/// [`with_range`] for [`BarOption::WithRange`].
#[derive(Debug)]
pub enum BarOption {
    /// Sets `(current, total)`.
    WithRange(u64, u64),
    /// Sets the text shown by `<text>` placeholders.
    WithText(String),
    /// Sets the declared size of the content area.
    WithSize(Size),
    /// Sets the declared position.
    WithPosition(Position),
    /// Whether the position names the middle of the bar.
    WithCentered(bool),
    /// Replaces the char set.
    WithCharset(CharSet),
    /// Replaces the color set.
    WithColorset(ColorSet),
    /// Replaces the format set.
    WithFormatset(FormatSet),
    /// Replaces the conditions.
    WithConditions(Vec<Condition>),
    /// Appends one condition.
    WithCondition(Condition),
    /// Sets the fill.
    WithFill(Fill),
    /// Swaps the full and empty halves when drawing.
    Inverted,
    /// Starts the bar disabled.
    Disabled,
}

impl BarOption {
    fn apply(self, bar: &mut Bar) {
        match self {
            BarOption::WithRange(current, total) => bar.range.set(current, total),
            BarOption::WithText(text) => bar.text = text,
            BarOption::WithSize(size) => bar.size = size,
            BarOption::WithPosition(position) => bar.position = position,
            BarOption::WithCentered(centered) => bar.centered = centered,
            BarOption::WithCharset(charset) => bar.charset = charset,
            BarOption::WithColorset(colorset) => bar.colorset = colorset,
            BarOption::WithFormatset(formatset) => bar.formatset = formatset,
            BarOption::WithConditions(conditions) => bar.conditions = conditions,
            BarOption::WithCondition(condition) => bar.conditions.push(condition),
            BarOption::WithFill(fill) => bar.fill = fill,
            BarOption::Inverted => bar.inverted = true,
            BarOption::Disabled => bar.enabled = false,
        }
    }
}

/// Sets the initial `(current, total)`. Values are clamped.
pub fn with_range(current: u64, total: u64) -> BarOption {
    BarOption::WithRange(current, total)
}

/// Sets the text shown by `<text>` placeholders.
pub fn with_text(text: impl Into<String>) -> BarOption {
    BarOption::WithText(text.into())
}

/// Sets the size of the content area, frame excluded.
///
/// Negative values stretch to the screen edge, see [`Size`].
pub fn with_size(size: impl Into<Size>) -> BarOption {
    BarOption::WithSize(size.into())
}

/// Sets the position, see [`Position`].
pub fn with_position(position: impl Into<Position>) -> BarOption {
    BarOption::WithPosition(position.into())
}

/// Whether the position names the middle of the bar (the default) or its
/// top-left cell.
pub fn with_centered(centered: bool) -> BarOption {
    BarOption::WithCentered(centered)
}

/// Sets the glyphs.
pub fn with_charset(charset: CharSet) -> BarOption {
    BarOption::WithCharset(charset)
}

/// Sets the colors.
pub fn with_colorset(colorset: ColorSet) -> BarOption {
    BarOption::WithColorset(colorset)
}

/// Sets the text templates.
pub fn with_formatset(formatset: FormatSet) -> BarOption {
    BarOption::WithFormatset(formatset)
}

/// Replaces every condition.
pub fn with_conditions(conditions: Vec<Condition>) -> BarOption {
    BarOption::WithConditions(conditions)
}

/// Adds a condition after the ones already set.
pub fn with_condition(condition: Condition) -> BarOption {
    BarOption::WithCondition(condition)
}

/// Sets the fill.
pub fn with_fill(fill: impl Into<Fill>) -> BarOption {
    BarOption::WithFill(fill.into())
}

/// Swaps the full and empty halves when drawing.
pub fn inverted() -> BarOption {
    BarOption::Inverted
}

/// Creates the bar disabled: it keeps its state but writes nothing.
pub fn disabled() -> BarOption {
    BarOption::Disabled
}

/// A progress bar.
///
/// Bars share their terminal through an `Rc`, so any number of them can draw
/// on the same screen. They are single-threaded; callers interleaving several
/// bars are expected to draw them one after the other.
///
/// # Examples
///
/// ```rust
/// use pbar::progress::{with_range, Bar, BarState};
/// use pbar::term::BufferTerminal;
/// use std::rc::Rc;
///
/// let terminal = Rc::new(BufferTerminal::new(80, 24));
/// let mut bar = Bar::new(terminal.clone(), vec![with_range(1, 3)]);
/// assert_eq!(bar.state(), BarState::Idle);
///
/// bar.draw().unwrap();
/// assert_eq!(bar.state(), BarState::OnScreen);
///
/// bar.clear().unwrap();
/// assert_eq!(bar.state(), BarState::Idle);
/// assert_eq!(terminal.writes().len(), 2);
/// ```
pub struct Bar {
    terminal: Rc<dyn Terminal>,
    range: ProgressRange,
    text: String,
    size: Size,
    position: Position,
    centered: bool,
    charset: CharSet,
    colorset: ColorSet,
    formatset: FormatSet,
    conditions: Vec<Condition>,
    fill: Fill,
    inverted: bool,
    enabled: bool,
    stopwatch: Stopwatch,
    snapshot: Option<DrawSnapshot>,
    pending_scroll: Rc<Cell<u16>>,
}

impl Bar {
    /// Creates a bar drawing on `terminal`.
    ///
    /// Nothing is written until the first [`Bar::draw`].
    pub fn new(terminal: Rc<dyn Terminal>, opts: Vec<BarOption>) -> Self {
        let pending_scroll = Rc::new(Cell::new(0u16));
        let listener = Rc::downgrade(&pending_scroll);
        terminal.subscribe_scroll(Box::new(move |lines| match listener.upgrade() {
            Some(pending) => {
                pending.set(pending.get().saturating_add(lines));
                true
            }
            None => false,
        }));

        let mut bar = Self {
            terminal,
            range: ProgressRange::default(),
            text: String::new(),
            size: Size::default(),
            position: Position::default(),
            centered: true,
            charset: *charset::DEFAULT,
            colorset: *colorset::DEFAULT,
            formatset: formatset::DEFAULT.clone(),
            conditions: Vec::new(),
            fill: Fill::default(),
            inverted: false,
            enabled: true,
            stopwatch: Stopwatch::new(),
            snapshot: None,
            pending_scroll,
        };
        for opt in opts {
            opt.apply(&mut bar);
        }
        bar
    }

    /// Creates a bar drawing on standard output.
    pub fn stdout(opts: Vec<BarOption>) -> Self {
        Self::new(Rc::new(CrosstermTerminal::new()), opts)
    }

    /// The terminal the bar draws on.
    pub fn terminal(&self) -> &Rc<dyn Terminal> {
        &self.terminal
    }

    fn can_write(&self) -> bool {
        self.enabled && self.terminal.supported()
    }

    /// Moves the last snapshot up by however far the screen scrolled since.
    fn apply_scroll(&mut self) {
        let scrolled = self.pending_scroll.replace(0);
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.geometry = snapshot.geometry.shifted_up(i32::from(scrolled));
        }
    }

    fn run_conditions(&mut self) {
        if self.conditions.is_empty() {
            return;
        }
        let mut conditions = std::mem::take(&mut self.conditions);
        for condition in conditions.iter_mut() {
            condition.apply(self);
        }
        // a callback may have installed new conditions
        if self.conditions.is_empty() {
            self.conditions = conditions;
        }
    }

    fn resolve(&self, labels: &Labels) -> Geometry {
        let margins = Margins::with_labels(display_width(&labels.left), display_width(&labels.right));
        // querying the cursor is a round trip to the terminal
        let cursor = if self.position.is_relative() {
            self.terminal.cursor_pos()
        } else {
            None
        };
        let bounds = Bounds::new(self.terminal.size(), cursor, margins);
        bounds.resolve(&self.position, &self.size, self.centered)
    }

    fn fill_style(&self) -> FillStyle {
        let style = FillStyle::from_sets(&self.charset, &self.colorset);
        if self.inverted {
            style.inverted()
        } else {
            style
        }
    }

    /// Paints the bar.
    ///
    /// Conditions run first, then the labels are rendered and the geometry
    /// resolved. If the previous frame would not be fully covered by the new
    /// one, it is blanked in a write of its own before the new frame is
    /// written.
    ///
    /// Disabled bars and bars on unsupported terminals write nothing.
    ///
    /// # Errors
    ///
    /// Template errors from the format set, and I/O errors from the terminal.
    pub fn draw(&mut self) -> Result<()> {
        if !self.can_write() {
            trace!(enabled = self.enabled, "draw suppressed");
            return Ok(());
        }

        self.run_conditions();
        let labels = self.formatset.render(&self.attributes())?;
        let geometry = self.resolve(&labels);
        let content = self.fill.generate(geometry, &self.fill_style(), self.range.ratio());

        // the snapshot is only replaced once the new frame is on screen
        self.apply_scroll();
        if let Some(previous) = &self.snapshot {
            if previous.needs_clear(&geometry, &self.formatset, &labels) {
                debug!(from = ?previous.geometry, to = ?geometry, "clearing previous frame");
                let blank = render::erase(&previous.geometry, &previous.labels);
                self.terminal.write(&seq::wrap_frame(&blank))?;
            }
        }

        let frame = render::compose(&geometry, &self.charset, &self.colorset, &content, &labels);
        self.terminal.write(&seq::wrap_frame(&frame))?;
        self.snapshot = Some(DrawSnapshot {
            geometry,
            formatset: self.formatset.clone(),
            labels,
        });
        Ok(())
    }

    /// Moves the range by `delta` and redraws.
    pub fn step(&mut self, delta: i64) -> Result<()> {
        self.range.step(delta);
        self.draw()
    }

    /// Moves the range by `delta`, replaces the text and redraws.
    pub fn step_with_text(&mut self, delta: i64, text: impl Into<String>) -> Result<()> {
        self.text = text.into();
        self.step(delta)
    }

    /// Blanks the last frame. Does nothing when the bar is not on screen.
    pub fn clear(&mut self) -> Result<()> {
        if !self.can_write() {
            trace!(enabled = self.enabled, "clear suppressed");
            return Ok(());
        }
        self.apply_scroll();
        if let Some(previous) = &self.snapshot {
            let blank = render::erase(&previous.geometry, &previous.labels);
            self.terminal.write(&seq::wrap_frame(&blank))?;
            self.snapshot = None;
        }
        Ok(())
    }

    /// Restarts the elapsed time clock.
    pub fn reset_elapsed(&mut self) {
        self.stopwatch.reset();
    }

    /// Time since creation or the last [`Bar::reset_elapsed`].
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// `(current, total)`.
    pub fn range(&self) -> (u64, u64) {
        self.range.get()
    }

    /// Replaces the range. Values are clamped.
    pub fn set_range(&mut self, current: u64, total: u64) {
        self.range.set(current, total);
    }

    /// Sets the range to `(0, n)` where `n` is the number of lines in
    /// `reader`, and returns `n`.
    ///
    /// # Errors
    ///
    /// I/O errors while reading.
    pub fn set_range_from_lines(&mut self, reader: impl BufRead) -> Result<u64> {
        let mut count = 0u64;
        for line in reader.lines() {
            line?;
            count += 1;
        }
        self.range.set(0, count);
        Ok(count)
    }

    /// Percentage of the range covered, rounded down.
    pub fn percentage(&self) -> u64 {
        self.range.percentage()
    }

    /// Moves `current` to cover `percentage` percent of the total.
    pub fn set_percentage(&mut self, percentage: u64) {
        self.range.set_percentage(percentage);
    }

    /// The text shown by `<text>` placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text. Takes effect on the next draw.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Current glyphs.
    pub fn charset(&self) -> &CharSet {
        &self.charset
    }

    /// Replaces the glyphs.
    pub fn set_charset(&mut self, charset: CharSet) {
        self.charset = charset;
    }

    /// Merges a partial tree over the current char set.
    ///
    /// On error the char set is left untouched.
    pub fn merge_charset(&mut self, tree: &SetTree) -> Result<()> {
        self.charset = self.charset.merged(tree)?;
        Ok(())
    }

    /// Current colors.
    pub fn colorset(&self) -> &ColorSet {
        &self.colorset
    }

    /// Replaces the colors.
    pub fn set_colorset(&mut self, colorset: ColorSet) {
        self.colorset = colorset;
    }

    /// Merges a partial tree over the current color set.
    pub fn merge_colorset(&mut self, tree: &SetTree) -> Result<()> {
        self.colorset = self.colorset.merged(tree)?;
        Ok(())
    }

    /// Current text templates.
    pub fn formatset(&self) -> &FormatSet {
        &self.formatset
    }

    /// Replaces the text templates.
    pub fn set_formatset(&mut self, formatset: FormatSet) {
        self.formatset = formatset;
    }

    /// Merges a partial tree over the current format set.
    pub fn merge_formatset(&mut self, tree: &SetTree) -> Result<()> {
        self.formatset = self.formatset.merged(tree)?;
        Ok(())
    }

    /// Declared position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the bar, redrawing it if it is on screen.
    pub fn set_position(&mut self, position: impl Into<Position>) -> Result<()> {
        self.position = position.into();
        self.redraw_if_shown()
    }

    /// Declared size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the bar, redrawing it if it is on screen.
    pub fn set_size(&mut self, size: impl Into<Size>) -> Result<()> {
        self.size = size.into();
        self.redraw_if_shown()
    }

    /// Whether the position names the middle of the bar.
    pub fn centered(&self) -> bool {
        self.centered
    }

    /// Changes the anchor, redrawing the bar if it is on screen.
    pub fn set_centered(&mut self, centered: bool) -> Result<()> {
        self.centered = centered;
        self.redraw_if_shown()
    }

    fn redraw_if_shown(&mut self) -> Result<()> {
        match self.state() {
            BarState::OnScreen => self.draw(),
            BarState::Idle => Ok(()),
        }
    }

    /// Current fill.
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    /// Replaces the fill.
    pub fn set_fill(&mut self, fill: impl Into<Fill>) {
        self.fill = fill.into();
    }

    /// Whether the fill halves are swapped.
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Swaps the fill halves, or stops swapping them.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Conditions, in evaluation order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Replaces every condition.
    pub fn set_conditions(&mut self, conditions: Vec<Condition>) {
        self.conditions = conditions;
    }

    /// Adds a condition after the existing ones.
    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Whether the bar writes anything.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables writing. State keeps changing while disabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Where the bar would be drawn right now.
    ///
    /// # Errors
    ///
    /// Template errors from the format set.
    pub fn geometry(&self) -> Result<Geometry> {
        let labels = self.formatset.render(&self.attributes())?;
        Ok(self.resolve(&labels))
    }

    /// Everything templates and conditions can read.
    pub fn attributes(&self) -> Attributes {
        Attributes::new(self.range.get(), self.text.clone()).with_elapsed(self.stopwatch.elapsed())
    }

    /// Whether the bar is on screen.
    pub fn state(&self) -> BarState {
        match self.snapshot {
            Some(_) => BarState::OnScreen,
            None => BarState::Idle,
        }
    }

    /// The last frame drawn, if the bar is on screen.
    pub fn snapshot(&self) -> Option<&DrawSnapshot> {
        self.snapshot.as_ref()
    }
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bar")
            .field("range", &self.range)
            .field("text", &self.text)
            .field("size", &self.size)
            .field("position", &self.position)
            .field("centered", &self.centered)
            .field("fill", &self.fill)
            .field("inverted", &self.inverted)
            .field("enabled", &self.enabled)
            .field("conditions", &self.conditions.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
