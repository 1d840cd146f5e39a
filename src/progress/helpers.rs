//! Driving bars from loops.

use super::Bar;
use crate::error::Result;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Runs `bar` through `range`, `step` at a time, sleeping `delay` after each
/// step.
///
/// The bar's range becomes `(range.start, range.end)`. When `interrupt` is
/// raised the bar is cleared and the function returns early; check
/// [`Bar::range`] to tell a finished run from an interrupted one.
///
/// ```rust
/// use pbar::progress::{animate, Bar};
/// use pbar::term::BufferTerminal;
/// use std::rc::Rc;
/// use std::sync::atomic::AtomicBool;
/// use std::time::Duration;
///
/// let mut bar = Bar::new(Rc::new(BufferTerminal::new(80, 24)), vec![]);
/// animate(&mut bar, 0..10, 2, Duration::ZERO, &AtomicBool::new(false)).unwrap();
/// assert_eq!(bar.range(), (10, 10));
/// ```
pub fn animate(
    bar: &mut Bar,
    range: Range<u64>,
    step: u64,
    delay: Duration,
    interrupt: &AtomicBool,
) -> Result<()> {
    bar.set_range(range.start, range.end);
    bar.draw()?;

    let step = i64::try_from(step.max(1)).unwrap_or(i64::MAX);
    loop {
        if interrupt.load(Ordering::Relaxed) {
            return bar.clear();
        }
        let (current, total) = bar.range();
        if current >= total {
            return Ok(());
        }
        bar.step(step)?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Iterator returned by [`iter`].
pub struct Steps<'a, I> {
    items: I,
    bars: Vec<&'a mut Bar>,
    pending: bool,
}

impl<'a, I: Iterator> Steps<'a, I> {
    fn step_bars(&mut self) {
        for bar in self.bars.iter_mut() {
            if let Err(err) = bar.step(1) {
                warn!(error = %err, "could not step bar");
            }
        }
    }
}

impl<'a, I: Iterator> Iterator for Steps<'a, I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        // the previous item is done once the next one is asked for
        if self.pending {
            self.step_bars();
        }
        let item = self.items.next();
        self.pending = item.is_some();
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Wraps `items` so every bar in `bars` steps once per item consumed.
///
/// When the number of items is known up front, every bar's range is set to
/// `(0, count)` and drawn. Otherwise the ranges are left as they are.
///
/// ```rust
/// use pbar::progress::{iter, Bar};
/// use pbar::term::BufferTerminal;
/// use std::rc::Rc;
///
/// let mut bar = Bar::new(Rc::new(BufferTerminal::new(80, 24)), vec![]);
/// let total: u32 = iter(vec![1, 2, 3], vec![&mut bar]).sum();
///
/// assert_eq!(total, 6);
/// assert_eq!(bar.range(), (3, 3));
/// ```
pub fn iter<'a, T: IntoIterator>(items: T, mut bars: Vec<&'a mut Bar>) -> Steps<'a, T::IntoIter> {
    let items = items.into_iter();
    if let (lower, Some(upper)) = items.size_hint() {
        if lower == upper {
            for bar in bars.iter_mut() {
                bar.set_range(0, lower as u64);
                if let Err(err) = bar.draw() {
                    warn!(error = %err, "could not draw bar");
                }
            }
        }
    }
    Steps {
        items,
        bars,
        pending: false,
    }
}
