//! The numeric progress of a bar.

/// `(current, total)` with `current <= total` and `total >= 1`.
///
/// Values that would break the invariant are clamped rather than rejected.
///
/// ```rust
/// use pbar::progress::range::ProgressRange;
///
/// let mut range = ProgressRange::new(3, 0);
/// assert_eq!(range.get(), (1, 1));
///
/// range.set(5, 8);
/// range.step(-10);
/// assert_eq!(range.current(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressRange {
    current: u64,
    total: u64,
}

impl ProgressRange {
    /// Creates a clamped range.
    pub fn new(current: u64, total: u64) -> Self {
        let mut range = Self { current: 0, total: 1 };
        range.set(current, total);
        range
    }

    /// Replaces both values.
    pub fn set(&mut self, current: u64, total: u64) {
        self.total = total.max(1);
        self.current = current.min(self.total);
    }

    /// Moves `current` by `delta`, stopping at both ends.
    pub fn step(&mut self, delta: i64) {
        let moved = if delta < 0 {
            self.current.saturating_sub(delta.unsigned_abs())
        } else {
            self.current.saturating_add(delta.unsigned_abs())
        };
        self.current = moved.min(self.total);
    }

    /// Sets `current` to cover `percentage` percent of the total, rounding
    /// down. Percentages above 100 count as 100.
    pub fn set_percentage(&mut self, percentage: u64) {
        let percentage = u128::from(percentage.min(100));
        let current = u128::from(self.total) * percentage / 100;
        self.current = u64::try_from(current).unwrap_or(self.total);
    }

    /// `floor(current * 100 / total)`.
    pub fn percentage(&self) -> u64 {
        let pct = u128::from(self.current) * 100 / u128::from(self.total);
        u64::try_from(pct).unwrap_or(100)
    }

    /// `current / total`, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.current as f64 / self.total as f64
    }

    /// `(current, total)`.
    pub fn get(&self) -> (u64, u64) {
        (self.current, self.total)
    }

    /// Progress made so far.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Progress needed to complete.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether `current` reached `total`.
    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl From<(u64, u64)> for ProgressRange {
    fn from((current, total): (u64, u64)) -> Self {
        Self::new(current, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(ProgressRange::new(5, 0).get(), (1, 1));
        assert_eq!(ProgressRange::new(9, 4).get(), (4, 4));
        assert_eq!(ProgressRange::default().get(), (0, 1));
    }

    #[test]
    fn test_percentage_is_floored() {
        for total in 1..=30u64 {
            for current in 0..=total {
                let range = ProgressRange::new(current, total);
                assert_eq!(range.percentage(), current * 100 / total);
            }
        }
        assert_eq!(ProgressRange::new(2, 3).percentage(), 66);
    }

    #[test]
    fn test_percentage_is_monotonic() {
        let mut last = 0;
        for current in 0..=7 {
            let pct = ProgressRange::new(current, 7).percentage();
            assert!(pct >= last);
            last = pct;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_step_saturates() {
        let mut range = ProgressRange::new(2, 5);
        range.step(2);
        assert_eq!(range.current(), 4);
        range.step(10);
        assert_eq!(range.current(), 5);
        assert!(range.is_complete());
        range.step(-7);
        assert_eq!(range.current(), 0);
        range.step(i64::MIN);
        assert_eq!(range.current(), 0);
    }

    #[test]
    fn test_set_percentage() {
        let mut range = ProgressRange::new(0, 8);
        range.set_percentage(50);
        assert_eq!(range.get(), (4, 8));
        range.set_percentage(99);
        assert_eq!(range.current(), 7);
        range.set_percentage(250);
        assert_eq!(range.current(), 8);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let range = ProgressRange::new(u64::MAX - 1, u64::MAX);
        assert_eq!(range.percentage(), 99);
        assert!((range.ratio() - 1.0).abs() < 1e-9);
    }
}
