//! Elapsed time since a bar was created.

use std::time::{Duration, Instant};

/// Measures time from creation or the last reset.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Stopwatch {
    /// Starts a stopwatch now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts from zero.
    pub fn reset(&mut self) {
        self.start_time = Instant::now();
    }

    /// Time since the start or the last reset.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Seconds, rounded to two decimals.
pub fn round_secs(d: Duration) -> f64 {
    (d.as_secs_f64() * 100.0).round() / 100.0
}

/// `mm:ss`, or `h:mm:ss` once an hour has passed.
pub fn format_duration(d: Duration) -> String {
    let seconds = d.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "00:00");
        assert_eq!(format_duration(Duration::from_millis(61_900)), "01:01");
        assert_eq!(format_duration(Duration::from_secs(3599)), "59:59");
        assert_eq!(format_duration(Duration::from_secs(3600 * 2 + 5)), "2:00:05");
    }

    #[test]
    fn test_round_secs() {
        assert_eq!(round_secs(Duration::from_millis(1234)), 1.23);
        assert_eq!(round_secs(Duration::from_millis(1235 * 10)), 12.35);
        assert_eq!(round_secs(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_reset_restarts_clock() {
        let mut sw = Stopwatch::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(sw.elapsed() >= Duration::from_millis(20));
        sw.reset();
        assert!(sw.elapsed() < Duration::from_millis(20));
    }
}
