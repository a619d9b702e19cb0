//! General time utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::dev::Timer;
use std::time::Instant;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A wall-clock [`Timer`] backed by the monotonic system clock.
#[derive(Debug, Default)]
pub struct Stopwatch {
    /// Time accumulated over previous start/stop periods.
    accumulated_s: f64,

    /// When the current running period began, `None` if stopped.
    running_since: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Stopwatch {
    /// A new, stopped stopwatch reading zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for Stopwatch {
    fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated_s += since.elapsed().as_secs_f64();
        }
    }

    fn reset(&mut self) {
        self.accumulated_s = 0.0;
        if self.running_since.is_some() {
            self.running_since = Some(Instant::now());
        }
    }

    fn get(&self) -> f64 {
        self.accumulated_s
            + self
                .running_since
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(1500)),
            Some(1.5)
        );
        assert_eq!(duration_to_seconds(chrono::Duration::max_value()), None);
    }

    #[test]
    fn test_stopwatch() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.get(), 0.0);

        sw.start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        sw.stop();
        let stopped = sw.get();
        assert!(stopped >= 0.005);

        // Stopped, so time doesn't advance
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(sw.get(), stopped);

        sw.reset();
        assert_eq!(sw.get(), 0.0);
    }
}
