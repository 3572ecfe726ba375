//! Windowed rate meter

use std::time::{Duration, Instant};

/// Rates are recomputed once per window
pub const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Counts occurrences and reports a per-second rate once per window.
///
/// The reported value is `round(count * 1000 / elapsed_ms)` for the window
/// that just closed, and stays fixed until the next window closes.
#[derive(Debug, Clone)]
pub struct RateMeter {
    window: Duration,
    window_start: Instant,
    count: u64,
    rate: u32,
}

impl RateMeter {
    pub fn new(now: Instant) -> Self {
        Self::with_window(RATE_WINDOW, now)
    }

    pub fn with_window(window: Duration, now: Instant) -> Self {
        Self {
            window,
            window_start: now,
            count: 0,
            rate: 0,
        }
    }

    /// Count one occurrence; returns the new rate when a window closes
    pub fn record(&mut self, now: Instant) -> Option<u32> {
        self.count += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let elapsed_ms = elapsed.as_millis().max(1) as f64;
        self.rate = (self.count as f64 * 1000.0 / elapsed_ms).round() as u32;
        self.count = 0;
        self.window_start = now;
        Some(self.rate)
    }

    /// Rate from the last closed window
    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn reset(&mut self, now: Instant) {
        self.window_start = now;
        self.count = 0;
        self.rate = 0;
    }
}
