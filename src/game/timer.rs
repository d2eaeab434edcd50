//! Match clock.
//!
//! Time comes from the caller as milliseconds since an arbitrary origin, so
//! the clock is deterministic under test.

/// Format milliseconds as `MM:SS`. Minutes go past 99 rather than wrap.
///
/// ```
/// use memory_match::game::format_clock;
///
/// assert_eq!(format_clock(0), "00:00");
/// assert_eq!(format_clock(61_999), "01:01");
/// ```
#[must_use]
pub fn format_clock(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed time of a match and throttling of its on-screen refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchTimer {
    started_at: u64,
    last_refresh: u64,
    interval: u64,
}

impl MatchTimer {
    #[must_use]
    pub fn new(interval_ms: u32) -> Self {
        Self {
            started_at: 0,
            last_refresh: 0,
            interval: u64::from(interval_ms),
        }
    }

    /// Restart the clock at `now`.
    pub fn start(&mut self, now: u64) {
        self.started_at = now;
        self.last_refresh = now;
    }

    /// Forget the current match.
    pub fn reset(&mut self) {
        self.started_at = 0;
        self.last_refresh = 0;
    }

    #[must_use]
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    /// Return the elapsed time if a refresh is due, and mark it done.
    pub fn refresh(&mut self, now: u64) -> Option<u64> {
        if now.saturating_sub(self.last_refresh) < self.interval {
            return None;
        }
        self.last_refresh = now;
        Some(self.elapsed(now))
    }
}
