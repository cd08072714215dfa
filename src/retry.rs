//! Bounded retry schedule for containers that are not laid out yet.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

/// Delay between mount attempts, in milliseconds.
pub const RETRY_INTERVAL_MS: u32 = 50;

/// Attempts before giving up on a pending container.
pub const MAX_RETRY_ATTEMPTS: u32 = 30;

/// Counts retry attempts against a fixed cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    interval_ms: u32,
    max_attempts: u32,
    attempts: u32,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(RETRY_INTERVAL_MS, MAX_RETRY_ATTEMPTS)
    }
}

impl RetrySchedule {
    #[must_use]
    pub fn new(interval_ms: u32, max_attempts: u32) -> Self {
        Self { interval_ms, max_attempts, attempts: 0 }
    }

    #[must_use]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Record one attempt. Returns `false` once the cap has been reached,
    /// in which case no attempt should be made.
    pub fn try_attempt(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.attempts += 1;
        true
    }

    /// Start counting from zero, e.g. after an explicit `mount` call.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
