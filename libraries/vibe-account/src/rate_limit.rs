//! Sliding-window rate limiter
//!
//! Bounds the frequency of account-mutating requests. Purely local and
//! in-memory; resets on process restart. This is an abuse speed bump, not a
//! security boundary.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window request gate
///
/// On each admission check, timestamps older than the window are discarded;
/// if the remaining count is at capacity the request is rejected without
/// being recorded, otherwise it is recorded and admitted.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    timestamps: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window`
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            timestamps: VecDeque::with_capacity(max_requests),
        }
    }

    /// Limiter for alias creation: 2 requests per second
    pub fn username_creation() -> Self {
        Self::new(Duration::from_secs(1), 2)
    }

    /// Limiter for registration: 1 request per 5 seconds
    pub fn registration() -> Self {
        Self::new(Duration::from_secs(5), 1)
    }

    /// Check admission at the current instant
    ///
    /// On rejection, returns how long until the window slides enough for the
    /// next request to be admitted.
    pub fn try_admit(&mut self) -> Result<(), Duration> {
        self.try_admit_at(Instant::now())
    }

    /// Check admission at an explicit instant (test hook)
    pub fn try_admit_at(&mut self, now: Instant) -> Result<(), Duration> {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) >= self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() >= self.max_requests {
            // Safe: non-empty when at capacity
            let oldest = *self.timestamps.front().expect("at capacity");
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return Err(retry_after);
        }

        self.timestamps.push_back(now);
        Ok(())
    }
}
