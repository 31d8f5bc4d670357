//! Sliding-window rate limiter
//!
//! Keeps the timestamps of admitted calls inside the trailing `period`.
//! A call is admitted while fewer than `limit` timestamps remain after pruning.
//! Uses the tokio clock so paused-time tests can drive the window.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Poll interval for `wait_if_needed`
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Rate limiter with sliding window.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum calls per window
    limit: usize,
    /// Window length
    period: Duration,
    /// Timestamps of admitted calls, oldest first
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            limit,
            period,
            calls: VecDeque::with_capacity(limit),
        }
    }

    /// Try to consume a slot. Returns true (and records the call) if allowed.
    pub fn can_call(&mut self) -> bool {
        let now = Instant::now();

        // Remove calls that have left the window
        while let Some(&front) = self.calls.front() {
            if now.duration_since(front) >= self.period {
                self.calls.pop_front();
            } else {
                break;
            }
        }

        if self.calls.len() < self.limit {
            self.calls.push_back(now);
            true
        } else {
            false
        }
    }

    /// Block (cooperatively) until a slot is available.
    pub async fn wait_if_needed(&mut self) {
        let mut waited = false;
        while !self.can_call() {
            if !waited {
                debug!("Rate limit reached ({} calls / {:?}), waiting", self.limit, self.period);
                waited = true;
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Calls currently counted in the window (not pruned).
    pub fn in_window(&self) -> usize {
        self.calls.len()
    }
}
