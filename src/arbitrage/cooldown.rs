//! Error Cooldown: pause the loop when failures arrive too quickly
//!
//! Purpose:
//!     Stops the bot from spinning in a tight failure loop when a price API
//!     or the RPC endpoint is down.
//!
//! Created: 2026-10-12
//!
//! Design:
//!     - Every error increments `consecutive_errors` (successes never touch it)
//!     - On reaching `max_consecutive_errors`:
//!         * pause for the full cooldown period only if the previous threshold
//!           hit (or startup) was less than one cooldown period ago
//!         * ALWAYS reset the counter to 0 and stamp `last_error_at`
//!     - The pause itself is performed by the caller so it can be interrupted

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::ArbError;

/// Counter and timestamp owned by the opportunity loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownState {
    pub consecutive_errors: u32,
    pub last_error_at: Instant,
}

/// What the loop should do after recording an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownAction {
    Continue,
    Pause(Duration),
}

/// Consecutive-error tracker with conditional cooldown
pub struct ErrorCooldown {
    state: CooldownState,
    max_consecutive_errors: u32,
    cooldown_period: Duration,
}

impl ErrorCooldown {
    /// `last_error_at` starts at construction time.
    pub fn new(max_consecutive_errors: u32, cooldown_period: Duration) -> Self {
        Self {
            state: CooldownState {
                consecutive_errors: 0,
                last_error_at: Instant::now(),
            },
            max_consecutive_errors: max_consecutive_errors.max(1),
            cooldown_period,
        }
    }

    /// Record an error observed now.
    pub fn record_error(&mut self, err: &ArbError) -> CooldownAction {
        self.record_error_at(err, Instant::now())
    }

    /// Record an error observed at `now`.
    pub fn record_error_at(&mut self, err: &ArbError, now: Instant) -> CooldownAction {
        self.state.consecutive_errors += 1;
        let mut action = CooldownAction::Continue;

        if self.state.consecutive_errors >= self.max_consecutive_errors {
            let since_last = now.saturating_duration_since(self.state.last_error_at);
            if since_last < self.cooldown_period {
                error!(
                    "Too many consecutive errors ({}). Entering cooldown for {}s",
                    self.state.consecutive_errors,
                    self.cooldown_period.as_secs()
                );
                action = CooldownAction::Pause(self.cooldown_period);
            } else {
                debug!(
                    "Error threshold reached after {:?} (>= {:?}), resetting without cooldown",
                    since_last, self.cooldown_period
                );
            }
            self.state.consecutive_errors = 0;
            self.state.last_error_at = now;
        }

        error!("Error occurred: {}", err);
        action
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.state.consecutive_errors
    }

    pub fn last_error_at(&self) -> Instant {
        self.state.last_error_at
    }

    pub fn state(&self) -> CooldownState {
        self.state
    }

    pub fn cooldown_period(&self) -> Duration {
        self.cooldown_period
    }
}
