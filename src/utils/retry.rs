//! Bounded retry with fixed delay
//!
//! Wraps a fallible async operation. Each failure except the last is logged
//! with its attempt number and followed by `delay`; the final error is
//! returned to the caller unchanged.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Attempts and delay between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` calls have failed.
pub async fn retry_with_delay<T, E, F, Fut>(
    policy: RetryPolicy,
    name: &str,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                error!("Max retries ({}) reached for {}: {}", max_attempts, name, e);
                return Err(e);
            }
            Err(e) => {
                warn!("Attempt {}/{} failed for {}: {}", attempt, max_attempts, name, e);
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}
