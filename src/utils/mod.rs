//! Utilities
//!
//! Reusable primitives (rate limiting, retries) plus small formatting and
//! validation helpers used by config loading and the dry-run executor.
//!
//! Created: 2026-10-12

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::RateLimiter;
pub use retry::{retry_with_delay, RetryPolicy};

/// Format an amount with a fixed number of decimals
pub fn format_amount(amount: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, amount)
}

/// Apply the configured safety multiplier to a network fee estimate
pub fn with_gas_buffer(base_fee: f64, gas_adjustment: f64) -> f64 {
    base_fee * gas_adjustment
}

/// Base58 account/router addresses are 43 or 44 characters long
pub fn validate_address(address: &str) -> bool {
    matches!(address.len(), 43 | 44)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1.23456789, 2), "1.23");
        assert_eq!(format_amount(1.23456789, 4), "1.2346");
        assert_eq!(format_amount(1.23456789, 8), "1.23456789");
    }

    #[test]
    fn test_with_gas_buffer() {
        assert!(with_gas_buffer(1.0, 1.2) > 1.0);
        assert_eq!(with_gas_buffer(2.0, 1.5), 3.0);
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(&"x".repeat(44)));
        assert!(validate_address(&"x".repeat(43)));
        assert!(!validate_address(&"x".repeat(42)));
        assert!(!validate_address(&"x".repeat(45)));
    }
}
