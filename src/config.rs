//! Configuration management
//! Load settings from the environment / .env file

use crate::error::ConfigError;
use crate::utils::validate_address;
use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;

// Re-export BotConfig for external access
pub use crate::types::BotConfig;
use crate::types::Venue;

pub const DEFAULT_VENUE_A_NAME: &str = "Raydium";
pub const DEFAULT_VENUE_B_NAME: &str = "Orca";
pub const DEFAULT_VENUE_A_PRICE_URL: &str = "https://api.raydium.io/v2/main/price";
pub const DEFAULT_VENUE_B_PRICE_URL: &str = "https://api.orca.so/v1/token/price";

pub const DEFAULT_FEE_RATE: f64 = 0.003;
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 5;
pub const DEFAULT_ERROR_COOLDOWN_SECS: u64 = 300;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_RATE_LIMIT_CALLS: usize = 10;
pub const DEFAULT_RATE_LIMIT_PERIOD_MS: u64 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.2;
pub const DEFAULT_BASE_NETWORK_FEE: f64 = 0.000005;

/// Load from the process environment, reading `.env` first if present
pub fn load_config() -> Result<BotConfig> {
    dotenv::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Load from a specific env file (e.g. `.env.mainnet`), then the environment
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<BotConfig> {
    dotenv::from_path(path.as_ref())
        .with_context(|| format!("Failed to read env file: {}", path.as_ref().display()))?;
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any key lookup (environment, map in tests, ...)
pub fn config_from_lookup<F>(lookup: F) -> Result<BotConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let poll_interval_ms = parse_or(&lookup, "PRICE_CHECK_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
    let trade_amount: f64 = parse_required(&lookup, "TRADE_AMOUNT")?;

    let config = BotConfig {
        token_address: required(&lookup, "TOKEN_ADDRESS")?,

        venue_a: Venue::new(
            lookup("VENUE_A_NAME").unwrap_or_else(|| DEFAULT_VENUE_A_NAME.to_string()),
            required(&lookup, "VENUE_A_ROUTER")?,
        ),
        venue_b: Venue::new(
            lookup("VENUE_B_NAME").unwrap_or_else(|| DEFAULT_VENUE_B_NAME.to_string()),
            required(&lookup, "VENUE_B_ROUTER")?,
        ),
        venue_a_price_url: lookup("VENUE_A_PRICE_URL")
            .unwrap_or_else(|| DEFAULT_VENUE_A_PRICE_URL.to_string()),
        venue_b_price_url: lookup("VENUE_B_PRICE_URL")
            .unwrap_or_else(|| DEFAULT_VENUE_B_PRICE_URL.to_string()),

        trade_amount,
        min_profit_threshold: parse_required(&lookup, "MIN_PROFIT_THRESHOLD")?,
        fee_rate: parse_or(&lookup, "FEE_RATE", DEFAULT_FEE_RATE)?,

        max_consecutive_errors: parse_or(
            &lookup,
            "MAX_CONSECUTIVE_ERRORS",
            DEFAULT_MAX_CONSECUTIVE_ERRORS,
        )?,
        error_cooldown_secs: parse_or(
            &lookup,
            "ERROR_COOLDOWN_PERIOD",
            DEFAULT_ERROR_COOLDOWN_SECS,
        )?,
        max_retries: parse_or(&lookup, "MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        retry_delay_ms: parse_or(&lookup, "RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?,

        poll_interval_ms,
        // Cached prices live for one poll interval unless overridden
        price_cache_ttl_ms: parse_or(&lookup, "PRICE_CACHE_TTL_MS", poll_interval_ms)?,
        rate_limit_calls: parse_or(&lookup, "RATE_LIMIT_CALLS", DEFAULT_RATE_LIMIT_CALLS)?,
        rate_limit_period_ms: parse_or(
            &lookup,
            "RATE_LIMIT_PERIOD_MS",
            DEFAULT_RATE_LIMIT_PERIOD_MS,
        )?,
        http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,

        gas_adjustment: parse_or(&lookup, "GAS_ADJUSTMENT", DEFAULT_GAS_ADJUSTMENT)?,
        base_network_fee: parse_or(&lookup, "BASE_NETWORK_FEE", DEFAULT_BASE_NETWORK_FEE)?,
        paper_balance: parse_or(&lookup, "PAPER_BALANCE", trade_amount)?,
    };

    config.validate()?;
    Ok(config)
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required(lookup, key)?;
    parse_value(key, &raw)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => parse_value(key, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        field: key,
        reason: format!("'{}': {}", raw, e),
    })
}

impl BotConfig {
    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.token_address.trim().is_empty() {
            return Err(ConfigError::Missing("TOKEN_ADDRESS"));
        }
        if !(self.trade_amount.is_finite() && self.trade_amount > 0.0) {
            return Err(invalid("TRADE_AMOUNT", "must be positive"));
        }
        if !self.min_profit_threshold.is_finite() {
            return Err(invalid("MIN_PROFIT_THRESHOLD", "must be finite"));
        }
        if !(0.0..1.0).contains(&self.fee_rate) {
            return Err(invalid("FEE_RATE", "must be in [0, 1)"));
        }
        if self.max_consecutive_errors == 0 {
            return Err(invalid("MAX_CONSECUTIVE_ERRORS", "must be at least 1"));
        }
        if self.rate_limit_calls == 0 {
            return Err(invalid("RATE_LIMIT_CALLS", "must be at least 1"));
        }
        if self.gas_adjustment < 1.0 {
            return Err(invalid("GAS_ADJUSTMENT", "must be >= 1.0"));
        }
        if self.venue_a.router_address == self.venue_b.router_address {
            return Err(invalid("VENUE_B_ROUTER", "must differ from VENUE_A_ROUTER"));
        }
        let routers = [("VENUE_A_ROUTER", &self.venue_a), ("VENUE_B_ROUTER", &self.venue_b)];
        for (field, venue) in routers {
            if !validate_address(&venue.router_address) {
                return Err(invalid(
                    field,
                    format!("'{}' is not a 43/44 character address", venue.router_address),
                ));
            }
        }
        Ok(())
    }
}
