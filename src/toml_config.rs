//! TOML Configuration Reader
//!
//! Alternative to the .env loader for running several bot instances with
//! checked-in config files. Produces the same validated `BotConfig`.
//!
//! Created: 2026-10-13

use crate::config::{
    DEFAULT_BASE_NETWORK_FEE, DEFAULT_ERROR_COOLDOWN_SECS, DEFAULT_FEE_RATE, DEFAULT_GAS_ADJUSTMENT,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_CONSECUTIVE_ERRORS, DEFAULT_MAX_RETRIES,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RATE_LIMIT_CALLS, DEFAULT_RATE_LIMIT_PERIOD_MS,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_VENUE_A_NAME, DEFAULT_VENUE_A_PRICE_URL, DEFAULT_VENUE_B_NAME,
    DEFAULT_VENUE_B_PRICE_URL,
};
use crate::types::{BotConfig, Venue};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level TOML configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub general: GeneralConfig,
    pub venue_a: VenueConfig,
    pub venue_b: VenueConfig,
    pub trading: TradingConfig,
    #[serde(default)]
    pub errors: ErrorConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub token_address: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_poll_interval() -> u64 { DEFAULT_POLL_INTERVAL_MS }
fn default_log_level() -> String { "info".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub name: Option<String>,
    pub router: String,
    pub price_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    pub trade_amount: f64,
    pub min_profit_threshold: f64,
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,
    pub paper_balance: Option<f64>,
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    #[serde(default = "default_base_network_fee")]
    pub base_network_fee: f64,
}

fn default_fee_rate() -> f64 { DEFAULT_FEE_RATE }
fn default_gas_adjustment() -> f64 { DEFAULT_GAS_ADJUSTMENT }
fn default_base_network_fee() -> f64 { DEFAULT_BASE_NETWORK_FEE }

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    pub max_consecutive_errors: u32,
    pub cooldown_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
            cooldown_secs: DEFAULT_ERROR_COOLDOWN_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub rate_limit_calls: usize,
    pub rate_limit_period_ms: u64,
    /// Defaults to the poll interval when absent
    pub price_cache_ttl_ms: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            rate_limit_calls: DEFAULT_RATE_LIMIT_CALLS,
            rate_limit_period_ms: DEFAULT_RATE_LIMIT_PERIOD_MS,
            price_cache_ttl_ms: None,
        }
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML configuration")
    }

    /// Convert to a validated BotConfig
    pub fn to_bot_config(&self) -> Result<BotConfig> {
        let config = BotConfig {
            token_address: self.general.token_address.clone(),
            venue_a: self.venue_a.to_venue(DEFAULT_VENUE_A_NAME),
            venue_b: self.venue_b.to_venue(DEFAULT_VENUE_B_NAME),
            venue_a_price_url: self
                .venue_a
                .price_url
                .clone()
                .unwrap_or_else(|| DEFAULT_VENUE_A_PRICE_URL.to_string()),
            venue_b_price_url: self
                .venue_b
                .price_url
                .clone()
                .unwrap_or_else(|| DEFAULT_VENUE_B_PRICE_URL.to_string()),
            trade_amount: self.trading.trade_amount,
            min_profit_threshold: self.trading.min_profit_threshold,
            fee_rate: self.trading.fee_rate,
            max_consecutive_errors: self.errors.max_consecutive_errors,
            error_cooldown_secs: self.errors.cooldown_secs,
            max_retries: self.errors.max_retries,
            retry_delay_ms: self.errors.retry_delay_ms,
            poll_interval_ms: self.general.poll_interval_ms,
            price_cache_ttl_ms: self
                .http
                .price_cache_ttl_ms
                .unwrap_or(self.general.poll_interval_ms),
            rate_limit_calls: self.http.rate_limit_calls,
            rate_limit_period_ms: self.http.rate_limit_period_ms,
            http_timeout_secs: self.http.timeout_secs,
            gas_adjustment: self.trading.gas_adjustment,
            base_network_fee: self.trading.base_network_fee,
            paper_balance: self.trading.paper_balance.unwrap_or(self.trading.trade_amount),
        };

        config.validate()?;
        Ok(config)
    }
}

impl VenueConfig {
    fn to_venue(&self, default_name: &str) -> Venue {
        Venue::new(
            self.name.clone().unwrap_or_else(|| default_name.to_string()),
            self.router.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[general]
token_address = "So11111111111111111111111111111111111111112"
poll_interval_ms = 500

[venue_a]
router = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8"

[venue_b]
name = "Orca Whirlpool"
router = "9W959DqEETiGZocYWCQPaJ6sBmUzgfxXfqGeTEdp3aQP"
price_url = "http://localhost:8080/orca"

[trading]
trade_amount = 10.0
min_profit_threshold = 0.5

[errors]
max_consecutive_errors = 3
"#;

    #[test]
    fn test_parse_toml() {
        let toml_config = TomlConfig::parse(SAMPLE).unwrap();
        assert_eq!(toml_config.general.log_level, "info");
        assert_eq!(toml_config.errors.max_consecutive_errors, 3);
        // Unset fields in a present table fall back to defaults
        assert_eq!(toml_config.errors.cooldown_secs, DEFAULT_ERROR_COOLDOWN_SECS);
    }

    #[test]
    fn test_to_bot_config() {
        let config = TomlConfig::parse(SAMPLE).unwrap().to_bot_config().unwrap();
        assert_eq!(config.venue_a.name, "Raydium");
        assert_eq!(config.venue_b.name, "Orca Whirlpool");
        assert_eq!(config.venue_a_price_url, DEFAULT_VENUE_A_PRICE_URL);
        assert_eq!(config.venue_b_price_url, "http://localhost:8080/orca");
        assert_eq!(config.price_cache_ttl_ms, 500);
        assert_eq!(config.paper_balance, 10.0);
        assert_eq!(config.fee_rate, DEFAULT_FEE_RATE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let broken = SAMPLE.replace("trade_amount = 10.0", "trade_amount = -1.0");
        assert!(TomlConfig::parse(&broken).unwrap().to_bot_config().is_err());
    }

    #[test]
    fn test_missing_section_fails_parse() {
        let broken = SAMPLE.replace("[trading]", "[trade]");
        assert!(TomlConfig::parse(&broken).is_err());
    }
}
