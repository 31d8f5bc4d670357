//! Error types
//!
//! `ArbError` covers transient I/O failures raised inside a loop cycle
//! (price fetch, swap submission). Logical rejections such as low profit or
//! missing balance are not errors and never appear here.
//!
//! Created: 2026-10-12

use crate::types::Leg;
use thiserror::Error;

/// Failures that abort a cycle and feed the error cooldown.
#[derive(Error, Debug)]
pub enum ArbError {
    #[error("price fetch failed: {0}")]
    PriceFetch(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{leg} swap on {venue} failed: {reason}")]
    Swap {
        venue: String,
        leg: Leg,
        reason: String,
    },
}

/// Configuration problems detected while loading or validating `BotConfig`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
