//! Two-Venue Arbitrage Bot Library
//!
//! Polls spot prices of one token on two DEX venues, computes net profit in
//! both directions, gates the better side and executes it as a buy leg
//! followed by a sell leg. Consecutive errors put the loop into cooldown.
//!
//! Created: 2026-10-12

pub mod arbitrage;
pub mod bot;
pub mod config;
pub mod dex;
pub mod error;
pub mod price_feed;
pub mod toml_config;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use bot::{ArbitrageBot, Collaborators, LoopStats};
pub use config::{load_config, load_config_from_file};
pub use error::{ArbError, ConfigError};
pub use price_feed::HttpPriceFeed;
pub use toml_config::TomlConfig;
pub use types::{BotConfig, CycleOutcome, Direction, Leg, PricePair, ProfitEstimate, Venue};
