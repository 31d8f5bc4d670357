//! DEX Collaborator Interfaces
//!
//! The decision core only talks to prices, balances, liquidity and swaps
//! through these traits. Live transaction construction and signing is out of
//! scope; the shipped implementations are the HTTP price feed
//! (`crate::price_feed`) and the dry-run executor/wallet in `dry_run`.
//!
//! Created: 2026-10-12

pub mod dry_run;

pub use dry_run::{DryRunDex, PaperWallet};

use crate::error::ArbError;
use crate::types::{PricePair, Venue};
use async_trait::async_trait;

/// Current prices for the two configured venues.
///
/// Unknown prices are `None` inside the pair; `Err` is reserved for
/// transport failures.
#[async_trait]
pub trait PriceSource: Send {
    async fn fetch_prices(&mut self) -> Result<PricePair, ArbError>;
}

/// Whether a venue can absorb `amount` without excessive price impact
#[async_trait]
pub trait LiquidityOracle: Send + Sync {
    async fn check_liquidity(&self, venue: &Venue, amount: f64) -> bool;
}

/// Wallet balance available for trading. `None` = unknown.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    async fn balance(&self) -> Option<f64>;
}

/// One-directional swap of a fixed amount on a venue.
///
/// `Ok(false)` is a rejected/failed swap, `Err` a transport or protocol error.
#[async_trait]
pub trait SwapExecutor: Send + Sync {
    async fn execute_swap(
        &self,
        venue: &Venue,
        amount: f64,
        is_buy: bool,
    ) -> Result<bool, ArbError>;
}
