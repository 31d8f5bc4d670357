//! Dry-Run Execution
//!
//! Paper-trading stand-ins for the swap executor, liquidity oracle and
//! wallet. Swaps are logged with a gas-buffered network fee estimate and
//! always report success; nothing is signed or submitted.
//!
//! Created: 2026-10-13

use super::{BalanceOracle, LiquidityOracle, SwapExecutor};
use crate::error::ArbError;
use crate::types::{BotConfig, Venue};
use crate::utils::{format_amount, with_gas_buffer};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Simulated DEX router access
pub struct DryRunDex {
    /// Estimated network fee per swap after the gas buffer
    fee_estimate: f64,
    swaps: AtomicU64,
}

impl DryRunDex {
    pub fn new(base_network_fee: f64, gas_adjustment: f64) -> Self {
        Self {
            fee_estimate: with_gas_buffer(base_network_fee, gas_adjustment),
            swaps: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.base_network_fee, config.gas_adjustment)
    }

    pub fn fee_estimate(&self) -> f64 {
        self.fee_estimate
    }

    /// Number of simulated swaps so far
    pub fn swap_count(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SwapExecutor for DryRunDex {
    async fn execute_swap(
        &self,
        venue: &Venue,
        amount: f64,
        is_buy: bool,
    ) -> Result<bool, ArbError> {
        self.swaps.fetch_add(1, Ordering::Relaxed);
        info!(
            "DRY RUN: {} {} on {} ({}) | est. network fee {}",
            if is_buy { "buy" } else { "sell" },
            format_amount(amount, 8),
            venue.name,
            venue.router_address,
            format_amount(self.fee_estimate, 9)
        );
        Ok(true)
    }
}

#[async_trait]
impl LiquidityOracle for DryRunDex {
    async fn check_liquidity(&self, venue: &Venue, amount: f64) -> bool {
        debug!("DRY RUN: assuming liquidity for {} on {}", amount, venue.name);
        true
    }
}

/// Wallet with a fixed paper balance
pub struct PaperWallet {
    balance: f64,
}

impl PaperWallet {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }
}

#[async_trait]
impl BalanceOracle for PaperWallet {
    async fn balance(&self) -> Option<f64> {
        Some(self.balance)
    }
}
