//! Trade Gate
//!
//! Decides whether a computed profit should be acted on. Checks run in a
//! fixed order and stop at the first failure:
//!   1. profit strictly above `min_profit_threshold` (free, no I/O)
//!   2. wallet balance known and >= trade amount
//!   3. buy venue has liquidity for the trade amount
//! Every rejection logs its reason. The gate holds no mutable state.
//!
//! Created: 2026-10-12

use crate::dex::{BalanceOracle, LiquidityOracle};
use crate::types::{RejectReason, Venue};
use std::sync::Arc;
use tracing::{info, warn};

/// Gate verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Accept,
    Reject(RejectReason),
}

impl GateDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, GateDecision::Accept)
    }
}

pub struct TradeGate {
    min_profit_threshold: f64,
    trade_amount: f64,
    balance: Arc<dyn BalanceOracle>,
    liquidity: Arc<dyn LiquidityOracle>,
}

impl TradeGate {
    pub fn new(
        min_profit_threshold: f64,
        trade_amount: f64,
        balance: Arc<dyn BalanceOracle>,
        liquidity: Arc<dyn LiquidityOracle>,
    ) -> Self {
        Self {
            min_profit_threshold,
            trade_amount,
            balance,
            liquidity,
        }
    }

    /// Evaluate `profit` for a trade that buys on `venue`.
    pub async fn evaluate(&self, profit: f64, venue: &Venue) -> GateDecision {
        if profit <= self.min_profit_threshold {
            info!(
                "Gate: profit {:.6} <= threshold {:.6} ({})",
                profit,
                self.min_profit_threshold,
                RejectReason::ProfitBelowThreshold
            );
            return GateDecision::Reject(RejectReason::ProfitBelowThreshold);
        }

        match self.balance.balance().await {
            None => {
                warn!("Gate: wallet balance unknown, skipping trade");
                return GateDecision::Reject(RejectReason::BalanceUnknown);
            }
            Some(balance) if balance < self.trade_amount => {
                warn!(
                    "Gate: insufficient balance for trade ({:.6} < {:.6})",
                    balance, self.trade_amount
                );
                return GateDecision::Reject(RejectReason::InsufficientBalance);
            }
            Some(_) => {}
        }

        if !self.liquidity.check_liquidity(venue, self.trade_amount).await {
            warn!("Gate: insufficient liquidity on {} for {}", venue, self.trade_amount);
            return GateDecision::Reject(RejectReason::InsufficientLiquidity);
        }

        info!("Gate: accepted {:.6} profit buying on {}", profit, venue);
        GateDecision::Accept
    }

    /// Boolean form of `evaluate`
    pub async fn should_execute(&self, profit: f64, venue: &Venue) -> bool {
        self.evaluate(profit, venue).await.is_accept()
    }
}
