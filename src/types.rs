// Core data structures shared by the loop, gate, executor and collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A trading destination (DEX router) identified by name and address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub router_address: String,
}

impl Venue {
    pub fn new(name: impl Into<String>, router_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            router_address: router_address.into(),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Trade direction between the two configured venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Buy on venue A, sell on venue B
    AToB,
    /// Buy on venue B, sell on venue A
    BToA,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::AToB => write!(f, "A->B"),
            Direction::BToA => write!(f, "B->A"),
        }
    }
}

/// One side of a two-venue trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    Buy,
    Sell,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Leg::Buy => write!(f, "buy"),
            Leg::Sell => write!(f, "sell"),
        }
    }
}

/// Latest prices from both venues. Either side may be unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePair {
    pub venue_a: Option<f64>,
    pub venue_b: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl PricePair {
    pub fn new(venue_a: Option<f64>, venue_b: Option<f64>) -> Self {
        Self {
            venue_a: venue_a.filter(|p| is_usable_price(*p)),
            venue_b: venue_b.filter(|p| is_usable_price(*p)),
            observed_at: Utc::now(),
        }
    }

    /// Both prices, only when both venues reported one.
    pub fn both(&self) -> Option<(f64, f64)> {
        Some((self.venue_a?, self.venue_b?))
    }
}

/// Zero, negative and NaN quotes are treated as "no quote"
fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Net profit estimate for one direction. Recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitEstimate {
    pub gross_profit: f64,
    pub estimated_fees: f64,
    pub net_profit: f64,
    pub direction: Direction,
}

/// Result of a two-leg execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub failing_leg: Option<Leg>,
}

impl ExecutionOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            failing_leg: None,
        }
    }

    pub fn failed(leg: Leg) -> Self {
        Self {
            success: false,
            failing_leg: Some(leg),
        }
    }

    /// Buy leg filled, sell leg did not: position is one-sided.
    pub fn is_partial(&self) -> bool {
        self.failing_leg == Some(Leg::Sell)
    }
}

/// Why the trade gate declined an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    ProfitBelowThreshold,
    BalanceUnknown,
    InsufficientBalance,
    InsufficientLiquidity,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RejectReason::ProfitBelowThreshold => write!(f, "profit below threshold"),
            RejectReason::BalanceUnknown => write!(f, "balance unknown"),
            RejectReason::InsufficientBalance => write!(f, "insufficient balance"),
            RejectReason::InsufficientLiquidity => write!(f, "insufficient liquidity"),
        }
    }
}

/// What a single loop cycle ended with (errors are reported separately)
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// One or both venues had no price
    PricesUnavailable,
    /// Both directions yield the same net profit
    NoSpread,
    /// Trade gate declined the better direction
    Rejected(RejectReason),
    /// Both legs were attempted (or the buy leg failed)
    Executed {
        profit: ProfitEstimate,
        outcome: ExecutionOutcome,
    },
}

/// Bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    // Asset
    pub token_address: String,

    // Venues (A = first price source, B = second)
    pub venue_a: Venue,
    pub venue_b: Venue,
    pub venue_a_price_url: String,
    pub venue_b_price_url: String,

    // Trading parameters
    pub trade_amount: f64,
    pub min_profit_threshold: f64,
    /// Round-trip fee/slippage estimate applied to both legs (0.003 = 0.3%)
    pub fee_rate: f64,

    // Error handling
    pub max_consecutive_errors: u32,
    pub error_cooldown_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,

    // Performance
    pub poll_interval_ms: u64,
    pub price_cache_ttl_ms: u64,
    pub rate_limit_calls: usize,
    pub rate_limit_period_ms: u64,
    pub http_timeout_secs: u64,

    // Dry-run execution
    pub gas_adjustment: f64,
    pub base_network_fee: f64,
    pub paper_balance: f64,
}

impl BotConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_secs)
    }

    pub fn price_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.price_cache_ttl_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_millis(self.rate_limit_period_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// (buy venue, sell venue) for a direction
    pub fn venues_for(&self, direction: Direction) -> (&Venue, &Venue) {
        match direction {
            Direction::AToB => (&self.venue_a, &self.venue_b),
            Direction::BToA => (&self.venue_b, &self.venue_a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_pair_drops_unusable_quotes() {
        let pair = PricePair::new(Some(0.0), Some(f64::NAN));
        assert_eq!(pair.venue_a, None);
        assert_eq!(pair.venue_b, None);

        let pair = PricePair::new(Some(-1.0), Some(1.5));
        assert_eq!(pair.venue_a, None);
        assert_eq!(pair.venue_b, Some(1.5));
        assert!(pair.both().is_none());
    }

    #[test]
    fn test_price_pair_both() {
        let pair = PricePair::new(Some(1.0), Some(1.1));
        assert_eq!(pair.both(), Some((1.0, 1.1)));
    }

    #[test]
    fn test_execution_outcome_partial() {
        assert!(ExecutionOutcome::failed(Leg::Sell).is_partial());
        assert!(!ExecutionOutcome::failed(Leg::Buy).is_partial());
        assert!(!ExecutionOutcome::succeeded().is_partial());
    }
}
