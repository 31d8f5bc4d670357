//! Trade Executor
//!
//! Executes a two-leg arbitrage through the `SwapExecutor` collaborator:
//! buy on the cheap venue, then sell on the expensive one. Two separate
//! swaps means leg risk: if the sell leg fails after the buy filled, the
//! position is one-sided. That case is reported, never unwound here.
//!
//! Created: 2026-10-12

use crate::dex::SwapExecutor;
use crate::error::ArbError;
use crate::types::{ExecutionOutcome, Leg, Venue};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

pub struct TradeExecutor {
    swaps: Arc<dyn SwapExecutor>,
    trade_amount: f64,
}

impl TradeExecutor {
    pub fn new(swaps: Arc<dyn SwapExecutor>, trade_amount: f64) -> Self {
        Self {
            swaps,
            trade_amount,
        }
    }

    /// Buy on `buy_venue`, then sell on `sell_venue`.
    ///
    /// A buy that returns `false` aborts before the sell leg. Transport errors
    /// are returned as `ArbError::Swap` tagged with the leg that raised them.
    pub async fn execute_arbitrage(
        &self,
        buy_venue: &Venue,
        sell_venue: &Venue,
    ) -> Result<ExecutionOutcome, ArbError> {
        let start_time = Instant::now();
        info!(
            "Executing arbitrage: buy {} on {} | sell on {}",
            self.trade_amount, buy_venue, sell_venue
        );

        let bought = self
            .swaps
            .execute_swap(buy_venue, self.trade_amount, true)
            .await
            .map_err(|e| swap_error(buy_venue, Leg::Buy, e))?;

        if !bought {
            error!("Buy trade failed on {}", buy_venue);
            return Ok(ExecutionOutcome::failed(Leg::Buy));
        }

        let sold = match self
            .swaps
            .execute_swap(sell_venue, self.trade_amount, false)
            .await
        {
            Ok(sold) => sold,
            Err(e) => {
                error!(
                    "UNHEDGED: buy filled on {} but sell on {} errored: {} - manual recovery",
                    buy_venue, sell_venue, e
                );
                return Err(swap_error(sell_venue, Leg::Sell, e));
            }
        };

        if !sold {
            error!(
                "UNHEDGED: buy filled on {} but sell trade failed on {} - manual recovery needed",
                buy_venue, sell_venue
            );
            return Ok(ExecutionOutcome::failed(Leg::Sell));
        }

        info!(
            "Arbitrage successfully executed between {} and {} ({}ms)",
            buy_venue,
            sell_venue,
            start_time.elapsed().as_millis()
        );
        Ok(ExecutionOutcome::succeeded())
    }
}

/// Tag a collaborator error with the venue and leg, keeping already-tagged errors
fn swap_error(venue: &Venue, leg: Leg, err: ArbError) -> ArbError {
    match err {
        ArbError::Swap { reason, .. } => ArbError::Swap {
            venue: venue.name.clone(),
            leg,
            reason,
        },
        other => ArbError::Swap {
            venue: venue.name.clone(),
            leg,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every swap and answers from a script: (buy result, sell result)
    struct ScriptedSwaps {
        buy: Result<bool, String>,
        sell: Result<bool, String>,
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl ScriptedSwaps {
        fn new(buy: Result<bool, String>, sell: Result<bool, String>) -> Arc<Self> {
            Arc::new(Self {
                buy,
                sell,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SwapExecutor for ScriptedSwaps {
        async fn execute_swap(
            &self,
            venue: &Venue,
            _amount: f64,
            is_buy: bool,
        ) -> Result<bool, ArbError> {
            self.calls.lock().unwrap().push((venue.name.clone(), is_buy));
            let scripted = if is_buy { &self.buy } else { &self.sell };
            scripted.clone().map_err(ArbError::PriceFetch)
        }
    }

    fn venues() -> (Venue, Venue) {
        (Venue::new("Raydium", "r".repeat(44)), Venue::new("Orca", "o".repeat(44)))
    }

    #[tokio::test]
    async fn test_both_legs_succeed() {
        let swaps = ScriptedSwaps::new(Ok(true), Ok(true));
        let executor = TradeExecutor::new(swaps.clone(), 10.0);
        let (a, b) = venues();

        let outcome = executor.execute_arbitrage(&a, &b).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::succeeded());
        assert_eq!(
            swaps.calls(),
            vec![("Raydium".to_string(), true), ("Orca".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_buy_failure_skips_sell() {
        let swaps = ScriptedSwaps::new(Ok(false), Ok(true));
        let executor = TradeExecutor::new(swaps.clone(), 10.0);
        let (a, b) = venues();

        let outcome = executor.execute_arbitrage(&a, &b).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.failing_leg, Some(Leg::Buy));
        assert_eq!(swaps.calls(), vec![("Raydium".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_sell_failure_is_partial() {
        let swaps = ScriptedSwaps::new(Ok(true), Ok(false));
        let executor = TradeExecutor::new(swaps.clone(), 10.0);
        let (a, b) = venues();

        let outcome = executor.execute_arbitrage(&a, &b).await.unwrap();
        assert!(outcome.is_partial());
        assert_eq!(swaps.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_buy_transport_error_is_tagged() {
        let swaps = ScriptedSwaps::new(Err("rpc timeout".to_string()), Ok(true));
        let executor = TradeExecutor::new(swaps.clone(), 10.0);
        let (a, b) = venues();

        let err = executor.execute_arbitrage(&a, &b).await.unwrap_err();
        match err {
            ArbError::Swap { venue, leg, reason } => {
                assert_eq!(venue, "Raydium");
                assert_eq!(leg, Leg::Buy);
                assert!(reason.contains("rpc timeout"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(swaps.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_transport_error_is_tagged() {
        let swaps = ScriptedSwaps::new(Ok(true), Err("connection reset".to_string()));
        let executor = TradeExecutor::new(swaps.clone(), 10.0);
        let (a, b) = venues();

        let err = executor.execute_arbitrage(&a, &b).await.unwrap_err();
        assert!(matches!(err, ArbError::Swap { leg: Leg::Sell, .. }));
    }
}
