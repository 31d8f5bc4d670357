//! Opportunity Loop
//!
//! One cycle: fetch prices -> profit for both directions -> gate the better
//! one -> buy leg, sell leg. Cycles run strictly one after another on a
//! fixed poll interval. Errors raised during a cycle go to the error
//! cooldown; the loop itself only ends when the shutdown signal flips.
//!
//! Created: 2026-10-13

use crate::arbitrage::{
    CooldownAction, ErrorCooldown, GateDecision, ProfitCalculator, TradeExecutor, TradeGate,
};
use crate::dex::{BalanceOracle, LiquidityOracle, PriceSource, SwapExecutor};
use crate::error::ArbError;
use crate::types::{BotConfig, CycleOutcome, Leg};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Log loop statistics every N cycles
const STATS_LOG_INTERVAL: u64 = 100;

/// External collaborators the loop drives
pub struct Collaborators {
    pub prices: Box<dyn PriceSource>,
    pub balance: Arc<dyn BalanceOracle>,
    pub liquidity: Arc<dyn LiquidityOracle>,
    pub swaps: Arc<dyn SwapExecutor>,
}

/// Running totals for the process lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub missing_prices: u64,
    /// Cycles whose best direction reached the gate
    pub opportunities: u64,
    pub rejected: u64,
    pub executed: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Buy filled, sell failed: needs operator attention
    pub partial_executions: u64,
    pub errors: u64,
    pub cooldowns: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::PricesUnavailable => self.missing_prices += 1,
            CycleOutcome::NoSpread => {}
            CycleOutcome::Rejected(_) => {
                self.opportunities += 1;
                self.rejected += 1;
            }
            CycleOutcome::Executed { outcome, .. } => {
                self.opportunities += 1;
                self.executed += 1;
                if outcome.success {
                    self.succeeded += 1;
                } else if outcome.is_partial() {
                    self.partial_executions += 1;
                } else {
                    self.failed += 1;
                }
            }
        }
    }

    /// A sell leg that errored after the buy filled leaves an open position
    fn record_error(&mut self, err: &ArbError) {
        self.errors += 1;
        if let ArbError::Swap { leg: Leg::Sell, .. } = err {
            self.opportunities += 1;
            self.executed += 1;
            self.partial_executions += 1;
        }
    }

    pub fn log(&self) {
        info!(
            "Cycles {} | opportunities {} | executed {} ({} ok, {} failed, {} partial) | \
             rejected {} | no prices {} | errors {} | cooldowns {}",
            self.cycles,
            self.opportunities,
            self.executed,
            self.succeeded,
            self.failed,
            self.partial_executions,
            self.rejected,
            self.missing_prices,
            self.errors,
            self.cooldowns
        );
    }
}

/// Two-venue arbitrage control loop
pub struct ArbitrageBot {
    config: BotConfig,
    prices: Box<dyn PriceSource>,
    calculator: ProfitCalculator,
    gate: TradeGate,
    executor: TradeExecutor,
    cooldown: ErrorCooldown,
    stats: LoopStats,
}

impl ArbitrageBot {
    pub fn new(config: &BotConfig, collaborators: Collaborators) -> Self {
        Self {
            config: config.clone(),
            prices: collaborators.prices,
            calculator: ProfitCalculator::new(config.trade_amount, config.fee_rate),
            gate: TradeGate::new(
                config.min_profit_threshold,
                config.trade_amount,
                collaborators.balance,
                collaborators.liquidity,
            ),
            executor: TradeExecutor::new(collaborators.swaps, config.trade_amount),
            cooldown: ErrorCooldown::new(config.max_consecutive_errors, config.error_cooldown()),
            stats: LoopStats::default(),
        }
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn cooldown(&self) -> &ErrorCooldown {
        &self.cooldown
    }

    /// Check for and execute an arbitrage opportunity (one cycle, no error handling)
    pub async fn check_opportunity(&mut self) -> Result<CycleOutcome, ArbError> {
        let pair = self.prices.fetch_prices().await?;

        let Some((price_a, price_b)) = pair.both() else {
            warn!(
                "Failed to get prices from one or both venues ({}: {:?}, {}: {:?})",
                self.config.venue_a, pair.venue_a, self.config.venue_b, pair.venue_b
            );
            return Ok(CycleOutcome::PricesUnavailable);
        };

        debug!(
            "{} @ {:.6} | {} @ {:.6}",
            self.config.venue_a, price_a, self.config.venue_b, price_b
        );

        let Some(best) = self.calculator.best_direction(price_a, price_b) else {
            debug!("Equal profit in both directions, no action");
            return Ok(CycleOutcome::NoSpread);
        };
        debug!("Best direction {} (net {:.6})", best.direction, best.net_profit);

        let (buy_venue, sell_venue) = self.config.venues_for(best.direction);

        if let GateDecision::Reject(reason) = self.gate.evaluate(best.net_profit, buy_venue).await {
            return Ok(CycleOutcome::Rejected(reason));
        }

        info!(
            "Executing {} -> {} arbitrage (Profit: {:.6})",
            buy_venue, sell_venue, best.net_profit
        );
        let outcome = self.executor.execute_arbitrage(buy_venue, sell_venue).await?;

        Ok(CycleOutcome::Executed {
            profit: best,
            outcome,
        })
    }

    /// Run one cycle and route any error through the cooldown.
    ///
    /// Returns `None` when the cycle failed. A cooldown pause is cut short by
    /// the shutdown signal.
    pub async fn run_cycle(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<CycleOutcome> {
        self.stats.cycles += 1;

        match self.check_opportunity().await {
            Ok(outcome) => {
                self.stats.record(&outcome);
                Some(outcome)
            }
            Err(e) => {
                self.stats.record_error(&e);
                if let CooldownAction::Pause(period) = self.cooldown.record_error(&e) {
                    self.stats.cooldowns += 1;
                    if sleep_or_shutdown(period, shutdown).await {
                        info!("Shutdown requested during cooldown");
                    }
                }
                None
            }
        }
    }

    /// Main bot loop. Returns the final statistics once `shutdown` is set.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LoopStats {
        info!(
            "Starting arbitrage bot ({} <-> {}, poll every {:?})...",
            self.config.venue_a,
            self.config.venue_b,
            self.config.poll_interval()
        );

        while !*shutdown.borrow() {
            self.run_cycle(&mut shutdown).await;

            if self.stats.cycles % STATS_LOG_INTERVAL == 0 {
                self.stats.log();
            }

            if sleep_or_shutdown(self.config.poll_interval(), &mut shutdown).await {
                break;
            }
        }

        info!("Stopping arbitrage bot...");
        self.stats.log();
        self.stats
    }
}

/// Sleep for `duration` unless shutdown is signalled first.
/// Returns true if shutdown was requested.
pub async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    let deadline = Instant::now() + duration;

    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return false,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // Sender gone: nobody can stop us any more, finish the sleep
                    tokio::time::sleep_until(deadline).await;
                    return false;
                }
                if *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
