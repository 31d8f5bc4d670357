//! Arbitrage Module
//!
//! Profit calculation, trade gating, error cooldown and two-leg execution.
//!
//! Created: 2026-10-12

pub mod cooldown;
pub mod executor;
pub mod gate;
pub mod profit;

pub use cooldown::{CooldownAction, CooldownState, ErrorCooldown};
pub use executor::TradeExecutor;
pub use gate::{GateDecision, TradeGate};
pub use profit::{net_profit, ProfitCalculator};
