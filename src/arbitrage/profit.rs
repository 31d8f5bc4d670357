//! Profit Calculator
//!
//! Net profit of buying `trade_amount` at `buy_price` on one venue and
//! selling it at `sell_price` on the other:
//!
//!   gross = (sell - buy) * amount
//!   fees  = (buy + sell) * amount * fee_rate
//!   net   = gross - fees
//!
//! The fee term depends on the sum of both prices, so `net(a, b)` is NOT
//! `-net(b, a)`. Both directions are always computed explicitly.
//!
//! Created: 2026-10-12

use crate::types::{Direction, ProfitEstimate};

/// Net profit for a directional price pair
pub fn net_profit(buy_price: f64, sell_price: f64, trade_amount: f64, fee_rate: f64) -> f64 {
    ProfitEstimate::compute(Direction::AToB, buy_price, sell_price, trade_amount, fee_rate)
        .net_profit
}

impl ProfitEstimate {
    pub fn compute(
        direction: Direction,
        buy_price: f64,
        sell_price: f64,
        trade_amount: f64,
        fee_rate: f64,
    ) -> Self {
        let gross_profit = (sell_price - buy_price) * trade_amount;
        let estimated_fees = (buy_price + sell_price) * trade_amount * fee_rate;

        Self {
            gross_profit,
            estimated_fees,
            net_profit: gross_profit - estimated_fees,
            direction,
        }
    }
}

/// Computes directional profit for the fixed trade size
#[derive(Debug, Clone, Copy)]
pub struct ProfitCalculator {
    trade_amount: f64,
    fee_rate: f64,
}

impl ProfitCalculator {
    pub fn new(trade_amount: f64, fee_rate: f64) -> Self {
        Self {
            trade_amount,
            fee_rate,
        }
    }

    /// Profit for buying at `buy_price` and selling at `sell_price`
    pub fn estimate(
        &self,
        direction: Direction,
        buy_price: f64,
        sell_price: f64,
    ) -> ProfitEstimate {
        ProfitEstimate::compute(direction, buy_price, sell_price, self.trade_amount, self.fee_rate)
    }

    /// (A->B, B->A) estimates for venue prices `price_a`, `price_b`
    pub fn estimate_both(&self, price_a: f64, price_b: f64) -> (ProfitEstimate, ProfitEstimate) {
        (
            self.estimate(Direction::AToB, price_a, price_b),
            self.estimate(Direction::BToA, price_b, price_a),
        )
    }

    /// The direction with strictly greater net profit; `None` on a tie
    pub fn best_direction(&self, price_a: f64, price_b: f64) -> Option<ProfitEstimate> {
        let (a_to_b, b_to_a) = self.estimate_both(price_a, price_b);
        if a_to_b.net_profit > b_to_a.net_profit {
            Some(a_to_b)
        } else if b_to_a.net_profit > a_to_b.net_profit {
            Some(b_to_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_reference_scenario() {
        // prices (1.0, 1.1), amount 10, fee 0.003
        let est = ProfitEstimate::compute(Direction::AToB, 1.0, 1.1, 10.0, 0.003);
        assert!((est.gross_profit - 1.0).abs() < EPS);
        assert!((est.estimated_fees - 0.063).abs() < EPS);
        assert!((est.net_profit - 0.937).abs() < EPS);
        assert!(est.net_profit > 0.5);
    }

    #[test]
    fn test_positive_when_spread_exceeds_fees() {
        let fee_rate = 0.003;
        for (buy, sell) in [(1.0, 1.1), (100.0, 100.7), (0.02, 0.021), (5.0, 5.5)] {
            assert!(sell - buy > fee_rate * (buy + sell));
            assert!(net_profit(buy, sell, 10.0, fee_rate) > 0.0, "buy={} sell={}", buy, sell);
        }
    }

    #[test]
    fn test_negative_when_spread_below_fees() {
        // spread 0.1% < 0.3% * (sum) -> fees dominate
        assert!(net_profit(100.0, 100.1, 10.0, 0.003) < 0.0);
    }

    #[test]
    fn test_equal_prices_zero_gross() {
        let est = ProfitEstimate::compute(Direction::AToB, 1.0, 1.0, 10.0, 0.003);
        assert_eq!(est.gross_profit, 0.0);
        assert_eq!(est.net_profit, -est.estimated_fees);

        // Without fees, equal prices are exactly break-even
        assert_eq!(net_profit(1.0, 1.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_not_antisymmetric() {
        let forward = net_profit(1.0, 1.1, 10.0, 0.003);
        let backward = net_profit(1.1, 1.0, 10.0, 0.003);
        assert!(backward < 0.0);
        assert!((forward + backward).abs() > EPS);
        // Sum is twice the (direction-invariant) fee term
        assert!((forward + backward + 2.0 * 0.063).abs() < EPS);
    }

    #[test]
    fn test_best_direction() {
        let calc = ProfitCalculator::new(10.0, 0.003);

        let best = calc.best_direction(1.0, 1.1).unwrap();
        assert_eq!(best.direction, Direction::AToB);

        let best = calc.best_direction(1.1, 1.0).unwrap();
        assert_eq!(best.direction, Direction::BToA);
        assert!((best.net_profit - 0.937).abs() < EPS);
    }

    #[test]
    fn test_tie_has_no_direction() {
        let calc = ProfitCalculator::new(10.0, 0.003);
        assert!(calc.best_direction(2.5, 2.5).is_none());
    }
}
