//! Derived values recomputed from the latest state snapshot. Pure; nothing
//! here caches a quote captured at render time.

use std::collections::HashMap;

use crate::model::position::{Position, PositionSide};
use crate::model::quote::PriceQuote;

/// Estimated margin for the trade ticket: (size * mid) / leverage.
/// Size of an unparsed input is 0, a missing quote contributes a mid of 0,
/// leverage below 1 is clamped up.
pub fn estimated_margin(size: f64, mid: f64, leverage: u32) -> f64 {
    let size = if size.is_finite() { size } else { 0.0 };
    let mid = if mid.is_finite() { mid } else { 0.0 };
    (size * mid) / f64::from(leverage.max(1))
}

/// Unrealized P&L against the current mid. Positive means the position is
/// in profit regardless of side.
pub fn unrealized_pnl(side: PositionSide, entry_price: f64, current_mid: f64, amount: f64) -> f64 {
    let amount = amount.abs();
    match side {
        PositionSide::Long => (current_mid - entry_price) * amount,
        PositionSide::Short => (entry_price - current_mid) * amount,
    }
}

/// P&L for a position against the quote snapshot. `None` when no quote
/// exists for the instrument; a missing quote is never treated as equal to
/// the entry price.
pub fn position_pnl(position: &Position, quotes: &HashMap<String, PriceQuote>) -> Option<f64> {
    let quote = quotes.get(position.base_symbol())?;
    Some(unrealized_pnl(
        position.side,
        position.entry_price,
        quote.mid,
        position.amount,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_divides_notional_by_leverage() {
        assert!((estimated_margin(2.0, 50000.0, 5) - 20000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn margin_is_zero_for_zero_size() {
        assert_eq!(estimated_margin(0.0, 50000.0, 1), 0.0);
    }

    #[test]
    fn margin_clamps_leverage_to_one() {
        assert!((estimated_margin(1.0, 100.0, 0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn margin_treats_nan_inputs_as_zero() {
        assert_eq!(estimated_margin(f64::NAN, 100.0, 2), 0.0);
        assert_eq!(estimated_margin(1.0, f64::NAN, 2), 0.0);
    }

    #[test]
    fn long_pnl_gains_when_price_rises() {
        let pnl = unrealized_pnl(PositionSide::Long, 100.0, 110.0, 2.0);
        assert!((pnl - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_pnl_gains_when_price_falls() {
        let pnl = unrealized_pnl(PositionSide::Short, 100.0, 90.0, 2.0);
        assert!((pnl - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pnl_uses_absolute_amount() {
        let pnl = unrealized_pnl(PositionSide::Short, 100.0, 90.0, -2.0);
        assert!((pnl - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_quote_yields_no_pnl() {
        let position = Position {
            product_id: 1,
            product_name: "BTC-PERP".to_string(),
            side: PositionSide::Long,
            amount: 1.0,
            entry_price: 50000.0,
        };
        let quotes = HashMap::new();
        assert_eq!(position_pnl(&position, &quotes), None);
    }

    #[test]
    fn pnl_looks_up_quote_by_base_symbol() {
        let position = Position {
            product_id: 1,
            product_name: "BTC-PERP".to_string(),
            side: PositionSide::Long,
            amount: 2.0,
            entry_price: 100.0,
        };
        let mut quotes = HashMap::new();
        quotes.insert(
            "BTC".to_string(),
            PriceQuote {
                bid: 109.0,
                ask: 111.0,
                mid: 110.0,
            },
        );
        let pnl = position_pnl(&position, &quotes).unwrap();
        assert!((pnl - 20.0).abs() < f64::EPSILON);
    }
}
