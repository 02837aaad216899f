//! RSI oracles over the price and RSI trends.

use super::OracleScore;
use crate::domain::direction::Direction;

/// Long when price and RSI both trend up, Short when both trend down.
pub fn score_rsi(price_trend: f64, rsi_trend: f64) -> OracleScore {
    if price_trend > 0.0 && rsi_trend > 0.0 {
        OracleScore::Long
    } else if price_trend < 0.0 && rsi_trend < 0.0 {
        OracleScore::Short
    } else {
        OracleScore::Neutral
    }
}

/// Held side that a price/RSI divergence argues against: price rising while RSI
/// falls undermines a long, the mirror undermines a short.
pub fn rsi_divergence(price_trend: f64, rsi_trend: f64) -> Option<Direction> {
    if price_trend > 0.0 && rsi_trend < 0.0 {
        Some(Direction::Long)
    } else if price_trend < 0.0 && rsi_trend > 0.0 {
        Some(Direction::Short)
    } else {
        None
    }
}
