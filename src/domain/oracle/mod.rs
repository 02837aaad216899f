//! Oracle scorers: each turns one indicator window into a directional score.

pub mod bollinger;
pub mod macd;
pub mod rsi;

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleScore {
    Neutral,
    WeakLong,
    Long,
    Short,
}

impl OracleScore {
    /// Numeric encoding used in logs and reports.
    pub fn value(self) -> f64 {
        match self {
            OracleScore::Neutral => 0.0,
            OracleScore::WeakLong => 0.5,
            OracleScore::Long => 1.0,
            OracleScore::Short => 2.0,
        }
    }

    /// True when the score is a full vote for `direction`.
    pub fn is(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (OracleScore::Long, Direction::Long) | (OracleScore::Short, Direction::Short)
        )
    }
}
