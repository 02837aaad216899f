//! Insights: the engine's output to the execution layer.

use chrono::{Duration, NaiveDateTime};
use std::fmt;

use super::direction::Direction;
use super::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightDirection {
    Up,
    Down,
    Flat,
}

impl From<Direction> for InsightDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => InsightDirection::Up,
            Direction::Short => InsightDirection::Down,
        }
    }
}

impl fmt::Display for InsightDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightDirection::Up => write!(f, "up"),
            InsightDirection::Down => write!(f, "down"),
            InsightDirection::Flat => write!(f, "flat"),
        }
    }
}

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource {
    Bootstrap,
    Entry,
    TrailingStop,
    RsiDivergence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub symbol: Symbol,
    pub generated_at: NaiveDateTime,
    pub direction: InsightDirection,
    pub expiry_days: u32,
    pub weight: f64,
    pub source: InsightSource,
}

impl Insight {
    pub fn expiry(&self) -> Duration {
        Duration::days(i64::from(self.expiry_days))
    }

    pub fn expires_at(&self) -> NaiveDateTime {
        self.generated_at + self.expiry()
    }
}
