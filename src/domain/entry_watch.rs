//! Per-symbol entry watch.
//!
//! A conviction does not trade immediately. It opens a watch that is advanced
//! once per tick until price confirms it against the Bollinger middle band or
//! the watch runs out of ticks.

use super::aggregator::Conviction;
use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryWatch {
    #[default]
    Idle,
    Watching {
        direction: Direction,
        ticks: u32,
        score: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Idle,
    Pending,
    Confirmed(Conviction),
    Expired,
}

impl EntryWatch {
    /// Signed tick counter: positive while watching long, negative while
    /// watching short, zero when idle.
    pub fn counter(&self) -> i32 {
        match *self {
            EntryWatch::Idle => 0,
            EntryWatch::Watching {
                direction, ticks, ..
            } => direction.sign() * ticks as i32,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EntryWatch::Idle)
    }

    /// Start watching. Returns false, leaving the existing watch untouched, when
    /// one is already pending.
    pub fn open(&mut self, conviction: Conviction) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = EntryWatch::Watching {
            direction: conviction.direction,
            ticks: 1,
            score: conviction.score,
        };
        true
    }

    /// One tick of the watch. `price` is the latest sampled price and `middle`
    /// the current Bollinger middle band; either missing keeps the watch pending.
    pub fn advance(
        &mut self,
        max_ticks: u32,
        price: Option<f64>,
        middle: Option<f64>,
    ) -> WatchOutcome {
        let EntryWatch::Watching {
            direction,
            ticks,
            score,
        } = *self
        else {
            return WatchOutcome::Idle;
        };

        let ticks = ticks + 1;
        if ticks > max_ticks {
            *self = EntryWatch::Idle;
            return WatchOutcome::Expired;
        }

        let confirmed = match (price, middle) {
            (Some(price), Some(middle)) => match direction {
                Direction::Long => price > middle,
                Direction::Short => price < middle,
            },
            _ => false,
        };

        if confirmed {
            *self = EntryWatch::Idle;
            WatchOutcome::Confirmed(Conviction { direction, score })
        } else {
            *self = EntryWatch::Watching {
                direction,
                ticks,
                score,
            };
            WatchOutcome::Pending
        }
    }
}
