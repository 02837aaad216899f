//! OHLCV bar representation.

use chrono::{NaiveDate, NaiveDateTime};

use super::symbol::Symbol;

/// One bar as delivered by the market data feed. `end_time` is the close of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: Symbol,
    pub end_time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Calendar session the bar belongs to.
    pub fn session(&self) -> NaiveDate {
        self.end_time.date()
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// All four prices are finite.
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite())
    }
}

/// Index of the first bar of the `sessions`-th session in time-sorted `bars`,
/// or `bars.len()` when there are not that many sessions.
pub fn session_split(bars: &[OhlcvBar], sessions: usize) -> usize {
    let mut seen = 0;
    let mut current = None;
    for (i, bar) in bars.iter().enumerate() {
        if current != Some(bar.session()) {
            if seen == sessions {
                return i;
            }
            seen += 1;
            current = Some(bar.session());
        }
    }
    bars.len()
}

/// The bars of the last `sessions` sessions in time-sorted `bars`.
pub fn recent_sessions(bars: &[OhlcvBar], sessions: usize) -> &[OhlcvBar] {
    let mut seen = 0;
    let mut current = None;
    for (i, bar) in bars.iter().enumerate().rev() {
        if current != Some(bar.session()) {
            if seen == sessions {
                return &bars[i + 1..];
            }
            seen += 1;
            current = Some(bar.session());
        }
    }
    bars
}
