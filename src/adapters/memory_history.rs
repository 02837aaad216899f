//! In-memory history, used by replay to seed symbols from the head of their data.

use std::collections::HashMap;

use crate::domain::error::OracleFuseError;
use crate::domain::ohlcv::{recent_sessions, OhlcvBar};
use crate::domain::symbol::Symbol;
use crate::ports::history_port::HistoryPort;

#[derive(Debug, Default)]
pub struct InMemoryHistory {
    bars: HashMap<Symbol, Vec<OhlcvBar>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored bars for `symbol`. Bars are kept sorted by time.
    pub fn insert(&mut self, symbol: Symbol, mut bars: Vec<OhlcvBar>) {
        bars.sort_by_key(|b| b.end_time);
        self.bars.insert(symbol, bars);
    }
}

impl HistoryPort for InMemoryHistory {
    fn history(&self, symbol: &Symbol, sessions: usize) -> Result<Vec<OhlcvBar>, OracleFuseError> {
        let bars = self.bars.get(symbol).ok_or_else(|| OracleFuseError::NoData {
            symbol: symbol.to_string(),
        })?;
        Ok(recent_sessions(bars, sessions).to_vec())
    }
}
