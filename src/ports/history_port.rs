//! Historical bar access used to warm up newly added symbols.

use crate::domain::error::OracleFuseError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::symbol::Symbol;

pub trait HistoryPort {
    /// Every intraday bar of the most recent `sessions` sessions for `symbol`,
    /// oldest first.
    fn history(&self, symbol: &Symbol, sessions: usize) -> Result<Vec<OhlcvBar>, OracleFuseError>;
}
