//! Folds intraday bars into one bar per session.

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Default)]
pub struct SessionConsolidator {
    working: Option<OhlcvBar>,
}

impl SessionConsolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one intraday bar. Returns the previous session's bar when `bar`
    /// opens a new session.
    pub fn update(&mut self, bar: &OhlcvBar) -> Option<OhlcvBar> {
        match self.working.as_mut() {
            Some(working) if working.session() == bar.session() => {
                working.high = working.high.max(bar.high);
                working.low = working.low.min(bar.low);
                working.close = bar.close;
                working.volume += bar.volume;
                working.end_time = bar.end_time;
                None
            }
            _ => self.working.replace(bar.clone()),
        }
    }
}
