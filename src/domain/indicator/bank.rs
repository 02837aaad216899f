//! The set of indicators one symbol needs.
//!
//! The intraday RSI sees every bar. Everything else sees one consolidated bar
//! per session, delivered when the following session opens.

use super::adx::Adx;
use super::atr::Atr;
use super::bollinger::Bollinger;
use super::consolidator::SessionConsolidator;
use super::ema::Ema;
use super::macd::Macd;
use super::obv::Obv;
use super::rsi::Rsi;
use crate::domain::config::IndicatorConfig;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct IndicatorBank {
    consolidator: SessionConsolidator,
    pub ema_fast: Ema,
    pub ema_slow: Ema,
    pub macd: Macd,
    pub bollinger: Bollinger,
    pub intraday_rsi: Rsi,
    pub adx: Adx,
    pub obv: Obv,
    pub atr: Atr,
}

impl IndicatorBank {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            consolidator: SessionConsolidator::new(),
            ema_fast: Ema::new(config.ema_fast),
            ema_slow: Ema::new(config.ema_slow),
            macd: Macd::new(config.macd_fast, config.macd_slow, config.macd_signal),
            bollinger: Bollinger::new(config.bollinger_period, config.bollinger_k),
            intraday_rsi: Rsi::new(config.rsi_period),
            adx: Adx::new(config.adx_period),
            obv: Obv::new(),
            atr: Atr::new(config.atr_period),
        }
    }

    /// Feed one intraday bar. Returns true when it closed a session.
    pub fn on_bar(&mut self, bar: &OhlcvBar) -> bool {
        self.intraday_rsi.update(bar.close);
        match self.consolidator.update(bar) {
            Some(session) => {
                self.on_session(&session);
                true
            }
            None => false,
        }
    }

    fn on_session(&mut self, session: &OhlcvBar) {
        self.ema_fast.update(session.close);
        self.ema_slow.update(session.close);
        self.macd.update(session.close);
        self.bollinger.update(session.close);
        self.adx.update(session);
        self.obv.update(session.close, session.volume);
        self.atr.update(session);
    }
}
