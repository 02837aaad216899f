//! Everything the engine keeps for one symbol.
//!
//! Live bars and seeding history go through the same [`SymbolState::on_bar`]
//! path, so a seeded symbol is indistinguishable from one that was fed live.

use super::aggregator::{regime, NoBuyReason, SignalInputs};
use super::config::{CadenceConfig, EngineConfig, WindowConfig};
use super::entry_watch::EntryWatch;
use super::indicator::IndicatorBank;
use super::ohlcv::OhlcvBar;
use super::oracle::bollinger::score_bollinger;
use super::oracle::macd::{score_macd, MacdCross};
use super::oracle::rsi::score_rsi;
use super::position_stop::PositionStop;
use super::rolling_window::{NotReady, RollingWindow};
use super::snapshot::{BollingerSnapshot, MacdSnapshot};
use super::symbol::Symbol;
use tracing::warn;

/// Per-symbol rolling windows, appended once per cadence boundary.
#[derive(Debug, Clone)]
pub struct SymbolWindows {
    pub price: RollingWindow<f64>,
    pub rsi_trend: RollingWindow<f64>,
    pub ema_fast: RollingWindow<f64>,
    pub ema_slow: RollingWindow<f64>,
    pub obv: RollingWindow<f64>,
    pub adx: RollingWindow<f64>,
    pub bollinger: RollingWindow<BollingerSnapshot>,
    pub macd: RollingWindow<MacdSnapshot>,
}

impl SymbolWindows {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            price: RollingWindow::with_min_fill("price window", config.price, 1),
            rsi_trend: RollingWindow::with_min_fill("rsi window", config.rsi_trend, 1),
            ema_fast: RollingWindow::with_min_fill("ema fast window", config.ema, 1),
            ema_slow: RollingWindow::with_min_fill("ema slow window", config.ema, 1),
            obv: RollingWindow::with_min_fill("obv window", config.obv, 1),
            adx: RollingWindow::with_min_fill("adx window", config.adx, 1),
            bollinger: RollingWindow::with_min_fill("bollinger window", config.bollinger, 1),
            macd: RollingWindow::with_min_fill("macd window", config.macd, 1),
        }
    }

    /// Samples where the fast EMA sat above / below the slow EMA.
    pub fn ema_streaks(&self) -> (usize, usize) {
        self.ema_fast
            .iter_recent_first()
            .zip(self.ema_slow.iter_recent_first())
            .fold((0, 0), |(bull, bear), (fast, slow)| {
                if fast > slow {
                    (bull + 1, bear)
                } else if fast < slow {
                    (bull, bear + 1)
                } else {
                    (bull, bear)
                }
            })
    }

    /// (latest - previous) / latest of the fast EMA; 0 with fewer than two samples.
    pub fn ema_derivative(&self) -> f64 {
        match (self.ema_fast.latest(), self.ema_fast.previous()) {
            (Some(&latest), Some(&previous)) if latest != 0.0 => (latest - previous) / latest,
            _ => 0.0,
        }
    }
}

/// Signal inputs for one tick plus the advisory MACD cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub inputs: SignalInputs,
    pub macd_cross: MacdCross,
}

#[derive(Debug, Clone)]
pub struct SymbolState {
    pub symbol: Symbol,
    pub indicators: IndicatorBank,
    pub windows: SymbolWindows,
    pub watch: EntryWatch,
    pub stop: PositionStop,
}

impl SymbolState {
    pub fn new(symbol: Symbol, config: &EngineConfig) -> Self {
        Self {
            symbol,
            indicators: IndicatorBank::new(&config.indicators),
            windows: SymbolWindows::new(&config.windows),
            watch: EntryWatch::default(),
            stop: PositionStop::default(),
        }
    }

    /// Update indicators with `bar`, then append to the windows if the bar
    /// closes on the cadence boundary. Returns true when the windows were appended.
    pub fn on_bar(&mut self, bar: &OhlcvBar, cadence: &CadenceConfig) -> bool {
        self.indicators.on_bar(bar);
        if !cadence.is_boundary(bar.end_time) {
            return false;
        }
        self.sample(bar);
        true
    }

    /// Replay history, oldest first. Bars with a non-finite price are skipped.
    /// Returns the number of cadence samples taken.
    pub fn seed(&mut self, history: &[OhlcvBar], cadence: &CadenceConfig) -> usize {
        let mut samples = 0;
        for bar in history {
            if !bar.is_finite() {
                warn!(
                    symbol = %self.symbol,
                    time = %bar.end_time,
                    "non-finite history bar skipped"
                );
                continue;
            }
            if self.on_bar(bar, cadence) {
                samples += 1;
            }
        }
        samples
    }

    fn sample(&mut self, bar: &OhlcvBar) {
        let ind = &self.indicators;
        let w = &mut self.windows;

        w.price.push(bar.close);
        if let Some(bands) = ind.bollinger.current() {
            w.bollinger.push(BollingerSnapshot {
                lower: bands.lower,
                middle: bands.middle,
                upper: bands.upper,
                price: bar.close,
            });
        }
        if let Some(snapshot) = ind.macd.current() {
            w.macd.push(snapshot);
        }
        if let Some(rsi) = ind.intraday_rsi.current() {
            w.rsi_trend.push(rsi);
        }
        // Pushed together so the streak comparison stays aligned.
        if let (Some(fast), Some(slow)) = (ind.ema_fast.current(), ind.ema_slow.current()) {
            w.ema_fast.push(fast);
            w.ema_slow.push(slow);
        }
        if let Some(obv) = ind.obv.current() {
            w.obv.push(obv);
        }
        if let Some(adx) = ind.adx.current() {
            w.adx.push(adx);
        }
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.windows.price.latest().copied()
    }

    /// Price and RSI trends over their windows.
    pub fn price_and_rsi_trends(&self, config: &EngineConfig) -> (f64, f64) {
        (
            config.trend.price.estimate(&self.windows.price.to_vec()),
            config.trend.rsi.estimate(&self.windows.rsi_trend.to_vec()),
        )
    }

    /// Compute trends and oracle scores. Portfolio flags are filled in by the caller.
    pub fn signals(&self, config: &EngineConfig) -> Result<Signals, NoBuyReason> {
        let not_ready = |e: NotReady| NoBuyReason::NotReady(e.name);
        let w = &self.windows;
        let bollinger_window = w.bollinger.ready().map_err(not_ready)?;
        let macd_window = w.macd.ready().map_err(not_ready)?;
        let adx_window = w.adx.ready().map_err(not_ready)?;
        let adx = self
            .indicators
            .adx
            .current()
            .ok_or(NoBuyReason::NotReady("adx"))?;

        let (bullish_streak, bearish_streak) = w.ema_streaks();
        let hint = regime(
            bullish_streak,
            bearish_streak,
            config.entry.ema_streak_threshold,
        );

        let (price_trend, rsi_trend) = self.price_and_rsi_trends(config);
        let obv_trend = config.trend.obv.estimate(&w.obv.to_vec());

        let macd = score_macd(macd_window, hint, &config.macd);
        let adx_max = adx_window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let adx_min = adx_window.iter().copied().fold(f64::INFINITY, f64::min);

        Ok(Signals {
            inputs: SignalInputs {
                bullish_streak,
                bearish_streak,
                bollinger: score_bollinger(bollinger_window, hint, &config.bollinger),
                macd: macd.score,
                rsi: score_rsi(price_trend, rsi_trend),
                derivative: w.ema_derivative(),
                adx,
                adx_max,
                adx_min,
                price_trend,
                rsi_trend,
                obv_trend,
                has_open_orders: false,
                invested: false,
            },
            macd_cross: macd.cross,
        })
    }
}
