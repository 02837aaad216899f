//! Validated engine configuration.
//!
//! Built once (see [`build_engine_config`](super::config_validation::build_engine_config))
//! and then shared read-only by every component.

use chrono::{NaiveDateTime, Timelike};

use super::aggregator::EntryParams;
use super::error::OracleFuseError;
use super::oracle::bollinger::BollingerParams;
use super::oracle::macd::MacdParams;
use super::symbol::Symbol;
use super::trend::TrendEstimator;

/// When session windows are sampled, and how much history seeds a new symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceConfig {
    pub sample_hour: u32,
    pub sample_minute: u32,
    pub seed_sessions: usize,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            sample_hour: 10,
            sample_minute: 0,
            seed_sessions: 750,
        }
    }
}

impl CadenceConfig {
    pub fn is_boundary(&self, end_time: NaiveDateTime) -> bool {
        end_time.hour() == self.sample_hour && end_time.minute() == self.sample_minute
    }
}

/// Rolling window capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub price: usize,
    pub rsi_trend: usize,
    pub ema: usize,
    pub obv: usize,
    pub adx: usize,
    pub bollinger: usize,
    pub macd: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            price: 30,
            rsi_trend: 30,
            ema: 250,
            obv: 150,
            adx: 30,
            bollinger: 25,
            macd: 15,
        }
    }
}

/// Indicator periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 50,
            ema_slow: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            rsi_period: 14,
            adx_period: 14,
            atr_period: 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendConfig {
    pub price: TrendEstimator,
    pub rsi: TrendEstimator,
    pub obv: TrendEstimator,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            price: TrendEstimator::new(5, 2),
            rsi: TrendEstimator::new(5, 2),
            obv: TrendEstimator::new(2, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitConfig {
    pub atr_multiplier: f64,
    pub rsi_divergence_exit: bool,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: 3.0,
            rsi_divergence_exit: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightConfig {
    pub expiry_days: u32,
    pub exit_expiry_days: u32,
    pub bootstrap_expiry_days: u32,
    pub bootstrap_weight: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            expiry_days: 14,
            exit_expiry_days: 7,
            bootstrap_expiry_days: 10,
            bootstrap_weight: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    pub cadence: CadenceConfig,
    pub windows: WindowConfig,
    pub indicators: IndicatorConfig,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
    pub trend: TrendConfig,
    pub entry: EntryParams,
    pub exit: ExitConfig,
    pub insight: InsightConfig,
    /// Symbols that receive a warm-start Up insight on the first tick.
    pub bootstrap_symbols: Vec<Symbol>,
}

fn positive(section: &str, key: &str, value: usize) -> Result<(), OracleFuseError> {
    if value == 0 {
        return Err(OracleFuseError::invalid(section, key, format!("{key} must be positive")));
    }
    Ok(())
}

fn finite(section: &str, key: &str, value: f64) -> Result<(), OracleFuseError> {
    if !value.is_finite() {
        return Err(OracleFuseError::invalid(section, key, format!("{key} must be finite")));
    }
    Ok(())
}

fn validate_trend(key: &str, trend: &TrendEstimator) -> Result<(), OracleFuseError> {
    if trend.order < 2 {
        return Err(OracleFuseError::invalid(
            "trend",
            &format!("{key}_order"),
            "order must be at least 2",
        ));
    }
    if trend.k_order == 0 || trend.k_order > trend.order {
        return Err(OracleFuseError::invalid(
            "trend",
            &format!("{key}_k_order"),
            "k_order must be between 1 and order",
        ));
    }
    Ok(())
}

impl EngineConfig {
    /// Check every value is in a sane range.
    pub fn validate(&self) -> Result<(), OracleFuseError> {
        let c = &self.cadence;
        if c.sample_hour >= 24 {
            return Err(OracleFuseError::invalid(
                "cadence",
                "sample_hour",
                "sample_hour must be below 24",
            ));
        }
        if c.sample_minute >= 60 {
            return Err(OracleFuseError::invalid(
                "cadence",
                "sample_minute",
                "sample_minute must be below 60",
            ));
        }
        positive("cadence", "seed_sessions", c.seed_sessions)?;

        let w = &self.windows;
        positive("windows", "price", w.price)?;
        positive("windows", "rsi_trend", w.rsi_trend)?;
        positive("windows", "ema", w.ema)?;
        positive("windows", "obv", w.obv)?;
        positive("windows", "adx", w.adx)?;
        positive("windows", "bollinger", w.bollinger)?;
        positive("windows", "macd", w.macd)?;

        let i = &self.indicators;
        positive("indicators", "ema_fast", i.ema_fast)?;
        positive("indicators", "ema_slow", i.ema_slow)?;
        if i.ema_fast >= i.ema_slow {
            return Err(OracleFuseError::invalid(
                "indicators",
                "ema_fast",
                "ema_fast must be shorter than ema_slow",
            ));
        }
        positive("indicators", "macd_fast", i.macd_fast)?;
        positive("indicators", "macd_slow", i.macd_slow)?;
        positive("indicators", "macd_signal", i.macd_signal)?;
        if i.macd_fast >= i.macd_slow {
            return Err(OracleFuseError::invalid(
                "indicators",
                "macd_fast",
                "macd_fast must be shorter than macd_slow",
            ));
        }
        positive("indicators", "bollinger_period", i.bollinger_period)?;
        finite("indicators", "bollinger_k", i.bollinger_k)?;
        if i.bollinger_k <= 0.0 {
            return Err(OracleFuseError::invalid(
                "indicators",
                "bollinger_k",
                "bollinger_k must be positive",
            ));
        }
        positive("indicators", "rsi_period", i.rsi_period)?;
        positive("indicators", "adx_period", i.adx_period)?;
        positive("indicators", "atr_period", i.atr_period)?;

        positive("macd", "cross_check_length", self.macd.cross_check_length)?;
        positive("macd", "macd_above_below_length", self.macd.macd_above_below_length)?;
        finite("macd", "long_macd_threshold", self.macd.long_macd_threshold)?;
        finite("macd", "short_macd_threshold", self.macd.short_macd_threshold)?;

        finite("bollinger", "long_threshold", self.bollinger.long_threshold)?;
        finite("bollinger", "short_threshold", self.bollinger.short_threshold)?;
        if self.bollinger.long_threshold < 0.0 {
            return Err(OracleFuseError::invalid(
                "bollinger",
                "long_threshold",
                "long_threshold must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.bollinger.short_threshold) {
            return Err(OracleFuseError::invalid(
                "bollinger",
                "short_threshold",
                "short_threshold must be between 0 and 1",
            ));
        }

        validate_trend("price", &self.trend.price)?;
        validate_trend("rsi", &self.trend.rsi)?;
        validate_trend("obv", &self.trend.obv)?;

        let e = &self.entry;
        if e.ema_streak_threshold == 0 || e.ema_streak_threshold > w.ema {
            return Err(OracleFuseError::invalid(
                "entry",
                "ema_streak_threshold",
                "ema_streak_threshold must be between 1 and the ema window",
            ));
        }
        finite("entry", "derivative_threshold", e.derivative_threshold)?;
        if e.derivative_threshold < 0.0 {
            return Err(OracleFuseError::invalid(
                "entry",
                "derivative_threshold",
                "derivative_threshold must be non-negative",
            ));
        }
        finite("adx", "threshold", e.adx_threshold)?;
        if !(0.0..1.0).contains(&e.adx_extreme_tolerance) {
            return Err(OracleFuseError::invalid(
                "adx",
                "extreme_tolerance",
                "extreme_tolerance must be in [0, 1)",
            ));
        }
        finite("obv", "threshold", e.obv_threshold)?;
        if e.obv_threshold < 0.0 {
            return Err(OracleFuseError::invalid(
                "obv",
                "threshold",
                "threshold must be non-negative",
            ));
        }
        finite("entry", "confidence_scale", e.confidence_scale)?;
        finite("entry", "confidence_bias", e.confidence_bias)?;
        if e.watch_expiry_ticks == 0 {
            return Err(OracleFuseError::invalid(
                "entry",
                "watch_expiry_ticks",
                "watch_expiry_ticks must be positive",
            ));
        }

        finite("exit", "atr_multiplier", self.exit.atr_multiplier)?;
        if self.exit.atr_multiplier <= 0.0 {
            return Err(OracleFuseError::invalid(
                "exit",
                "atr_multiplier",
                "atr_multiplier must be positive",
            ));
        }

        let ins = &self.insight;
        if ins.expiry_days == 0 {
            return Err(OracleFuseError::invalid(
                "insight",
                "expiry_days",
                "expiry_days must be positive",
            ));
        }
        if ins.exit_expiry_days == 0 {
            return Err(OracleFuseError::invalid(
                "insight",
                "exit_expiry_days",
                "exit_expiry_days must be positive",
            ));
        }
        if ins.bootstrap_expiry_days == 0 {
            return Err(OracleFuseError::invalid(
                "insight",
                "bootstrap_expiry_days",
                "bootstrap_expiry_days must be positive",
            ));
        }
        finite("insight", "bootstrap_weight", ins.bootstrap_weight)?;
        if ins.bootstrap_weight < 0.0 {
            return Err(OracleFuseError::invalid(
                "insight",
                "bootstrap_weight",
                "bootstrap_weight must be non-negative",
            ));
        }

        Ok(())
    }
}
