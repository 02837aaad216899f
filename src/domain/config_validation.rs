//! Building and validating the engine configuration from a [`ConfigPort`].
//!
//! Every key is optional and falls back to the value in [`EngineConfig::default`].
//! A key that is present but malformed is an error, not a silent default.

use crate::domain::config::EngineConfig;
use crate::domain::error::OracleFuseError;
use crate::domain::symbol::parse_symbols;
use crate::domain::trend::TrendEstimator;
use crate::ports::config_port::ConfigPort;

pub fn build_engine_config(config: &dyn ConfigPort) -> Result<EngineConfig, OracleFuseError> {
    let d = EngineConfig::default();
    let mut engine = EngineConfig::default();

    engine.cadence.sample_hour = read_u32(config, "cadence", "sample_hour", d.cadence.sample_hour)?;
    engine.cadence.sample_minute =
        read_u32(config, "cadence", "sample_minute", d.cadence.sample_minute)?;
    engine.cadence.seed_sessions =
        read_usize(config, "cadence", "seed_sessions", d.cadence.seed_sessions)?;

    engine.windows.price = read_usize(config, "windows", "price", d.windows.price)?;
    engine.windows.rsi_trend = read_usize(config, "windows", "rsi_trend", d.windows.rsi_trend)?;
    engine.windows.ema = read_usize(config, "windows", "ema", d.windows.ema)?;
    engine.windows.obv = read_usize(config, "windows", "obv", d.windows.obv)?;
    engine.windows.adx = read_usize(config, "windows", "adx", d.windows.adx)?;
    engine.windows.bollinger = read_usize(config, "windows", "bollinger", d.windows.bollinger)?;
    engine.windows.macd = read_usize(config, "windows", "macd", d.windows.macd)?;

    let ind = &mut engine.indicators;
    ind.ema_fast = read_usize(config, "indicators", "ema_fast", d.indicators.ema_fast)?;
    ind.ema_slow = read_usize(config, "indicators", "ema_slow", d.indicators.ema_slow)?;
    ind.macd_fast = read_usize(config, "indicators", "macd_fast", d.indicators.macd_fast)?;
    ind.macd_slow = read_usize(config, "indicators", "macd_slow", d.indicators.macd_slow)?;
    ind.macd_signal = read_usize(config, "indicators", "macd_signal", d.indicators.macd_signal)?;
    ind.bollinger_period = read_usize(
        config,
        "indicators",
        "bollinger_period",
        d.indicators.bollinger_period,
    )?;
    ind.bollinger_k = read_f64(config, "indicators", "bollinger_k", d.indicators.bollinger_k)?;
    ind.rsi_period = read_usize(config, "indicators", "rsi_period", d.indicators.rsi_period)?;
    ind.adx_period = read_usize(config, "indicators", "adx_period", d.indicators.adx_period)?;
    ind.atr_period = read_usize(config, "indicators", "atr_period", d.indicators.atr_period)?;

    engine.macd.cross_check_length =
        read_usize(config, "macd", "cross_check_length", d.macd.cross_check_length)?;
    engine.macd.macd_above_below_length = read_usize(
        config,
        "macd",
        "macd_above_below_length",
        d.macd.macd_above_below_length,
    )?;
    engine.macd.long_macd_threshold =
        read_f64(config, "macd", "long_macd_threshold", d.macd.long_macd_threshold)?;
    engine.macd.short_macd_threshold =
        read_f64(config, "macd", "short_macd_threshold", d.macd.short_macd_threshold)?;
    engine.macd.require_cross = read_bool(config, "macd", "require_cross", d.macd.require_cross)?;

    engine.bollinger.long_threshold =
        read_f64(config, "bollinger", "long_threshold", d.bollinger.long_threshold)?;
    engine.bollinger.short_threshold =
        read_f64(config, "bollinger", "short_threshold", d.bollinger.short_threshold)?;

    engine.trend.price = read_trend(config, "price", d.trend.price)?;
    engine.trend.rsi = read_trend(config, "rsi", d.trend.rsi)?;
    engine.trend.obv = read_trend(config, "obv", d.trend.obv)?;

    engine.entry.ema_streak_threshold = read_usize(
        config,
        "entry",
        "ema_streak_threshold",
        d.entry.ema_streak_threshold,
    )?;
    engine.entry.derivative_threshold = read_f64(
        config,
        "entry",
        "derivative_threshold",
        d.entry.derivative_threshold,
    )?;
    engine.entry.confidence_scale =
        read_f64(config, "entry", "confidence_scale", d.entry.confidence_scale)?;
    engine.entry.confidence_bias =
        read_f64(config, "entry", "confidence_bias", d.entry.confidence_bias)?;
    engine.entry.watch_expiry_ticks =
        read_u32(config, "entry", "watch_expiry_ticks", d.entry.watch_expiry_ticks)?;
    engine.entry.adx_threshold = read_f64(config, "adx", "threshold", d.entry.adx_threshold)?;
    engine.entry.adx_extreme_tolerance = read_f64(
        config,
        "adx",
        "extreme_tolerance",
        d.entry.adx_extreme_tolerance,
    )?;
    engine.entry.obv_threshold = read_f64(config, "obv", "threshold", d.entry.obv_threshold)?;

    engine.exit.atr_multiplier = read_f64(config, "exit", "atr_multiplier", d.exit.atr_multiplier)?;
    engine.exit.rsi_divergence_exit = read_bool(
        config,
        "exit",
        "rsi_divergence_exit",
        d.exit.rsi_divergence_exit,
    )?;

    engine.insight.expiry_days = read_u32(config, "insight", "expiry_days", d.insight.expiry_days)?;
    engine.insight.exit_expiry_days =
        read_u32(config, "insight", "exit_expiry_days", d.insight.exit_expiry_days)?;
    engine.insight.bootstrap_expiry_days = read_u32(
        config,
        "insight",
        "bootstrap_expiry_days",
        d.insight.bootstrap_expiry_days,
    )?;
    engine.insight.bootstrap_weight =
        read_f64(config, "insight", "bootstrap_weight", d.insight.bootstrap_weight)?;

    if let Some(list) = config.get_string("bootstrap", "symbols") {
        if !list.trim().is_empty() {
            engine.bootstrap_symbols = parse_symbols(&list)
                .map_err(|e| OracleFuseError::invalid("bootstrap", "symbols", e.to_string()))?;
        }
    }

    engine.validate()?;
    Ok(engine)
}

fn read_trend(
    config: &dyn ConfigPort,
    name: &str,
    default: TrendEstimator,
) -> Result<TrendEstimator, OracleFuseError> {
    let order = read_usize(config, "trend", &format!("{name}_order"), default.order)?;
    let k_order = read_usize(config, "trend", &format!("{name}_k_order"), default.k_order)?;
    Ok(TrendEstimator::new(order, k_order))
}

fn read_i64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, OracleFuseError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<i64>().is_err() => Err(OracleFuseError::invalid(
            section,
            key,
            format!("{key} must be an integer, got {raw:?}"),
        )),
        _ => Ok(config.get_int(section, key, default)),
    }
}

fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, OracleFuseError> {
    let value = read_i64(config, section, key, default as i64)?;
    usize::try_from(value)
        .map_err(|_| OracleFuseError::invalid(section, key, format!("{key} must be non-negative")))
}

fn read_u32(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u32,
) -> Result<u32, OracleFuseError> {
    let value = read_i64(config, section, key, i64::from(default))?;
    u32::try_from(value)
        .map_err(|_| OracleFuseError::invalid(section, key, format!("{key} is out of range")))
}

fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, OracleFuseError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<f64>().is_err() => Err(OracleFuseError::invalid(
            section,
            key,
            format!("{key} must be a number, got {raw:?}"),
        )),
        _ => Ok(config.get_double(section, key, default)),
    }
}

fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, OracleFuseError> {
    // A recognised value reads the same whatever the default is.
    let as_true = config.get_bool(section, key, true);
    let as_false = config.get_bool(section, key, false);
    match (config.get_string(section, key), as_true == as_false) {
        (Some(raw), false) => Err(OracleFuseError::invalid(
            section,
            key,
            format!("{key} must be true or false, got {raw:?}"),
        )),
        _ => Ok(config.get_bool(section, key, default)),
    }
}
