//! Score aggregation: fuses trend and oracle outputs into an entry decision.
//!
//! [`evaluate_entry`] is pure. It walks the gates in a fixed order and reports
//! the first one that fails as a [`NoBuyReason`].

use std::fmt;

use super::direction::Direction;
use super::oracle::OracleScore;

/// Everything the aggregator looks at for one symbol on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub bullish_streak: usize,
    pub bearish_streak: usize,
    pub bollinger: OracleScore,
    pub macd: OracleScore,
    pub rsi: OracleScore,
    pub derivative: f64,
    pub adx: f64,
    pub adx_max: f64,
    pub adx_min: f64,
    pub price_trend: f64,
    pub rsi_trend: f64,
    pub obv_trend: f64,
    pub has_open_orders: bool,
    pub invested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryParams {
    pub ema_streak_threshold: usize,
    pub derivative_threshold: f64,
    pub adx_threshold: f64,
    pub adx_extreme_tolerance: f64,
    pub obv_threshold: f64,
    pub confidence_scale: f64,
    pub confidence_bias: f64,
    pub watch_expiry_ticks: u32,
}

impl Default for EntryParams {
    fn default() -> Self {
        Self {
            ema_streak_threshold: 210,
            derivative_threshold: 0.005,
            adx_threshold: 30.0,
            adx_extreme_tolerance: 0.05,
            obv_threshold: 0.5,
            confidence_scale: 100.0,
            confidence_bias: 700.0,
            watch_expiry_ticks: 70,
        }
    }
}

/// A directional entry decision with its confidence magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conviction {
    pub direction: Direction,
    pub score: u32,
}

/// Why a symbol produced no conviction this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoBuyReason {
    NoData,
    BadData,
    MacdNotReady,
    NotReady(&'static str),
    NoEmaTrend,
    Bollinger,
    Macd,
    Rsi,
    Derivative,
    AdxBelowThreshold,
    AdxNotAtExtreme,
    ObvTrend,
    OpenOrders,
    AlreadyInvested,
    WatchPending,
}

impl fmt::Display for NoBuyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoBuyReason::NoData => write!(f, "no data"),
            NoBuyReason::BadData => write!(f, "non-finite bar"),
            NoBuyReason::MacdNotReady => write!(f, "macd not ready"),
            NoBuyReason::NotReady(name) => write!(f, "{name} not ready"),
            NoBuyReason::NoEmaTrend => write!(f, "not in ema trend"),
            NoBuyReason::Bollinger => write!(f, "bollinger disagrees"),
            NoBuyReason::Macd => write!(f, "macd disagrees"),
            NoBuyReason::Rsi => write!(f, "rsi disagrees"),
            NoBuyReason::Derivative => write!(f, "ema derivative too flat"),
            NoBuyReason::AdxBelowThreshold => write!(f, "adx below threshold"),
            NoBuyReason::AdxNotAtExtreme => write!(f, "adx not at extreme"),
            NoBuyReason::ObvTrend => write!(f, "obv trend too weak"),
            NoBuyReason::OpenOrders => write!(f, "open orders"),
            NoBuyReason::AlreadyInvested => write!(f, "already invested"),
            NoBuyReason::WatchPending => write!(f, "entry watch pending"),
        }
    }
}

/// Direction of the EMA regime: the bullish streak is checked first.
pub fn regime(bullish_streak: usize, bearish_streak: usize, threshold: usize) -> Option<Direction> {
    if bullish_streak >= threshold {
        Some(Direction::Long)
    } else if bearish_streak >= threshold {
        Some(Direction::Short)
    } else {
        None
    }
}

/// `|trunc(d × adx × max(pt,1) × max(rt,1) × max(ot,1) × scale + bias)|`
pub fn confidence(inputs: &SignalInputs, params: &EntryParams) -> u32 {
    let raw = inputs.derivative
        * inputs.adx
        * inputs.price_trend.max(1.0)
        * inputs.rsi_trend.max(1.0)
        * inputs.obv_trend.max(1.0)
        * params.confidence_scale
        + params.confidence_bias;
    // `as` saturates; NaN maps to 0.
    raw.trunc().abs() as u32
}

pub fn evaluate_entry(
    inputs: &SignalInputs,
    params: &EntryParams,
) -> Result<Conviction, NoBuyReason> {
    let direction = regime(
        inputs.bullish_streak,
        inputs.bearish_streak,
        params.ema_streak_threshold,
    )
    .ok_or(NoBuyReason::NoEmaTrend)?;

    if !inputs.bollinger.is(direction) {
        return Err(NoBuyReason::Bollinger);
    }
    if !inputs.macd.is(direction) {
        return Err(NoBuyReason::Macd);
    }
    if !inputs.rsi.is(direction) {
        return Err(NoBuyReason::Rsi);
    }

    let sign = f64::from(direction.sign());
    if inputs.derivative * sign <= params.derivative_threshold {
        return Err(NoBuyReason::Derivative);
    }
    if inputs.adx <= params.adx_threshold {
        return Err(NoBuyReason::AdxBelowThreshold);
    }
    let at_extreme = match direction {
        Direction::Long => inputs.adx >= (1.0 - params.adx_extreme_tolerance) * inputs.adx_max,
        Direction::Short => inputs.adx <= (1.0 + params.adx_extreme_tolerance) * inputs.adx_min,
    };
    if !at_extreme {
        return Err(NoBuyReason::AdxNotAtExtreme);
    }
    if inputs.obv_trend * sign <= params.obv_threshold {
        return Err(NoBuyReason::ObvTrend);
    }
    if inputs.has_open_orders {
        return Err(NoBuyReason::OpenOrders);
    }
    if inputs.invested {
        return Err(NoBuyReason::AlreadyInvested);
    }

    Ok(Conviction {
        direction,
        score: confidence(inputs, params),
    })
}
