//! Streaming technical indicators.
//!
//! Each indicator is fed one input at a time through `update` and exposes
//! `is_ready` and `current` (which is `None` until ready). Formulas follow the
//! usual definitions: SMA-seeded EMA, Wilder-smoothed RSI/ATR/ADX,
//! population-stddev Bollinger Bands and cumulative OBV.

pub mod adx;
pub mod atr;
pub mod bank;
pub mod bollinger;
pub mod consolidator;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;

pub use bank::IndicatorBank;
