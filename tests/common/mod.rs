#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use oraclefuse::domain::direction::Direction;
use oraclefuse::domain::error::OracleFuseError;
pub use oraclefuse::domain::ohlcv::{recent_sessions, OhlcvBar};
pub use oraclefuse::domain::symbol::Symbol;
use oraclefuse::ports::history_port::HistoryPort;
use oraclefuse::ports::portfolio_port::PortfolioPort;
use std::collections::{HashMap, HashSet};

pub struct MockHistoryPort {
    pub data: HashMap<Symbol, Vec<OhlcvBar>>,
    pub errors: HashMap<Symbol, String>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(Symbol::new(symbol), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(Symbol::new(symbol), reason.to_string());
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn history(&self, symbol: &Symbol, sessions: usize) -> Result<Vec<OhlcvBar>, OracleFuseError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(OracleFuseError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).cloned().unwrap_or_default();
        Ok(recent_sessions(&bars, sessions).to_vec())
    }
}

#[derive(Default)]
pub struct MockPortfolio {
    pub positions: HashMap<Symbol, Direction>,
    pub open_orders: HashSet<Symbol>,
    pub liquidated: Vec<Symbol>,
}

impl MockPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(mut self, symbol: &str, side: Direction) -> Self {
        self.positions.insert(Symbol::new(symbol), side);
        self
    }
}

impl PortfolioPort for MockPortfolio {
    fn position(&self, symbol: &Symbol) -> Option<Direction> {
        self.positions.get(symbol).copied()
    }

    fn has_open_orders(&self, symbol: &Symbol) -> bool {
        self.open_orders.contains(symbol)
    }

    fn liquidate(&mut self, symbol: &Symbol) {
        self.positions.remove(symbol);
        self.liquidated.push(symbol.clone());
    }
}

/// 10:00 on the given date.
pub fn sample_time(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn make_bar(symbol: &str, end_time: NaiveDateTime, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: Symbol::new(symbol),
        end_time,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// One 10:00 bar per day, price moving by `step` each day.
pub fn daily_bars(
    symbol: &str,
    start: NaiveDateTime,
    count: usize,
    start_price: f64,
    step: f64,
) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| make_bar(symbol, start + Duration::days(i as i64), start_price + step * i as f64))
        .collect()
}

/// Bars from 10:00 to 15:00 every day; only the first of each day is on the cadence.
pub fn hourly_bars(
    symbol: &str,
    start: NaiveDateTime,
    days: usize,
    start_price: f64,
) -> Vec<OhlcvBar> {
    let mut bars = Vec::new();
    for d in 0..days {
        for h in 0..6 {
            let close = start_price + d as f64 + h as f64 * 0.1;
            bars.push(make_bar(
                symbol,
                start + Duration::days(d as i64) + Duration::hours(h),
                close,
            ));
        }
    }
    bars
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.end_time.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
