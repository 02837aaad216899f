//! Per-tick orchestration over every active symbol.
//!
//! Order within a tick:
//! 1. first tick only: warm-start insights for the bootstrap symbols
//! 2. per symbol: indicators and windows, trends and oracles, entry decision
//! 3. advance the entry watches that were already pending before this tick
//! 4. trailing stops (and the optional RSI divergence exit) over held positions
//!
//! Per-symbol problems never abort a tick; they are counted as [`NoBuyReason`]s.
//! A bar with a non-finite price is one of them: that symbol skips the tick.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

use super::aggregator::{evaluate_entry, NoBuyReason, SignalInputs};
use super::config::EngineConfig;
use super::entry_watch::WatchOutcome;
use super::error::OracleFuseError;
use super::insight::{Insight, InsightDirection, InsightSource};
use super::ohlcv::OhlcvBar;
use super::oracle::rsi::rsi_divergence;
use super::position_stop::StopDecision;
use super::symbol::Symbol;
use super::symbol_state::SymbolState;
use crate::ports::history_port::HistoryPort;
use crate::ports::portfolio_port::PortfolioPort;

/// The bars that arrived at one scheduling tick, keyed by symbol.
#[derive(Debug, Clone)]
pub struct Tick {
    pub time: NaiveDateTime,
    pub bars: HashMap<Symbol, OhlcvBar>,
}

impl Tick {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time,
            bars: HashMap::new(),
        }
    }

    pub fn insert(&mut self, bar: OhlcvBar) {
        self.bars.insert(bar.symbol.clone(), bar);
    }

    pub fn with_bar(mut self, bar: OhlcvBar) -> Self {
        self.insert(bar);
        self
    }

    /// Close of `symbol`'s bar, if it has a usable one this tick.
    fn close(&self, symbol: &Symbol) -> Option<f64> {
        self.bars
            .get(symbol)
            .filter(|b| b.is_finite())
            .map(|b| b.close)
    }

    fn validate(&self) -> Result<(), OracleFuseError> {
        for (symbol, bar) in &self.bars {
            if &bar.symbol != symbol {
                return Err(OracleFuseError::Data {
                    reason: format!("bar for {} keyed under {}", bar.symbol, symbol),
                });
            }
        }
        Ok(())
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub insights: Vec<Insight>,
    pub no_buy_reasons: BTreeMap<NoBuyReason, usize>,
    pub liquidations: Vec<Symbol>,
}

impl CycleReport {
    fn record(&mut self, reason: NoBuyReason) {
        *self.no_buy_reasons.entry(reason).or_insert(0) += 1;
    }

    /// Reasons ordered most frequent first.
    pub fn reasons_by_frequency(&self) -> Vec<(NoBuyReason, usize)> {
        let mut reasons: Vec<_> = self
            .no_buy_reasons
            .iter()
            .map(|(reason, count)| (*reason, *count))
            .collect();
        reasons.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        reasons
    }
}

pub struct SignalEngine {
    config: EngineConfig,
    states: BTreeMap<Symbol, SymbolState>,
    bootstrapped: bool,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Result<Self, OracleFuseError> {
        config.validate()?;
        Ok(Self {
            config,
            states: BTreeMap::new(),
            bootstrapped: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self, symbol: &Symbol) -> Option<&SymbolState> {
        self.states.get(symbol)
    }

    pub fn is_active(&self, symbol: &Symbol) -> bool {
        self.states.contains_key(symbol)
    }

    pub fn active_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.states.keys()
    }

    /// Drop removed symbols, then create and seed added ones. A symbol whose
    /// history cannot be loaded still joins, cold.
    pub fn on_membership_changed(
        &mut self,
        added: &[Symbol],
        removed: &[Symbol],
        history: &dyn HistoryPort,
    ) {
        for symbol in removed {
            if self.states.remove(symbol).is_some() {
                info!(symbol = %symbol, "symbol removed");
            }
        }

        for symbol in added {
            if self.states.contains_key(symbol) {
                continue;
            }
            let mut state = SymbolState::new(symbol.clone(), &self.config);
            match history.history(symbol, self.config.cadence.seed_sessions) {
                Ok(bars) => {
                    let samples = state.seed(&bars, &self.config.cadence);
                    info!(
                        symbol = %symbol,
                        bars = bars.len(),
                        samples,
                        "symbol added and seeded"
                    );
                }
                Err(e) => warn!(symbol = %symbol, error = %e, "seeding failed, starting cold"),
            }
            self.states.insert(symbol.clone(), state);
        }
    }

    /// Run one scheduling tick.
    pub fn update(
        &mut self,
        tick: &Tick,
        portfolio: &mut dyn PortfolioPort,
    ) -> Result<CycleReport, OracleFuseError> {
        tick.validate()?;
        let mut report = CycleReport::default();

        if !self.bootstrapped {
            self.bootstrap(tick.time, &mut report);
            self.bootstrapped = true;
        }

        // Watches opened during this tick are first advanced on the next one.
        let pending: Vec<Symbol> = self
            .states
            .iter()
            .filter(|(_, state)| !state.watch.is_idle())
            .map(|(symbol, _)| symbol.clone())
            .collect();

        let sampled = self.evaluate_entries(tick, &*portfolio, &mut report);
        self.advance_watches(tick, &pending, &mut report);
        self.run_exits(tick, &sampled, portfolio, &mut report);

        for (reason, count) in report.reasons_by_frequency() {
            debug!(reason = %reason, count, "no-buy reason");
        }
        Ok(report)
    }

    fn bootstrap(&mut self, time: NaiveDateTime, report: &mut CycleReport) {
        let insight_config = self.config.insight;
        for symbol in &self.config.bootstrap_symbols {
            if !self.states.contains_key(symbol) {
                self.states
                    .insert(symbol.clone(), SymbolState::new(symbol.clone(), &self.config));
            }
            info!(symbol = %symbol, "warm-start insight");
            report.insights.push(Insight {
                symbol: symbol.clone(),
                generated_at: time,
                direction: InsightDirection::Up,
                expiry_days: insight_config.bootstrap_expiry_days,
                weight: insight_config.bootstrap_weight,
                source: InsightSource::Bootstrap,
            });
        }
    }

    /// Indicators, oracles and the entry decision for every active symbol.
    /// Returns the symbols whose windows were appended this tick.
    fn evaluate_entries(
        &mut self,
        tick: &Tick,
        portfolio: &dyn PortfolioPort,
        report: &mut CycleReport,
    ) -> BTreeSet<Symbol> {
        let config = &self.config;
        let mut sampled = BTreeSet::new();

        for (symbol, state) in self.states.iter_mut() {
            let Some(bar) = tick.bars.get(symbol) else {
                report.record(NoBuyReason::NoData);
                continue;
            };
            if !bar.is_finite() {
                warn!(symbol = %symbol, time = %bar.end_time, "non-finite bar skipped");
                report.record(NoBuyReason::BadData);
                continue;
            }
            if state.on_bar(bar, &config.cadence) {
                sampled.insert(symbol.clone());
            }
            if !state.indicators.macd.is_ready() {
                report.record(NoBuyReason::MacdNotReady);
                continue;
            }

            let signals = match state.signals(config) {
                Ok(signals) => signals,
                Err(reason) => {
                    report.record(reason);
                    continue;
                }
            };
            let inputs = SignalInputs {
                has_open_orders: portfolio.has_open_orders(symbol),
                invested: portfolio.is_invested(symbol),
                ..signals.inputs
            };
            debug!(
                symbol = %symbol,
                bull = inputs.bullish_streak,
                bear = inputs.bearish_streak,
                bollinger = inputs.bollinger.value(),
                macd = inputs.macd.value(),
                macd_cross = ?signals.macd_cross,
                rsi = inputs.rsi.value(),
                derivative = inputs.derivative,
                adx = inputs.adx,
                price_trend = inputs.price_trend,
                rsi_trend = inputs.rsi_trend,
                obv_trend = inputs.obv_trend,
                "signals"
            );

            match evaluate_entry(&inputs, &config.entry) {
                Ok(conviction) => {
                    if state.watch.open(conviction) {
                        info!(
                            symbol = %symbol,
                            direction = %conviction.direction,
                            score = conviction.score,
                            "entry watch opened"
                        );
                    } else {
                        report.record(NoBuyReason::WatchPending);
                    }
                }
                Err(reason) => report.record(reason),
            }
        }

        sampled
    }

    fn advance_watches(&mut self, tick: &Tick, pending: &[Symbol], report: &mut CycleReport) {
        let config = &self.config;
        for symbol in pending {
            // Removed since the watch was opened.
            let Some(state) = self.states.get_mut(symbol) else {
                continue;
            };
            let price = state.latest_price();
            let middle = state.indicators.bollinger.current().map(|b| b.middle);

            match state
                .watch
                .advance(config.entry.watch_expiry_ticks, price, middle)
            {
                WatchOutcome::Confirmed(conviction) => {
                    let entry_price = tick.close(symbol).or(price);
                    if let Some(entry_price) = entry_price {
                        state.stop.arm(entry_price);
                    }
                    info!(
                        symbol = %symbol,
                        direction = %conviction.direction,
                        score = conviction.score,
                        entry_price = ?entry_price,
                        "entry confirmed"
                    );
                    report.insights.push(Insight {
                        symbol: symbol.clone(),
                        generated_at: tick.time,
                        direction: conviction.direction.into(),
                        expiry_days: config.insight.expiry_days,
                        weight: f64::from(conviction.score),
                        source: InsightSource::Entry,
                    });
                }
                WatchOutcome::Expired => {
                    state.stop.clear();
                    debug!(symbol = %symbol, "entry watch expired");
                }
                WatchOutcome::Pending | WatchOutcome::Idle => {}
            }
        }
    }

    fn run_exits(
        &mut self,
        tick: &Tick,
        sampled: &BTreeSet<Symbol>,
        portfolio: &mut dyn PortfolioPort,
        report: &mut CycleReport,
    ) {
        let config = &self.config;
        for (symbol, state) in self.states.iter_mut() {
            let Some(side) = portfolio.position(symbol) else {
                continue;
            };

            if config.exit.rsi_divergence_exit && sampled.contains(symbol) {
                let (price_trend, rsi_trend) = state.price_and_rsi_trends(config);
                if rsi_divergence(price_trend, rsi_trend) == Some(side) {
                    info!(
                        symbol = %symbol,
                        side = %side,
                        price_trend,
                        rsi_trend,
                        "rsi divergence exit"
                    );
                    report.insights.push(Insight {
                        symbol: symbol.clone(),
                        generated_at: tick.time,
                        direction: InsightDirection::Flat,
                        expiry_days: config.insight.exit_expiry_days,
                        weight: 1.0,
                        source: InsightSource::RsiDivergence,
                    });
                }
            }

            if !state.stop.is_armed() {
                continue;
            }
            let Some(atr) = state.indicators.atr.current() else {
                debug!(symbol = %symbol, "atr not ready, stop check skipped");
                continue;
            };
            let Some(price) = tick.close(symbol).or_else(|| state.latest_price()) else {
                continue;
            };

            if let StopDecision::Liquidate { price, peak, band } =
                state.stop.trail(side, price, atr, config.exit.atr_multiplier)
            {
                info!(
                    symbol = %symbol,
                    side = %side,
                    price,
                    peak,
                    band,
                    atr,
                    "trailing stop hit, liquidating"
                );
                portfolio.liquidate(symbol);
                report.liquidations.push(symbol.clone());
                report.insights.push(Insight {
                    symbol: symbol.clone(),
                    generated_at: tick.time,
                    direction: InsightDirection::Flat,
                    expiry_days: config.insight.exit_expiry_days,
                    weight: 1.0,
                    source: InsightSource::TrailingStop,
                });
            }
        }
    }
}
