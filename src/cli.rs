//! CLI definition and dispatch.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_history::InMemoryHistory;
use crate::adapters::paper_portfolio::PaperPortfolio;
use crate::domain::aggregator::NoBuyReason;
use crate::domain::config::EngineConfig;
use crate::domain::config_validation::build_engine_config;
use crate::domain::engine::{SignalEngine, Tick};
use crate::domain::error::OracleFuseError;
use crate::domain::insight::Insight;
use crate::domain::ohlcv::{session_split, OhlcvBar};
use crate::domain::symbol::{parse_symbols, Symbol};

#[derive(Parser, Debug)]
#[command(name = "oraclefuse", about = "Multi-oracle signal fusion engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay CSV bars through the engine and write the insight log
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding one <SYMBOL>.csv per symbol
        #[arg(short, long)]
        data: PathBuf,
        /// Comma-separated symbols; defaults to every CSV in the data directory
        #[arg(short, long)]
        symbols: Option<String>,
        /// Sessions per symbol used for seeding instead of [cadence] seed_sessions
        #[arg(long)]
        seed_sessions: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate an engine configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Replay {
            config,
            data,
            symbols,
            seed_sessions,
            output,
        } => run_replay(
            &config,
            &data,
            symbols.as_deref(),
            seed_sessions,
            output.as_ref(),
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

fn report_error(err: &OracleFuseError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_engine_config(path: &PathBuf) -> Result<EngineConfig, OracleFuseError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    build_engine_config(&adapter)
}

/// Symbols named on the command line, or every CSV file in the data directory.
pub fn resolve_symbols(
    symbols_arg: Option<&str>,
    csv: &CsvAdapter,
) -> Result<Vec<Symbol>, OracleFuseError> {
    match symbols_arg {
        Some(list) => parse_symbols(list).map_err(|e| OracleFuseError::ConfigInvalid {
            section: "cli".to_string(),
            key: "symbols".to_string(),
            reason: e.to_string(),
        }),
        None => csv.list_symbols(),
    }
}

/// Load every symbol's bars. Symbols without a file are skipped with a warning;
/// it is an error only if none are left.
pub fn load_bars(
    csv: &CsvAdapter,
    symbols: &[Symbol],
) -> Result<BTreeMap<Symbol, Vec<OhlcvBar>>, OracleFuseError> {
    let mut loaded = BTreeMap::new();
    for symbol in symbols {
        match csv.load_bars(symbol) {
            Ok(bars) if bars.is_empty() => warn!(symbol = %symbol, "empty CSV, skipping"),
            Ok(bars) => {
                loaded.insert(symbol.clone(), bars);
            }
            Err(OracleFuseError::NoData { .. }) => warn!(symbol = %symbol, "no CSV, skipping"),
            Err(e) => return Err(e),
        }
    }
    if loaded.is_empty() {
        return Err(OracleFuseError::NoData {
            symbol: symbols
                .iter()
                .map(Symbol::as_str)
                .collect::<Vec<_>>()
                .join(","),
        });
    }
    Ok(loaded)
}

/// Everything a replay produced.
#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub ticks: usize,
    pub insights: Vec<Insight>,
    pub liquidations: usize,
    pub no_buy_reasons: BTreeMap<NoBuyReason, usize>,
}

/// Bars from every symbol grouped by end time, oldest tick first.
pub fn build_ticks(bars: BTreeMap<Symbol, Vec<OhlcvBar>>) -> Vec<Tick> {
    let mut ticks: BTreeMap<NaiveDateTime, Tick> = BTreeMap::new();
    for bar in bars.into_values().flatten() {
        ticks
            .entry(bar.end_time)
            .or_insert_with(|| Tick::new(bar.end_time))
            .insert(bar);
    }
    ticks.into_values().collect()
}

/// Seed each symbol from its first `seed_sessions` sessions, then replay the
/// rest tick by tick against a paper portfolio.
pub fn run_replay_pipeline(
    config: EngineConfig,
    bars: BTreeMap<Symbol, Vec<OhlcvBar>>,
) -> Result<ReplayOutcome, OracleFuseError> {
    let seed_sessions = config.cadence.seed_sessions;
    let mut engine = SignalEngine::new(config)?;

    let mut history = InMemoryHistory::new();
    let mut live = BTreeMap::new();
    for (symbol, mut series) in bars {
        series.sort_by_key(|b| b.end_time);
        let rest = series.split_off(session_split(&series, seed_sessions));
        history.insert(symbol.clone(), series);
        live.insert(symbol, rest);
    }
    let symbols: Vec<Symbol> = live.keys().cloned().collect();
    engine.on_membership_changed(&symbols, &[], &history);

    let mut portfolio = PaperPortfolio::new();
    let mut outcome = ReplayOutcome::default();
    for tick in build_ticks(live) {
        let report = engine.update(&tick, &mut portfolio)?;
        portfolio.apply(&report.insights);
        outcome.ticks += 1;
        outcome.liquidations += report.liquidations.len();
        for (reason, count) in report.no_buy_reasons {
            *outcome.no_buy_reasons.entry(reason).or_insert(0) += count;
        }
        outcome.insights.extend(report.insights);
    }
    Ok(outcome)
}

#[derive(Serialize)]
struct InsightRecord<'a> {
    symbol: &'a str,
    generated_at: NaiveDateTime,
    expires_at: NaiveDateTime,
    direction: String,
    weight: f64,
    source: String,
}

/// Write the insight log as CSV, one row per insight.
pub fn write_insights<W: io::Write>(
    insights: &[Insight],
    writer: W,
) -> Result<(), OracleFuseError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for insight in insights {
        wtr.serialize(InsightRecord {
            symbol: insight.symbol.as_str(),
            generated_at: insight.generated_at,
            expires_at: insight.expires_at(),
            direction: insight.direction.to_string(),
            weight: insight.weight,
            source: format!("{:?}", insight.source).to_lowercase(),
        })
        .map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_replay(
    config_path: &PathBuf,
    data_dir: &PathBuf,
    symbols_arg: Option<&str>,
    seed_sessions: Option<usize>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let mut config = match load_engine_config(config_path) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    if let Some(n) = seed_sessions {
        config.cadence.seed_sessions = n;
    }

    let csv = CsvAdapter::new(data_dir.clone());
    let symbols = match resolve_symbols(symbols_arg, &csv) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    if symbols.is_empty() {
        eprintln!("error: no symbols to replay");
        return ExitCode::from(2);
    }

    let bars = match load_bars(&csv, &symbols) {
        Ok(b) => b,
        Err(e) => return report_error(&e),
    };
    eprintln!(
        "Replaying {} symbols (seeding {} sessions each)...",
        bars.len(),
        config.cadence.seed_sessions
    );

    let outcome = match run_replay_pipeline(config, bars) {
        Ok(o) => o,
        Err(e) => return report_error(&e),
    };
    info!(
        ticks = outcome.ticks,
        insights = outcome.insights.len(),
        liquidations = outcome.liquidations,
        "replay finished"
    );

    let written = match output_path {
        Some(path) => File::create(path)
            .map_err(OracleFuseError::from)
            .and_then(|file| write_insights(&outcome.insights, file)),
        None => write_insights(&outcome.insights, io::stdout().lock()),
    };
    if let Err(e) = written {
        return report_error(&e);
    }

    eprintln!(
        "{} ticks, {} insights, {} liquidations",
        outcome.ticks,
        outcome.insights.len(),
        outcome.liquidations
    );
    let mut reasons: Vec<_> = outcome.no_buy_reasons.iter().collect();
    reasons.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (reason, count) in reasons.iter().take(5) {
        eprintln!("  {count:>8}  {reason}");
    }
    if let Some(path) = output_path {
        eprintln!("Insights written to {}", path.display());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_engine_config(config_path) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    eprintln!(
        "  cadence:   {:02}:{:02}, seed {} sessions",
        config.cadence.sample_hour,
        config.cadence.sample_minute,
        config.cadence.seed_sessions
    );
    eprintln!(
        "  windows:   price {}, ema {}, adx {}, bollinger {}, macd {}",
        config.windows.price,
        config.windows.ema,
        config.windows.adx,
        config.windows.bollinger,
        config.windows.macd
    );
    eprintln!(
        "  exit:      atr x{}, rsi divergence {}",
        config.exit.atr_multiplier,
        if config.exit.rsi_divergence_exit { "on" } else { "off" }
    );
    if !config.bootstrap_symbols.is_empty() {
        let names: Vec<&str> = config.bootstrap_symbols.iter().map(Symbol::as_str).collect();
        eprintln!("  bootstrap: {}", names.join(", "));
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
