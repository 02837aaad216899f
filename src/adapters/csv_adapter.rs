//! CSV bar files, one per symbol: `<SYMBOL>.csv` with columns
//! `timestamp,open,high,low,close,volume` and timestamps as `%Y-%m-%d %H:%M:%S`.

use crate::domain::error::OracleFuseError;
use crate::domain::ohlcv::{recent_sessions, OhlcvBar};
use crate::domain::symbol::Symbol;
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

fn field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<T, OracleFuseError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| OracleFuseError::Data {
        reason: format!("line {line}: missing {name} column"),
    })?;
    raw.trim().parse().map_err(|e| OracleFuseError::Data {
        reason: format!("line {line}: invalid {name} value {raw:?}: {e}"),
    })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &Symbol) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    /// Every bar in the symbol's file, sorted by time.
    pub fn load_bars(&self, symbol: &Symbol) -> Result<Vec<OhlcvBar>, OracleFuseError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => OracleFuseError::NoData {
                symbol: symbol.to_string(),
            },
            _ => OracleFuseError::Io(e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| OracleFuseError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let raw_time = record.get(0).ok_or_else(|| OracleFuseError::Data {
                reason: format!("line {line}: missing timestamp column"),
            })?;
            let end_time = NaiveDateTime::parse_from_str(raw_time.trim(), TIMESTAMP_FORMAT)
                .map_err(|e| OracleFuseError::Data {
                    reason: format!("line {line}: invalid timestamp {raw_time:?}: {e}"),
                })?;

            bars.push(OhlcvBar {
                symbol: symbol.clone(),
                end_time,
                open: field(&record, 1, "open", line)?,
                high: field(&record, 2, "high", line)?,
                low: field(&record, 3, "low", line)?,
                close: field(&record, 4, "close", line)?,
                volume: field(&record, 5, "volume", line)?,
            });
        }

        bars.sort_by_key(|b| b.end_time);
        Ok(bars)
    }

    /// Symbols with a CSV file in the base directory, sorted.
    pub fn list_symbols(&self) -> Result<Vec<Symbol>, OracleFuseError> {
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(Symbol::new(stem));
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

impl HistoryPort for CsvAdapter {
    fn history(&self, symbol: &Symbol, sessions: usize) -> Result<Vec<OhlcvBar>, OracleFuseError> {
        let bars = self.load_bars(symbol)?;
        Ok(recent_sessions(&bars, sessions).to_vec())
    }
}
