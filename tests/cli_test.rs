//! CLI orchestration tests: config loading, CSV discovery, the replay pipeline
//! and the insight log, using real files in temp directories.

mod common;

use clap::Parser;
use common::*;
use oraclefuse::adapters::csv_adapter::CsvAdapter;
use oraclefuse::cli::{self, Cli};
use oraclefuse::domain::error::OracleFuseError;
use std::fs;
use std::io::Write;
use std::process::ExitCode;
use tempfile::TempDir;

const VALID_INI: &str = r#"
[cadence]
sample_hour = 10
seed_sessions = 20

[exit]
atr_multiplier = 2.5

[bootstrap]
symbols = MS,HOOD
"#;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Data directory with 40 daily bars each for MS and HOOD.
fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let start = sample_time(2024, 1, 1);
    for (symbol, price) in [("MS", 90.0), ("HOOD", 20.0)] {
        let bars = daily_bars(symbol, start, 40, price, 0.5);
        fs::write(dir.path().join(format!("{symbol}.csv")), bars_to_csv(&bars)).unwrap();
    }
    dir
}

fn is_success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}

mod config_loading {
    use super::*;

    #[test]
    fn load_engine_config_reads_overrides() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_engine_config(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.cadence.seed_sessions, 20);
        assert_eq!(config.exit.atr_multiplier, 2.5);
        assert_eq!(config.bootstrap_symbols, vec![Symbol::new("MS"), Symbol::new("HOOD")]);
        // Untouched keys keep their defaults.
        assert_eq!(config.windows.ema, 250);
    }

    #[test]
    fn invalid_value_names_section_and_key() {
        let file = write_temp_ini("[windows]\nprice = 0\n");
        let err = cli::load_engine_config(&file.path().to_path_buf()).unwrap_err();
        match err {
            OracleFuseError::ConfigInvalid { section, key, .. } => {
                assert_eq!(section, "windows");
                assert_eq!(key, "price");
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_parse_error() {
        let path = std::path::PathBuf::from("/nonexistent/oraclefuse.ini");
        assert!(matches!(
            cli::load_engine_config(&path),
            Err(OracleFuseError::ConfigParse { .. })
        ));
    }

    #[test]
    fn shipped_demo_config_is_valid() {
        let path =
            std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/oraclefuse.ini");
        let config = cli::load_engine_config(&path).unwrap();
        assert_eq!(config.bootstrap_symbols.len(), 5);
        assert_eq!(config.cadence.seed_sessions, 750);
    }
}

mod symbol_resolution {
    use super::*;

    #[test]
    fn explicit_list_is_normalized() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let symbols = cli::resolve_symbols(Some("ms, hood"), &csv).unwrap();
        assert_eq!(symbols, vec![Symbol::new("MS"), Symbol::new("HOOD")]);
    }

    #[test]
    fn duplicate_in_list_is_rejected() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            cli::resolve_symbols(Some("MS,ms"), &csv),
            Err(OracleFuseError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn defaults_to_every_csv() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let symbols = cli::resolve_symbols(None, &csv).unwrap();
        assert_eq!(symbols, vec![Symbol::new("HOOD"), Symbol::new("MS")]);
    }

    #[test]
    fn missing_symbols_are_skipped() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let bars = cli::load_bars(&csv, &[Symbol::new("MS"), Symbol::new("DAL")]).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[&Symbol::new("MS")].len(), 40);
    }

    #[test]
    fn no_symbols_with_data_is_no_data() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            cli::load_bars(&csv, &[Symbol::new("DAL"), Symbol::new("APP")]),
            Err(OracleFuseError::NoData { .. })
        ));
    }
}

mod replay_pipeline {
    use super::*;

    #[test]
    fn ticks_group_bars_by_time() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let bars = cli::load_bars(&csv, &[Symbol::new("MS"), Symbol::new("HOOD")]).unwrap();
        let ticks = cli::build_ticks(bars);
        assert_eq!(ticks.len(), 40);
        assert!(ticks.iter().all(|t| t.bars.len() == 2));
        assert!(ticks.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn replay_seeds_then_runs_remaining_ticks() {
        let dir = data_dir();
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_engine_config(&file.path().to_path_buf()).unwrap();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let bars = cli::load_bars(&csv, &[Symbol::new("MS"), Symbol::new("HOOD")]).unwrap();

        let outcome = cli::run_replay_pipeline(config, bars).unwrap();
        // 40 bars per symbol, 20 used for seeding.
        assert_eq!(outcome.ticks, 20);
        assert_eq!(outcome.insights.len(), 2);
        assert_eq!(outcome.insights[0].generated_at, sample_time(2024, 1, 21));
        assert_eq!(outcome.liquidations, 0);
    }

    #[test]
    fn insight_log_is_csv() {
        let dir = data_dir();
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_engine_config(&file.path().to_path_buf()).unwrap();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let bars = cli::load_bars(&csv, &[Symbol::new("MS")]).unwrap();
        let outcome = cli::run_replay_pipeline(config, bars).unwrap();

        let mut buf = Vec::new();
        cli::write_insights(&outcome.insights, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("symbol,generated_at,expires_at,direction,weight,source")
        );
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("MS,2024-01-21"));
        assert!(rows[0].ends_with(",up,0.75,bootstrap"));
        assert!(rows[1].starts_with("HOOD,"));
    }
}

mod commands {
    use super::*;

    #[test]
    fn replay_command_writes_output_file() {
        let dir = data_dir();
        let file = write_temp_ini(VALID_INI);
        let out = dir.path().join("insights.csv");

        let cli = Cli::parse_from([
            "oraclefuse",
            "replay",
            "--config",
            file.path().to_str().unwrap(),
            "--data",
            dir.path().to_str().unwrap(),
            "--symbols",
            "MS,HOOD",
            "--seed-sessions",
            "30",
            "--output",
            out.to_str().unwrap(),
        ]);
        assert!(is_success(cli::run(cli)));

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("symbol,"));
        assert!(written.contains("HOOD,2024-01-31"));
    }

    #[test]
    fn validate_command_accepts_and_rejects() {
        let good = write_temp_ini(VALID_INI);
        let cli = Cli::parse_from([
            "oraclefuse",
            "validate",
            "--config",
            good.path().to_str().unwrap(),
        ]);
        assert!(is_success(cli::run(cli)));

        let bad = write_temp_ini("[indicators]\nema_fast = 300\nema_slow = 200\n");
        let cli = Cli::parse_from([
            "oraclefuse",
            "validate",
            "--config",
            bad.path().to_str().unwrap(),
        ]);
        assert!(!is_success(cli::run(cli)));
    }

    #[test]
    fn replay_without_data_fails() {
        let dir = TempDir::new().unwrap();
        let file = write_temp_ini(VALID_INI);
        let cli = Cli::parse_from([
            "oraclefuse",
            "replay",
            "--config",
            file.path().to_str().unwrap(),
            "--data",
            dir.path().to_str().unwrap(),
            "--symbols",
            "MS",
        ]);
        let code = cli::run(cli);
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(5)));
    }
}
