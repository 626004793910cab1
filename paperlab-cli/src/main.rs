//! PaperLab CLI: replay candles through the indicator engine.
//!
//! Commands:
//! - `replay`: stream one or more CSV files, one engine per file
//! - `synthetic`: generate seeded random walks and replay them
//! - `config`: print the default configuration as TOML

mod feed;
mod replay;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use paperlab_core::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::feed::{load_csv, synthetic, Feed};
use crate::replay::{replay_all, ReplayReport};

#[derive(Parser)]
#[command(
    name = "paperlab",
    version,
    about = "PaperLab CLI: Laguerre RSI, trend classifiers and composite signals over candle feeds"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every replaying command.
#[derive(Args)]
struct ReplayOptions {
    /// Path to a TOML engine config. Missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instrument tick size, used for marker offsets.
    #[arg(long, default_value_t = 0.25)]
    tick_size: f64,

    /// Print events as JSON lines instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay CSV files (columns: time,open,high,low,close).
    Replay {
        /// CSV files; each file is one instrument named after its stem.
        #[arg(long = "csv", required = true, num_args = 1..)]
        csv: Vec<PathBuf>,

        #[command(flatten)]
        options: ReplayOptions,
    },
    /// Generate seeded random-walk candles and replay them.
    Synthetic {
        /// Number of one-minute bars per symbol.
        #[arg(long, default_value_t = 1000)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Symbols to generate.
        #[arg(long, default_values_t = vec!["SYNTH".to_string()], num_args = 1..)]
        symbols: Vec<String>,

        /// First bar time (YYYY-MM-DD).
        #[arg(long, default_value = "2024-01-02")]
        start: String,

        #[command(flatten)]
        options: ReplayOptions,
    },
    /// Print the default engine configuration as TOML.
    Config,
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so JSON output on stdout stays machine-readable.
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Replay { csv, options } => {
            let feeds = csv
                .iter()
                .map(|path| load_csv(path).with_context(|| format!("loading {}", path.display())))
                .collect::<Result<Vec<_>>>()?;
            run_replay(&feeds, &options)
        }
        Commands::Synthetic {
            bars,
            seed,
            symbols,
            start,
            options,
        } => {
            let start = parse_start(&start)?;
            let feeds: Vec<Feed> = symbols
                .iter()
                .map(|s| synthetic(s, bars, seed, start))
                .collect();
            info!(bars, seed, symbols = symbols.len(), "generated synthetic feeds");
            run_replay(&feeds, &options)
        }
        Commands::Config => {
            print!("{}", EngineConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn parse_start(value: &str) -> Result<NaiveDateTime> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("invalid start date '{value}'"))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    EngineConfig::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn run_replay(feeds: &[Feed], options: &ReplayOptions) -> Result<()> {
    let config = load_config(options.config.as_deref())?;
    info!(
        fingerprint = %config.fingerprint()?,
        feeds = feeds.len(),
        timing = ?config.alerts.timing,
        "starting replay"
    );

    let reports = replay_all(feeds, &config, options.tick_size)?;
    print_reports(&reports, options.json)
}

fn print_reports(reports: &[ReplayReport], json: bool) -> Result<()> {
    for report in reports {
        for event in &report.events {
            if json {
                println!("{}", serde_json::to_string(event)?);
            } else {
                println!("{}", event.to_line());
            }
        }
    }
    if !json {
        println!();
        println!("{:<10} {:>8} {:>8}", "Symbol", "Bars", "Events");
        println!("{}", "-".repeat(28));
        for report in reports {
            println!(
                "{:<10} {:>8} {:>8}",
                report.symbol,
                report.bars,
                report.events.len()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_replay_arguments() {
        let cli = Cli::try_parse_from([
            "paperlab", "replay", "--csv", "a.csv", "b.csv", "--tick-size", "0.01", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay { csv, options } => {
                assert_eq!(csv, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
                assert_eq!(options.tick_size, 0.01);
                assert!(options.json);
                assert!(options.config.is_none());
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn replay_requires_a_file() {
        assert!(Cli::try_parse_from(["paperlab", "replay"]).is_err());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "[ma_cloud]\nfast_period = 5\nslow_period = 13\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.ma_cloud.fast_period, 5);
        assert_eq!(config.ma_cloud.slow_period, 13);
        assert_eq!(config.adx, EngineConfig::default().adx);

        std::fs::write(&path, "[ma_cloud]\nfast_period = 30\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn start_date_parses() {
        assert_eq!(
            parse_start("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(parse_start("02/01/2024").is_err());
    }
}
