//! TMI CLI — build the composite index, or probe a single symbol.
//!
//! Commands:
//! - `build` — fetch the configured basket from Yahoo Finance over the
//!   lookback window, aggregate, and write the CSV artifact
//! - `probe` — fetch one symbol and report its coverage (diagnostic)

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tmi_core::clock::{lookback_window, Clock, FixedClock, SystemClock};
use tmi_core::config::IndexConfig;
use tmi_core::data::{DataProvider, StdoutProgress, YahooProvider};
use tmi_core::pipeline::build_index;

#[derive(Parser)]
#[command(name = "tmi", about = "TMI — synthetic Total Market Index builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the basket, aggregate, and write the composite CSV.
    Build {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the basket symbols (e.g., ES=F NQ=F RTY=F YM=F).
        #[arg(long, num_args = 1..)]
        symbols: Option<Vec<String>>,

        /// Override the output CSV path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fixed day-count window instead of the trailing calendar year.
        #[arg(long)]
        lookback_days: Option<i64>,

        /// Pin the window end (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
    /// Fetch one symbol over the lookback window and report coverage.
    Probe {
        /// Symbol to fetch (e.g., ES=F).
        symbol: String,

        /// Fixed day-count window instead of the trailing calendar year.
        #[arg(long)]
        lookback_days: Option<i64>,

        /// Pin the window end (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            symbols,
            output,
            lookback_days,
            end,
        } => run_build(config, symbols, output, lookback_days, end),
        Commands::Probe {
            symbol,
            lookback_days,
            end,
        } => run_probe(&symbol, lookback_days, end),
    }
}

/// Clock for a run: pinned to `--end` when given, wall clock otherwise.
fn resolve_clock(end: Option<String>) -> Result<Box<dyn Clock>> {
    match end {
        Some(s) => {
            let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")?;
            Ok(Box::new(FixedClock(date)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn run_build(
    config_path: Option<PathBuf>,
    symbols: Option<Vec<String>>,
    output: Option<PathBuf>,
    lookback_days: Option<i64>,
    end: Option<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => IndexConfig::from_file(&path)?,
        None => IndexConfig::default(),
    };

    if let Some(symbols) = symbols {
        if config.weights.is_some() {
            bail!("--symbols cannot override a config with explicit weights");
        }
        config.symbols = symbols;
    }
    if let Some(output) = output {
        config.output = output;
    }
    if let Some(days) = lookback_days {
        config.lookback_days = Some(days);
    }
    config.validate()?;

    let clock = resolve_clock(end)?;
    let provider = YahooProvider::new();
    let report = build_index(&config, &provider, clock.as_ref(), &StdoutProgress)?;

    println!();
    println!("=== {} ===", report.index);
    println!("Window:           {} to {}", report.start, report.end);
    for (symbol, count) in &report.bar_counts {
        println!("{symbol:<10} {count} bars");
    }
    println!("Aligned sessions: {}", report.rows);

    if report.is_empty() {
        eprintln!(
            "WARNING: no common trading dates across the basket — wrote a header-only artifact"
        );
    }
    println!("{} CSV saved to {}", report.index, report.output.display());

    Ok(())
}

fn run_probe(symbol: &str, lookback_days: Option<i64>, end: Option<String>) -> Result<()> {
    let clock = resolve_clock(end)?;
    let (start, end) = lookback_window(clock.as_ref(), lookback_days);
    let provider = YahooProvider::new();

    println!("Probing {symbol} via {} ({start} to {end})...", provider.name());
    let bars = provider.fetch(symbol, start, end)?;

    // fetch never returns an empty Vec; NoData surfaces as an error above.
    let first = bars.first().map(|b| b.date.to_string()).unwrap_or_default();
    let last = bars.last().map(|b| b.date.to_string()).unwrap_or_default();
    let incomplete = bars.iter().filter(|b| !b.is_complete()).count();

    println!("{symbol}: {} bars, {first} to {last}", bars.len());
    if incomplete > 0 {
        println!("  {incomplete} bars have missing fields and will be dropped by alignment");
    }

    Ok(())
}
