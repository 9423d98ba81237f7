// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Command Line Runner
//
// Usage:
//   herd run.cfg                                  # One run, CSV row to stdout
//   herd run.cfg --seed 42 --out result.csv       # Fixed seed, CSV to file
//   herd run.cfg --runs 30 --report report.json   # Monte Carlo with summary stats
//   herd run.cfg --time-series ts/                # Per-tick JSONL snapshots
//
// Set RUST_LOG=info (or debug for per-tick lines) to see progress.

mod monte_carlo;
mod report;
mod time_series;

use anyhow::Context;
use clap::Parser;
use herd_engine::output::write_csv_rows;
use herd_engine::{DecisionParams, SimConfig, DEFAULT_SEED};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

/// Stock-market participation simulation over a social network
#[derive(Parser, Debug)]
#[command(name = "herd")]
#[command(version)]
struct Args {
    /// Configuration file in key=value form
    config: PathBuf,

    /// Base seed; overrides the configuration's `seed` key
    #[arg(long)]
    seed: Option<u64>,

    /// Number of runs, seeded base..base+runs
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// CSV output file (stdout when omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file with decision-model parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Directory for per-tick JSONL snapshots
    #[arg(long = "time-series")]
    time_series: Option<PathBuf>,

    /// Write aggregated statistics as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn load_params(config: &SimConfig, path: Option<&Path>) -> anyhow::Result<DecisionParams> {
    let base = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading parameters from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing parameters in {}", path.display()))?
        }
        None => DecisionParams::default(),
    };
    Ok(config.apply_overrides(base))
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimConfig::load(&args.config)
        .with_context(|| format!("loading configuration {}", args.config.display()))?;
    let params = load_params(&config, args.params.as_deref())?;
    let seed = args.seed.or(config.seed).unwrap_or(DEFAULT_SEED);
    anyhow::ensure!(args.runs > 0, "--runs must be at least 1");

    info!(
        "herd: model={} size={} timesteps={} herd={} runs={} seed={}",
        config.topology.short_name(),
        config.size,
        config.timesteps,
        config.herd,
        args.runs,
        seed
    );

    let report = monte_carlo::run_monte_carlo(
        &config,
        &params,
        args.runs,
        seed,
        args.time_series.as_deref(),
    )?;

    let rows: Vec<&[f64]> = report
        .individual_runs
        .iter()
        .map(|r| r.series.as_slice())
        .collect();
    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_csv_rows(&mut writer, &rows)?;
            writer.flush()?;
            info!("wrote {} row(s) to {}", rows.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_csv_rows(&mut lock, &rows)?;
            lock.flush()?;
        }
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    if args.runs > 1 {
        eprintln!(
            "  {} runs | final {:.3} ± {:.3} | drawdown {:.3} | run-up {:.3}",
            report.n_runs,
            report.final_total.mean,
            report.final_total.std_dev,
            report.max_drawdown.mean,
            report.max_run_up.mean
        );
    }

    Ok(())
}
