// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Monte Carlo Runner
// N runs with seeds base..base+N, aggregated as mean ± 95% CI

use herd_engine::*;
use log::info;
use std::path::Path;
use std::time::Instant;

use crate::report::*;
use crate::time_series::TimeSeriesRecorder;

/// Run one simulation to completion with a specific seed.
pub fn run_single(
    config: &SimConfig,
    params: &DecisionParams,
    seed: u64,
    time_series_dir: Option<&Path>,
) -> anyhow::Result<RunResult> {
    let start = Instant::now();
    let mut sim = Simulation::with_params(config.clone(), params.clone(), seed)?;
    let limit = sim.market().limit().to_f64();

    let mut recorder = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut blocked = [0u64; 3];

    while let Some(result) = sim.step() {
        blocked[0] += result.blocked_by_capacity as u64;
        blocked[1] += result.blocked_by_cooldown as u64;
        blocked[2] += result.blocked_by_rate_limit as u64;
        if let Some(rec) = recorder.as_mut() {
            rec.record(&result, limit);
        }
    }

    if let (Some(rec), Some(dir)) = (recorder, time_series_dir) {
        let path = dir.join(format!("{}-seed-{}.jsonl", sim.sphere().model().short_name(), seed));
        rec.write_jsonl(&path)?;
        info!("wrote {} tick snapshots to {}", rec.len(), path.display());
    }

    let stats = sim.stats();
    Ok(RunResult {
        seed,
        ticks: stats.tick,
        limit,
        in_market: stats.in_market,
        total_joins: stats.total_joins,
        total_leaves: stats.total_leaves,
        blocked_by_capacity: blocked[0],
        blocked_by_cooldown: blocked[1],
        blocked_by_rate_limit: blocked[2],
        summary: SeriesSummary::from_series(sim.series(), limit),
        elapsed_ms: start.elapsed().as_millis(),
        series: sim.series().to_vec(),
    })
}

pub fn run_monte_carlo(
    config: &SimConfig,
    params: &DecisionParams,
    n_runs: usize,
    base_seed: u64,
    time_series_dir: Option<&Path>,
) -> anyhow::Result<MonteCarloReport> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs as u64 {
        let seed = base_seed.wrapping_add(i);
        let result = run_single(config, params, seed, time_series_dir)?;
        info!(
            "run {}/{} seed={} final={:.3} drawdown={:.3}",
            i + 1,
            n_runs,
            seed,
            result.summary.final_total,
            result.summary.max_drawdown
        );
        results.push(result);
    }
    Ok(aggregate(config, base_seed, results))
}

pub fn aggregate(config: &SimConfig, base_seed: u64, results: Vec<RunResult>) -> MonteCarloReport {
    let stat = |f: fn(&RunResult) -> f64| {
        let samples: Vec<f64> = results.iter().map(f).collect();
        Stats::from_samples(&samples)
    };
    let final_total = stat(|r| r.summary.final_total);
    let peak = stat(|r| r.summary.peak);
    let trough = stat(|r| r.summary.trough);
    let max_drawdown = stat(|r| r.summary.max_drawdown);
    let max_run_up = stat(|r| r.summary.max_run_up);
    let drawdown_fraction = stat(|r| r.summary.drawdown_fraction);
    let run_up_fraction = stat(|r| r.summary.run_up_fraction);
    let elapsed_ms = stat(|r| r.elapsed_ms as f64);

    MonteCarloReport {
        model: config.topology.short_name(),
        size: config.size,
        timesteps: config.timesteps,
        herd: config.herd,
        prng: "ChaCha8Rng",
        base_seed,
        n_runs: results.len(),
        final_total,
        peak,
        trough,
        max_drawdown,
        max_run_up,
        drawdown_fraction,
        run_up_fraction,
        elapsed_ms,
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig::barabasi_albert(30, 10, 0.4, true)
    }

    #[test]
    fn test_run_single_matches_direct_run() {
        let cfg = config();
        let params = cfg.decision_params();
        let result = run_single(&cfg, &params, 4, None).unwrap();

        let mut sim = Simulation::with_params(cfg.clone(), params, 4).unwrap();
        assert_eq!(result.series, sim.run().to_vec());
        assert_eq!(result.ticks, 10);
    }

    #[test]
    fn test_monte_carlo_uses_consecutive_seeds() {
        let cfg = config();
        let params = cfg.decision_params();
        let report = run_monte_carlo(&cfg, &params, 3, 10, None).unwrap();
        let seeds: Vec<u64> = report.individual_runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12]);
        assert_eq!(report.final_total.n, 3);
        assert_eq!(report.model, "ba");
    }

    #[test]
    fn test_time_series_written_per_seed() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config();
        let params = cfg.decision_params();
        run_monte_carlo(&cfg, &params, 2, 0, Some(dir.path())).unwrap();
        for seed in 0..2 {
            let path = dir.path().join(format!("ba-seed-{}.jsonl", seed));
            let text = std::fs::read_to_string(path).unwrap();
            assert_eq!(text.lines().count(), 10);
        }
    }
}
