// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Run Report Types

use herd_engine::SeriesSummary;
use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub seed: u64,
    pub ticks: u64,
    pub limit: f64,
    pub in_market: usize,
    pub total_joins: u64,
    pub total_leaves: u64,
    pub blocked_by_capacity: u64,
    pub blocked_by_cooldown: u64,
    pub blocked_by_rate_limit: u64,
    pub summary: SeriesSummary,
    pub elapsed_ms: u128,
    #[serde(skip)]
    pub series: Vec<f64>,
}

// ─── Monte Carlo Report ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub model: &'static str,
    pub size: usize,
    pub timesteps: u64,
    pub herd: bool,
    pub prng: &'static str,
    pub base_seed: u64,
    pub n_runs: usize,
    pub final_total: Stats,
    pub peak: Stats,
    pub trough: Stats,
    pub max_drawdown: Stats,
    pub max_run_up: Stats,
    pub drawdown_fraction: Stats,
    pub run_up_fraction: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<RunResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_samples() {
        let s = Stats::from_samples(&[2.0, 4.0, 6.0]);
        assert_eq!(s.n, 3);
        assert!((s.mean - 4.0).abs() < 1e-12);
        assert!((s.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 6.0);
        assert!(s.ci_lower < s.mean && s.mean < s.ci_upper);
    }

    #[test]
    fn test_stats_single_and_empty() {
        let one = Stats::from_samples(&[5.0]);
        assert_eq!(one.std_dev, 0.0);
        assert_eq!(one.ci_lower, 5.0);
        assert_eq!(Stats::from_samples(&[]).n, 0);
    }
}
