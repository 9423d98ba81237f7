// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Series Metrics

use serde::Serialize;

/// Shape of a market-total series: where it started and ended, its
/// extremes, and the largest bubble and crash it went through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub initial: f64,
    pub final_total: f64,
    pub peak: f64,
    pub trough: f64,
    /// Largest rise from an earlier low to a later high.
    pub max_run_up: f64,
    /// Largest fall from an earlier high to a later low.
    pub max_drawdown: f64,
    /// `max_run_up / limit`, zero for a non-positive limit.
    pub run_up_fraction: f64,
    /// `max_drawdown / limit`, zero for a non-positive limit.
    pub drawdown_fraction: f64,
}

impl SeriesSummary {
    /// Summarises `series` against the market `limit`. An empty series
    /// yields all zeros.
    pub fn from_series(series: &[f64], limit: f64) -> Self {
        let (Some(&initial), Some(&final_total)) = (series.first(), series.last()) else {
            return Self::empty();
        };

        let mut peak = initial;
        let mut trough = initial;
        let mut running_high = initial;
        let mut running_low = initial;
        let mut max_run_up: f64 = 0.0;
        let mut max_drawdown: f64 = 0.0;

        for &value in &series[1..] {
            peak = peak.max(value);
            trough = trough.min(value);
            running_high = running_high.max(value);
            running_low = running_low.min(value);
            max_drawdown = max_drawdown.max(running_high - value);
            max_run_up = max_run_up.max(value - running_low);
        }

        let relative = |x: f64| if limit > 0.0 { x / limit } else { 0.0 };
        Self {
            initial,
            final_total,
            peak,
            trough,
            max_run_up,
            max_drawdown,
            run_up_fraction: relative(max_run_up),
            drawdown_fraction: relative(max_drawdown),
        }
    }

    fn empty() -> Self {
        Self {
            initial: 0.0,
            final_total: 0.0,
            peak: 0.0,
            trough: 0.0,
            max_run_up: 0.0,
            max_drawdown: 0.0,
            run_up_fraction: 0.0,
            drawdown_fraction: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_then_crash() {
        let s = SeriesSummary::from_series(&[10.0, 20.0, 40.0, 15.0, 25.0], 50.0);
        assert_eq!(s.initial, 10.0);
        assert_eq!(s.final_total, 25.0);
        assert_eq!(s.peak, 40.0);
        assert_eq!(s.trough, 10.0);
        assert_eq!(s.max_run_up, 30.0);
        assert_eq!(s.max_drawdown, 25.0);
        assert_eq!(s.run_up_fraction, 0.6);
        assert_eq!(s.drawdown_fraction, 0.5);
    }

    #[test]
    fn test_run_up_needs_earlier_low() {
        // Monotone fall: the only rise would go backwards in time.
        let s = SeriesSummary::from_series(&[9.0, 6.0, 3.0], 10.0);
        assert_eq!(s.max_run_up, 0.0);
        assert_eq!(s.max_drawdown, 6.0);
    }

    #[test]
    fn test_flat_and_empty() {
        let flat = SeriesSummary::from_series(&[4.0; 5], 0.0);
        assert_eq!(flat.max_drawdown, 0.0);
        assert_eq!(flat.drawdown_fraction, 0.0);
        assert_eq!(SeriesSummary::from_series(&[], 10.0), SeriesSummary::empty());
    }
}
