// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Decision Parameters

//! Tunable literals of the investor decision model.
//!
//! Every influence weight is drawn from a band rather than fixed, so the
//! strength of each factor varies from decision to decision. The defaults
//! are the empirically chosen bands of the reference model.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Closed-open interval `[low, high)` a weight is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Uniform draw from the band. A degenerate band returns `low` without
    /// consuming randomness.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.high > self.low {
            rng.gen_range(self.low..self.high)
        } else {
            self.low
        }
    }

    fn validate_unit(&self, name: &str) -> Result<(), ConfigError> {
        let ok = self.low.is_finite()
            && self.high.is_finite()
            && (0.0..=1.0).contains(&self.low)
            && (0.0..=1.0).contains(&self.high)
            && self.low <= self.high;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                name,
                &format!("{}..{}", self.low, self.high),
                "band must satisfy 0 <= low <= high <= 1",
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    /// Intrinsic propensity before any evidence is applied.
    pub baseline: Band,
    /// A neighbour is a hub when its degree exceeds this multiple of the
    /// population's average degree.
    pub hub_multiple: f64,
    pub hub_weight: Band,
    /// Scaled by `degree / largest_degree` for ordinary neighbours.
    pub peer_weight: Band,
    /// A neighbour that changed state fewer than this many ticks ago counts
    /// as a recent mover.
    pub recency_window: u32,
    pub recency_weight: Band,
    /// Fraction of the limit above which the market counts as crowded.
    pub capacity_threshold: Band,
    /// Scaled by `total_shares / limit`.
    pub capacity_weight: Band,
    /// Scaled by `|trend| / limit`, capped at 1.
    pub trend_weight: Band,
    /// Applied to join decisions of investors that have left before.
    pub scar_weight: Band,
    /// Ticks an investor must hold a state before it may change again.
    pub cooldown: u32,
    /// Per-tick cap on joins, and separately on leaves, as a fraction of
    /// the population.
    pub rate_limit: f64,
    /// Market limit as a fraction of total investor capacity.
    pub market_limit: Band,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            baseline: Band::new(0.01, 0.10),
            hub_multiple: 2.0,
            hub_weight: Band::new(0.70, 0.90),
            peer_weight: Band::new(0.30, 0.60),
            recency_window: 3,
            recency_weight: Band::new(0.50, 0.80),
            capacity_threshold: Band::new(0.75, 0.95),
            capacity_weight: Band::new(0.50, 0.90),
            trend_weight: Band::new(0.30, 0.60),
            scar_weight: Band::new(0.60, 0.90),
            cooldown: 3,
            rate_limit: 0.05,
            market_limit: Band::new(0.60, 0.90),
        }
    }
}

impl DecisionParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.baseline.validate_unit("baseline")?;
        self.hub_weight.validate_unit("hub_weight")?;
        self.peer_weight.validate_unit("peer_weight")?;
        self.recency_weight.validate_unit("recency_weight")?;
        self.capacity_threshold.validate_unit("capacity_threshold")?;
        self.capacity_weight.validate_unit("capacity_weight")?;
        self.trend_weight.validate_unit("trend_weight")?;
        self.scar_weight.validate_unit("scar_weight")?;
        self.market_limit.validate_unit("market_limit")?;
        if !(self.hub_multiple.is_finite() && self.hub_multiple >= 0.0) {
            return Err(ConfigError::invalid(
                "hub_multiple",
                &self.hub_multiple.to_string(),
                "must be a non-negative number",
            ));
        }
        if !(self.rate_limit > 0.0 && self.rate_limit <= 1.0) {
            return Err(ConfigError::invalid(
                "rate_limit",
                &self.rate_limit.to_string(),
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Maximum joins (and, separately, leaves) allowed in one tick.
    pub fn moves_per_tick(&self, population: usize) -> usize {
        ((self.rate_limit * population as f64).ceil() as usize).max(1)
    }

    /// Counter value given to investors at setup so their initial state is
    /// neither cooling down nor mistaken for a recent move.
    pub fn settled_counter(&self) -> u32 {
        self.cooldown.max(self.recency_window)
    }
}
