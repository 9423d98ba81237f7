// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Simulation Core

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::investor::{DecisionContext, Investor};
use crate::market::Market;
use crate::params::DecisionParams;
use crate::shares::Shares;
use crate::social_sphere::SocialSphere;
use crate::types::*;

/// Seed used when neither the caller nor the configuration names one.
pub const DEFAULT_SEED: u64 = 0;

// ─── Simulation struct ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) params: DecisionParams,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,

    pub(crate) sphere: SocialSphere,
    pub(crate) investors: Vec<Investor>,
    pub(crate) market: Market,

    /// Market total before the first tick, then one value per tick.
    pub(crate) series: Vec<f64>,
    pub(crate) current_tick: u64,
    pub(crate) total_joins: u64,
    pub(crate) total_leaves: u64,
}

// ─── Setup ──────────────────────────────────────────────────────────────────

impl Simulation {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        let params = config.decision_params();
        Self::with_params(config, params, seed)
    }

    /// Builds the whole world from one seed. Randomness is consumed in a
    /// fixed order: network, capacities, market limit, starting positions.
    pub fn with_params(
        config: SimConfig,
        params: DecisionParams,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        params.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sphere = SocialSphere::build(config.size, config.topology.clone(), &mut rng)?;

        let settled = params.settled_counter();
        let mut investors: Vec<Investor> = sphere
            .graph()
            .vertices()
            .into_iter()
            .map(|v| {
                let capacity = rng.gen::<f64>() * (sphere.degree(v) + 1) as f64;
                Investor::new(v, Shares::from_f64(capacity), settled)
            })
            .collect();

        let total_capacity: Shares = investors.iter().map(|i| i.num_shares()).sum();
        let mut market =
            Market::with_capacity_fraction(total_capacity, params.market_limit.draw(&mut rng));

        for investor in investors.iter_mut() {
            let wants_in = rng.gen::<f64>() <= config.investor_start;
            if wants_in && market.can_join(investor) {
                market.add(investor);
                investor.start_in_market();
            }
        }

        let initial = market.total_shares().to_f64();
        info!(
            "simulation ready: seed={} investors={} capacity={} limit={} initial_total={}",
            seed,
            investors.len(),
            total_capacity,
            market.limit(),
            market.total_shares()
        );

        Ok(Self {
            config,
            params,
            seed,
            rng,
            sphere,
            investors,
            market,
            series: vec![initial],
            current_tick: 0,
            total_joins: 0,
            total_leaves: 0,
        })
    }
}

// ─── Tick loop ──────────────────────────────────────────────────────────────

impl Simulation {
    /// One pass over every investor in ascending vertex order. Transitions
    /// apply immediately, so later investors see earlier moves of the same
    /// tick.
    pub fn tick_core(&mut self) -> TickResult {
        self.current_tick += 1;
        let budget = self.params.moves_per_tick(self.investors.len());
        let mut result = TickResult {
            tick: self.current_tick,
            total_shares: 0.0,
            in_market: 0,
            joins: 0,
            leaves: 0,
            blocked_by_capacity: 0,
            blocked_by_cooldown: 0,
            blocked_by_rate_limit: 0,
        };

        for idx in 0..self.investors.len() {
            let (joining, success) = self.draw_decision(idx);
            let investor = &self.investors[idx];

            if !success {
                self.investors[idx].stay();
                continue;
            }
            if investor.is_cooling_down(self.params.cooldown) {
                result.blocked_by_cooldown += 1;
                self.investors[idx].stay();
                continue;
            }

            if joining {
                if result.joins >= budget {
                    result.blocked_by_rate_limit += 1;
                    self.investors[idx].stay();
                } else if !self.market.can_join(investor) {
                    result.blocked_by_capacity += 1;
                    self.investors[idx].stay();
                } else {
                    self.market.add(investor);
                    self.investors[idx].join();
                    result.joins += 1;
                }
            } else if result.leaves >= budget {
                result.blocked_by_rate_limit += 1;
                self.investors[idx].stay();
            } else {
                self.market.remove(investor);
                self.investors[idx].leave();
                result.leaves += 1;
            }
        }

        debug_assert!(self.market.within_capacity());

        self.total_joins += result.joins as u64;
        self.total_leaves += result.leaves as u64;
        result.total_shares = self.market.total_shares().to_f64();
        result.in_market = self.in_market_count();
        self.series.push(result.total_shares);

        debug!(
            "tick {}: total={} in_market={} joins={} leaves={} blocked(cap={}, cool={}, rate={})",
            result.tick,
            result.total_shares,
            result.in_market,
            result.joins,
            result.leaves,
            result.blocked_by_capacity,
            result.blocked_by_cooldown,
            result.blocked_by_rate_limit
        );
        result
    }

    /// Shapes the relevant probability for investor `idx` and samples it.
    /// Returns `(is_join_decision, bernoulli_success)`. Every investor
    /// consumes its draws every tick, cooling down or not.
    fn draw_decision(&mut self, idx: usize) -> (bool, bool) {
        let ctx = DecisionContext {
            sphere: &self.sphere,
            investors: &self.investors,
            market: &self.market,
            series: &self.series,
            params: &self.params,
            herd: self.config.herd,
        };
        let investor = &self.investors[idx];
        let joining = !investor.in_market();
        let p = if joining {
            investor.probability_to_join(&ctx, &mut self.rng)
        } else {
            investor.probability_to_leave(&ctx, &mut self.rng)
        };
        let success = self.rng.gen::<f64>() < p;
        (joining, success)
    }

    /// Advances one tick unless the configured `timesteps` are done.
    pub fn step(&mut self) -> Option<TickResult> {
        if self.is_finished() {
            return None;
        }
        Some(self.tick_core())
    }

    /// Runs the remaining configured ticks and returns the full series.
    pub fn run(&mut self) -> &[f64] {
        while self.step().is_some() {}
        info!(
            "run finished: ticks={} final_total={} joins={} leaves={}",
            self.current_tick,
            self.market.total_shares(),
            self.total_joins,
            self.total_leaves
        );
        &self.series
    }

    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.config.timesteps
    }
}

// ─── Accessors ──────────────────────────────────────────────────────────────

impl Simulation {
    pub fn series(&self) -> &[f64] {
        &self.series
    }

    pub fn investors(&self) -> &[Investor] {
        &self.investors
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn sphere(&self) -> &SocialSphere {
        &self.sphere
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn params(&self) -> &DecisionParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn in_market_count(&self) -> usize {
        self.investors.iter().filter(|i| i.in_market()).count()
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            tick: self.current_tick,
            population: self.investors.len(),
            limit: self.market.limit().to_f64(),
            total_shares: self.market.total_shares().to_f64(),
            fullness: self.market.fullness(),
            in_market: self.in_market_count(),
            total_joins: self.total_joins,
            total_leaves: self.total_leaves,
        }
    }

    pub fn investor_snapshots(&self) -> Vec<InvestorSnapshot> {
        self.investors
            .iter()
            .map(|i| InvestorSnapshot {
                label: self
                    .sphere
                    .graph()
                    .label(i.vertex())
                    .unwrap_or_default()
                    .to_string(),
                degree: self.sphere.degree(i.vertex()),
                num_shares: i.num_shares().to_f64(),
                position: i.position(),
                ticks_since_last_change: i.ticks_since_last_change(),
                times_joined: i.times_joined(),
                times_left: i.times_left(),
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
