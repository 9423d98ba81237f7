// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Investor Decision Model

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::VertexId;
use crate::likelihood::Likelihood;
use crate::market::Market;
use crate::params::DecisionParams;
use crate::shares::Shares;
use crate::social_sphere::SocialSphere;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPosition {
    OutOfMarket,
    InMarket,
}

/// Which decision is being shaped. Factors that favour entering the market
/// push a join decision up and a leave decision down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Join,
    Leave,
}

impl Decision {
    /// Pull direction for evidence that favours (`true`) or disfavours
    /// entering the market.
    fn pull_up(self, favours_entry: bool) -> bool {
        match self {
            Decision::Join => favours_entry,
            Decision::Leave => !favours_entry,
        }
    }
}

/// Read-only view of the world an investor decides against.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub sphere: &'a SocialSphere,
    /// Indexed by vertex: `investors[v.0]` sits on vertex `v`.
    pub investors: &'a [Investor],
    pub market: &'a Market,
    /// Market totals recorded so far, initial value first.
    pub series: &'a [f64],
    pub params: &'a DecisionParams,
    pub herd: bool,
}

impl DecisionContext<'_> {
    fn previous_total(&self) -> f64 {
        self.series
            .last()
            .copied()
            .unwrap_or_else(|| self.market.total_shares().to_f64())
    }

    fn trend(&self) -> f64 {
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

// ─── Investor ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    vertex: VertexId,
    num_shares: Shares,
    in_market: bool,
    started_in_market: bool,
    history: Vec<bool>,
    ticks_since_last_change: u32,
    times_left: u32,
    times_joined: u32,
}

impl Investor {
    /// An investor outside the market. `settled_counter` seeds the
    /// ticks-since-change counter.
    pub fn new(vertex: VertexId, num_shares: Shares, settled_counter: u32) -> Self {
        Self {
            vertex,
            num_shares,
            in_market: false,
            started_in_market: false,
            history: Vec::new(),
            ticks_since_last_change: settled_counter,
            times_left: 0,
            times_joined: 0,
        }
    }

    /// Places the investor in the market at setup. Not a transition.
    pub fn start_in_market(&mut self) {
        self.in_market = true;
        self.started_in_market = true;
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    pub fn num_shares(&self) -> Shares {
        self.num_shares
    }

    pub fn in_market(&self) -> bool {
        self.in_market
    }

    pub fn position(&self) -> MarketPosition {
        if self.in_market {
            MarketPosition::InMarket
        } else {
            MarketPosition::OutOfMarket
        }
    }

    pub fn started_in_market(&self) -> bool {
        self.started_in_market
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn ticks_since_last_change(&self) -> u32 {
        self.ticks_since_last_change
    }

    pub fn times_left(&self) -> u32 {
        self.times_left
    }

    pub fn times_joined(&self) -> u32 {
        self.times_joined
    }

    pub fn has_moved(&self) -> bool {
        self.times_joined + self.times_left > 0
    }

    pub fn is_cooling_down(&self, cooldown: u32) -> bool {
        self.ticks_since_last_change < cooldown
    }

    pub fn recently_joined(&self, window: u32) -> bool {
        self.has_moved() && self.in_market && self.ticks_since_last_change < window
    }

    pub fn recently_left(&self, window: u32) -> bool {
        self.has_moved() && !self.in_market && self.ticks_since_last_change < window
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    pub fn join(&mut self) {
        self.in_market = true;
        self.history.push(true);
        self.ticks_since_last_change = 0;
        self.times_joined += 1;
    }

    pub fn leave(&mut self) {
        self.in_market = false;
        self.history.push(false);
        self.ticks_since_last_change = 0;
        self.times_left += 1;
    }

    pub fn stay(&mut self) {
        self.history.push(self.in_market);
        self.ticks_since_last_change = self.ticks_since_last_change.saturating_add(1);
    }

    // ─── Decision model ─────────────────────────────────────────────────────

    /// Chance that this investor, currently out of the market, enters it.
    pub fn probability_to_join<R: Rng + ?Sized>(
        &self,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) -> f64 {
        let mut p = self.shape(Decision::Join, ctx, rng);
        if self.times_left > 0 {
            p.toward_zero(ctx.params.scar_weight.draw(rng));
        }
        p.value()
    }

    /// Chance that this investor, currently in the market, exits it.
    pub fn probability_to_leave<R: Rng + ?Sized>(
        &self,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) -> f64 {
        self.shape(Decision::Leave, ctx, rng).value()
    }

    fn shape<R: Rng + ?Sized>(
        &self,
        decision: Decision,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) -> Likelihood {
        let mut p = Likelihood::new(ctx.params.baseline.draw(rng));
        if ctx.herd {
            self.apply_peer_influence(&mut p, decision, ctx, rng);
            self.apply_peer_recency(&mut p, decision, ctx, rng);
        }
        apply_capacity_pressure(&mut p, decision, ctx, rng);
        apply_trend(&mut p, decision, ctx, rng);
        p
    }

    fn apply_peer_influence<R: Rng + ?Sized>(
        &self,
        p: &mut Likelihood,
        decision: Decision,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) {
        let params = ctx.params;
        let hub_floor = params.hub_multiple * ctx.sphere.average_degree();
        let largest = ctx.sphere.largest_degree().max(1) as f64;

        for neighbor in ctx.sphere.connections(self.vertex) {
            let Some(peer) = ctx.investors.get(neighbor.index()) else {
                continue;
            };
            let degree = ctx.sphere.degree(neighbor) as f64;
            let a = if degree > hub_floor {
                params.hub_weight.draw(rng)
            } else {
                degree / largest * params.peer_weight.draw(rng)
            };
            p.toward(decision.pull_up(peer.in_market), a);
        }
    }

    fn apply_peer_recency<R: Rng + ?Sized>(
        &self,
        p: &mut Likelihood,
        decision: Decision,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) {
        let window = ctx.params.recency_window;
        for neighbor in ctx.sphere.connections(self.vertex) {
            let Some(peer) = ctx.investors.get(neighbor.index()) else {
                continue;
            };
            if peer.recently_joined(window) {
                p.toward(decision.pull_up(true), ctx.params.recency_weight.draw(rng));
            } else if peer.recently_left(window) {
                p.toward(decision.pull_up(false), ctx.params.recency_weight.draw(rng));
            }
        }
    }
}

fn apply_capacity_pressure<R: Rng + ?Sized>(
    p: &mut Likelihood,
    decision: Decision,
    ctx: &DecisionContext<'_>,
    rng: &mut R,
) {
    let limit = ctx.market.limit().to_f64();
    let threshold = ctx.params.capacity_threshold.draw(rng);
    if limit <= 0.0 || ctx.previous_total() < threshold * limit {
        return;
    }
    let a = ctx.market.fullness() * ctx.params.capacity_weight.draw(rng);
    p.toward(decision.pull_up(false), a);
}

fn apply_trend<R: Rng + ?Sized>(
    p: &mut Likelihood,
    decision: Decision,
    ctx: &DecisionContext<'_>,
    rng: &mut R,
) {
    let limit = ctx.market.limit().to_f64();
    let delta = ctx.trend();
    if limit <= 0.0 || delta == 0.0 {
        return;
    }
    let magnitude = (delta.abs() / limit).min(1.0);
    let a = magnitude * ctx.params.trend_weight.draw(rng);
    p.toward(decision.pull_up(delta > 0.0), a);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
