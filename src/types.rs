// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Result Types

use serde::{Deserialize, Serialize};

use crate::investor::MarketPosition;

// ─── Tick Result ────────────────────────────────────────────────────────────

/// What happened during one pass over the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick: u64,
    pub total_shares: f64,
    pub in_market: usize,
    pub joins: usize,
    pub leaves: usize,
    /// Successful join draws refused because the market lacked room.
    pub blocked_by_capacity: usize,
    /// Successful draws refused because the investor moved too recently.
    pub blocked_by_cooldown: usize,
    /// Successful draws refused because the tick's move budget was spent.
    pub blocked_by_rate_limit: usize,
}

// ─── Snapshots ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub tick: u64,
    pub population: usize,
    pub limit: f64,
    pub total_shares: f64,
    pub fullness: f64,
    pub in_market: usize,
    pub total_joins: u64,
    pub total_leaves: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorSnapshot {
    pub label: String,
    pub degree: usize,
    pub num_shares: f64,
    pub position: MarketPosition,
    pub ticks_since_last_change: u32,
    pub times_joined: u32,
    pub times_left: u32,
}
