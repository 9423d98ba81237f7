// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Market Capacity

use serde::{Deserialize, Serialize};

use crate::investor::Investor;
use crate::shares::Shares;

/// Aggregate market state: shares currently held and the hard capacity.
///
/// `add` and `remove` are plain arithmetic. Admission policy lives with the
/// caller, which must consult [`Market::can_join`] before `add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    total_shares: Shares,
    limit: Shares,
}

impl Market {
    pub fn new(limit: Shares) -> Self {
        Self {
            total_shares: Shares::zero(),
            limit,
        }
    }

    /// Limit set to `fraction` of the population's total capacity.
    pub fn with_capacity_fraction(total_capacity: Shares, fraction: f64) -> Self {
        Self::new(total_capacity.scale(fraction))
    }

    pub fn total_shares(&self) -> Shares {
        self.total_shares
    }

    pub fn limit(&self) -> Shares {
        self.limit
    }

    pub fn remaining(&self) -> Shares {
        self.limit - self.total_shares
    }

    /// `total_shares / limit`, zero for a zero limit.
    pub fn fullness(&self) -> f64 {
        self.total_shares.ratio(self.limit)
    }

    pub fn can_join(&self, investor: &Investor) -> bool {
        self.remaining() >= investor.num_shares()
    }

    pub fn add(&mut self, investor: &Investor) {
        self.total_shares += investor.num_shares();
    }

    pub fn remove(&mut self, investor: &Investor) {
        self.total_shares -= investor.num_shares();
    }

    pub fn within_capacity(&self) -> bool {
        !self.total_shares.is_negative() && self.total_shares <= self.limit
    }
}
