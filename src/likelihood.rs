// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Probability Shaping

/// A probability shaped by successive pulls toward 0 or 1.
///
/// Both pulls are convex combinations of the current value with an endpoint,
/// so the value stays in [0, 1] for any weight in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Likelihood(f64);

impl Likelihood {
    pub fn new(p: f64) -> Self {
        Self(p.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `p ← p + a·(1−p)`
    pub fn toward_one(&mut self, a: f64) {
        let a = weight(a);
        self.0 += a * (1.0 - self.0);
    }

    /// `p ← p − a·p`
    pub fn toward_zero(&mut self, a: f64) {
        let a = weight(a);
        self.0 -= a * self.0;
    }

    pub fn toward(&mut self, up: bool, a: f64) {
        if up {
            self.toward_one(a);
        } else {
            self.toward_zero(a);
        }
    }
}

fn weight(a: f64) -> f64 {
    if a.is_nan() {
        0.0
    } else {
        a.clamp(0.0, 1.0)
    }
}
