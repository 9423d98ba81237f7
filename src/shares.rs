// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Share Quantities

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Decimal places kept when a capacity is converted from a random draw.
pub const SHARE_SCALE: u32 = 6;

/// A share quantity backed by `rust_decimal::Decimal`.
///
/// Market totals are sums and differences of these values; decimal
/// arithmetic keeps a join followed by a leave exactly neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Shares(pub Decimal);

impl Shares {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Lossy conversion from a float draw, rounded to [`SHARE_SCALE`] places.
    /// Non-finite input becomes zero.
    pub fn from_f64(v: f64) -> Self {
        Self(
            Decimal::from_f64(v)
                .map(|d| d.round_dp(SHARE_SCALE))
                .unwrap_or(Decimal::ZERO),
        )
    }

    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Scales by a float fraction, rounded to [`SHARE_SCALE`] places.
    pub fn scale(self, fraction: f64) -> Self {
        let factor = Decimal::from_f64(fraction).unwrap_or(Decimal::ZERO);
        Self((self.0 * factor).round_dp(SHARE_SCALE))
    }

    /// `self / other` as a float; zero when `other` is zero.
    pub fn ratio(self, other: Shares) -> f64 {
        if other.is_zero() {
            0.0
        } else {
            (self.0 / other.0).to_f64().unwrap_or(0.0)
        }
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Shares {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Shares {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Shares {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Shares {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Shares {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, s| acc + s)
    }
}

impl<'a> Sum<&'a Shares> for Shares {
    fn sum<I: Iterator<Item = &'a Shares>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, s| acc + *s)
    }
}
