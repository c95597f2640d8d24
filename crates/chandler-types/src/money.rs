//! Money and totals.
//!
//! Amounts are integer minor units (cents). Tax arithmetic rounds down
//! per line, so repeated recomputation over unchanged contents is
//! bit-identical.

use serde::{Deserialize, Serialize};

/// An amount in minor currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Multiply by a quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * i64::from(quantity))
    }

    /// Apply a rate in basis points, rounding down.
    pub fn at_rate_bps(self, bps: u32) -> Money {
        Money(self.0 * i64::from(bps) / 10_000)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Totals breakdown for a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Total number of units across all line items.
    pub items_count: u32,
    /// Sum of line prices before tax.
    pub subtotal: Money,
    /// Tax across taxable lines.
    pub tax: Money,
    /// Subtotal plus tax.
    pub total: Money,
}

impl Totals {
    /// Totals with every field zeroed.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
