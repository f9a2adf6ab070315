//! Money type for representing monetary values.
//!
//! Uses pence-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. All prices in
//! the system are in pounds sterling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in integer pence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in pence.
    pence: i64,
}

impl Money {
    /// Create a Money value from pence.
    pub fn from_pence(pence: i64) -> Self {
        Self { pence }
    }

    /// Create a Money value from a decimal pound amount.
    ///
    /// ```
    /// use parana_commerce::money::Money;
    /// let price = Money::from_pounds(5.00);
    /// assert_eq!(price.pence(), 500);
    /// ```
    pub fn from_pounds(pounds: f64) -> Self {
        Self {
            pence: (pounds * 100.0).round() as i64,
        }
    }

    /// A zero amount.
    pub fn zero() -> Self {
        Self { pence: 0 }
    }

    /// Get the amount in pence.
    pub fn pence(&self) -> i64 {
        self.pence
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.pence == 0
    }

    /// Convert to a decimal pound value.
    pub fn to_pounds(&self) -> f64 {
        self.pence as f64 / 100.0
    }

    /// Try to add another amount, returning `None` on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.pence.checked_add(other.pence).map(Money::from_pence)
    }

    /// Try to multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.pence.checked_mul(factor).map(Money::from_pence)
    }

    /// Try to sum an iterator of amounts, returning `None` on overflow.
    pub fn try_sum<'a>(iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        let mut total = Money::zero();
        for m in iter {
            total = total.try_add(m)?;
        }
        Some(total)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.pence < 0 { "-" } else { "" };
        let abs = self.pence.unsigned_abs();
        write!(f, "{}\u{00a3}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
