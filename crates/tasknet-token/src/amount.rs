//! Exact token amount representation.
//!
//! Amounts are unsigned base units. All arithmetic is checked or
//! saturating; there is no floating point and no silent wraparound.
//! Anything that would underflow or overflow is surfaced to the caller
//! as `None` and turned into an error at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero units.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u64::MAX);

    /// Create an amount from base units.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Get the amount in base units.
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Checked multiplication by a unit count.
    #[must_use]
    pub const fn checked_mul(&self, count: u64) -> Option<Self> {
        match self.0.checked_mul(count) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_roundtrip() {
        let amount = Amount::from_units(42);
        assert_eq!(amount.units(), 42);
    }

    #[test]
    fn test_zero() {
        assert!(Amount::ZERO.is_zero());
        assert_eq!(Amount::ZERO.units(), 0);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn test_checked_add() {
        let a = Amount::from_units(1);
        let b = Amount::from_units(2);
        assert_eq!(a.checked_add(b), Some(Amount::from_units(3)));
        assert_eq!(Amount::MAX.checked_add(a), None);
    }

    #[test]
    fn test_checked_sub() {
        let a = Amount::from_units(3);
        let b = Amount::from_units(1);
        assert_eq!(a.checked_sub(b), Some(Amount::from_units(2)));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_checked_mul() {
        let price = Amount::from_units(7);
        assert_eq!(price.checked_mul(3), Some(Amount::from_units(21)));
        assert_eq!(Amount::MAX.checked_mul(2), None);
    }

    #[test]
    fn test_saturating_add() {
        let c = Amount::MAX.saturating_add(Amount::from_units(1));
        assert_eq!(c, Amount::MAX);
    }

    #[test]
    fn test_saturating_sub() {
        let c = Amount::from_units(1).saturating_sub(Amount::from_units(2));
        assert!(c.is_zero());
    }

    #[test]
    fn test_ordering() {
        assert!(Amount::from_units(1) < Amount::from_units(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_units(1500).to_string(), "1500");
    }

    #[test]
    fn test_serialization_is_transparent() {
        let amount = Amount::from_units(99);
        let json = serde_json::to_string(&amount).expect("serialize");
        assert_eq!(json, "99");
        let parsed: Amount = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(amount, parsed);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn add_then_sub_roundtrips(a in any::<u64>(), b in any::<u64>()) {
                let x = Amount::from_units(a);
                let y = Amount::from_units(b);
                match x.checked_add(y) {
                    Some(sum) => prop_assert_eq!(sum.checked_sub(y), Some(x)),
                    None => prop_assert!(u128::from(a) + u128::from(b) > u128::from(u64::MAX)),
                }
            }

            #[test]
            fn saturating_ops_never_wrap(a in any::<u64>(), b in any::<u64>()) {
                let x = Amount::from_units(a);
                let y = Amount::from_units(b);
                prop_assert!(x.saturating_add(y) >= x);
                prop_assert!(x.saturating_sub(y) <= x);
            }
        }
    }
}
