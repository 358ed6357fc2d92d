//! Money value object.
//!
//! Amounts are carried as integer minor currency units (paise), never as
//! floats, so arithmetic and equality stay exact. Decimal conversion only
//! happens at the API boundary.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest decimal input accepted by [`Amount::from_decimal`].
///
/// Keeps the scaled value well inside f64's exact-integer range.
const MAX_DECIMAL: f64 = 1e13;

/// A positive monetary amount in minor currency units.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Construct from minor units (e.g. 50_000 == Rs 500.00).
    ///
    /// Does not enforce positivity; consumers that require a positive amount
    /// (renderer, gateway) check [`Amount::is_positive`].
    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Construct from a decimal major-unit number, as received over the wire.
    ///
    /// Fails with `InvalidAmount` when the value is not finite, not positive,
    /// or too large to scale exactly. Fractions beyond two decimals round to
    /// the nearest minor unit.
    pub fn from_decimal(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::invalid_amount("amount must be a finite number"));
        }
        if value <= 0.0 {
            return Err(DomainError::invalid_amount("amount must be positive"));
        }
        if value > MAX_DECIMAL {
            return Err(DomainError::invalid_amount("amount is out of range"));
        }

        let minor = (value * 100.0).round();
        if minor < 1.0 {
            return Err(DomainError::invalid_amount(
                "amount must be at least one minor unit",
            ));
        }
        Ok(Self(minor as u64))
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    /// Decimal major-unit representation for wire/JSON output.
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl core::fmt::Display for Amount {
    /// Formats with the currency marker and exactly two decimals: `Rs 500.00`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Rs {}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_decimal_scales_to_minor_units() {
        assert_eq!(Amount::from_decimal(500.0).unwrap().minor_units(), 50_000);
        assert_eq!(Amount::from_decimal(0.01).unwrap().minor_units(), 1);
        assert_eq!(Amount::from_decimal(1234.56).unwrap().minor_units(), 123_456);
    }

    #[test]
    fn from_decimal_rejects_non_positive_and_non_finite() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Amount::from_decimal(bad).unwrap_err();
            assert!(matches!(err, DomainError::InvalidAmount(_)), "{bad}");
        }
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Amount::from_minor(50_000).to_string(), "Rs 500.00");
        assert_eq!(Amount::from_minor(7).to_string(), "Rs 0.07");
        assert_eq!(Amount::from_minor(120).to_string(), "Rs 1.20");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: decimal round-trip is exact for any plausible amount.
            #[test]
            fn decimal_round_trip(minor in 1u64..1_000_000_000_000) {
                let amount = Amount::from_minor(minor);
                let back = Amount::from_decimal(amount.to_decimal()).unwrap();
                prop_assert_eq!(back, amount);
            }

            /// Property: display always carries exactly two decimals.
            #[test]
            fn display_shape(minor in 1u64..1_000_000_000_000) {
                let text = Amount::from_minor(minor).to_string();
                let (_, frac) = text.rsplit_once('.').unwrap();
                prop_assert_eq!(frac.len(), 2);
                prop_assert!(text.starts_with("Rs "));
            }
        }
    }
}
