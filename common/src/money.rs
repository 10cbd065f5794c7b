//! Monetary amounts.

use std::{fmt, iter::Sum, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Non-negative amount of money.
///
/// Billing components (rent, taxes, utility bills) can never be negative,
/// so negativity is rejected at construction rather than re-checked at
/// every use site.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    /// An [`Amount`] of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Amount`] if the given `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative()).then_some(Self(amount))
    }

    /// Creates a new [`Amount`] from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the inner [`Decimal`] of this [`Amount`].
    #[must_use]
    pub fn get(self) -> Decimal {
        self.0
    }

    /// Adds two [`Amount`]s, saturating at the maximum representable
    /// value.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.to_i128().expect("integer"))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Amount {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Amount;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Amount::new(decimal("-0.01")).is_none());
        assert!(Amount::new(decimal("0")).is_some());
        assert!(Amount::new(decimal("123.45")).is_some());

        assert!(Amount::from_str("-1").is_err());
        assert!(Amount::from_str("not money").is_err());
        assert_eq!(
            Amount::from_str("123.45").unwrap(),
            Amount::new(decimal("123.45")).unwrap(),
        );
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Amount::new(decimal("123.45")).unwrap().to_string(),
            "123.45",
        );
        assert_eq!(Amount::new(decimal("123.00")).unwrap().to_string(), "123");
        assert_eq!(Amount::from_units(70_000).to_string(), "70000");
    }

    #[test]
    fn sums_components() {
        let total: Amount = [
            Amount::from_units(100),
            Amount::from_units(20),
            Amount::from_units(3),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Amount::from_units(123));
    }
}
