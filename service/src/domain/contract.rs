//! [`Contract`] definitions.

use common::{unit, DateOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{activity::Window, apartment, user};
#[cfg(doc)]
use super::{Apartment, User};

/// Tenancy contract binding a tenant [`User`] to an [`Apartment`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`User`] renting the [`Apartment`].
    pub tenant_id: user::Id,

    /// ID of the rented [`Apartment`].
    pub apartment_id: apartment::Id,

    /// [`StartDate`] of this [`Contract`].
    ///
    /// Always the first day of the month the tenancy starts in.
    pub start: StartDate,

    /// [`EndDate`] of this [`Contract`], or [`None`] while the tenancy is
    /// ongoing.
    ///
    /// Always the last day of the month the tenancy ends in.
    pub end: Option<EndDate>,

    /// [`AdjustmentInterval`] of this [`Contract`]'s rent, if any.
    pub adjustment_interval: Option<AdjustmentInterval>,
}

impl Contract {
    /// Returns the [`Window`] of days this [`Contract`] spans.
    #[must_use]
    pub fn window(&self) -> Window {
        Window {
            start: self.start.coerce(),
            end: self.end.map(DateOf::coerce),
        }
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// First day of the month a [`Contract`] starts in.
pub type StartDate = DateOf<(Contract, unit::Start)>;

/// Last day of the month a [`Contract`] ends in.
pub type EndDate = DateOf<(Contract, unit::End)>;

/// Interval between rent adjustments of a [`Contract`], in months.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct AdjustmentInterval(u16);

impl AdjustmentInterval {
    /// Creates a new [`AdjustmentInterval`] if the given number of `months`
    /// is positive.
    #[must_use]
    pub fn new(months: u16) -> Option<Self> {
        (months > 0).then_some(Self(months))
    }

    /// Returns the number of months of this [`AdjustmentInterval`].
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod spec {
    use common::MonthYear;

    use super::{apartment, user, AdjustmentInterval, Contract, Id};

    #[test]
    fn adjustment_interval_is_positive() {
        assert!(AdjustmentInterval::new(0).is_none());
        assert_eq!(AdjustmentInterval::new(12).unwrap().get(), 12);
    }

    #[test]
    fn window_spans_whole_months() {
        let contract = Contract {
            id: Id::new(),
            tenant_id: user::Id::new(),
            apartment_id: apartment::Id::new(),
            start: MonthYear::new(1, 2025).unwrap().first_day(),
            end: Some(MonthYear::new(6, 2025).unwrap().last_day()),
            adjustment_interval: None,
        };

        let window = contract.window();
        assert_eq!(window.start.to_string(), "2025-01-01");
        assert_eq!(window.end.unwrap().to_string(), "2025-06-30");
        assert!(window.is_well_formed());
        assert!(window.contains("2025-03-01".parse().unwrap()));
        assert!(!window.contains("2025-07-01".parse().unwrap()));
    }
}
