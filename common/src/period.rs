//! Calendar month/year pairs and their normalization to month boundaries.
//!
//! Wherever the system accepts a billing month (contract start, contract
//! end, charge period) it does so as a [`MonthYear`], and the conversion to
//! an actual [`DateOf`] anchor happens here — in exactly one place — so
//! that month-boundary semantics can never drift between call sites.

use std::{cmp::Ordering, fmt};

use crate::date::DateOf;

/// Calendar month number, guaranteed to lie in `1..=12`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Month(u8);

impl Month {
    /// Creates a new [`Month`] if the given `month` lies in `1..=12`.
    #[must_use]
    pub fn new(month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month))
    }

    /// Returns the month number of this [`Month`].
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Calendar year, guaranteed to lie in the supported billing range
/// `1900..=2100`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Year(i32);

impl Year {
    /// Creates a new [`Year`] if the given `year` lies in `1900..=2100`.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (1900..=2100).contains(&year).then_some(Self(year))
    }

    /// Returns the year number of this [`Year`].
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

/// A calendar month of a calendar year.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MonthYear {
    /// [`Month`] of this [`MonthYear`].
    pub month: Month,

    /// [`Year`] of this [`MonthYear`].
    pub year: Year,
}

impl MonthYear {
    /// Creates a new [`MonthYear`] if both components are in range.
    #[must_use]
    pub fn new(month: u8, year: i32) -> Option<Self> {
        Some(Self {
            month: Month::new(month)?,
            year: Year::new(year)?,
        })
    }

    /// Returns this [`MonthYear`]'s inner [`time::Month`].
    fn time_month(self) -> time::Month {
        time::Month::try_from(self.month.get()).expect("validated")
    }

    /// Normalizes this [`MonthYear`] to the first calendar day of the
    /// month, the canonical "start" anchor.
    #[must_use]
    pub fn first_day<Of: ?Sized>(self) -> DateOf<Of> {
        time::Date::from_calendar_date(self.year.get(), self.time_month(), 1)
            .expect("validated")
            .into()
    }

    /// Normalizes this [`MonthYear`] to the last calendar day of the month
    /// (leap-year aware), the canonical "end" anchor.
    #[must_use]
    pub fn last_day<Of: ?Sized>(self) -> DateOf<Of> {
        let (next_year, next_month) = match self.month.get() {
            12 => (self.year.get() + 1, time::Month::January),
            _ => (self.year.get(), self.time_month().next()),
        };
        time::Date::from_calendar_date(next_year, next_month, 1)
            .expect("validated")
            .previous_day()
            .expect("not the minimum date")
            .into()
    }
}

// Chronological order: the year is more significant than the month.
impl Ord for MonthYear {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}
impl PartialOrd for MonthYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time_month(), self.year.get())
    }
}

#[cfg(test)]
mod spec {
    use super::{Month, MonthYear, Year};
    use crate::Date;

    #[test]
    fn rejects_out_of_range_components() {
        assert!(Month::new(0).is_none());
        assert!(Month::new(13).is_none());
        assert!(Month::new(1).is_some());
        assert!(Month::new(12).is_some());

        assert!(Year::new(1899).is_none());
        assert!(Year::new(2101).is_none());
        assert!(Year::new(1900).is_some());
        assert!(Year::new(2100).is_some());
    }

    #[test]
    fn normalizes_to_month_boundaries() {
        let march = MonthYear::new(3, 2025).unwrap();
        assert_eq!(march.first_day::<()>().to_string(), "2025-03-01");
        assert_eq!(march.last_day::<()>().to_string(), "2025-03-31");

        let december = MonthYear::new(12, 2024).unwrap();
        assert_eq!(december.last_day::<()>().to_string(), "2024-12-31");
    }

    #[test]
    fn respects_leap_years() {
        let leap = MonthYear::new(2, 2024).unwrap();
        assert_eq!(leap.last_day::<()>().to_string(), "2024-02-29");

        let common = MonthYear::new(2, 2025).unwrap();
        assert_eq!(common.last_day::<()>().to_string(), "2025-02-28");

        // Century years are only leap when divisible by 400.
        let century = MonthYear::new(2, 2100).unwrap();
        assert_eq!(century.last_day::<()>().to_string(), "2100-02-28");
        let quadricentennial = MonthYear::new(2, 2000).unwrap();
        assert_eq!(
            quadricentennial.last_day::<()>().to_string(),
            "2000-02-29",
        );
    }

    #[test]
    fn orders_chronologically() {
        let dec_2024 = MonthYear::new(12, 2024).unwrap();
        let jan_2025 = MonthYear::new(1, 2025).unwrap();
        let mar_2025 = MonthYear::new(3, 2025).unwrap();

        assert!(dec_2024 < jan_2025);
        assert!(jan_2025 < mar_2025);
        assert!(mar_2025 > dec_2024);
    }

    #[test]
    fn round_trips_through_a_start_anchor() {
        for month in 1..=12_u8 {
            let source = MonthYear::new(month, 2025).unwrap();
            let anchor: Date = source.first_day();
            assert_eq!(anchor.month_year(), Some(source));
        }
    }
}
