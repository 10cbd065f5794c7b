//! Calendar date utilities.
//!
//! All temporal anchors of the system (contract windows, billing periods,
//! payment dates) are whole calendar days, so [`Date`] carries no time of
//! day and no offset.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Display, Error};
use time::macros::format_description;

use crate::period::{Month, MonthYear, Year};

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date.
///
/// The `Of` type parameter describes what kind of date this is (e.g. a
/// contract start, a billing period), so that different kinds cannot be
/// mixed up accidentally.
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`DateOf`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`DateOf`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid calendar
    /// date.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        Some(Self {
            inner: time::Date::from_calendar_date(year, month, day).ok()?,
            _of: PhantomData,
        })
    }

    /// Creates a new [`DateOf`] from the provided `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid `YYYY-MM-DD` date.
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(
            input,
            &format_description!("[year]-[month]-[day]"),
        )
        .map(|inner| Self {
            inner,
            _of: PhantomData,
        })
        .map_err(ParseError)
    }

    /// Returns the calendar year of this [`DateOf`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the calendar month (1-12) of this [`DateOf`].
    #[must_use]
    pub fn month(&self) -> u8 {
        u8::from(self.inner.month())
    }

    /// Returns the day of month (1-31) of this [`DateOf`].
    #[must_use]
    pub fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Returns the [`MonthYear`] this [`DateOf`] falls into.
    ///
    /// [`None`] is returned if the year lies outside the supported billing
    /// range.
    #[must_use]
    pub fn month_year(&self) -> Option<MonthYear> {
        Some(MonthYear {
            month: Month::new(self.month())?,
            year: Year::new(self.year())?,
        })
    }

    /// Coerces one kind of [`DateOf`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `Date`: {_0}")]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> fmt::Debug for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .inner
            .format(&format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|e| panic!("cannot format `Date`: {e}"));
        write!(f, "{formatted}")
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso8601(s)
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> std::hash::Hash for DateOf<Of> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::DateOf;

    impl<Of: ?Sized> serde::Serialize for DateOf<Of> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de, Of: ?Sized> serde::Deserialize<'de> for DateOf<Of> {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let raw = String::deserialize(deserializer)?;
            Self::from_iso8601(&raw).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_and_formats_iso8601() {
        let date = Date::from_iso8601("2025-03-01").unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 1);
        assert_eq!(date.to_string(), "2025-03-01");

        assert!(Date::from_iso8601("2025-13-01").is_err());
        assert!(Date::from_iso8601("not a date").is_err());
    }

    #[test]
    fn rejects_invalid_calendar_components() {
        assert!(Date::from_calendar(2025, 2, 29).is_none());
        assert!(Date::from_calendar(2024, 2, 29).is_some());
        assert!(Date::from_calendar(2025, 0, 1).is_none());
    }
}
