//! Date and time utilities.
//!
//! Unlike [`Date`](crate::Date), a [`DateTime`] is a precise UTC instant.
//! The engine itself reasons in whole calendar days; instants only appear
//! on data carried for external collaborators (e.g. password-reset token
//! expiry).

use std::fmt;

use derive_more::{Display, Error};
use time::format_description::well_known::Rfc3339;

/// UTC date and time.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime(time::OffsetDateTime);

impl DateTime {
    /// Creates a new [`DateTime`] representing the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(time::OffsetDateTime::now_utc())
    }

    /// Creates a new [`DateTime`] from the provided Unix timestamp.
    ///
    /// [`None`] is returned if the timestamp is invalid.
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        time::OffsetDateTime::from_unix_timestamp(timestamp)
            .ok()
            .map(Self)
    }

    /// Returns the Unix timestamp of this [`DateTime`].
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and
    /// time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        time::OffsetDateTime::parse(input, &Rfc3339)
            .map(|dt| Self(dt.to_offset(time::UtcOffset::UTC)))
            .map_err(ParseError)
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(&Rfc3339)
            .unwrap_or_else(|e| panic!("cannot format `DateTime`: {e}"));
        write!(f, "{formatted}")
    }
}

/// Error of parsing a [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `DateTime`: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn round_trips_through_rfc3339() {
        let parsed = DateTime::from_rfc3339("2025-06-01T12:30:00Z").unwrap();
        assert_eq!(parsed.to_string(), "2025-06-01T12:30:00Z");
        assert!(DateTime::from_rfc3339("2025-06-01").is_err());
    }

    #[test]
    fn orders_by_instant() {
        let earlier = DateTime::from_unix_timestamp(1_000).unwrap();
        let later = DateTime::from_unix_timestamp(2_000).unwrap();
        assert!(earlier < later);
    }
}
