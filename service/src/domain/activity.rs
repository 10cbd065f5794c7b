//! Temporal activity of [`Contract`] windows.
//!
//! A [`Contract`] is active on a day when the day falls inside its
//! [`Window`], with both bounds inclusive and a missing end meaning the
//! tenancy is ongoing. Every "is this contract active?" question in the
//! system goes through [`ActivityPolicy`], so the bound semantics live in
//! exactly one place.
//!
//! [`Contract`]: super::Contract

use common::Date;

/// Span of days a [`Contract`] covers.
///
/// [`Contract`]: super::Contract
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// First day of the span.
    pub start: Date,

    /// Last day of the span, or [`None`] if the span is ongoing.
    pub end: Option<Date>,
}

impl Window {
    /// Indicates whether this [`Window`] doesn't end before it starts.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.end.map_or(true, |end| end >= self.start)
    }

    /// Indicates whether the given `day` falls inside this [`Window`].
    ///
    /// Both bounds are inclusive, and a missing end bound covers every day
    /// from the start on.
    #[must_use]
    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && self.end.map_or(true, |end| day <= end)
    }
}

/// Policy deciding whether a [`Window`] is active as of a fixed day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActivityPolicy {
    /// Day the activity is evaluated against.
    pub as_of: Date,
}

impl ActivityPolicy {
    /// Creates a new [`ActivityPolicy`] evaluating against the current day.
    #[must_use]
    pub fn now() -> Self {
        Self {
            as_of: Date::today(),
        }
    }

    /// Indicates whether the given [`Window`] is active as of this
    /// [`ActivityPolicy`]'s day.
    #[must_use]
    pub fn is_active(&self, window: &Window) -> bool {
        window.start <= self.as_of
            && window.end.map_or(true, |end| end >= self.as_of)
    }

    /// Indicates whether the given [`Window`] is inactive as of this
    /// [`ActivityPolicy`]'s day.
    ///
    /// Spelled out as the explicit negation of [`is_active()`], so that a
    /// change to one bound cannot silently desynchronize the two
    /// predicates.
    ///
    /// [`is_active()`]: ActivityPolicy::is_active
    #[must_use]
    pub fn is_inactive(&self, window: &Window) -> bool {
        window.start > self.as_of
            || window.end.is_some_and(|end| end < self.as_of)
    }
}

/// Requested activity state of a listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Activity {
    /// Only active [`Window`]s.
    Active,

    /// Only inactive [`Window`]s.
    Inactive,
}

/// Activity filter applied by listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Filter {
    /// [`ActivityPolicy`] to evaluate [`Window`]s with.
    pub policy: ActivityPolicy,

    /// [`Activity`] state to retain.
    pub which: Activity,
}

impl Filter {
    /// Creates a new [`Filter`] retaining active [`Window`]s.
    #[must_use]
    pub fn active(policy: ActivityPolicy) -> Self {
        Self {
            policy,
            which: Activity::Active,
        }
    }

    /// Creates a new [`Filter`] retaining inactive [`Window`]s.
    #[must_use]
    pub fn inactive(policy: ActivityPolicy) -> Self {
        Self {
            policy,
            which: Activity::Inactive,
        }
    }

    /// Indicates whether the given [`Window`] passes this [`Filter`].
    #[must_use]
    pub fn matches(&self, window: &Window) -> bool {
        match self.which {
            Activity::Active => self.policy.is_active(window),
            Activity::Inactive => self.policy.is_inactive(window),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use proptest::prelude::*;

    use super::{ActivityPolicy, Filter, Window};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn any_date() -> impl Strategy<Value = Date> {
        (1990..=2080_i32, 1..=12_u8, 1..=28_u8).prop_map(|(y, m, d)| {
            Date::from_calendar(y, m, d).expect("day <= 28 always exists")
        })
    }

    fn any_window() -> impl Strategy<Value = Window> {
        (any_date(), proptest::option::of(any_date())).prop_map(
            |(a, b)| match b {
                Some(b) if b < a => Window {
                    start: b,
                    end: Some(a),
                },
                end => Window { start: a, end },
            },
        )
    }

    #[test]
    fn end_bound_is_inclusive() {
        let window = Window {
            start: date("2025-01-01"),
            end: Some(date("2025-06-30")),
        };

        let on_end = ActivityPolicy {
            as_of: date("2025-06-30"),
        };
        assert!(on_end.is_active(&window));
        assert!(!on_end.is_inactive(&window));

        let after_end = ActivityPolicy {
            as_of: date("2025-07-01"),
        };
        assert!(!after_end.is_active(&window));
        assert!(after_end.is_inactive(&window));
    }

    #[test]
    fn start_bound_is_inclusive() {
        let window = Window {
            start: date("2025-01-01"),
            end: None,
        };

        let on_start = ActivityPolicy {
            as_of: date("2025-01-01"),
        };
        assert!(on_start.is_active(&window));

        let before_start = ActivityPolicy {
            as_of: date("2024-12-31"),
        };
        assert!(before_start.is_inactive(&window));
    }

    #[test]
    fn open_ended_window_never_expires() {
        let window = Window {
            start: date("2000-01-01"),
            end: None,
        };
        let far_future = ActivityPolicy {
            as_of: date("2080-12-28"),
        };
        assert!(far_future.is_active(&window));
    }

    proptest! {
        #[test]
        fn inactivity_is_the_exact_negation_of_activity(
            window in any_window(),
            as_of in any_date(),
        ) {
            let policy = ActivityPolicy { as_of };
            prop_assert_ne!(
                policy.is_active(&window),
                policy.is_inactive(&window),
            );
        }

        #[test]
        fn filter_agrees_with_the_policy(
            window in any_window(),
            as_of in any_date(),
        ) {
            let policy = ActivityPolicy { as_of };
            prop_assert_eq!(
                Filter::active(policy).matches(&window),
                policy.is_active(&window),
            );
            prop_assert_eq!(
                Filter::inactive(policy).matches(&window),
                policy.is_inactive(&window),
            );
        }
    }
}
