//! Tri-state field patches.

/// A patch value for a nullable field of an update operation.
///
/// Distinguishes, at the type level, the three things an update payload can
/// say about a field: leave it alone, clear it, or replace it. A plain
/// `Option<Option<T>>` expresses the same states, but collapses too easily
/// under `flatten`/`map` to be trusted at validation boundaries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Patch<T> {
    /// The field is not part of the patch and keeps its current value.
    #[default]
    Absent,

    /// The field is explicitly cleared.
    Null,

    /// The field is explicitly set to the contained value.
    Value(T),
}

impl<T> Patch<T> {
    /// Indicates whether this [`Patch`] touches the field at all.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Resolves this [`Patch`] against the field's `current` value.
    #[must_use]
    pub fn resolve(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Absent => current,
            Self::Null => None,
            Self::Value(v) => Some(v),
        }
    }

    /// Converts from `&Patch<T>` to `Patch<&T>`.
    #[must_use]
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(v),
        }
    }

    /// Maps a `Patch<T>` to a `Patch<U>` by applying `f` to a contained
    /// value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// Converts an explicitly present payload value into a [`Patch`]:
    /// `Some` sets, `None` clears. Absence cannot be expressed via this
    /// conversion on purpose.
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

#[cfg(test)]
mod spec {
    use super::Patch;

    #[test]
    fn resolves_three_states_distinctly() {
        let current = Some(7);

        assert_eq!(Patch::Absent.resolve(current), Some(7));
        assert_eq!(Patch::Null.resolve(current), None);
        assert_eq!(Patch::Value(9).resolve(current), Some(9));

        assert_eq!(Patch::<i32>::Absent.resolve(None), None);
        assert_eq!(Patch::Value(9).resolve(None), Some(9));
    }

    #[test]
    fn touch_tracking() {
        assert!(!Patch::<i32>::Absent.is_touched());
        assert!(Patch::<i32>::Null.is_touched());
        assert!(Patch::Value(1).is_touched());
    }
}
