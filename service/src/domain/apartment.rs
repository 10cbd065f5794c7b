//! [`Apartment`] definitions.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rentable apartment unit of the building.
#[derive(Clone, Debug)]
pub struct Apartment {
    /// ID of this [`Apartment`].
    pub id: Id,

    /// [`Position`] of this [`Apartment`] inside the building.
    pub position: Position,

    /// Whether this [`Apartment`] is owned rather than sublet.
    pub is_owned: bool,

    /// [`Utilities`] accounts of this [`Apartment`].
    pub utilities: Utilities,
}

/// ID of an [`Apartment`].
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

/// Position of an [`Apartment`] inside the building.
///
/// No two [`Apartment`]s may share a [`Position`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{floor}{letter}")]
pub struct Position {
    /// [`Floor`] the [`Apartment`] is on.
    pub floor: Floor,

    /// Door [`Letter`] of the [`Apartment`].
    pub letter: Letter,
}

/// Floor number of an [`Apartment`].
///
/// Negative floors denote basement levels.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Floor(i16);

/// Door letter of an [`Apartment`], stored upper-case.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Letter(char);

impl Letter {
    /// Creates a new [`Letter`] if the given `letter` is a single ASCII
    /// alphabetic character, normalizing it to upper-case.
    #[must_use]
    pub fn new(letter: char) -> Option<Self> {
        letter
            .is_ascii_alphabetic()
            .then(|| Self(letter.to_ascii_uppercase()))
    }

    /// Returns the inner [`char`] of this [`Letter`].
    #[must_use]
    pub fn get(self) -> char {
        self.0
    }
}

/// Utility provider account number.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct AccountNumber(i64);

/// Utility provider accounts attached to an [`Apartment`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Utilities {
    /// Gas provider account.
    pub gas: Option<AccountNumber>,

    /// Electricity provider client account.
    pub electricity_client: Option<AccountNumber>,

    /// Electricity provider contract account.
    pub electricity_contract: Option<AccountNumber>,

    /// Water provider account.
    pub water: Option<AccountNumber>,
}
