//! [`Database`]-related implementations.

pub mod memory;

use derive_more::{Display, Error as StdError};

use crate::error::Kind;

pub use self::memory::Memory;

/// Database operation.
pub use common::Handler as Database;

/// Unique constraint enforced by a [`Database`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Constraint {
    /// One apartment per `(floor, letter)` position.
    #[display("apartments_floor_letter")]
    ApartmentsFloorLetter,

    /// One contract per `(apartment, start)` pair.
    #[display("contracts_apartment_start")]
    ContractsApartmentStart,

    /// One charge per `(contract, period)` pair.
    #[display("charges_contract_period")]
    ChargesContractPeriod,

    /// One user per email address.
    #[display("users_email")]
    UsersEmail,
}

/// [`Database`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Write violating a unique [`Constraint`].
    ///
    /// This is the authoritative backstop behind command-level duplicate
    /// pre-checks: the pre-checks produce precise errors, while a
    /// concurrent writer slipping between a pre-check and its write still
    /// ends up here rather than in the store.
    #[display("unique constraint `{_0}` violated")]
    UniqueViolation(#[error(not(source))] Constraint),

    /// Write addressing a row that doesn't exist.
    #[display("row of `{_0}` not found")]
    RowNotFound(#[error(not(source))] &'static str),
}

impl Error {
    /// Indicates whether this [`Error`] is a violation of the provided
    /// unique [`Constraint`].
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Constraint) -> bool {
        match self {
            Self::UniqueViolation(violated) => *violated == constraint,
            Self::RowNotFound(_) => false,
        }
    }

    /// Classifies this [`Error`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::UniqueViolation(_) => Kind::DuplicateResource,
            Self::RowNotFound(_) => Kind::Internal,
        }
    }
}
