//! Classification of execution failures.

use derive_more::Display;

/// Classification of an execution failure.
///
/// Every command's and query's `ExecutionError` maps itself into exactly
/// one [`Kind`] via its `kind()` method, so boundary adapters can translate
/// outcomes without re-deriving the rules here.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Kind {
    /// A referenced entity doesn't exist.
    NotFound,

    /// A write collides with an existing unique value.
    DuplicateResource,

    /// A domain invariant is violated.
    DomainValidation,

    /// The acting user is identified, but not permitted.
    Forbidden,

    /// No acting user could be identified.
    ///
    /// Reserved for the identity collaborator at the boundary; the engine
    /// itself always receives a resolved acting user.
    Unauthorized,

    /// Infrastructure failure.
    Internal,
}
