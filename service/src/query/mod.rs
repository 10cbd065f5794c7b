//! [`Query`] definition.

pub mod apartment;
pub mod apartments;
pub mod charge;
pub mod charges;
pub mod contract;
pub mod contracts;
pub mod user;
pub mod users;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;
