//! Read model definitions.

pub mod apartment;
pub mod charge;
pub mod contract;
pub mod user;
