//! Domain definitions.

pub mod activity;
pub mod apartment;
pub mod charge;
pub mod contract;
pub mod user;

pub use self::{
    activity::ActivityPolicy,
    apartment::Apartment,
    charge::Charge,
    contract::Contract,
    user::{Role, User},
};
