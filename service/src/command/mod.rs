//! [`Command`] definition.

pub mod compose_charge_statement;
pub mod create_apartment;
pub mod create_charge;
pub mod create_contract;
pub mod create_user;
pub mod delete_apartment;
pub mod delete_charge;
pub mod delete_contract;
pub mod delete_user;
pub mod update_apartment;
pub mod update_charge;
pub mod update_contract;
pub mod update_user;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    compose_charge_statement::ComposeChargeStatement,
    create_apartment::CreateApartment, create_charge::CreateCharge,
    create_contract::CreateContract, create_user::CreateUser,
    delete_apartment::DeleteApartment, delete_charge::DeleteCharge,
    delete_contract::DeleteContract, delete_user::DeleteUser,
    update_apartment::UpdateApartment, update_charge::UpdateCharge,
    update_contract::UpdateContract, update_user::UpdateUser,
};
