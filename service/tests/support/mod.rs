//! Shared fixtures of the integration suites.

#![allow(dead_code, reason = "not every suite uses every fixture")]

use common::{Amount, MonthYear};
use service::{
    command::{CreateApartment, CreateCharge, CreateContract, CreateUser},
    domain::{
        apartment, charge, user, Apartment, Charge, Contract, Role, User,
    },
    infra::Memory,
    Command as _, Config, Service,
};

/// [`Service`] under test, backed by an in-memory database.
pub type Svc = Service<Memory>;

/// Creates a fresh empty [`Svc`].
pub fn service() -> Svc {
    Service::new(Config::default(), Memory::new())
}

/// Fabricates an admin [`User`] to act as.
///
/// Acting users are passed into commands and queries already resolved, so
/// the admin doesn't have to exist in the store.
pub fn admin() -> User {
    User {
        id: user::Id::new(),
        email: user::Email::new("admin@example.com").unwrap(),
        name: user::Name::new("Admin").unwrap(),
        role: Role::Admin,
        password_hash: user::PasswordHash::new("hash"),
        password_reset: None,
    }
}

/// Persists a new [`User`] with the given [`Role`] and email.
pub async fn create_user(svc: &Svc, role: Role, email: &str) -> User {
    svc.execute(CreateUser {
        acting_user: admin(),
        email: user::Email::new(email).unwrap(),
        name: user::Name::new("Someone").unwrap(),
        role,
        password_hash: user::PasswordHash::new("hash"),
    })
    .await
    .unwrap()
}

/// Shortcut for a [`MonthYear`] literal.
pub fn month(month: u8, year: i32) -> MonthYear {
    MonthYear::new(month, year).unwrap()
}

/// Shortcut for an [`apartment::Position`] literal.
pub fn position(floor: i16, letter: char) -> apartment::Position {
    apartment::Position {
        floor: apartment::Floor::from(floor),
        letter: apartment::Letter::new(letter).unwrap(),
    }
}

/// Persists a new owned [`Apartment`] at the given position.
pub async fn create_apartment(
    svc: &Svc,
    floor: i16,
    letter: char,
) -> Apartment {
    svc.execute(CreateApartment {
        acting_user: admin(),
        position: position(floor, letter),
        is_owned: true,
        utilities: apartment::Utilities::default(),
    })
    .await
    .unwrap()
}

/// Persists a new [`Contract`] renting the `apartment` to the `tenant`.
pub async fn create_contract(
    svc: &Svc,
    tenant: &User,
    apartment: &Apartment,
    start: MonthYear,
    end: Option<MonthYear>,
) -> Contract {
    svc.execute(CreateContract {
        acting_user: admin(),
        tenant_id: tenant.id,
        apartment_id: apartment.id,
        start,
        end,
        adjustment_interval: None,
    })
    .await
    .unwrap()
}

/// [`charge::Amounts`] fixture totalling 80 500.
pub fn amounts() -> charge::Amounts {
    charge::Amounts {
        rent: Amount::from_units(70_000),
        expenses: Amount::from_units(8_000),
        municipal_tax: Amount::from_units(1_200),
        provincial_tax: Amount::from_units(900),
        water: Amount::from_units(400),
    }
}

/// Persists a new visible unpaid [`Charge`] billing the given month.
pub async fn create_charge(
    svc: &Svc,
    contract: &Contract,
    period: MonthYear,
) -> Charge {
    svc.execute(CreateCharge {
        acting_user: admin(),
        contract_id: contract.id,
        period,
        amounts: amounts(),
        is_adjustment: false,
        is_visible: true,
        paid_at: None,
    })
    .await
    .unwrap()
}
