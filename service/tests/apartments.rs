//! Integration tests of the apartment surface.

mod support;

use common::Patch;
use service::{
    command::{
        CreateApartment, DeleteApartment, DeleteContract, UpdateApartment,
    },
    domain::{apartment, Role},
    query, Command as _, Kind,
};

#[tokio::test]
async fn rejects_duplicate_positions_case_insensitively() {
    let svc = support::service();
    let _ = support::create_apartment(&svc, 1, 'B').await;

    // 'b' normalizes to 'B', so this is the same position.
    let err = svc
        .execute(CreateApartment {
            acting_user: support::admin(),
            position: support::position(1, 'b'),
            is_owned: true,
            utilities: apartment::Utilities::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DuplicateResource);

    // Same letter on another floor is fine.
    let _ = support::create_apartment(&svc, 2, 'b').await;
}

#[tokio::test]
async fn update_may_not_move_onto_an_occupied_position() {
    let svc = support::service();
    let _ = support::create_apartment(&svc, 1, 'A').await;
    let second = support::create_apartment(&svc, 2, 'A').await;

    let err = svc
        .execute(UpdateApartment {
            acting_user: support::admin(),
            id: second.id,
            floor: Some(apartment::Floor::from(1)),
            letter: None,
            is_owned: None,
            gas_account: Patch::Absent,
            electricity_client_account: Patch::Absent,
            electricity_contract_account: Patch::Absent,
            water_account: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DuplicateResource);

    // Moving within its own position (floor unchanged) stays legal.
    let updated = svc
        .execute(UpdateApartment {
            acting_user: support::admin(),
            id: second.id,
            floor: None,
            letter: Some(apartment::Letter::new('c').unwrap()),
            is_owned: None,
            gas_account: Patch::Value(apartment::AccountNumber::from(42)),
            electricity_client_account: Patch::Absent,
            electricity_contract_account: Patch::Absent,
            water_account: Patch::Absent,
        })
        .await
        .unwrap();
    assert_eq!(updated.position.to_string(), "2C");
    assert_eq!(
        updated.utilities.gas,
        Some(apartment::AccountNumber::from(42)),
    );
}

#[tokio::test]
async fn writes_are_admin_only() {
    let svc = support::service();
    let accountant =
        support::create_user(&svc, Role::Accountant, "a@example.com").await;

    let err = svc
        .execute(CreateApartment {
            acting_user: accountant,
            position: support::position(1, 'A'),
            is_owned: true,
            utilities: apartment::Utilities::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn tenant_sees_only_actively_rented_apartments() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let rented = support::create_apartment(&svc, 1, 'A').await;
    let other = support::create_apartment(&svc, 2, 'A').await;
    let _ = support::create_contract(
        &svc,
        &tenant,
        &rented,
        support::month(1, 2020),
        None,
    )
    .await;

    let listed = svc
        .execute(query::apartments::List {
            acting_user: tenant.clone(),
            is_owned: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, rented.id);

    let fetched = svc
        .execute(query::apartment::Get {
            acting_user: tenant.clone(),
            id: rented.id,
        })
        .await
        .unwrap();
    assert_eq!(fetched.id, rented.id);

    let err = svc
        .execute(query::apartment::Get {
            acting_user: tenant,
            id: other.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);

    let all = svc
        .execute(query::apartments::List {
            acting_user: support::admin(),
            is_owned: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn expired_tenancy_hides_the_apartment_from_the_tenant() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 1, 'A').await;
    let _ = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(1, 2020),
        Some(support::month(12, 2020)),
    )
    .await;

    let listed = svc
        .execute(query::apartments::List {
            acting_user: tenant.clone(),
            is_owned: None,
        })
        .await
        .unwrap();
    assert!(listed.is_empty());

    let err = svc
        .execute(query::apartment::Get {
            acting_user: tenant,
            id: apartment.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn delete_is_refused_while_a_contract_references_it() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 1, 'A').await;
    let contract = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(1, 2025),
        None,
    )
    .await;

    let err = svc
        .execute(DeleteApartment {
            acting_user: support::admin(),
            id: apartment.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);

    svc.execute(DeleteContract {
        acting_user: support::admin(),
        id: contract.id,
    })
    .await
    .unwrap();
    svc.execute(DeleteApartment {
        acting_user: support::admin(),
        id: apartment.id,
    })
    .await
    .unwrap();

    let all = svc
        .execute(query::apartments::List {
            acting_user: support::admin(),
            is_owned: None,
        })
        .await
        .unwrap();
    assert!(all.is_empty());
}
