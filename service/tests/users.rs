//! Integration tests of the user account surface.

mod support;

use common::Patch;
use service::{
    command::{CreateUser, DeleteContract, DeleteUser, UpdateUser},
    domain::{user, Role},
    query, Command as _, Kind,
};

#[tokio::test]
async fn email_is_unique_across_users() {
    let svc = support::service();
    let _ =
        support::create_user(&svc, Role::Tenant, "taken@example.com").await;
    let other =
        support::create_user(&svc, Role::Tenant, "other@example.com").await;

    let err = svc
        .execute(CreateUser {
            acting_user: support::admin(),
            email: user::Email::new("taken@example.com").unwrap(),
            name: user::Name::new("Someone Else").unwrap(),
            role: Role::Accountant,
            password_hash: user::PasswordHash::new("hash"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DuplicateResource);

    let err = svc
        .execute(UpdateUser {
            acting_user: support::admin(),
            id: other.id,
            email: Some(user::Email::new("taken@example.com").unwrap()),
            name: None,
            role: None,
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DuplicateResource);
}

#[tokio::test]
async fn listing_is_admin_only_and_filters_by_role() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let _ =
        support::create_user(&svc, Role::Accountant, "a@example.com").await;

    let err = svc
        .execute(query::users::List {
            acting_user: tenant.clone(),
            role: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);

    let all = svc
        .execute(query::users::List {
            acting_user: support::admin(),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let tenants = svc
        .execute(query::users::List {
            acting_user: support::admin(),
            role: Some(Role::Tenant),
        })
        .await
        .unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0].id, tenant.id);
}

#[tokio::test]
async fn non_admin_reads_only_their_own_account() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let other =
        support::create_user(&svc, Role::Tenant, "o@example.com").await;

    let own = svc
        .execute(query::user::Get {
            acting_user: tenant.clone(),
            id: tenant.id,
        })
        .await
        .unwrap();
    assert_eq!(own.id, tenant.id);

    let err = svc
        .execute(query::user::Get {
            acting_user: tenant,
            id: other.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn non_admin_updates_own_record_but_never_a_role() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let other =
        support::create_user(&svc, Role::Tenant, "o@example.com").await;

    let renamed = svc
        .execute(UpdateUser {
            acting_user: tenant.clone(),
            id: tenant.id,
            email: None,
            name: Some(user::Name::new("Renamed").unwrap()),
            role: None,
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap();
    assert_eq!(renamed.name.to_string(), "Renamed");

    let err = svc
        .execute(UpdateUser {
            acting_user: tenant.clone(),
            id: tenant.id,
            email: None,
            name: None,
            role: Some(Role::Admin),
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);

    let err = svc
        .execute(UpdateUser {
            acting_user: tenant,
            id: other.id,
            email: None,
            name: Some(user::Name::new("Hijacked").unwrap()),
            role: None,
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn admin_changes_any_role_but_their_own() {
    let svc = support::service();
    let admin = support::create_user(
        &svc,
        Role::Admin,
        "stored-admin@example.com",
    )
    .await;
    let accountant =
        support::create_user(&svc, Role::Accountant, "a@example.com").await;

    let promoted = svc
        .execute(UpdateUser {
            acting_user: admin.clone(),
            id: accountant.id,
            email: None,
            name: None,
            role: Some(Role::Tenant),
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Tenant);

    let err = svc
        .execute(UpdateUser {
            acting_user: admin.clone(),
            id: admin.id,
            email: None,
            name: None,
            role: Some(Role::Tenant),
            password_hash: None,
            password_reset: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn delete_is_refused_while_a_contract_references_the_tenant() {
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
        .execute(DeleteUser {
            acting_user: support::admin(),
            id: tenant.id,
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
    svc.execute(DeleteUser {
        acting_user: support::admin(),
        id: tenant.id,
    })
    .await
    .unwrap();

    let err = svc
        .execute(query::user::Get {
            acting_user: support::admin(),
            id: tenant.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::NotFound);
}
