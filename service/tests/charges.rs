//! Integration tests of the monthly charge surface.

mod support;

use common::Patch;
use service::{
    command::{
        ComposeChargeStatement, CreateCharge, DeleteCharge, UpdateCharge,
    },
    domain::Role,
    query, Command as _, Kind,
};

#[tokio::test]
async fn billing_must_stay_inside_the_tenancy_window() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 1, 'A').await;
    let contract = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(2, 2025),
        Some(support::month(6, 2025)),
    )
    .await;

    // The month before the start is out.
    let err = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: contract.id,
            period: support::month(1, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: true,
            paid_at: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);

    // The start and end months themselves are in.
    let _ = support::create_charge(&svc, &contract, support::month(2, 2025))
        .await;
    let _ = support::create_charge(&svc, &contract, support::month(6, 2025))
        .await;

    // The month after the end is out again.
    let err = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: contract.id,
            period: support::month(7, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: true,
            paid_at: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);
}

#[tokio::test]
async fn ongoing_tenancy_accepts_far_future_billing() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 1, 'A').await;
    let contract = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(1, 2020),
        None,
    )
    .await;

    let _ = support::create_charge(&svc, &contract, support::month(12, 2040))
        .await;
}

#[tokio::test]
async fn rejects_double_billing_of_a_month() {
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
    let _ = support::create_charge(&svc, &contract, support::month(3, 2025))
        .await;

    let err = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: contract.id,
            period: support::month(3, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: true,
            paid_at: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DuplicateResource);
}

#[tokio::test]
async fn update_may_not_move_billing_outside_the_window() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 1, 'A').await;
    let contract = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(1, 2025),
        Some(support::month(6, 2025)),
    )
    .await;
    let charge =
        support::create_charge(&svc, &contract, support::month(3, 2025))
            .await;

    let err = svc
        .execute(UpdateCharge {
            acting_user: support::admin(),
            id: charge.id,
            contract_id: None,
            period: Some(support::month(7, 2025)),
            rent: None,
            expenses: None,
            municipal_tax: None,
            provincial_tax: None,
            water: None,
            is_adjustment: None,
            is_visible: None,
            paid_at: Patch::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);
}

#[tokio::test]
async fn payment_can_be_recorded_and_reverted() {
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
    let charge =
        support::create_charge(&svc, &contract, support::month(3, 2025))
            .await;
    assert!(!charge.is_paid());

    let paid = svc
        .execute(UpdateCharge {
            acting_user: support::admin(),
            id: charge.id,
            contract_id: None,
            period: None,
            rent: None,
            expenses: None,
            municipal_tax: None,
            provincial_tax: None,
            water: None,
            is_adjustment: None,
            is_visible: None,
            paid_at: Patch::Value("2025-03-10".parse().unwrap()),
        })
        .await
        .unwrap();
    assert!(paid.is_paid());

    // Paid billing history is immutable; the charge cannot be deleted.
    let err = svc
        .execute(DeleteCharge {
            acting_user: support::admin(),
            id: charge.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);

    // Reverting the payment unlocks it again.
    let reverted = svc
        .execute(UpdateCharge {
            acting_user: support::admin(),
            id: charge.id,
            contract_id: None,
            period: None,
            rent: None,
            expenses: None,
            municipal_tax: None,
            provincial_tax: None,
            water: None,
            is_adjustment: None,
            is_visible: None,
            paid_at: Patch::Null,
        })
        .await
        .unwrap();
    assert!(!reverted.is_paid());
    svc.execute(DeleteCharge {
        acting_user: support::admin(),
        id: charge.id,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn tenant_sees_only_own_visible_charges() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t1@example.com").await;
    let other =
        support::create_user(&svc, Role::Tenant, "t2@example.com").await;
    let first = support::create_apartment(&svc, 1, 'A').await;
    let second = support::create_apartment(&svc, 2, 'A').await;
    let own_contract = support::create_contract(
        &svc,
        &tenant,
        &first,
        support::month(1, 2025),
        None,
    )
    .await;
    let foreign_contract = support::create_contract(
        &svc,
        &other,
        &second,
        support::month(1, 2025),
        None,
    )
    .await;

    let visible =
        support::create_charge(&svc, &own_contract, support::month(3, 2025))
            .await;
    let hidden = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: own_contract.id,
            period: support::month(4, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: false,
            paid_at: None,
        })
        .await
        .unwrap();
    let foreign = support::create_charge(
        &svc,
        &foreign_contract,
        support::month(3, 2025),
    )
    .await;

    let listed = svc
        .execute(query::charges::List {
            acting_user: tenant.clone(),
            contract: None,
            period: None,
            unpaid: None,
            apartment: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, visible.id);

    let fetched = svc
        .execute(query::charge::Get {
            acting_user: tenant.clone(),
            id: visible.id,
        })
        .await
        .unwrap();
    assert_eq!(fetched.id, visible.id);

    // A hidden charge of their own reads as missing, not as forbidden.
    let err = svc
        .execute(query::charge::Get {
            acting_user: tenant.clone(),
            id: hidden.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::NotFound);

    let err = svc
        .execute(query::charge::Get {
            acting_user: tenant,
            id: foreign.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn filters_the_listing_by_payment_state() {
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
    let unpaid =
        support::create_charge(&svc, &contract, support::month(3, 2025))
            .await;
    let paid = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: contract.id,
            period: support::month(4, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: true,
            paid_at: Some("2025-04-10".parse().unwrap()),
        })
        .await
        .unwrap();

    let listed = svc
        .execute(query::charges::List {
            acting_user: support::admin(),
            contract: Some(contract.id),
            period: None,
            unpaid: Some(true),
            apartment: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, unpaid.id);

    let listed = svc
        .execute(query::charges::List {
            acting_user: support::admin(),
            contract: None,
            period: None,
            unpaid: Some(false),
            apartment: Some(apartment.id),
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, paid.id);
}

#[tokio::test]
async fn composes_a_statement_for_a_visible_charge() {
    let svc = support::service();
    let tenant =
        support::create_user(&svc, Role::Tenant, "t@example.com").await;
    let apartment = support::create_apartment(&svc, 3, 'B').await;
    let contract = support::create_contract(
        &svc,
        &tenant,
        &apartment,
        support::month(1, 2025),
        None,
    )
    .await;
    let charge =
        support::create_charge(&svc, &contract, support::month(3, 2025))
            .await;

    let statement = svc
        .execute(ComposeChargeStatement {
            acting_user: support::admin(),
            id: charge.id,
        })
        .await
        .unwrap();
    assert_eq!(statement.recipient, tenant.email);
    assert_eq!(statement.apartment.to_string(), "3B");
    assert_eq!(statement.period, support::month(3, 2025));
    assert_eq!(statement.total, support::amounts().total());

    let err = svc
        .execute(ComposeChargeStatement {
            acting_user: tenant,
            id: charge.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}

#[tokio::test]
async fn refuses_a_statement_for_a_hidden_charge() {
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
    let hidden = svc
        .execute(CreateCharge {
            acting_user: support::admin(),
            contract_id: contract.id,
            period: support::month(3, 2025),
            amounts: support::amounts(),
            is_adjustment: false,
            is_visible: false,
            paid_at: None,
        })
        .await
        .unwrap();

    let err = svc
        .execute(ComposeChargeStatement {
            acting_user: support::admin(),
            id: hidden.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::DomainValidation);
}

#[tokio::test]
async fn resolves_the_latest_adjustment() {
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

    assert!(svc
        .execute(query::charge::LatestAdjusted {
            acting_user: support::admin(),
            contract_id: contract.id,
        })
        .await
        .unwrap()
        .is_none());

    for (period, is_adjustment) in [(2, true), (3, false), (4, true)] {
        let _ = svc
            .execute(CreateCharge {
                acting_user: support::admin(),
                contract_id: contract.id,
                period: support::month(period, 2025),
                amounts: support::amounts(),
                is_adjustment,
                is_visible: true,
                paid_at: None,
            })
            .await
            .unwrap();
    }

    let latest = svc
        .execute(query::charge::LatestAdjusted {
            acting_user: support::admin(),
            contract_id: contract.id,
        })
        .await
        .unwrap()
        .unwrap();
    assert!(latest.is_adjustment);
    assert_eq!(latest.period, support::month(4, 2025).first_day());

    let err = svc
        .execute(query::charge::LatestAdjusted {
            acting_user: tenant,
            contract_id: contract.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.as_ref().kind(), Kind::Forbidden);
}
