//! Payment ledger integration tests.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test

mod common;

use chrono::Utc;
use common::{create_test_bill, create_test_member, record_test_payment, spawn_app};
use rust_decimal::Decimal;
use serial_test::serial;
use uuid::Uuid;
use wifi_billing_service::models::Payment;

#[tokio::test]
#[serial]
async fn recording_payment_copies_period_and_derives_surplus() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    // One active member, so the share equals the total
    let bill = create_test_bill(&app, "2026-01", "40000").await;

    let payment = record_test_payment(&app, member.id, bill.id, "90000").await;

    assert_eq!(payment.member_id, member.id);
    assert_eq!(payment.bill_id, bill.id);
    assert_eq!(payment.period, "2026-01");
    assert_eq!(payment.amount, Decimal::from(90_000));
    assert_eq!(payment.surplus, Decimal::from(50_000));
}

#[tokio::test]
#[serial]
async fn exact_payment_has_zero_surplus() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-02", "40000").await;

    let payment = record_test_payment(&app, member.id, bill.id, "40000").await;

    assert_eq!(payment.surplus, Decimal::ZERO);
}

#[tokio::test]
#[serial]
async fn partial_payment_has_zero_surplus() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-03", "40000").await;

    let payment = record_test_payment(&app, member.id, bill.id, "25000").await;

    assert_eq!(payment.surplus, Decimal::ZERO);
}

#[tokio::test]
#[serial]
async fn payment_against_zero_share_is_all_surplus() {
    let app = spawn_app().await;
    // An inactive member can still be billed against; with no active
    // members the share is zero
    let member = create_test_member(&app, "Joko", "inactive").await;
    let bill = create_test_bill(&app, "2026-04", "100000").await;
    assert_eq!(bill.per_person_share, Decimal::ZERO);

    let payment = record_test_payment(&app, member.id, bill.id, "15000").await;

    assert_eq!(payment.surplus, Decimal::from(15_000));
}

#[tokio::test]
#[serial]
async fn payment_with_unknown_member_is_rejected() {
    let app = spawn_app().await;
    create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-05", "40000").await;

    let response = app
        .client
        .post(app.url("/payments"))
        .json(&serde_json::json!({
            "member_id": Uuid::new_v4(),
            "bill_id": bill.id,
            "amount": "40000",
            "payment_date": Utc::now().date_naive().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[serial]
async fn payment_with_unknown_bill_is_rejected() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;

    let response = app
        .client
        .post(app.url("/payments"))
        .json(&serde_json::json!({
            "member_id": member.id,
            "bill_id": Uuid::new_v4(),
            "amount": "40000",
            "payment_date": Utc::now().date_naive().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[serial]
async fn negative_amount_is_rejected() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-06", "40000").await;

    let response = app
        .client
        .post(app.url("/payments"))
        .json(&serde_json::json!({
            "member_id": member.id,
            "bill_id": bill.id,
            "amount": "-1",
            "payment_date": Utc::now().date_naive().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
#[serial]
async fn editing_payment_recomputes_surplus_against_current_share() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-07", "40000").await;

    let payment = record_test_payment(&app, member.id, bill.id, "40000").await;
    assert_eq!(payment.surplus, Decimal::ZERO);

    // The share drops to 20000 after the roster doubles and the bill is
    // re-saved
    create_test_member(&app, "Siti", "active").await;
    let due_date = (Utc::now().date_naive() + chrono::Duration::days(30)).to_string();
    app.client
        .put(app.url(&format!("/bills/{}", bill.id)))
        .json(&serde_json::json!({
            "total_cost": "40000",
            "due_date": due_date,
        }))
        .send()
        .await
        .unwrap();

    let response = app
        .client
        .put(app.url(&format!("/payments/{}", payment.id)))
        .json(&serde_json::json!({
            "member_id": member.id,
            "bill_id": bill.id,
            "amount": "40000",
            "payment_date": Utc::now().date_naive().to_string(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let updated: Payment = response.json().await.unwrap();
    assert_eq!(updated.surplus, Decimal::from(20_000));
}

#[tokio::test]
#[serial]
async fn deleted_payment_is_gone() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;
    let bill = create_test_bill(&app, "2026-08", "40000").await;
    let payment = record_test_payment(&app, member.id, bill.id, "40000").await;

    let response = app
        .client
        .delete(app.url(&format!("/payments/{}", payment.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .client
        .get(app.url(&format!("/payments/{}", payment.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
