//! Dashboard aggregation integration tests.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test

mod common;

use common::{create_test_bill, create_test_member, current_period, record_test_payment, spawn_app};
use rust_decimal::Decimal;
use serial_test::serial;

fn decimal_field(value: &serde_json::Value, field: &str) -> Decimal {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing field '{}'", field))
        .parse()
        .unwrap_or_else(|_| panic!("field '{}' is not a decimal", field))
}

#[tokio::test]
#[serial]
async fn dashboard_without_current_bill_reports_absence() {
    let app = spawn_app().await;
    create_test_member(&app, "Budi", "active").await;
    create_test_member(&app, "Joko", "inactive").await;

    let summary: serde_json::Value = app
        .client
        .get(app.url("/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["current_period"].as_str().unwrap(), current_period());
    assert!(!summary["has_current_bill"].as_bool().unwrap());
    assert_eq!(summary["active_members"].as_i64().unwrap(), 1);
    assert_eq!(decimal_field(&summary, "total_billed"), Decimal::ZERO);
    assert_eq!(decimal_field(&summary, "total_paid"), Decimal::ZERO);
    assert_eq!(decimal_field(&summary, "total_unpaid"), Decimal::ZERO);
    assert_eq!(decimal_field(&summary, "cost_per_person"), Decimal::ZERO);
    assert_eq!(summary["unpaid_member_count"].as_i64().unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn dashboard_aggregates_current_month_bill() {
    let app = spawn_app().await;
    let settled = create_test_member(&app, "Budi", "active").await;
    let partial = create_test_member(&app, "Siti", "active").await;

    let bill = create_test_bill(&app, &current_period(), "100000").await;
    record_test_payment(&app, settled.id, bill.id, "50000").await;
    record_test_payment(&app, partial.id, bill.id, "20000").await;

    let summary: serde_json::Value = app
        .client
        .get(app.url("/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(summary["has_current_bill"].as_bool().unwrap());
    assert_eq!(summary["active_members"].as_i64().unwrap(), 2);
    assert_eq!(
        decimal_field(&summary, "cost_per_person"),
        Decimal::from(50_000)
    );
    assert_eq!(
        decimal_field(&summary, "total_billed"),
        Decimal::from(100_000)
    );
    assert_eq!(decimal_field(&summary, "total_paid"), Decimal::from(70_000));
    assert_eq!(
        decimal_field(&summary, "total_unpaid"),
        Decimal::from(30_000)
    );
    assert_eq!(summary["unpaid_member_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn dashboard_total_unpaid_can_go_negative_on_overpayment() {
    let app = spawn_app().await;
    let member = create_test_member(&app, "Budi", "active").await;

    let bill = create_test_bill(&app, &current_period(), "50000").await;
    record_test_payment(&app, member.id, bill.id, "120000").await;

    let summary: serde_json::Value = app
        .client
        .get(app.url("/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        decimal_field(&summary, "total_unpaid"),
        Decimal::from(-70_000)
    );
    assert_eq!(summary["unpaid_member_count"].as_i64().unwrap(), 0);
}
