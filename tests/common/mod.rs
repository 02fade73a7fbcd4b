//! Common test utilities for wifi-billing-service integration tests.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use std::sync::Once;
use uuid::Uuid;
use wifi_billing_service::config::{Config, DatabaseConfig, ServerConfig};
use wifi_billing_service::models::{Bill, Member, Payment};
use wifi_billing_service::Application;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,wifi_billing_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Spawn a test application against a clean database and return a client.
///
/// Tests share one database, so they must run with `#[serial]`.
pub async fn spawn_app() -> TestApp {
    init_tracing();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to a PostgreSQL database for integration tests");

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url.clone(),
            max_connections: 2,
            min_connections: 1,
        },
        service_name: "wifi-billing-service-test".to_string(),
    };

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    // Start from a clean slate (build has run the migrations by now)
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::query("TRUNCATE payments, bills, members")
        .execute(&pool)
        .await
        .expect("Failed to reset test database");

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

/// Helper to create a member for testing.
pub async fn create_test_member(app: &TestApp, name: &str, status: &str) -> Member {
    let response = app
        .client
        .post(app.url("/members"))
        .json(&serde_json::json!({
            "name": name,
            "contact": "+6281234567890",
            "status": status,
            "join_date": "2024-01-01",
        }))
        .send()
        .await
        .expect("Failed to create member");

    assert_eq!(response.status().as_u16(), 201, "member creation failed");
    response.json().await.expect("Invalid member response")
}

/// Helper to create a bill for testing, due 30 days from now.
pub async fn create_test_bill(app: &TestApp, period: &str, total_cost: &str) -> Bill {
    let due_date = (Utc::now().date_naive() + Duration::days(30)).to_string();
    let response = app
        .client
        .post(app.url("/bills"))
        .json(&serde_json::json!({
            "period": period,
            "total_cost": total_cost,
            "due_date": due_date,
        }))
        .send()
        .await
        .expect("Failed to create bill");

    assert_eq!(response.status().as_u16(), 201, "bill creation failed");
    response.json().await.expect("Invalid bill response")
}

/// Helper to record a payment for testing.
pub async fn record_test_payment(
    app: &TestApp,
    member_id: Uuid,
    bill_id: Uuid,
    amount: &str,
) -> Payment {
    let response = app
        .client
        .post(app.url("/payments"))
        .json(&serde_json::json!({
            "member_id": member_id,
            "bill_id": bill_id,
            "amount": amount,
            "payment_date": Utc::now().date_naive().to_string(),
        }))
        .send()
        .await
        .expect("Failed to record payment");

    assert_eq!(response.status().as_u16(), 201, "payment recording failed");
    response.json().await.expect("Invalid payment response")
}

/// The current calendar month in `YYYY-MM` form, as the dashboard sees it.
pub fn current_period() -> String {
    Utc::now().format("%Y-%m").to_string()
}
