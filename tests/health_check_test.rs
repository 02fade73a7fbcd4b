//! Health endpoint integration tests.

mod common;

use common::spawn_app;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "ok");
    assert_eq!(body["service"].as_str().unwrap(), "wifi-billing-service");
}

#[tokio::test]
#[serial]
async fn readiness_check_works() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/ready")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
