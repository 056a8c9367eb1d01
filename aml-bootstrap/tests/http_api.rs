use std::collections::BTreeSet;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use aml_bootstrap::{build_router_with_layers, AppContext};
use aml_domain::RuntimeConfig;

async fn spawn_server() -> String {
    let config = RuntimeConfig {
        api_token: Some("api-secret".to_string()),
        admin_token: Some("admin-secret".to_string()),
        ..RuntimeConfig::default()
    };
    let state = AppContext::in_memory(config, BTreeSet::from(["BAD-1"])).state;
    let app = build_router_with_layers(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn payment(id: &str, recipient: &str) -> Value {
    json!({
        "id": id,
        "timestamp": Utc::now(),
        "sender": { "id": "S1", "party_type": "INDIVIDUAL" },
        "recipient": { "id": recipient, "party_type": "MERCHANT" },
        "amount": 12_000,
        "kind": "PAYMENT",
        "channel": "APP"
    })
}

#[tokio::test]
async fn monitor_requires_bearer_token() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/v1/payments/monitor", base))
        .json(&payment("tx-1", "M1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/v1/payments/monitor", base))
        .bearer_auth("api-secret")
        .json(&payment("tx-1", "M1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["allowed"], json!(true));
}

#[tokio::test]
async fn payment_view_hides_evidence_but_case_view_shows_it() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{}/v1/payments/monitor", base))
        .bearer_auth("api-secret")
        .json(&payment("tx-bad", "BAD-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["allowed"], json!(false));
    let notice = &body["alerts"][0];
    assert!(notice.get("evidence").is_none());
    let alert_id = notice["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/v1/cases/alerts/{}", base, alert_id))
        .bearer_auth("api-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let alert: Value = client
        .get(format!("{}/v1/cases/alerts/{}", base, alert_id))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(alert["evidence"][0], json!("sanctions:recipient:BAD-1"));
}

#[tokio::test]
async fn unknown_alert_returns_not_found() {
    let base = spawn_server().await;
    let response = reqwest::Client::new()
        .get(format!("{}/v1/cases/alerts/ALT-none", base))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    client
        .post(format!("{}/v1/payments/monitor", base))
        .bearer_auth("api-secret")
        .json(&payment("tx-1", "M1"))
        .send()
        .await
        .unwrap();

    let text = client
        .get(format!("{}/v1/ops/metrics/prometheus", base))
        .bearer_auth("api-secret")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("aml_monitored_transactions_total 1"));
}
