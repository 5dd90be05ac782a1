//! # Secret Handling
//!
//! The operator code and the home-network private key are accepted on write
//! and never echoed back, whatever the caller's role.

use axum::http::StatusCode;
use ec_02_change_log::AuditSink;
use serde_json::json;

use super::harness::{send_raw, TestNode, ADMIN, MANAGER, OPERATOR_CODE, PRIVATE_KEY, VIEWER};

const READ_ROUTES: &[&str] = &[
    "/api/v1/operator",
    "/api/v1/operator/id",
    "/api/v1/operator/slice",
    "/api/v1/operator/tracking",
    "/api/v1/operator/home-network",
    "/api/v1/operator/id/staged",
    "/api/v1/networking/interfaces/n3",
    "/api/v1/logs/audit?per_page=100",
    "/api/v1/logs/audit/retention",
    "/api/v1/radios",
    "/api/v1/status",
];

async fn node_with_secrets() -> TestNode {
    let node = TestNode::in_memory();
    node.enforcer.seed_defaults().await.unwrap();

    let (status, _) = node
        .put(
            "/api/v1/operator/code",
            ADMIN,
            json!({"operatorCode": OPERATOR_CODE}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = node
        .put(
            "/api/v1/operator/home-network",
            ADMIN,
            json!({"privateKey": PRIVATE_KEY}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    node
}

fn leaks(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains(OPERATOR_CODE) || lower.contains(PRIVATE_KEY)
}

#[tokio::test]
async fn test_no_read_route_returns_secrets() {
    let node = node_with_secrets().await;

    for token in [ADMIN, MANAGER, VIEWER] {
        for route in READ_ROUTES {
            let (status, text) = send_raw(&node.router, "GET", route, Some(token), None).await;
            assert!(status.is_success(), "{} as {} -> {}", route, token, status);
            assert!(!leaks(&text), "{} leaked a secret: {}", route, text);
        }
    }
}

#[tokio::test]
async fn test_home_network_exposes_public_key_only() {
    let node = node_with_secrets().await;
    let (status, body) = node
        .get("/api/v1/operator/home-network", Some(VIEWER))
        .await;
    assert_eq!(status, StatusCode::OK);

    let public_key = body["result"]["publicKey"].as_str().unwrap();
    assert_eq!(public_key.len(), 64);
    assert_ne!(public_key, PRIVATE_KEY);
}

#[tokio::test]
async fn test_operator_view_reports_code_presence() {
    let node = node_with_secrets().await;
    let (_, body) = node.get("/api/v1/operator", Some(VIEWER)).await;
    assert_eq!(body["result"]["operatorCodeSet"], true);
}

#[tokio::test]
async fn test_rejected_secret_is_not_echoed() {
    let node = TestNode::in_memory();
    let bad_code = "zz".repeat(16);
    let (status, text) = send_raw(
        &node.router,
        "PUT",
        "/api/v1/operator/code",
        Some(ADMIN),
        Some(json!({"operatorCode": bad_code})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!text.contains(&bad_code));

    let (_, text) = send_raw(
        &node.router,
        "GET",
        "/api/v1/logs/audit",
        Some(ADMIN),
        None,
    )
    .await;
    assert!(!text.contains(&bad_code));
}

#[tokio::test]
async fn test_secret_audit_entries_are_redacted() {
    let node = node_with_secrets().await;
    let entries = node.audit.list(Default::default()).unwrap();
    assert!(!entries.items.is_empty());

    let serialized = serde_json::to_string(&entries.items).unwrap();
    assert!(!leaks(&serialized));
}
