//! # Access Control
//!
//! Bearer authentication in the middleware, role checks in the handlers.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::harness::{send, TestNode, ADMIN, MANAGER, OPERATOR_CODE, PRIVATE_KEY, VIEWER};

fn writes() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        ("PUT", "/api/v1/operator/id", json!({"mcc": "001", "mnc": "01"})),
        ("PUT", "/api/v1/operator/slice", json!({"sst": 1})),
        (
            "PUT",
            "/api/v1/operator/tracking",
            json!({"supportedTacs": ["000001"]}),
        ),
        (
            "PUT",
            "/api/v1/operator/code",
            json!({"operatorCode": OPERATOR_CODE}),
        ),
        (
            "PUT",
            "/api/v1/operator/home-network",
            json!({"privateKey": PRIVATE_KEY}),
        ),
        (
            "PUT",
            "/api/v1/networking/interfaces/n3",
            json!({"external_address": "10.0.0.1"}),
        ),
    ]
}

#[tokio::test]
async fn test_every_api_route_requires_a_token() {
    let node = TestNode::in_memory();
    for (method, uri, body) in writes() {
        let (status, body) = send(&node.router, method, uri, None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "Authorization token not found");
    }
    for uri in ["/api/v1/operator", "/api/v1/logs/audit", "/api/v1/radios"] {
        let (status, _) = node.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let node = TestNode::in_memory();
    let (status, body) = node
        .get("/api/v1/operator", Some("it-admin-token-012345678X"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_readonly_cannot_write_anything() {
    let node = TestNode::in_memory();
    for (method, uri, body) in writes() {
        let (status, _) = send(&node.router, method, uri, Some(VIEWER), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }

    // Forbidden attempts leave neither state nor audit trail
    let (status, _) = node.get("/api/v1/operator/id", Some(VIEWER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
    assert_eq!(body["result"]["total_count"], 0);
}

#[tokio::test]
async fn test_manager_writes_config_but_not_retention() {
    let node = TestNode::in_memory();
    for (method, uri, body) in writes() {
        let (status, _) = send(&node.router, method, uri, Some(MANAGER), Some(body)).await;
        assert!(status.is_success(), "{} {} -> {}", method, uri, status);
    }

    let (status, _) = node
        .put("/api/v1/logs/audit/retention", MANAGER, json!({"days": 3}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = node
        .put("/api/v1/logs/audit/retention", ADMIN, json!({"days": 3}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_readonly_cannot_manage_radios() {
    let node = TestNode::in_memory();
    let (status, _) = node
        .post(
            "/api/v1/radios",
            VIEWER,
            json!({"name": "gnb-1", "mcc": "001", "mnc": "01", "tac": "000001"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = node.get("/api/v1/radios", Some(VIEWER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!([]));
}
