//! # Operator Workflows
//!
//! Identity, tracking and slice updates as an operator would run them,
//! including the rejection paths and what they leave behind.

use axum::http::StatusCode;
use serde_json::json;

use super::harness::{TestNode, ADMIN, MANAGER, VIEWER};

#[tokio::test]
async fn test_identity_update_then_invalid_mcc_keeps_previous() {
    let node = TestNode::in_memory();

    let (status, body) = node
        .put("/api/v1/operator/id", ADMIN, json!({"mcc": "310", "mnc": "410"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["result"]["message"], "Operator ID updated successfully");

    let (status, body) = node
        .put("/api/v1/operator/id", ADMIN, json!({"mcc": "31", "mnc": "410"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["mcc"], "MCC must be a 3 decimal digit");
    assert!(body["fields"].get("mnc").is_none());

    let (status, body) = node.get("/api/v1/operator/id", Some(VIEWER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"mcc": "310", "mnc": "410"}));
}

#[tokio::test]
async fn test_tracking_normalized_and_invalid_set_rejected_whole() {
    let node = TestNode::in_memory();

    let (status, body) = node
        .put(
            "/api/v1/operator/tracking",
            MANAGER,
            json!({"supportedTacs": ["0000FF", "00AB12"]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["result"]["message"],
        "Operator tracking information updated successfully"
    );

    let (_, body) = node.get("/api/v1/operator/tracking", Some(VIEWER)).await;
    assert_eq!(body["result"]["supportedTacs"], json!(["0000ff", "00ab12"]));

    let (status, body) = node
        .put(
            "/api/v1/operator/tracking",
            MANAGER,
            json!({"supportedTacs": ["000001", "XYZ"]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["supportedTacs"]
        .as_str()
        .unwrap()
        .contains("XYZ"));

    let (_, body) = node.get("/api/v1/operator/tracking", Some(VIEWER)).await;
    assert_eq!(body["result"]["supportedTacs"], json!(["0000ff", "00ab12"]));
}

#[tokio::test]
async fn test_empty_tracking_disables_radio_admission() {
    let node = TestNode::in_memory();
    node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "01"}))
        .await;

    let (status, _) = node
        .put("/api/v1/operator/tracking", ADMIN, json!({"supportedTacs": []}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = node.get("/api/v1/operator/tracking", Some(VIEWER)).await;
    assert_eq!(body["result"]["supportedTacs"], json!([]));

    let radio = json!({"name": "gnb-1", "mcc": "001", "mnc": "01", "tac": "000001"});
    let (status, body) = node.post("/api/v1/radios", MANAGER, radio.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("gnb-1"));

    node.put(
        "/api/v1/operator/tracking",
        ADMIN,
        json!({"supportedTacs": ["000001"]}),
    )
    .await;
    let (status, _) = node.post("/api/v1/radios", MANAGER, radio).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_radio_pins_plmn_until_detached() {
    let node = TestNode::in_memory();
    node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "01"}))
        .await;
    node.put(
        "/api/v1/operator/tracking",
        ADMIN,
        json!({"supportedTacs": ["000001"]}),
    )
    .await;
    node.post(
        "/api/v1/radios",
        MANAGER,
        json!({"name": "gnb-7", "mcc": "001", "mnc": "01", "tac": "000001"}),
    )
    .await;

    let (status, body) = node
        .put("/api/v1/operator/id", ADMIN, json!({"mcc": "310", "mnc": "410"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("gnb-7"));

    let (_, body) = node.get("/api/v1/operator/id", Some(VIEWER)).await;
    assert_eq!(body["result"], json!({"mcc": "001", "mnc": "01"}));

    let (status, _) = node.delete("/api/v1/radios/gnb-7", MANAGER).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = node
        .put("/api/v1/operator/id", ADMIN, json!({"mcc": "310", "mnc": "410"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_slice_update_replaces_whole_slice() {
    let node = TestNode::in_memory();

    let (status, _) = node
        .put("/api/v1/operator/slice", ADMIN, json!({"sst": 1, "sd": "ABCDEF"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = node.get("/api/v1/operator/slice", Some(VIEWER)).await;
    assert_eq!(body["result"], json!({"sst": 1, "sd": "abcdef"}));

    let (status, _) = node
        .put("/api/v1/operator/slice", ADMIN, json!({"sst": 2}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = node.get("/api/v1/operator/slice", Some(VIEWER)).await;
    assert_eq!(body["result"], json!({"sst": 2, "sd": null}));

    let (status, _) = node
        .put("/api/v1/operator/slice", ADMIN, json!({"sst": 3, "sd": ""}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = node.get("/api/v1/operator/slice", Some(VIEWER)).await;
    assert_eq!(body["result"], json!({"sst": 3, "sd": null}));

    let (status, body) = node
        .put("/api/v1/operator/slice", ADMIN, json!({"sst": 256, "sd": "12345"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["sst"].is_string());
    assert!(body["fields"]["sd"].is_string());
}

#[tokio::test]
async fn test_status_reports_initialized_after_full_setup() {
    let node = TestNode::in_memory();
    let (_, body) = node.get("/api/v1/status", None).await;
    assert_eq!(body["result"]["initialized"], false);

    node.enforcer.seed_defaults().await.unwrap();

    let (_, body) = node.get("/api/v1/status", None).await;
    assert_eq!(body["result"]["initialized"], true);
}

#[tokio::test]
async fn test_every_mutation_is_audited() {
    let node = TestNode::in_memory();
    node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "01"}))
        .await;
    node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "1", "mnc": "01"}))
        .await;
    node.put(
        "/api/v1/networking/interfaces/n3",
        MANAGER,
        json!({"external_address": "10.0.0.1"}),
    )
    .await;

    let (status, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["total_count"], 3);

    let items = body["result"]["items"].as_array().unwrap();
    assert_eq!(items[0]["actor"], "ops@ella");
    assert_eq!(items[2]["actor"], "admin@ella");
}
