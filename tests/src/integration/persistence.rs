//! # Restart Persistence
//!
//! The file backend keeps the operator record, the audit trail and the
//! retention policy across a restart.

use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use ella_runtime::config::{RuntimeConfig, StorageBackend};
use ella_runtime::container::ServiceContainer;
use serde_json::json;

use super::harness::{TestNode, ADMIN, MANAGER, OPERATOR_CODE, VIEWER};

fn file_config(dir: &Path) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = dir.to_path_buf();
    config
}

fn boot(dir: &Path) -> (ServiceContainer, TestNode) {
    let container = ServiceContainer::build(&file_config(dir)).unwrap();
    let node = TestNode::over(container.enforcer.clone(), Arc::clone(&container.audit));
    (container, node)
}

#[tokio::test]
async fn test_configuration_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (_container, node) = boot(dir.path());
        node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "310", "mnc": "410"}))
            .await;
        node.put(
            "/api/v1/operator/tracking",
            MANAGER,
            json!({"supportedTacs": ["0000FF", "00AB12"]}),
        )
        .await;
        node.put(
            "/api/v1/operator/code",
            ADMIN,
            json!({"operatorCode": OPERATOR_CODE}),
        )
        .await;
        let (status, _) = node
            .put("/api/v1/logs/audit/retention", ADMIN, json!({"days": 45}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_container, node) = boot(dir.path());

    let (status, body) = node.get("/api/v1/operator/id", Some(VIEWER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"mcc": "310", "mnc": "410"}));

    let (_, body) = node.get("/api/v1/operator/tracking", Some(VIEWER)).await;
    assert_eq!(body["result"]["supportedTacs"], json!(["0000ff", "00ab12"]));

    let (_, body) = node.get("/api/v1/operator", Some(VIEWER)).await;
    assert_eq!(body["result"]["operatorCodeSet"], true);

    let (_, body) = node.get("/api/v1/logs/audit/retention", Some(VIEWER)).await;
    assert_eq!(body["result"]["days"], 45);

    let (_, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
    assert_eq!(body["result"]["total_count"], 3);
}

#[tokio::test]
async fn test_audit_ids_keep_increasing_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first_id = {
        let (_container, node) = boot(dir.path());
        node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "01"}))
            .await;
        let (_, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
        body["result"]["items"][0]["id"].as_u64().unwrap()
    };

    let (_container, node) = boot(dir.path());
    node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "02"}))
        .await;
    let (_, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
    let newest = body["result"]["items"][0]["id"].as_u64().unwrap();
    assert!(newest > first_id);
}

#[tokio::test]
async fn test_seeded_defaults_persist() {
    let dir = tempfile::tempdir().unwrap();

    let public_key = {
        let (container, node) = boot(dir.path());
        container.enforcer.seed_defaults().await.unwrap();
        let (_, body) = node
            .get("/api/v1/operator/home-network", Some(VIEWER))
            .await;
        body["result"]["publicKey"].as_str().unwrap().to_string()
    };

    let (container, node) = boot(dir.path());
    assert_eq!(container.enforcer.seed_defaults().await.unwrap(), 0);

    let (_, body) = node.get("/api/v1/status", None).await;
    assert_eq!(body["result"]["initialized"], true);

    let (_, body) = node
        .get("/api/v1/operator/home-network", Some(VIEWER))
        .await;
    assert_eq!(body["result"]["publicKey"], public_key);
}

#[test]
fn test_second_process_on_same_data_dir_refused() {
    let dir = tempfile::tempdir().unwrap();
    let _first = ServiceContainer::build(&file_config(dir.path())).unwrap();
    assert!(ServiceContainer::build(&file_config(dir.path())).is_err());
}
