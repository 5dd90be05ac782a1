//! # Concurrent Updates
//!
//! Concurrent writers are serialized; readers only ever observe a PLMN some
//! writer actually submitted.

use std::collections::HashMap;

use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use super::harness::{TestNode, ADMIN, MANAGER, VIEWER};

const PLMNS: &[(&str, &str)] = &[
    ("001", "01"),
    ("310", "410"),
    ("208", "93"),
    ("999", "999"),
    ("234", "15"),
    ("505", "02"),
];

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identity_updates_never_mix() {
    let node = TestNode::in_memory();
    let expected: HashMap<&str, &str> = PLMNS.iter().copied().collect();

    let writes = PLMNS.iter().map(|(mcc, mnc)| {
        let node = &node;
        async move {
            node.put("/api/v1/operator/id", ADMIN, json!({"mcc": mcc, "mnc": mnc}))
                .await
        }
    });
    let reads = (0..PLMNS.len()).map(|_| {
        let node = &node;
        async move { node.get("/api/v1/operator/id", Some(VIEWER)).await }
    });

    let (written, read) = tokio::join!(join_all(writes), join_all(reads));

    for (status, body) in written {
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
    for (status, body) in read {
        if status == StatusCode::NOT_FOUND {
            continue;
        }
        assert_eq!(status, StatusCode::OK);
        let mcc = body["result"]["mcc"].as_str().unwrap();
        let mnc = body["result"]["mnc"].as_str().unwrap();
        assert_eq!(expected.get(mcc), Some(&mnc));
    }

    let (_, body) = node.get("/api/v1/operator/id", Some(VIEWER)).await;
    let mcc = body["result"]["mcc"].as_str().unwrap();
    let mnc = body["result"]["mnc"].as_str().unwrap();
    assert_eq!(expected.get(mcc), Some(&mnc));

    let (_, body) = node.get("/api/v1/logs/audit", Some(VIEWER)).await;
    assert_eq!(body["result"]["total_count"], PLMNS.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_to_different_resources_all_land() {
    let node = TestNode::in_memory();

    let (id, slice, tracking, n3) = tokio::join!(
        node.put("/api/v1/operator/id", ADMIN, json!({"mcc": "001", "mnc": "01"})),
        node.put("/api/v1/operator/slice", MANAGER, json!({"sst": 1, "sd": "000001"})),
        node.put(
            "/api/v1/operator/tracking",
            MANAGER,
            json!({"supportedTacs": ["000001", "000002"]}),
        ),
        node.put(
            "/api/v1/networking/interfaces/n3",
            ADMIN,
            json!({"external_address": "10.1.2.3"}),
        ),
    );
    assert_eq!(id.0, StatusCode::CREATED);
    assert_eq!(slice.0, StatusCode::CREATED);
    assert_eq!(tracking.0, StatusCode::CREATED);
    assert_eq!(n3.0, StatusCode::OK);

    let (_, body) = node.get("/api/v1/operator", Some(VIEWER)).await;
    let operator = &body["result"];
    assert_eq!(operator["id"], json!({"mcc": "001", "mnc": "01"}));
    assert_eq!(operator["slice"], json!({"sst": 1, "sd": "000001"}));
    assert_eq!(
        operator["tracking"]["supportedTacs"],
        json!(["000001", "000002"])
    );

    let (_, body) = node
        .get("/api/v1/networking/interfaces/n3", Some(VIEWER))
        .await;
    assert_eq!(body["result"]["external_address"], "10.1.2.3");
}
