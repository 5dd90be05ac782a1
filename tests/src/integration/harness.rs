//! Shared fixtures for the HTTP scenarios.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ec_01_operator_identity::{
    ConsistencyEnforcer, EnforcerConfig, EnforcerDependencies, InMemoryIdentityStore,
    InMemoryRadioRegistry,
};
use ec_02_change_log::{AuditSink, InMemoryAuditLog};
use ec_03_api_gateway::{ApiGatewayService, GatewayConfig, TokenConfig};
use serde_json::Value;
use shared_types::Role;
use tower::ServiceExt;

pub const ADMIN: &str = "it-admin-token-0123456789";
pub const MANAGER: &str = "it-manager-token-0123456789";
pub const VIEWER: &str = "it-viewer-token-0123456789";

pub const OPERATOR_CODE: &str = "c0ffee00c0ffee00c0ffee00c0ffee00";
pub const PRIVATE_KEY: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";

/// Gateway config carrying one token per role.
pub fn gateway_config() -> GatewayConfig {
    GatewayConfig {
        tokens: vec![
            TokenConfig::new(ADMIN, "admin@ella", Role::Admin),
            TokenConfig::new(MANAGER, "ops@ella", Role::NetworkManager),
            TokenConfig::new(VIEWER, "viewer@ella", Role::ReadOnly),
        ],
        ..Default::default()
    }
}

/// A router over in-memory storage, plus the enforcer behind it.
pub struct TestNode {
    pub router: Router,
    pub enforcer: Arc<ConsistencyEnforcer>,
    pub audit: Arc<dyn AuditSink>,
}

impl TestNode {
    pub fn in_memory() -> Self {
        let audit: Arc<dyn AuditSink> = Arc::new(InMemoryAuditLog::new());
        let enforcer = Arc::new(ConsistencyEnforcer::new(
            EnforcerDependencies {
                store: Arc::new(InMemoryIdentityStore::new()),
                audit: Arc::clone(&audit),
                radios: Arc::new(InMemoryRadioRegistry::new()),
            },
            EnforcerConfig::default(),
        ));
        Self::over(enforcer, audit)
    }

    pub fn over(enforcer: Arc<ConsistencyEnforcer>, audit: Arc<dyn AuditSink>) -> Self {
        let router = ApiGatewayService::new(gateway_config(), enforcer.clone(), Arc::clone(&audit))
            .unwrap()
            .router();
        Self {
            router,
            enforcer,
            audit,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        send(&self.router, "GET", uri, token, None).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, "PUT", uri, Some(token), Some(body)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, "POST", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        send(&self.router, "DELETE", uri, Some(token), None).await
    }
}

/// Send one request and decode the JSON body (`Null` when not JSON).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, text) = send_raw(router, method, uri, token, body).await;
    let value = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, value)
}

/// Like [`send`] but returns the body text unparsed.
pub async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
