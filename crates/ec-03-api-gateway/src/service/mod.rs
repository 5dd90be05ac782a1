//! API Gateway service: router construction and the HTTP server loop.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use ec_01_operator_identity::OperatorConfigApi;
use ec_02_change_log::AuditSink;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::handlers::{audit, networking, operator, radios, status, AppState};
use crate::middleware::{create_cors_layer, AuthLayer, TimeoutLayer, TracingLayer};

/// Build the full router with its middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let router = Router::new()
        .route("/api/v1/operator", get(operator::get_operator))
        .route(
            "/api/v1/operator/id",
            get(operator::get_operator_id).put(operator::update_operator_id),
        )
        .route(
            "/api/v1/operator/id/staged",
            get(operator::get_staged_identity_change)
                .post(operator::commit_staged_identity_change)
                .delete(operator::discard_staged_identity_change),
        )
        .route(
            "/api/v1/operator/slice",
            get(operator::get_operator_slice).put(operator::update_operator_slice),
        )
        .route(
            "/api/v1/operator/tracking",
            get(operator::get_operator_tracking).put(operator::update_operator_tracking),
        )
        // Write-only: the operator code is never returned
        .route(
            "/api/v1/operator/code",
            axum::routing::put(operator::update_operator_code),
        )
        .route(
            "/api/v1/operator/home-network",
            get(operator::get_operator_home_network).put(operator::update_operator_home_network),
        )
        .route(
            "/api/v1/networking/interfaces/n3",
            get(networking::get_n3_interface).put(networking::update_n3_interface),
        )
        .route("/api/v1/logs/audit", get(audit::list_audit_logs))
        .route(
            "/api/v1/logs/audit/retention",
            get(audit::get_audit_retention).put(audit::update_audit_retention),
        )
        .route(
            "/api/v1/radios",
            get(radios::list_radios).post(radios::attach_radio),
        )
        .route("/api/v1/radios/:name", delete(radios::detach_radio))
        .route("/api/v1/status", get(status::get_status))
        .route("/metrics", get(status::get_metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(AuthLayer::new(config.tokens.clone()))
        .layer(TimeoutLayer::new(config.request_timeout));

    let router = match create_cors_layer(&config.cors) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TracingLayer::new())
}

/// API Gateway service
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(
        config: GatewayConfig,
        operator: Arc<dyn OperatorConfigApi>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        if config.tokens.is_empty() {
            warn!("No API tokens configured; every protected route will answer 401");
        }

        Ok(Self {
            config,
            state: AppState::new(operator, audit),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.listen;
        TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Serve until `shutdown` turns `true` or its sender is dropped.
    ///
    /// In-flight requests are drained before this returns.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Server(e.to_string()))?;
        info!(addr = %local_addr, "API Gateway listening");

        let router = self.router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            info!("API Gateway received shutdown signal");
        })
        .await
        .map_err(|e| GatewayError::Server(e.to_string()))?;

        info!("API Gateway stopped");
        Ok(())
    }

    /// Bind and serve.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
