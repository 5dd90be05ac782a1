//! # API Gateway (ec-03)
//!
//! REST surface of the configuration service. Translates HTTP requests into
//! calls on `OperatorConfigApi` and `AuditSink` and maps domain errors to
//! status codes.
//!
//! ## Request Path
//!
//! ```text
//! TracingLayer -> CORS (optional) -> TimeoutLayer -> AuthLayer -> handler
//!                                                       |
//!                                   Actor in request extensions
//!                                                       |
//!                              permission check -> tokio::spawn(apply)
//! ```
//!
//! ## Status Mapping
//!
//! | Condition | Status |
//! |-----------|--------|
//! | Validation failure, malformed body | 400 |
//! | Missing or unknown bearer token | 401 |
//! | Role lacks permission | 403 |
//! | Not initialized, unknown radio | 404 |
//! | Business-rule conflict | 409 |
//! | Pre-commit timeout, registry unavailable | 503 |
//! | Store or audit failure | 500 |

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use domain::{ApiError, ConfigError, CorsConfig, GatewayConfig, GatewayError, TokenConfig};
pub use handlers::AppState;
pub use service::{build_router, ApiGatewayService};
