//! Gateway middleware stack.
//!
//! Applied outermost first: tracing, CORS, timeout, auth.

pub mod auth;
pub mod cors;
pub mod timeout;
pub mod tracing;

pub use auth::{constant_time_compare, AuthLayer, PUBLIC_PATHS};
pub use cors::create_cors_layer;
pub use timeout::TimeoutLayer;
pub use self::tracing::{TracingLayer, REQUEST_ID_HEADER};
