pub mod config;
pub mod error;

pub use config::{humantime_serde, ConfigError, CorsConfig, GatewayConfig, TokenConfig};
pub use error::{ApiError, GatewayError};
