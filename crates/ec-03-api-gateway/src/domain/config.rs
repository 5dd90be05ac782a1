//! Gateway configuration.

use serde::{Deserialize, Serialize};
use shared_types::Role;
use std::collections::HashSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Tokens shorter than this are rejected by `validate`.
pub const MIN_TOKEN_LEN: usize = 16;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub listen: SocketAddr,
    /// Whole-request deadline. Mutations already admitted keep running.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
    /// Bearer token table
    pub tokens: Vec<TokenConfig>,
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5002),
            request_timeout: Duration::from_secs(10),
            max_body_bytes: 64 * 1024,
            tokens: Vec::new(),
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout cannot be 0".into(),
            ));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.tokens {
            if entry.subject.trim().is_empty() {
                return Err(ConfigError::Invalid("token subject cannot be empty".into()));
            }
            if entry.token.len() < MIN_TOKEN_LEN {
                return Err(ConfigError::WeakToken {
                    subject: entry.subject.clone(),
                });
            }
            if !seen.insert(entry.token.as_str()) {
                return Err(ConfigError::DuplicateToken {
                    subject: entry.subject.clone(),
                });
            }
        }

        Ok(())
    }
}

/// One API token and the identity it authenticates as.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub subject: String,
    pub role: Role,
}

impl TokenConfig {
    pub fn new(token: impl Into<String>, subject: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            subject: subject.into(),
            role,
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("token", &"***")
            .field("subject", &self.subject)
            .field("role", &self.role)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Two table entries share a token
    #[error("duplicate token configured for {subject}")]
    DuplicateToken { subject: String },
    #[error("token for {subject} is shorter than {min} characters", min = MIN_TOKEN_LEN)]
    WeakToken { subject: String },
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Durations written as `"250ms"`, `"5s"`, `"1m"` or plain seconds.
pub mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else if let Some(hours) = s.strip_suffix('h') {
            hours
                .trim()
                .parse::<u64>()
                .map(|h| Duration::from_secs(h * 3600))
                .map_err(|_| "invalid hours")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
