//! # Runtime Configuration
//!
//! One TOML file with a section per component. Every section and field has a
//! default, so an empty file (or none at all) is a valid development setup.
//!
//! ```toml
//! [gateway]
//! listen = "0.0.0.0:5002"
//! request_timeout = "10s"
//!
//! [[gateway.tokens]]
//! token = "change-me-to-a-long-random-string"
//! subject = "admin@ella"
//! role = "admin"
//!
//! [storage]
//! backend = "file"
//! data_dir = "/var/lib/ella-core"
//!
//! [operator]
//! precommit_timeout = "2s"
//! seed_defaults = true
//!
//! [audit]
//! initial_retention_days = 7
//! reaper_interval = "1h"
//! ```
//!
//! Precedence, lowest first: defaults, file, environment, command line.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ec_01_operator_identity::service::DEFAULT_PRECOMMIT_TIMEOUT;
use ec_02_change_log::{RetentionPolicy, DEFAULT_RETENTION_DAYS};
use ec_03_api_gateway::domain::humantime_serde;
use ec_03_api_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_CONFIG: &str = "ELLA_CONFIG";
pub const ENV_DATA_DIR: &str = "ELLA_DATA_DIR";
pub const ENV_LISTEN: &str = "ELLA_LISTEN";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub operator: OperatorConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Operator record and audit log persisted under `data_dir`.
    #[default]
    File,
    /// Nothing survives a restart. For development and tests.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => f.write_str("file"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("/var/lib/ella-core"),
        }
    }
}

impl StorageConfig {
    pub fn operator_dir(&self) -> PathBuf {
        self.data_dir.join("operator")
    }

    pub fn audit_dir(&self) -> PathBuf {
        self.data_dir.join("audit")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Bound on writer-gate wait plus radio confirmation.
    #[serde(with = "humantime_serde")]
    pub precommit_timeout: Duration,
    /// Write factory defaults to sub-resources that were never set.
    pub seed_defaults: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            precommit_timeout: DEFAULT_PRECOMMIT_TIMEOUT,
            seed_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Retention applied when the audit log is created. Afterwards the
    /// persisted policy, changed through the API, wins.
    pub initial_retention_days: u32,
    #[serde(with = "humantime_serde")]
    pub reaper_interval: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            initial_retention_days: DEFAULT_RETENTION_DAYS,
            reaper_interval: Duration::from_secs(3600),
        }
    }
}

/// Values from the environment or the command line that replace file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub listen: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os(ENV_DATA_DIR).map(PathBuf::from),
            listen: std::env::var(ENV_LISTEN).ok(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error(transparent)]
    Gateway(#[from] ec_03_api_gateway::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl RuntimeConfig {
    /// Load from `path`, or defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Self::parse(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply(&mut self, overrides: Overrides) -> Result<(), ConfigError> {
        if let Some(data_dir) = overrides.data_dir {
            self.storage.data_dir = data_dir;
        }
        if let Some(listen) = overrides.listen {
            self.gateway.listen = listen.parse::<SocketAddr>().map_err(|e| {
                ConfigError::Invalid(format!("listen address {:?}: {}", listen, e))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;

        if self.operator.precommit_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "operator.precommit_timeout cannot be 0".into(),
            ));
        }
        // Otherwise the gateway answers 503 before the enforcer can
        if self.operator.precommit_timeout >= self.gateway.request_timeout {
            return Err(ConfigError::Invalid(format!(
                "operator.precommit_timeout ({:?}) must be shorter than gateway.request_timeout ({:?})",
                self.operator.precommit_timeout, self.gateway.request_timeout
            )));
        }

        RetentionPolicy::new(self.audit.initial_retention_days)
            .map_err(|e| ConfigError::Invalid(format!("audit.initial_retention_days: {}", e)))?;

        if self.audit.reaper_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "audit.reaper_interval cannot be 0".into(),
            ));
        }

        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.data_dir is required for the file backend".into(),
            ));
        }

        Ok(())
    }
}
