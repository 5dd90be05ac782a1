//! # Service Container
//!
//! Builds the store, audit log, radio registry and enforcer for the
//! configured backend and holds them for the lifetime of the process.
//!
//! ## File backend layout
//!
//! ```text
//! <data_dir>/operator/operator.json   operator record (0600)
//! <data_dir>/operator/LOCK            held while the process runs
//! <data_dir>/audit/audit.jsonl        audit entries
//! <data_dir>/audit/audit.meta.json    retention and id high-water mark
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use ec_01_operator_identity::{
    ConsistencyEnforcer, EnforcerConfig, EnforcerDependencies, FileIdentityStore,
    IdentityStore, InMemoryIdentityStore, InMemoryRadioRegistry,
};
use ec_02_change_log::{AuditSink, FileAuditLog, InMemoryAuditLog, RetentionPolicy};
use tracing::info;

use crate::config::{RuntimeConfig, StorageBackend};

pub struct ServiceContainer {
    pub enforcer: Arc<ConsistencyEnforcer>,
    pub audit: Arc<dyn AuditSink>,
    pub radios: Arc<InMemoryRadioRegistry>,
    pub backend: StorageBackend,
}

impl ServiceContainer {
    /// Open storage and wire the enforcer.
    ///
    /// The operator store is opened first so a second process on the same
    /// data directory fails on the lock before touching the audit log.
    pub fn build(config: &RuntimeConfig) -> Result<Self> {
        let initial_retention = RetentionPolicy::new(config.audit.initial_retention_days)
            .context("Invalid audit.initial_retention_days")?;

        let (store, audit): (Arc<dyn IdentityStore>, Arc<dyn AuditSink>) =
            match config.storage.backend {
                StorageBackend::File => {
                    let store = FileIdentityStore::open(config.storage.operator_dir())
                        .context("Failed to open operator store")?;

                    let audit_dir = config.storage.audit_dir();
                    let fresh = !audit_dir.exists();
                    let audit =
                        FileAuditLog::open(&audit_dir).context("Failed to open audit log")?;
                    if fresh {
                        audit
                            .set_retention(initial_retention)
                            .context("Failed to set initial audit retention")?;
                    }
                    (Arc::new(store), Arc::new(audit))
                }
                StorageBackend::Memory => {
                    let audit = InMemoryAuditLog::new();
                    audit
                        .set_retention(initial_retention)
                        .context("Failed to set initial audit retention")?;
                    (Arc::new(InMemoryIdentityStore::new()), Arc::new(audit))
                }
            };

        let radios = Arc::new(InMemoryRadioRegistry::new());
        let enforcer = ConsistencyEnforcer::new(
            EnforcerDependencies {
                store,
                audit: Arc::clone(&audit),
                radios: radios.clone(),
            },
            EnforcerConfig {
                precommit_timeout: config.operator.precommit_timeout,
            },
        );

        info!(backend = %config.storage.backend, "Service container ready");

        Ok(Self {
            enforcer: Arc::new(enforcer),
            audit,
            radios,
            backend: config.storage.backend,
        })
    }
}
