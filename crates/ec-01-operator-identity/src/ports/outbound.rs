//! # Outbound Ports (Driven Ports)
//!
//! Dependencies of the consistency enforcer: the identity store, the radio
//! registry and the audit sink (re-exported from the change log).

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::SubResource;

use crate::domain::{
    AttachedRadio, Mutation, OperatorIdentity, RegistryError, StoreError,
};

pub use ec_02_change_log::AuditSink;

/// Holder of the singleton operator record.
///
/// Implementations must enforce:
/// - readers see either the old or the new record, never a mix
/// - a failed write leaves the published record unchanged
pub trait IdentityStore: Send + Sync {
    /// Snapshot of the whole internal record.
    fn read(&self) -> Result<Arc<OperatorIdentity>, StoreError>;

    /// Snapshot, failing with `NotInitialized` if `resource` was never written.
    fn read_subresource(&self, resource: SubResource) -> Result<Arc<OperatorIdentity>, StoreError> {
        let identity = self.read()?;
        if identity.is_initialized(resource) {
            Ok(identity)
        } else {
            Err(StoreError::NotInitialized { resource })
        }
    }

    /// Replace one sub-resource and publish the new record.
    fn write_subresource(&self, mutation: &Mutation) -> Result<Arc<OperatorIdentity>, StoreError>;
}

/// Local snapshot of attached radios. Queried, never waited on for radio I/O.
#[async_trait]
pub trait RadioRegistry: Send + Sync {
    async fn attached_radios(&self) -> Result<Vec<AttachedRadio>, RegistryError>;

    /// Insert or replace by name.
    async fn attach(&self, radio: AttachedRadio) -> Result<(), RegistryError>;

    /// Returns the removed radio, `None` if it was not attached.
    async fn detach(&self, name: &str) -> Result<Option<AttachedRadio>, RegistryError>;
}
