//! In-memory identity store for tests and ephemeral runs.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::domain::{Mutation, OperatorIdentity, StoreError};
use crate::ports::IdentityStore;

/// Copy-on-write record behind a read/write lock. Readers clone the `Arc`;
/// a write builds the next record off to the side and swaps the pointer.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    current: RwLock<Arc<OperatorIdentity>>,
    writer: Mutex<()>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: OperatorIdentity) -> Self {
        Self {
            current: RwLock::new(Arc::new(identity)),
            writer: Mutex::new(()),
        }
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn read(&self) -> Result<Arc<OperatorIdentity>, StoreError> {
        Ok(Arc::clone(&self.current.read()))
    }

    fn write_subresource(&self, mutation: &Mutation) -> Result<Arc<OperatorIdentity>, StoreError> {
        let _writer = self.writer.lock();
        let next = Arc::new(self.current.read().apply(mutation));
        *self.current.write() = Arc::clone(&next);
        Ok(next)
    }
}
