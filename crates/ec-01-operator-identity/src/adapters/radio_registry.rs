//! In-process radio registry.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{AttachedRadio, RegistryError};
use crate::ports::RadioRegistry;

/// Attached radios keyed by name.
#[derive(Debug, Default)]
pub struct InMemoryRadioRegistry {
    radios: RwLock<BTreeMap<String, AttachedRadio>>,
}

impl InMemoryRadioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.radios.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.radios.read().is_empty()
    }

    fn publish_gauge(radios: &BTreeMap<String, AttachedRadio>) {
        ella_telemetry::RADIOS_ATTACHED.set(radios.len() as i64);
    }
}

#[async_trait]
impl RadioRegistry for InMemoryRadioRegistry {
    async fn attached_radios(&self) -> Result<Vec<AttachedRadio>, RegistryError> {
        Ok(self.radios.read().values().cloned().collect())
    }

    async fn attach(&self, radio: AttachedRadio) -> Result<(), RegistryError> {
        let mut radios = self.radios.write();
        radios.insert(radio.name.clone(), radio);
        Self::publish_gauge(&radios);
        Ok(())
    }

    async fn detach(&self, name: &str) -> Result<Option<AttachedRadio>, RegistryError> {
        let mut radios = self.radios.write();
        let removed = radios.remove(name);
        Self::publish_gauge(&radios);
        Ok(removed)
    }
}
