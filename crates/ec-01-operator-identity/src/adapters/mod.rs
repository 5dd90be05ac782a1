pub mod file_store;
pub mod lock;
pub mod memory_store;
pub mod radio_registry;

pub use file_store::FileIdentityStore;
pub use lock::{DataDirLock, LockError};
pub use memory_store::InMemoryIdentityStore;
pub use radio_registry::InMemoryRadioRegistry;
