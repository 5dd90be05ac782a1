//! # Operator Identity (ec-01)
//!
//! Owns the singleton operator record: PLMN, network slice, supported tracking
//! areas, operator code, home-network key and the N3 external address.
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No torn reads | Copy-on-write `Arc` swap in the identity store |
//! | Single writer | Async writer gate in `ConsistencyEnforcer` |
//! | Write-ahead audit | Entry recorded before the store write |
//! | Secrets stay internal | `OperatorView` has no field for secret material |
//! | Safe PLMN changes | `Prepare -> Confirm -> Commit/Abort` against the radio registry |
//!
//! ## Crate Structure
//!
//! - `domain/` - Value objects, validator, mutations, invariants, staging
//! - `ports/` - `OperatorConfigApi` (inbound); store and registry (outbound)
//! - `adapters/` - Memory and file stores, directory lock, radio registry
//! - `service/` - The consistency enforcer
//! - `bootstrap` - Factory defaults

pub mod adapters;
pub mod bootstrap;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileIdentityStore, InMemoryIdentityStore, InMemoryRadioRegistry};
pub use domain::{
    ApplyReceipt, AttachedRadio, ConflictError, Field, MutationRequest, N3View, NotFoundError,
    OperatorError, OperatorResult, OperatorView, RadioRequest, RawSecret, RegistryError, SdInput,
    StagedChangeView, StoreError, SubResourceView, ValidationError,
};
pub use ports::{IdentityStore, OperatorConfigApi, RadioRegistry};
pub use service::{ConsistencyEnforcer, EnforcerConfig, EnforcerDependencies};
