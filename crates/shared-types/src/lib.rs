//! # Shared Types Crate
//!
//! Primitives used by more than one Ella Core configuration crate: the
//! authenticated `Actor` with its role and permissions, the sub-resource kinds
//! that mutations and audit entries address, and page-based listing.

pub mod actor;
pub mod errors;
pub mod pagination;
pub mod resource;

pub use actor::{Actor, Permission, Role};
pub use errors::SharedError;
pub use pagination::{Page, PageRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use resource::SubResource;
