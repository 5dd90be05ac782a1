//! Value digests recorded in place of raw values.
//!
//! A digest is `hex(sha256(resource || 0x00 || canonical_bytes))`. The resource
//! prefix keeps equal byte strings under different sub-resources distinct.

use sha2::{Digest, Sha256};
use shared_types::SubResource;

pub fn value_digest(resource: SubResource, canonical: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resource.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(canonical);
    hex::encode(hasher.finalize())
}
