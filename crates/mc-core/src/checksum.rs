//! SHA-256 checksums and catalog fingerprints.

use crate::domain::DomainCatalog;
use crate::error::CoreResult;
use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Stable fingerprint of a domain catalog's content.
///
/// The model holds only ordered collections, so the JSON form and therefore
/// the hash are identical across runs.
pub fn catalog_fingerprint(catalog: &DomainCatalog) -> CoreResult<String> {
    let json = serde_json::to_string(catalog)?;
    Ok(compute_checksum(&json))
}
