//! Catalog project discovery and loading

mod loading;

use crate::config::Config;
use crate::domain::DomainCatalog;
use crate::error::{CoreError, CoreResult};
use crate::names::DomainId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A loaded catalog project
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,

    /// Domains keyed by id (sorted)
    pub domains: BTreeMap<DomainId, DomainCatalog>,
}

impl Project {
    /// Look up a domain by id.
    pub fn get_domain(&self, id: &str) -> Option<&DomainCatalog> {
        self.domains.get(id)
    }

    /// Look up a domain, failing with [`CoreError::DomainNotFound`].
    pub fn require_domain(&self, id: &str) -> CoreResult<&DomainCatalog> {
        self.get_domain(id).ok_or_else(|| CoreError::DomainNotFound { id: id.to_string() })
    }

    /// Domain ids in sorted order.
    pub fn domain_ids(&self) -> Vec<&str> {
        self.domains.keys().map(DomainId::as_str).collect()
    }

    /// Export output directory.
    pub fn target_dir(&self) -> PathBuf {
        self.config.target_path_absolute(&self.root)
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
