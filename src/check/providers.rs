// src/check/providers.rs

//! Global provider index
//!
//! Maps every consumable name (a package's bare name and each virtual name
//! it provides) to the pkgver supplying it. A name should have exactly one
//! supplier; when a second one shows up the collision is reported and the
//! later supplier replaces the earlier one.

use super::Finding;
use crate::package::bare_name;
use crate::repository::{PackageIndex, Registry};
use std::collections::HashMap;
use tracing::debug;

/// Name to supplier mapping across all repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderIndex {
    providers: HashMap<String, String>,
}

impl ProviderIndex {
    /// Supplier of `name`, if any
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.providers.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Accumulates providers and the collisions seen while doing so
#[derive(Debug, Default)]
pub struct ProviderIndexBuilder {
    index: ProviderIndex,
    findings: Vec<Finding>,
}

impl ProviderIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as supplied by `pkgver`
    ///
    /// An existing supplier is reported as a duplicate and then replaced.
    pub fn register(&mut self, name: &str, pkgver: &str) {
        if let Some(previous) = self
            .index
            .providers
            .insert(name.to_string(), pkgver.to_string())
        {
            debug!("{} already here ({})", name, previous);
            self.findings.push(Finding::DuplicateProvider {
                name: name.to_string(),
                previous,
                pkgver: pkgver.to_string(),
            });
        }
    }

    /// Register a package's own name and all its virtual names
    pub fn add_index(&mut self, index: &PackageIndex) {
        for (name, pkg) in index.entries() {
            self.register(name, &pkg.pkgver);
            for provided in &pkg.provides {
                self.register(bare_name(provided), &pkg.pkgver);
            }
        }
    }

    pub fn finish(self) -> (ProviderIndex, Vec<Finding>) {
        (self.index, self.findings)
    }
}

/// Build the provider index over every selected index of the registry
pub fn build_provider_index(registry: &Registry) -> (ProviderIndex, Vec<Finding>) {
    let mut builder = ProviderIndexBuilder::new();
    for index in registry.indexes() {
        builder.add_index(index);
    }

    let (index, findings) = builder.finish();
    debug!(
        "Provider index: {} names, {} collisions",
        index.len(),
        findings.len()
    );
    (index, findings)
}
