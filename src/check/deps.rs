// src/check/deps.rs

//! Runtime dependency check

use super::{Finding, ProviderIndex};
use crate::package::pattern_name;
use crate::repository::Registry;
use tracing::debug;

/// Report every runtime dependency no package or virtual name satisfies
///
/// Only the bare name of a dependency pattern is looked up; version
/// qualifiers are not evaluated.
pub fn validate_dependencies(registry: &Registry, providers: &ProviderIndex) -> Vec<Finding> {
    let mut findings = Vec::new();

    for index in registry.indexes() {
        for pkg in index.packages() {
            for dep in &pkg.run_depends {
                let name = pattern_name(dep);
                if !providers.contains(name) {
                    debug!("{} (from {}) not provided by any repository", dep, pkg.pkgver);
                    findings.push(Finding::MissingDependency {
                        name: name.to_string(),
                        required_by: pkg.pkgver.clone(),
                    });
                }
            }
        }
    }

    findings
}
