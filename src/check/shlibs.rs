// src/check/shlibs.rs

//! Shared library check
//!
//! Unlike package names, a shared library may be exported by several
//! packages, so the provide set only records presence.

use super::Finding;
use crate::repository::Registry;
use std::collections::HashSet;
use tracing::debug;

/// Every shared library exported anywhere in the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShlibProvides {
    shlibs: HashSet<String>,
}

impl ShlibProvides {
    pub fn contains(&self, shlib: &str) -> bool {
        self.shlibs.contains(shlib)
    }

    pub fn len(&self) -> usize {
        self.shlibs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shlibs.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ShlibProvides {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            shlibs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Union the `shlib-provides` of every package
pub fn collect_shlib_provides(registry: &Registry) -> ShlibProvides {
    let provides: ShlibProvides = registry
        .indexes()
        .flat_map(|index| index.packages())
        .flat_map(|pkg| pkg.shlib_provides.iter().cloned())
        .collect();

    debug!("{} shared libraries provided", provides.len());
    provides
}

/// Report every `shlib-requires` entry nobody provides
pub fn validate_shlib_requires(registry: &Registry, provides: &ShlibProvides) -> Vec<Finding> {
    let mut findings = Vec::new();

    for index in registry.indexes() {
        for pkg in index.packages() {
            for shlib in &pkg.shlib_requires {
                if !provides.contains(shlib) {
                    findings.push(Finding::MissingShlib {
                        name: shlib.clone(),
                        required_by: pkg.pkgver.clone(),
                    });
                }
            }
        }
    }

    findings
}
