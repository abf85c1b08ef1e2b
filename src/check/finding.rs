// src/check/finding.rs

//! Reported repository inconsistencies

use serde::Serialize;
use std::fmt;

/// An inconsistency found in the audited repositories
///
/// Findings never abort a check; every one of them is reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// A package or virtual name is supplied by more than one package
    DuplicateProvider {
        /// Bare package or virtual name
        name: String,
        /// Package that supplied the name before
        previous: String,
        /// Package that supplies it now
        pkgver: String,
    },

    /// No package supplies a runtime dependency
    MissingDependency { name: String, required_by: String },

    /// No package exports a required shared library
    MissingShlib { name: String, required_by: String },
}

impl Finding {
    /// Name the finding is about
    pub fn name(&self) -> &str {
        match self {
            Finding::DuplicateProvider { name, .. }
            | Finding::MissingDependency { name, .. }
            | Finding::MissingShlib { name, .. } => name,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DuplicateProvider {
                name,
                previous,
                pkgver,
            } => write!(f, "{}: already here ({}, now {})", name, previous, pkgver),
            Finding::MissingDependency { name, required_by }
            | Finding::MissingShlib { name, required_by } => {
                write!(f, "{}: missing (required by {})", name, required_by)
            }
        }
    }
}
