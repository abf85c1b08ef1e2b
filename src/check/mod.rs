// src/check/mod.rs

//! Cross-repository consistency checks
//!
//! Two independent phases run over a populated [`Registry`]:
//! - runtime dependencies, resolved against a global provider index
//!   built from package names and virtual provides
//! - shared libraries, resolved against the union of all `shlib-provides`
//!
//! Problems in the audited data are reported as [`Finding`]s and never stop
//! a phase.

pub mod deps;
pub mod finding;
pub mod providers;
pub mod shlibs;

pub use deps::validate_dependencies;
pub use finding::Finding;
pub use providers::{build_provider_index, ProviderIndex, ProviderIndexBuilder};
pub use shlibs::{collect_shlib_provides, validate_shlib_requires, ShlibProvides};

use crate::report::ReportSink;
use crate::repository::Registry;
use serde::Serialize;
use std::io;
use tracing::info;

/// Report section a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    RuntimeDependencies,
    SharedLibraries,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::RuntimeDependencies => "Runtime dependencies",
            Section::SharedLibraries => "Shared libraries",
        }
    }
}

/// Finding counts of a completed check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub missing_dependencies: usize,
    pub missing_shlibs: usize,
    pub duplicate_providers: usize,
}

impl Summary {
    pub fn record(&mut self, finding: &Finding) {
        match finding {
            Finding::DuplicateProvider { .. } => self.duplicate_providers += 1,
            Finding::MissingDependency { .. } => self.missing_dependencies += 1,
            Finding::MissingShlib { .. } => self.missing_shlibs += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_dependencies + self.missing_shlibs + self.duplicate_providers
    }
}

/// Findings of the runtime dependency phase, collisions first
pub fn check_dependencies(registry: &Registry) -> Vec<Finding> {
    let (providers, mut findings) = build_provider_index(registry);
    findings.extend(validate_dependencies(registry, &providers));
    findings
}

/// Findings of the shared library phase
pub fn check_shlibs(registry: &Registry) -> Vec<Finding> {
    let provides = collect_shlib_provides(registry);
    validate_shlib_requires(registry, &provides)
}

/// Run both phases and stream their findings into `sink`
///
/// Only failing to write the report is an error.
pub fn run(registry: &Registry, sink: &mut dyn ReportSink) -> io::Result<Summary> {
    let mut summary = Summary::default();

    info!("Checking runtime dependencies");
    sink.begin_section(Section::RuntimeDependencies)?;
    for finding in check_dependencies(registry) {
        summary.record(&finding);
        sink.finding(&finding)?;
    }

    info!("Checking shared libraries");
    sink.begin_section(Section::SharedLibraries)?;
    for finding in check_shlibs(registry) {
        summary.record(&finding);
        sink.finding(&finding)?;
    }

    sink.finish(&summary)?;
    info!("Check complete: {} findings", summary.total());
    Ok(summary)
}
