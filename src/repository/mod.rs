// src/repository/mod.rs

//! Repository registry
//!
//! This module provides:
//! - Scanning repository directories for architecture indexes
//! - Opening the published and staged index of each selected architecture
//! - The ordered set of repositories every check walks over

pub mod index;
pub mod loader;
pub mod parsers;

pub use index::PackageIndex;
pub use loader::{IndexFile, RepodataLoader, RepositoryLoader};

use crate::config::CheckConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Indexes opened for one architecture of a repository
#[derive(Debug, Clone)]
pub struct ArchIndex {
    pub arch: String,

    /// Published index
    pub public: PackageIndex,

    /// Staged index, if the repository has one
    pub stage: Option<PackageIndex>,
}

/// A scanned repository directory
#[derive(Debug, Clone)]
pub struct Repository {
    pub path: PathBuf,

    /// Opened architectures, most recently opened first
    pub archs: Vec<ArchIndex>,
}

impl Repository {
    /// Create a repository entry with no architecture selected
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            archs: Vec::new(),
        }
    }

    /// Create a repository entry around an already parsed public index
    pub fn with_index(path: impl Into<PathBuf>, arch: impl Into<String>, index: PackageIndex) -> Self {
        Self {
            path: path.into(),
            archs: vec![ArchIndex {
                arch: arch.into(),
                public: index,
                stage: None,
            }],
        }
    }

    /// The architecture the checks run against
    pub fn selected(&self) -> Option<&ArchIndex> {
        self.archs.first()
    }

    /// Published index of the selected architecture
    pub fn index(&self) -> Option<&PackageIndex> {
        self.selected().map(|arch| &arch.public)
    }
}

/// All repositories taking part in a check, most recently added first
#[derive(Debug, Clone)]
pub struct Registry {
    target_arch: String,
    repositories: Vec<Repository>,
}

impl Registry {
    /// Create an empty registry selecting `target_arch` in mono-arch mode
    pub fn new(target_arch: impl Into<String>) -> Self {
        Self {
            target_arch: target_arch.into(),
            repositories: Vec::new(),
        }
    }

    pub fn target_arch(&self) -> &str {
        &self.target_arch
    }

    /// Scan `path` and register it as a repository
    ///
    /// With `mono_arch` set, indexes for any architecture other than the
    /// target one are skipped without being opened. A repository left
    /// without any architecture is still registered; the checks skip it.
    ///
    /// Failing to open a published index is an error, as is any staged
    /// index failure other than the staged index not existing.
    pub fn add_repository<L: RepositoryLoader + ?Sized>(
        &mut self,
        loader: &L,
        path: &Path,
        mono_arch: bool,
    ) -> Result<&Repository> {
        debug!("Scanning repository: {}", path.display());

        let mut repo = Repository::new(path);
        for file in loader.list_index_files(path)? {
            if file.stage {
                continue;
            }

            if mono_arch && file.arch != self.target_arch {
                debug!("  skipping architecture: {}", file.arch);
                continue;
            }
            debug!("  found architecture: {}", file.arch);

            let public = loader.open_public(path, &file.arch).map_err(|e| Error::Repodata {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

            let stage = match loader.open_stage(path, &file.arch) {
                Ok(stage) => Some(stage),
                Err(e) if e.is_not_found() => {
                    debug!("  no stagedata for {}", file.arch);
                    None
                }
                Err(e) => {
                    return Err(Error::Stagedata {
                        path: path.to_path_buf(),
                        source: Box::new(e),
                    })
                }
            };

            repo.archs.insert(
                0,
                ArchIndex {
                    arch: file.arch,
                    public,
                    stage,
                },
            );
        }

        match repo.selected() {
            Some(selected) => info!(
                "Loaded {} packages for {} from {}",
                selected.public.len(),
                selected.arch,
                path.display()
            ),
            None => info!(
                "No {} index in {}, skipping",
                self.target_arch,
                path.display()
            ),
        }

        self.repositories.insert(0, repo);
        Ok(&self.repositories[0])
    }

    /// Register an already loaded repository
    pub fn push(&mut self, repo: Repository) {
        self.repositories.insert(0, repo);
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Selected indexes of every repository, in registry order
    pub fn indexes(&self) -> impl Iterator<Item = &PackageIndex> {
        self.repositories.iter().filter_map(Repository::index)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

/// Populate a registry with every repository named in `config`
///
/// Stops at the first repository that cannot be loaded.
pub fn load_registry<L: RepositoryLoader + ?Sized>(
    loader: &L,
    config: &CheckConfig,
) -> Result<Registry> {
    let mut registry = Registry::new(config.target_arch.clone());
    for path in &config.repositories {
        registry.add_repository(loader, path, config.mono_arch)?;
    }
    Ok(registry)
}

#[cfg(test)]
impl Registry {
    /// Registry over in-memory indexes, added in order so the last one is
    /// walked first
    pub(crate) fn from_indexes(indexes: Vec<PackageIndex>) -> Self {
        let mut registry = Registry::new("x86_64");
        for (i, index) in indexes.into_iter().enumerate() {
            registry.push(Repository::with_index(format!("/repo{}", i), "x86_64", index));
        }
        registry
    }

    /// Like [`Registry::from_indexes`], keying records by their pkgver name
    pub(crate) fn from_records(repos: Vec<Vec<crate::package::PackageRecord>>) -> Self {
        Self::from_indexes(
            repos
                .into_iter()
                .map(|records| records.into_iter().collect())
                .collect(),
        )
    }
}
