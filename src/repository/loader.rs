// src/repository/loader.rs

//! Locating and opening architecture indexes inside a repository directory
//!
//! Index files sit directly in the repository directory and are named
//! `<arch>-repodata` (the published index) or `<arch>-stagedata` (packages
//! waiting to be published).

use super::index::PackageIndex;
use super::parsers::repodata;
use crate::arch;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name suffix of a published index
pub const REPODATA_SUFFIX: &str = "repodata";

/// File name suffix of a staged index
pub const STAGEDATA_SUFFIX: &str = "stagedata";

/// An index file found in a repository directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFile {
    /// Architecture tag taken from the file name
    pub arch: String,

    /// Whether this is the staged variant
    pub stage: bool,
}

/// Access to the indexes of a repository
///
/// The registry only talks to repositories through this trait, so tests can
/// hand it in-memory indexes.
pub trait RepositoryLoader {
    /// List index files in `path`, sorted by file name
    fn list_index_files(&self, path: &Path) -> Result<Vec<IndexFile>>;

    /// Open the published index for one architecture
    fn open_public(&self, path: &Path, arch: &str) -> Result<PackageIndex>;

    /// Open the staged index for one architecture
    ///
    /// Absence is reported as an error for which
    /// [`Error::is_not_found`] holds.
    fn open_stage(&self, path: &Path, arch: &str) -> Result<PackageIndex>;
}

/// Loader for repodata files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RepodataLoader;

impl RepodataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Path of the published index for `arch`
    pub fn repodata_path(path: &Path, arch: &str) -> PathBuf {
        path.join(format!("{}-{}", arch, REPODATA_SUFFIX))
    }

    /// Path of the staged index for `arch`
    pub fn stagedata_path(path: &Path, arch: &str) -> PathBuf {
        path.join(format!("{}-{}", arch, STAGEDATA_SUFFIX))
    }
}

impl RepositoryLoader for RepodataLoader {
    fn list_index_files(&self, path: &Path) -> Result<Vec<IndexFile>> {
        let scan_error = |source| Error::Scan {
            path: path.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(scan_error)? {
            let entry = entry.map_err(scan_error)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        let mut files = Vec::new();
        for name in names {
            if let Some(file) = classify_index_file(&name)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    fn open_public(&self, path: &Path, arch: &str) -> Result<PackageIndex> {
        repodata::read_index(&Self::repodata_path(path, arch))
    }

    fn open_stage(&self, path: &Path, arch: &str) -> Result<PackageIndex> {
        repodata::read_index(&Self::stagedata_path(path, arch))
    }
}

/// Classify a directory entry name as an index file
///
/// Hidden files, names without a recognized suffix and names with an empty
/// architecture tag yield `None`. A recognized suffix with an unusable
/// architecture tag is an error.
pub fn classify_index_file(name: &str) -> Result<Option<IndexFile>> {
    if name.starts_with('.') {
        return Ok(None);
    }

    let Some((arch, suffix)) = name.rsplit_once('-') else {
        return Ok(None);
    };

    let stage = match suffix {
        REPODATA_SUFFIX => false,
        STAGEDATA_SUFFIX => true,
        _ => return Ok(None),
    };

    if arch.is_empty() {
        debug!("Ignoring {}: no architecture tag", name);
        return Ok(None);
    }

    if !arch::is_valid(arch) {
        return Err(Error::InvalidIndexName(name.to_string()));
    }

    debug!("Index file {} (arch {}, stage {})", name, arch, stage);
    Ok(Some(IndexFile {
        arch: arch.to_string(),
        stage,
    }))
}
