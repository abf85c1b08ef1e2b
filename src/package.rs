// src/package.rs

//! Package records as stored in a repository index
//!
//! A record is identified by its `pkgver` (`NAME-VERSION_REVISION`) and
//! carries the four name lists the checker audits. Dependency strings and
//! virtual provides may carry version qualifiers; the helpers here reduce
//! them to bare names without evaluating the qualifier.

/// Characters that start a version comparison in a dependency pattern
const COMPARISON_CHARS: &[char] = &['<', '>', '='];

/// Characters that mark a glob version pattern (`foo-[0-9]*`)
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// One package entry of a repository index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// Package-version string, e.g. `openssl-3.1.4_1`
    pub pkgver: String,

    /// Runtime dependency patterns (`run_depends`)
    pub run_depends: Vec<String>,

    /// Virtual packages this package satisfies (`provides`)
    pub provides: Vec<String>,

    /// Shared libraries exported by this package (`shlib-provides`)
    pub shlib_provides: Vec<String>,

    /// Shared libraries needed by this package (`shlib-requires`)
    pub shlib_requires: Vec<String>,
}

impl PackageRecord {
    /// Create a record with empty name lists
    pub fn new(pkgver: impl Into<String>) -> Self {
        Self {
            pkgver: pkgver.into(),
            ..Self::default()
        }
    }

    /// Bare package name derived from `pkgver`
    ///
    /// Falls back to the whole `pkgver` when it does not carry a revision.
    /// Repository indexes key records by their real name, see
    /// [`PackageIndex::entries`](crate::repository::PackageIndex::entries).
    pub fn name(&self) -> &str {
        split_pkgver(&self.pkgver)
            .map(|(name, _)| name)
            .unwrap_or(self.pkgver.as_str())
    }

    pub fn with_run_depends<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_depends = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = provides.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shlib_provides<I, S>(mut self, shlibs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shlib_provides = shlibs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shlib_requires<I, S>(mut self, shlibs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shlib_requires = shlibs.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a `NAME-VERSION_REVISION` string into name and version
///
/// Returns `None` unless the part after the last `-` is a version with a
/// numeric revision, so names like `python3-2to3` stay whole.
pub fn split_pkgver(pkgver: &str) -> Option<(&str, &str)> {
    let (name, version) = pkgver.rsplit_once('-')?;
    if name.is_empty() || !is_version(version) {
        return None;
    }
    Some((name, version))
}

fn is_version(version: &str) -> bool {
    match version.rsplit_once('_') {
        Some((ver, rev)) => {
            !ver.is_empty() && !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Reduce a pkgver or virtual name to its bare name
pub fn bare_name(name: &str) -> &str {
    split_pkgver(name).map(|(n, _)| n).unwrap_or(name)
}

/// Reduce a dependency pattern to the bare name it asks for
///
/// Handles comparison patterns (`foo>=1.0`, `foo<2`), exact pkgvers
/// (`foo-1.0_1`) and glob patterns (`foo-[0-9]*`). The qualifier itself is
/// never evaluated.
pub fn pattern_name(pattern: &str) -> &str {
    if let Some(pos) = pattern.find(COMPARISON_CHARS) {
        return &pattern[..pos];
    }

    if let Some((name, _)) = split_pkgver(pattern) {
        return name;
    }

    match pattern.rsplit_once('-') {
        Some((name, version)) if !name.is_empty() && version.contains(GLOB_CHARS) => name,
        _ => pattern,
    }
}
