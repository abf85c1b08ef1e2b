// src/repository/index.rs

//! Parsed package index of one repository architecture

use super::parsers::plist::Value;
use crate::error::{Error, Result};
use crate::package::PackageRecord;
use std::collections::BTreeMap;

/// Ordered mapping from index key (the package name) to package record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageIndex {
    packages: BTreeMap<String, PackageRecord>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under the name derived from its pkgver
    pub fn insert(&mut self, record: PackageRecord) -> Option<PackageRecord> {
        self.packages.insert(record.name().to_string(), record)
    }

    /// Insert a record under an explicit package name
    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        record: PackageRecord,
    ) -> Option<PackageRecord> {
        self.packages.insert(name.into(), record)
    }

    pub fn get(&self, key: &str) -> Option<&PackageRecord> {
        self.packages.get(key)
    }

    /// Records in the index's native order
    pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    /// Package names with their records, in the index's native order
    ///
    /// The name is the index key, which holds even when the pkgver carries
    /// no revision to split on.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PackageRecord)> {
        self.packages
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Build an index from the root dictionary of an `index.plist`
    pub fn from_plist(root: &Value) -> Result<Self> {
        let entries = root.as_dict().ok_or_else(|| {
            Error::ParseError(format!("index root is a {}, expected dict", root.kind()))
        })?;

        let mut packages = BTreeMap::new();
        for (key, value) in entries {
            let pkgd = value.as_dict().ok_or_else(|| {
                Error::ParseError(format!("entry {} is a {}, expected dict", key, value.kind()))
            })?;

            let pkgver = pkgd
                .get("pkgver")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::ParseError(format!("entry {} has no pkgver", key)))?;

            let record = PackageRecord {
                pkgver: pkgver.to_string(),
                run_depends: string_list(pkgd, key, "run_depends")?,
                provides: string_list(pkgd, key, "provides")?,
                shlib_provides: string_list(pkgd, key, "shlib-provides")?,
                shlib_requires: string_list(pkgd, key, "shlib-requires")?,
            };
            packages.insert(key.clone(), record);
        }

        Ok(Self { packages })
    }
}

impl FromIterator<PackageRecord> for PackageIndex {
    fn from_iter<I: IntoIterator<Item = PackageRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

impl<K: Into<String>> FromIterator<(K, PackageRecord)> for PackageIndex {
    fn from_iter<I: IntoIterator<Item = (K, PackageRecord)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, record) in iter {
            index.insert_named(name, record);
        }
        index
    }
}

/// Read an optional array-of-strings field
fn string_list(pkgd: &BTreeMap<String, Value>, pkg: &str, field: &str) -> Result<Vec<String>> {
    let Some(value) = pkgd.get(field) else {
        return Ok(Vec::new());
    };

    let items = value.as_array().ok_or_else(|| {
        Error::ParseError(format!(
            "{} of {} is a {}, expected array",
            field,
            pkg,
            value.kind()
        ))
    })?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                Error::ParseError(format!(
                    "{} of {} contains a {}, expected string",
                    field,
                    pkg,
                    item.kind()
                ))
            })
        })
        .collect()
}
