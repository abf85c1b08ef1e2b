// src/repository/parsers/repodata.rs

//! Repodata archive reader
//!
//! A repodata file is a tar archive, usually zstd compressed, holding
//! `index.plist` (the package index) next to `index-meta.plist` and
//! signature data. Only the package index is read.

use super::plist;
use crate::error::{Error, Result};
use crate::repository::index::PackageIndex;
use flate2::read::GzDecoder;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tar::Archive;
use tracing::debug;
use xz2::read::XzDecoder;

/// Archive member holding the package index
pub const INDEX_MEMBER: &str = "index.plist";

const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];
const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];

/// Compression wrapped around the repodata tarball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Zstd,
    Gzip,
    Xz,
    None,
}

impl CompressionFormat {
    /// Detect compression from the leading magic bytes
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(ZSTD_MAGIC) {
            CompressionFormat::Zstd
        } else if data.starts_with(GZIP_MAGIC) {
            CompressionFormat::Gzip
        } else if data.starts_with(XZ_MAGIC) {
            CompressionFormat::Xz
        } else {
            CompressionFormat::None
        }
    }
}

/// Read and parse the package index stored in a repodata file
///
/// A missing file yields [`Error::IndexNotFound`] so callers can tell
/// absence apart from corruption.
pub fn read_index(path: &Path) -> Result<PackageIndex> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::IndexNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let xml = extract_index_plist(&data)?;
    let root = plist::parse(&xml)?;
    let index = PackageIndex::from_plist(&root)?;

    debug!("Read {} packages from {}", index.len(), path.display());
    Ok(index)
}

/// Decompress a repodata archive and return the text of `index.plist`
pub fn extract_index_plist(data: &[u8]) -> Result<String> {
    let compression = CompressionFormat::detect(data);
    debug!("Repodata compression: {:?}", compression);

    let reader: Box<dyn Read + '_> = match compression {
        CompressionFormat::Zstd => {
            let decoder = zstd::Decoder::new(data)
                .map_err(|e| Error::ParseError(format!("Failed to create zstd decoder: {}", e)))?;
            Box::new(decoder)
        }
        CompressionFormat::Gzip => Box::new(GzDecoder::new(data)),
        CompressionFormat::Xz => Box::new(XzDecoder::new(data)),
        CompressionFormat::None => Box::new(data),
    };

    let mut archive = Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| Error::ParseError(format!("Failed to read repodata archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::ParseError(format!("Failed to read archive entry: {}", e)))?;

        let is_index = {
            let path = entry
                .path()
                .map_err(|e| Error::ParseError(format!("Invalid path in archive: {}", e)))?;
            path.strip_prefix("./").unwrap_or(path.as_ref()) == Path::new(INDEX_MEMBER)
        };

        if is_index {
            let mut content = String::new();
            entry.read_to_string(&mut content).map_err(|e| {
                Error::ParseError(format!("Failed to read {}: {}", INDEX_MEMBER, e))
            })?;
            return Ok(content);
        }
    }

    Err(Error::ParseError(format!(
        "Repodata archive has no {}",
        INDEX_MEMBER
    )))
}
