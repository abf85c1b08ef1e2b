// src/repository/parsers/mod.rs

//! Repository metadata parsers
//!
//! This module reads the on-disk repodata format:
//! - `repodata`: compressed tar archives carrying `index.plist`
//! - `plist`: the XML property list grammar used by the index

pub mod plist;
pub mod repodata;

pub use repodata::{read_index, CompressionFormat};
