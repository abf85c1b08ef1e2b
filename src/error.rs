// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for repocheck
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed archive or property list
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Index file whose name cannot carry an architecture tag
    #[error("invalid repodata: {0}")]
    InvalidIndexName(String),

    /// Index file does not exist
    #[error("No such index: {0}")]
    IndexNotFound(PathBuf),

    /// Repository directory could not be listed
    #[error("Failed to scan repository {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Public index could not be opened
    #[error("Failed to read repodata {path}: {source}")]
    Repodata {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Staged index exists but could not be opened
    #[error("Failed to read stagedata {path}: {source}")]
    Stagedata {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this error means the requested index is simply absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::IndexNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type alias using repocheck's Error type
pub type Result<T> = std::result::Result<T, Error>;
