// src/lib.rs

//! Repocheck
//!
//! Cross-repository consistency checker for binary package repodata.
//! Given a set of repository directories it verifies that every package's
//! runtime dependencies and shared library requirements are satisfied by
//! some package in the set, and flags names supplied by more than one
//! package.
//!
//! # Architecture
//!
//! - Read-only: repodata is opened and parsed, never modified
//! - Mono-architecture: one target architecture is selected per repository
//! - Two phases: runtime dependencies against a global provider index,
//!   shared libraries against the union of all exported libraries
//! - Findings are reported, never fatal; only unreadable repositories abort

pub mod arch;
pub mod check;
pub mod config;
mod error;
pub mod package;
pub mod report;
pub mod repository;

pub use error::{Error, Result};
