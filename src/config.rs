// src/config.rs

//! Check configuration
//!
//! There is no configuration file; everything comes from the command line
//! and `RUST_LOG`.

use crate::arch;
use std::path::PathBuf;
use std::str::FromStr;

/// Report renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Settings of one checker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Repository directories to audit
    pub repositories: Vec<PathBuf>,

    /// Architecture selected in each repository
    pub target_arch: String,

    /// Skip indexes of every other architecture
    pub mono_arch: bool,

    pub format: OutputFormat,
}

impl CheckConfig {
    /// Configuration for the given repositories on the native architecture
    pub fn new(repositories: Vec<PathBuf>) -> Self {
        Self {
            repositories,
            target_arch: arch::native(),
            mono_arch: true,
            format: OutputFormat::Text,
        }
    }

    /// Override the target architecture
    pub fn with_arch(mut self, target_arch: Option<String>) -> Self {
        if let Some(target_arch) = target_arch {
            self.target_arch = target_arch;
        }
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
