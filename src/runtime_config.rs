//! # Runtime Configuration Module
//!
//! Environment variable overrides for where and how the CLI writes artifacts.
//!
//! ## Environment Variables
//!
//! ### `JSONAPI_OAS_OUTPUT_DIR`
//!
//! Directory receiving `{server}_openapi.{yaml|json}`. Default: `storage/app`.
//!
//! ### `JSONAPI_OAS_FORMAT`
//!
//! Default output format when none is given on the command line:
//! `yaml` or `json`. Default: `yaml`.
//!
//! ## Usage
//!
//! ```rust
//! use jsonapi_openapi::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Writing to {}", config.output_dir.display());
//! ```

use std::env;
use std::path::PathBuf;

use crate::spec::OutputFormat;

/// Default artifact directory.
pub const DEFAULT_OUTPUT_DIR: &str = "storage/app";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory the generated document is written to
    pub output_dir: PathBuf,
    /// Format used when the caller doesn't pick one
    pub format: OutputFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Yaml,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let output_dir = lookup("JSONAPI_OAS_OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let format = lookup("JSONAPI_OAS_FORMAT")
            .map(|v| OutputFormat::parse(&v))
            .unwrap_or_default();
        RuntimeConfig { output_dir, format }
    }
}
