use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};

use super::Document;

/// Serialization format of the generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Parse a format name, defaulting to YAML for anything unrecognised.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }

    /// Pick the format matching a file's extension (`.yaml`/`.yml` → YAML, else JSON).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

/// Artifact name for a server: `{server_key}_openapi.{yaml|json}`.
pub fn artifact_name(server_key: &str, format: OutputFormat) -> String {
    format!("{}_openapi.{}", server_key, format.extension())
}

/// Serialize a document in the requested format.
pub fn to_string(document: &Document, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(document)
            .map_err(|e| GeneratorError::parse("OpenAPI document as YAML", e)),
        OutputFormat::Json => serde_json::to_string_pretty(document)
            .map_err(|e| GeneratorError::parse("OpenAPI document as JSON", e)),
    }
}

/// Read a previously generated document back from disk.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let what = format!("OpenAPI document {}", path.display());
    match OutputFormat::from_path(path) {
        OutputFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| GeneratorError::parse(what, e)),
        OutputFormat::Json => serde_json::from_str(&content).map_err(|e| GeneratorError::parse(what, e)),
    }
}

/// Write the document under `dir` using [`artifact_name`], creating `dir` if needed.
///
/// # Returns
///
/// Path of the written artifact.
pub fn write_document(
    document: &Document,
    server_key: &str,
    format: OutputFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let body = to_string(document, format)?;
    std::fs::create_dir_all(dir).map_err(|source| GeneratorError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(artifact_name(server_key, format));
    std::fs::write(&path, body).map_err(|source| GeneratorError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
