//! Loading billing documents from disk.

use std::path::Path;

use anyhow::{Context, Result};
use biller_core::Document;

/// Serialization format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// `.json` files are JSON, everything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parses a document from text.
pub fn parse_document(text: &str, format: DataFormat) -> Result<Document> {
    match format {
        DataFormat::Json => serde_json::from_str(text).context("failed to parse JSON document"),
        DataFormat::Yaml => serde_yaml::from_str(text).context("failed to parse YAML document"),
    }
}

/// Reads and parses the data file at `path`.
pub fn load_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    let format = DataFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "loading data file");
    parse_document(&text, format).with_context(|| format!("in {}", path.display()))
}
