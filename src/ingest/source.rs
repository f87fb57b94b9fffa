//! Source-document provider
//!
//! Sources arrive pre-extracted as JSON files: either plain text lines or a
//! page -> table -> row -> cell structure (cells may be null). The file name
//! doubles as the identifier used for institution resolution.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CatalogError, Result};

/// One extracted table cell; null in the JSON maps to `None`
pub type Cell = Option<String>;
/// One table row
pub type Row = Vec<Cell>;
/// One extracted table
pub type Table = Vec<Row>;
/// All tables extracted from one page
pub type Page = Vec<Table>;

/// Pre-extracted content of a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceContent {
    /// Plain text, one entry per extracted line
    Lines(Vec<String>),
    /// Tabular extraction, in page order
    Pages(Vec<Page>),
}

/// A single source document keyed by its identifier
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: String,
    pub content: SourceContent,
}

impl SourceDocument {
    /// Load one source document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| CatalogError::Ingestion {
                source_id: path.display().to_string(),
                reason: "path has no file name".to_string(),
            })?;
        let raw = fs::read_to_string(path)?;
        let content: SourceContent =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Ingestion {
                source_id: id.clone(),
                reason: format!("invalid source JSON: {e}"),
            })?;
        Ok(Self { id, content })
    }
}

/// Load every `.json` source in a directory, sorted by file name so that
/// document ids are stable across runs. A missing directory yields an empty
/// batch rather than an error, and an unreadable source is logged and
/// skipped so one corrupt file cannot take down the whole batch.
pub fn load_dir(dir: &Path) -> Result<Vec<SourceDocument>> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "data directory does not exist, empty corpus");
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match SourceDocument::load(&path) {
            Ok(source) => sources.push(source),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable source");
            }
        }
    }
    Ok(sources)
}
