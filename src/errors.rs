//! Error types for syllabot
//!
//! Provides comprehensive error handling with context propagation
//! across ingestion, indexing, and query execution.

use thiserror::Error;

/// Main error type for the catalog agent system
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Source-document ingestion errors
    #[error("Ingestion failed for source '{source_id}': {reason}")]
    Ingestion { source_id: String, reason: String },

    /// Embedding provider errors
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Vector dimension mismatch between index and provider
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Answer generation errors
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Tool execution errors
    #[error("Tool '{tool}' failed: {reason}")]
    Tool { tool: String, reason: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

/// Result type alias for catalog-agent operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Convert anyhow errors to CatalogError
impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Generic(err.to_string())
    }
}
