//! syllabot - Course-Catalog QA Agent
//!
//! Answers natural-language questions about university course catalogs by
//! combining keyword (BM25) and semantic (embedding) retrieval over catalog
//! text extracted from tabular source documents.
//!
//! # Architecture
//!
//! - `ingest`: table structurer turning noisy tabular rows into flat
//!   catalog lines, with per-source error isolation
//! - `index` + `retrieval`: dual-index corpus with deterministic shortcut
//!   paths and min-max score fusion
//! - `agent` + `tools` + `llm`: deterministic router, tool execution, and
//!   answer synthesis over the retrieved context

pub mod errors;
pub mod text;
pub mod ingest;
pub mod index;
pub mod embedding;
pub mod retrieval;
pub mod llm;
pub mod tools;
pub mod agent;
pub mod cli;

// Re-export commonly used types
pub use errors::{CatalogError, Result};
pub use retrieval::{Corpus, Document, HybridEngine, SearchParams};
