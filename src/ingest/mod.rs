//! Catalog ingestion: source documents -> flat indexable lines
//!
//! Components:
//! - Institution resolution from source identifiers
//! - Structured course records and their flat rendering
//! - The table structurer state machine
//! - JSON source-document loading

pub mod institution;
pub mod record;
pub mod source;
pub mod structurer;

pub use institution::Institution;
pub use record::{Category, CourseRecord};
pub use source::{load_dir, SourceContent, SourceDocument};
pub use structurer::{build_corpus_texts, ParseState, EMPTY_CORPUS_SENTINEL};
