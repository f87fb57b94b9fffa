//! Hybrid retrieval: corpus construction and query execution
//!
//! Components:
//! - Corpus: documents + lexical + vector indices, built once at startup
//! - HybridEngine: shortcut stages and score fusion per query

pub mod corpus;
pub mod engine;

pub use corpus::{Corpus, Document};
pub use engine::{HybridEngine, SearchParams};
