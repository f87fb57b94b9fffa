//! Answer generation
//!
//! The retrieval core has no dependency on the generator's internals: it is
//! an opaque `(query, context) -> text` function behind a trait, implemented
//! against a local Ollama server in production and mocked in tests.

pub mod ollama;

use async_trait::async_trait;

use crate::errors::Result;

/// Produces the final prose answer from the query and retrieved context
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String>;
}

pub use ollama::OllamaGenerator;
