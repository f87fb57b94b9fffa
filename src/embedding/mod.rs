//! Embedding providers
//!
//! The retrieval engine treats embedding as an opaque function
//! `text -> Vec<f32>` with a fixed dimension. The production provider runs
//! all-MiniLM-L6-v2 locally through candle; tests inject deterministic
//! stubs through the same trait.

pub mod local;

use async_trait::async_trait;

use crate::errors::Result;

/// Maps text to fixed-dimension vectors. Implementations must be safe to
/// call concurrently at query time (stateless or internally synchronized).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed output dimension
    fn dimension(&self) -> usize;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts; used at index-build time for efficiency.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub use local::LocalEmbedder;
