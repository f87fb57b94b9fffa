//! Corpus: the document sequence plus both retrieval indices
//!
//! Built once at startup; read-only for the rest of the process. Document
//! ids are corpus positions and double as indices into both indices.

use tracing::info;

use crate::embedding::EmbeddingProvider;
use crate::errors::Result;
use crate::index::{LexicalIndex, VectorIndex};

/// An immutable, indexable unit of retrievable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Position in the corpus, stable for the process lifetime
    pub id: usize,
    /// Full text shown to the user and scored by both indices
    pub text: String,
}

/// Owns the documents and both indices
pub struct Corpus {
    documents: Vec<Document>,
    lexical: LexicalIndex,
    vector: VectorIndex,
}

impl Corpus {
    /// Build both indices over the given texts. Embeds every document
    /// through the provider's batch call; completes fully before any query
    /// can be served.
    pub async fn build(texts: Vec<String>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        let lexical = LexicalIndex::build(&texts);
        let embeddings = embedder.embed_batch(&texts).await?;
        let vector = VectorIndex::build(embeddings)?;

        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(id, text)| Document { id, text })
            .collect::<Vec<_>>();

        info!(
            documents = documents.len(),
            dimension = vector.dimension(),
            "corpus indexed"
        );
        Ok(Self {
            documents,
            lexical,
            vector,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    pub fn vector(&self) -> &VectorIndex {
        &self.vector
    }
}
