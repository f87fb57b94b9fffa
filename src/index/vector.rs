//! Dense vector index with exact inner-product search
//!
//! Stores one L2-normalized embedding per document in a flat row-major
//! matrix, so inner product equals cosine similarity. Search is brute-force
//! O(n*d), which is the right trade at catalog scale (tens to low thousands
//! of records).

use crate::errors::{CatalogError, Result};

/// Immutable matrix of normalized document embeddings
#[derive(Debug)]
pub struct VectorIndex {
    data: Vec<f32>,
    dimension: usize,
    len: usize,
}

/// Normalize a vector to unit L2 norm in place; zero vectors are left as-is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

impl VectorIndex {
    /// Build from one embedding per document, in document-id order.
    /// Every vector must have the same dimension.
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);
        let len = embeddings.len();
        let mut data = Vec::with_capacity(len * dimension);

        for mut vector in embeddings {
            if vector.len() != dimension {
                return Err(CatalogError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            l2_normalize(&mut vector);
            data.extend_from_slice(&vector);
        }

        Ok(Self {
            data,
            dimension,
            len,
        })
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Cosine-similarity scores of the query against every document,
    /// aligned by document id. The query is normalized here, so callers
    /// pass the raw embedding.
    pub fn score_all(&self, query: &[f32]) -> Result<Vec<f64>> {
        if query.len() != self.dimension {
            return Err(CatalogError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        let mut q = query.to_vec();
        l2_normalize(&mut q);

        let scores = self
            .data
            .chunks_exact(self.dimension.max(1))
            .map(|row| {
                row.iter()
                    .zip(q.iter())
                    .map(|(a, b)| f64::from(a * b))
                    .sum()
            })
            .collect();
        Ok(scores)
    }
}
