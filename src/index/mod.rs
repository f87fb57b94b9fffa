//! Dual retrieval indices: BM25 lexical ranking and exact vector search

pub mod lexical;
pub mod vector;

pub use lexical::LexicalIndex;
pub use vector::VectorIndex;
