//! BM25 lexical index
//!
//! Term-frequency statistics are computed once at construction and read-only
//! afterwards; scoring takes `&self` and is safe to run concurrently.

use std::collections::HashMap;

use crate::text::tokenize;

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// Okapi BM25 ranking model over the tokenized corpus
#[derive(Debug)]
pub struct LexicalIndex {
    /// Per-document term frequencies, aligned by document id
    term_freqs: Vec<HashMap<String, usize>>,
    /// Per-document token counts
    doc_lens: Vec<usize>,
    /// Corpus-wide document frequencies
    doc_freqs: HashMap<String, usize>,
    avg_doc_len: f64,
}

impl LexicalIndex {
    /// Build the index from the corpus text sequence, in document-id order.
    pub fn build(texts: &[String]) -> Self {
        let mut term_freqs = Vec::with_capacity(texts.len());
        let mut doc_lens = Vec::with_capacity(texts.len());
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for text in texts {
            let tokens = tokenize(text);
            doc_lens.push(tokens.len());
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *tf.entry(token).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(tf);
        }

        let total: usize = doc_lens.iter().sum();
        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            total as f64 / doc_lens.len() as f64
        };

        Self {
            term_freqs,
            doc_lens,
            doc_freqs,
            avg_doc_len,
        }
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    /// Smoothed inverse document frequency for one term
    fn idf(&self, term: &str) -> f64 {
        let n = self.len() as f64;
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Score every document against the query, aligned by document id.
    pub fn score_all(&self, query: &str) -> Vec<f64> {
        let query_terms = tokenize(query);
        let mut scores = vec![0.0; self.len()];
        if query_terms.is_empty() || self.avg_doc_len == 0.0 {
            return scores;
        }

        for term in &query_terms {
            let idf = self.idf(term);
            for (id, tf_map) in self.term_freqs.iter().enumerate() {
                let tf = tf_map.get(term).copied().unwrap_or(0) as f64;
                if tf == 0.0 {
                    continue;
                }
                let len_norm = 1.0 - B + B * self.doc_lens[id] as f64 / self.avg_doc_len;
                scores[id] += idf * tf * (K1 + 1.0) / (tf + K1 * len_norm);
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "[UCSP] Algoritmos requiere CS101".to_string(),
            "[UNMSM] Algoritmos en San Marcos requiere Matemáticas Básicas".to_string(),
            "[UNI] Física I tiene cinco créditos".to_string(),
        ]
    }

    #[test]
    fn test_discriminating_terms_win() {
        let index = LexicalIndex::build(&corpus());
        let scores = index.score_all("requisito Algoritmos San Marcos");
        assert!(scores[1] > scores[0], "san/marcos should favor doc 1");
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn test_unmatched_query_scores_zero() {
        let index = LexicalIndex::build(&corpus());
        let scores = index.score_all("palabra_inexistente_xyz");
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_scores_aligned_by_id() {
        let index = LexicalIndex::build(&corpus());
        assert_eq!(index.len(), 3);
        let scores = index.score_all("física créditos");
        assert!(scores[2] > scores[0]);
        assert!(scores[2] > scores[1]);
    }

    #[test]
    fn test_empty_corpus() {
        let index = LexicalIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.score_all("algo").is_empty());
    }
}
