//! Fusion & shortcut query engine
//!
//! Three stages in priority order, first match wins:
//! 1. exact course-code containment,
//! 2. category listings (cycle and elective blocks),
//! 3. min-max-normalized linear fusion of BM25 and cosine scores.
//!
//! The shortcuts exist because structured fields (codes, category labels)
//! are matched more reliably by containment than by statistical ranking at
//! this corpus scale.

use std::cmp::Ordering;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::errors::Result;
use crate::retrieval::corpus::{Corpus, Document};
use crate::text::normalize;

/// Course-code shape inside free text (same shape the structurer accepts)
static QUERY_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z]{2,4}[0-9][0-9A-Za-z]{1,3}\b").expect("valid code regex")
});

/// Cycle ordinals as they appear in normalized section labels
const CYCLE_ORDINALS: &[&str] = &[
    "primer", "segundo", "tercer", "cuarto", "quinto", "sexto", "septimo", "octavo", "noveno",
    "decimo",
];

/// Words that signal "list the courses" intent
const LISTING_INTENT: &[&str] = &["cursos", "materias", "asignaturas", "lista", "listar", "llevan", "hay", "dictan"];

const CYCLE_LISTING_CAP: usize = 60;
const ELECTIVE_LISTING_CAP: usize = 80;

/// Caller-facing query parameters
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Result count for ranked retrieval
    pub k: usize,
    /// Fusion weight in [0,1]: 1.0 = vector only, 0.0 = lexical only
    pub alpha: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { k: 3, alpha: 0.45 }
    }
}

/// Hybrid retrieval engine over an immutable corpus
pub struct HybridEngine {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn EmbeddingProvider>,
}

/// Which stage produced the results; listings render newline-joined
/// (verbatim listing), the other stages blank-line-joined (ranked snippets).
enum Stage {
    ExactCode,
    Listing,
    Ranked,
}

impl HybridEngine {
    pub fn new(corpus: Arc<Corpus>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { corpus, embedder }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Search and render the result for the answer generator. Always
    /// returns a non-empty string.
    pub async fn search(&self, query: &str, params: &SearchParams) -> String {
        let (stage, documents) = self.run_stages(query, params).await;
        if documents.is_empty() {
            return "No se encontraron documentos relevantes en el catálogo.".to_string();
        }
        let separator = match stage {
            Stage::Listing => "\n",
            Stage::ExactCode | Stage::Ranked => "\n\n",
        };
        documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Search and return the matched documents best-first, whichever stage
    /// fired. Exposed for testability.
    pub async fn search_ranked(&self, query: &str, params: &SearchParams) -> Vec<Document> {
        self.run_stages(query, params).await.1
    }

    async fn run_stages(&self, query: &str, params: &SearchParams) -> (Stage, Vec<Document>) {
        if let Some(docs) = self.exact_code_stage(query, params.k) {
            debug!(query, "exact-code shortcut fired");
            return (Stage::ExactCode, docs);
        }
        if let Some(docs) = self.listing_stage(query) {
            debug!(query, "category-listing shortcut fired");
            return (Stage::Listing, docs);
        }
        (Stage::Ranked, self.ranked_stage(query, params).await)
    }

    /// Stage 1: a code-shaped token in the raw query that appears literally
    /// as "({CODE})" in some document bypasses scoring entirely.
    fn exact_code_stage(&self, query: &str, k: usize) -> Option<Vec<Document>> {
        let code = QUERY_CODE_RE.find(query)?.as_str().to_uppercase();
        let needle = format!("({code})");
        let matches: Vec<Document> = self
            .corpus
            .documents()
            .iter()
            .filter(|d| d.text.contains(&needle))
            .take(k)
            .cloned()
            .collect();
        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }

    /// Stage 2: cycle or elective-category listings matched by containment
    /// on the rendered `Ubicación:` / `Tipo:` markers.
    fn listing_stage(&self, query: &str) -> Option<Vec<Document>> {
        let query_norm = normalize(query);
        let has_intent = LISTING_INTENT.iter().any(|w| query_norm.contains(w));

        for ordinal in CYCLE_ORDINALS {
            // The ordinal plus either listing intent or the bare word
            // "ciclo" anywhere in the query; adjacency is not required.
            let triggered = query_norm.contains(ordinal)
                && (has_intent || query_norm.contains("ciclo"));
            if !triggered {
                continue;
            }
            let marker = format!("ubicacion {ordinal} ciclo");
            let matches = self.collect_by_marker(&marker, CYCLE_LISTING_CAP);
            if !matches.is_empty() {
                return Some(matches);
            }
        }

        if query_norm.contains("electiv") {
            if query_norm.contains("especialidad") {
                let matches =
                    self.collect_by_marker("tipo electivo de especialidad", ELECTIVE_LISTING_CAP);
                if !matches.is_empty() {
                    return Some(matches);
                }
            }
            if query_norm.contains("complementari") {
                let matches =
                    self.collect_by_marker("tipo electivo complementario", ELECTIVE_LISTING_CAP);
                if !matches.is_empty() {
                    return Some(matches);
                }
            }
        }
        None
    }

    fn collect_by_marker(&self, marker: &str, cap: usize) -> Vec<Document> {
        self.corpus
            .documents()
            .iter()
            .filter(|d| normalize(&d.text).contains(marker))
            .take(cap)
            .cloned()
            .collect()
    }

    /// Stage 3: min-max-normalized linear fusion of both score vectors.
    async fn ranked_stage(&self, query: &str, params: &SearchParams) -> Vec<Document> {
        let n = self.corpus.len();
        if n == 0 {
            return Vec::new();
        }
        let alpha = params.alpha.clamp(0.0, 1.0);

        let lexical = min_max_normalize(&self.corpus.lexical().score_all(query));

        // A failed query-time embedding degrades to lexical-only scoring
        // instead of failing the whole query.
        let vector = if alpha > 0.0 {
            match self.vector_scores(query).await {
                Ok(scores) => Some(min_max_normalize(&scores)),
                Err(e) => {
                    warn!(error = %e, "query embedding failed, lexical-only scoring");
                    None
                }
            }
        } else {
            None
        };

        let combined: Vec<f64> = match vector {
            Some(vector) => lexical
                .iter()
                .zip(vector.iter())
                .map(|(l, v)| alpha * v + (1.0 - alpha) * l)
                .collect(),
            None => lexical,
        };

        // Sort ids by combined score, ties broken by lower document id.
        let mut ids: Vec<usize> = (0..n).collect();
        ids.sort_by(|&a, &b| {
            combined[b]
                .partial_cmp(&combined[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        ids.truncate(params.k);

        ids.iter()
            .map(|&id| self.corpus.documents()[id].clone())
            .collect()
    }

    async fn vector_scores(&self, query: &str) -> Result<Vec<f64>> {
        let query_vec = self.embedder.embed(query).await?;
        self.corpus.vector().score_all(&query_vec)
    }
}

/// Min-max normalize scores to [0,1]. A degenerate all-equal vector maps to
/// all-1.0, avoiding division by zero and avoiding a bias toward an
/// arbitrary index when one model is uninformative.
pub fn min_max_normalize(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if scores.is_empty() || max == min {
        return vec![1.0; scores.len()];
    }
    scores.iter().map(|s| (s - min) / (max - min)).collect()
}
