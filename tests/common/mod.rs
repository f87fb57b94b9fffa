//! Shared test support: deterministic embedder and corpus fixtures
#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;

use syllabot::embedding::EmbeddingProvider;
use syllabot::errors::Result;
use syllabot::retrieval::{Corpus, HybridEngine};
use syllabot::text::tokenize;

pub const STUB_DIM: usize = 16;

/// Deterministic embedder: known synonym groups share an axis, everything
/// else is feature-hashed. Gives stable "semantic" neighborhoods without a
/// model download.
pub struct StubEmbedder;

fn token_axis(token: &str) -> usize {
    match token {
        "nota" | "calificacion" | "calificaciones" => 0,
        "minima" | "aprobatoria" | "aprobatorio" | "aprobar" => 1,
        "uni" => 2,
        "unmsm" | "san" | "marcos" => 3,
        "ucsp" => 4,
        "algoritmos" => 5,
        "fisica" => 6,
        "credito" | "creditos" => 7,
        "requiere" | "requisito" | "requisitos" => 8,
        other => {
            let mut hasher = DefaultHasher::new();
            other.hash(&mut hasher);
            9 + (hasher.finish() as usize) % (STUB_DIM - 9)
        }
    }
}

fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; STUB_DIM];
    for token in tokenize(text) {
        vector[token_axis(&token)] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn dimension(&self) -> usize {
        STUB_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| embed_text(t)).collect())
    }
}

/// Embedder that fails on every call, for degradation tests.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn dimension(&self) -> usize {
        STUB_DIM
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(syllabot::CatalogError::Embedding("stub failure".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Build-time batch succeeds so the corpus can be constructed.
        Ok(texts.iter().map(|_| vec![0.0; STUB_DIM]).collect())
    }
}

/// The mixed-catalog fixture used across retrieval tests.
pub fn catalog_texts() -> Vec<String> {
    vec![
        "[UCSP] El curso de Algoritmos requiere CS101.".to_string(),
        "[UNMSM] El curso de Algoritmos en San Marcos requiere Matemáticas Básicas.".to_string(),
        "[UNI] La nota mínima para aprobar es 10.".to_string(),
        "[UCSP] La nota mínima para aprobar es 12.".to_string(),
        "[GENERAL] La inteligencia artificial es el futuro.".to_string(),
        "[UNI] Curso: Física I (BFI01) | Ubicación: Tercer ciclo | Tipo: Obligatorio | \
         Créditos: 5 | Pre-requisito: Ninguno"
            .to_string(),
        "[UNI] Curso: Química General (BQU01) | Ubicación: Segundo ciclo | Tipo: Obligatorio | \
         Créditos: 4 | Pre-requisito: Ninguno"
            .to_string(),
        "[UNI] Curso: Cálculo II (BMA02) | Ubicación: Segundo ciclo | Tipo: Obligatorio | \
         Créditos: 5 | Pre-requisito: BMA01"
            .to_string(),
        "[UNI] Curso: Dibujo Técnico (BDI01) | Ubicación: Segundo ciclo | Tipo: Obligatorio | \
         Créditos: 3 | Pre-requisito: Ninguno"
            .to_string(),
        "[UNI] Curso: Robótica (EE501) | Ubicación: Electivos | Tipo: Electivo de Especialidad | \
         Créditos: 4 | Pre-requisito: Ninguno"
            .to_string(),
        "[UNI] Curso: Historia de la Ciencia (HU301) | Ubicación: Electivos | \
         Tipo: Electivo Complementario | Créditos: 2 | Pre-requisito: Ninguno"
            .to_string(),
    ]
}

pub async fn engine_over(texts: Vec<String>) -> HybridEngine {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder);
    let corpus = Arc::new(
        Corpus::build(texts, embedder.as_ref())
            .await
            .expect("corpus build"),
    );
    HybridEngine::new(corpus, embedder)
}
