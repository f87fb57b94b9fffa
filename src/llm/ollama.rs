//! Ollama-backed answer generator
//!
//! Non-streaming `POST /api/generate` against a local Ollama server.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::errors::{CatalogError, Result};
use crate::llm::AnswerGenerator;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for Ollama text generation
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a generator for the given server and model.
    ///
    /// # Arguments
    /// * `base_url` - e.g. "http://127.0.0.1:11434"
    /// * `model` - e.g. "qwen2.5:7b-instruct"
    pub fn new(base_url: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(CatalogError::Http)?;
        Ok(Self {
            client,
            base_url,
            model,
        })
    }

    fn build_prompt(query: &str, context: &str) -> String {
        format!(
            "Eres un asistente académico. Responde la pregunta usando únicamente \
             el contexto proporcionado. Si el contexto no contiene la respuesta, dilo.\n\n\
             Contexto:\n{context}\n\nPregunta: {query}\nRespuesta:"
        )
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": Self::build_prompt(query, context),
            "stream": false,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Generation(format!(
                "Ollama API error: {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_query_and_context() {
        let prompt = OllamaGenerator::build_prompt(
            "¿Cuántos créditos tiene BFI01?",
            "[UNI] Curso: Física I (BFI01) | Créditos: 5",
        );
        assert!(prompt.contains("¿Cuántos créditos tiene BFI01?"));
        assert!(prompt.contains("(BFI01)"));
        assert!(prompt.contains("Contexto:"));
    }
}
