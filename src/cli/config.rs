//! Configuration management for syllabot
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.syllabot/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{CatalogError, Result};

/// Complete configuration for syllabot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub paths: PathsConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model_id: String,
}

/// Retrieval parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Result count for ranked retrieval
    pub top_k: usize,
    /// Fusion weight in [0,1]
    pub alpha: f64,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: "qwen2.5:7b-instruct".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            alpha: 0.45,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".syllabot")
            .join("config.toml")
    }

    /// Load from the given path, or fall back to defaults when the file
    /// does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the system relies on.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.retrieval.alpha) {
            return Err(CatalogError::Config(format!(
                "retrieval.alpha must be in [0,1], got {}",
                self.retrieval.alpha
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(CatalogError::Config(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        if self.ollama.host.is_empty() {
            return Err(CatalogError::Config("ollama.host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Base URL of the Ollama server
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.alpha - 0.45).abs() < 1e-9);
        assert_eq!(config.ollama_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut config = Config::default();
        config.retrieval.alpha = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_k_rejected() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let raw = toml::to_string(&config).expect("serialize");
        let parsed: Config = toml::from_str(&raw).expect("parse");
        assert_eq!(parsed.retrieval.top_k, config.retrieval.top_k);
        assert_eq!(parsed.embedding.model_id, config.embedding.model_id);
    }
}
