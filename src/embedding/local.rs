//! Local embedding engine: all-MiniLM-L6-v2 via candle
//!
//! Downloads the model from the HuggingFace Hub on first use, then runs
//! fully offline. Output vectors are mean-pooled over the attention mask;
//! L2 normalization happens in the vector index.

use anyhow::Context;
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::embedding::EmbeddingProvider;
use crate::errors::{CatalogError, Result};

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const EMBEDDING_DIM: usize = 384;

/// MiniLM sentence embedder running on CPU
pub struct LocalEmbedder {
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
}

impl LocalEmbedder {
    /// Load the default sentence-transformer model.
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_MODEL_ID)
    }

    /// Load a specific BERT-family model from the Hub.
    pub fn with_model(model_id: &str) -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new()
            .context("Failed to create HuggingFace API client")
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| CatalogError::Embedding(format!("config download: {e}")))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| CatalogError::Embedding(format!("tokenizer download: {e}")))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| CatalogError::Embedding(format!("weights download: {e}")))?;

        let config_contents = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_contents)?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| CatalogError::Embedding(format!("tokenizer load: {e}")))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| CatalogError::Embedding(format!("weights load: {e}")))?
        };
        let model = BertModel::load(vb, &config)
            .map_err(|e| CatalogError::Embedding(format!("model load: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device,
        })
    }

    fn embed_batch_sync(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| CatalogError::Embedding(format!("tokenization: {e}")))?;

        let batch_size = texts.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Pad token ids and attention masks to a rectangular batch.
        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            flat_ids[i * max_len..i * max_len + ids.len()].copy_from_slice(ids);
            flat_mask[i * max_len..i * max_len + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        let token_type_ids = token_ids
            .zeros_like()
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;

        let pooled = Self::mean_pool(&hidden, &attention_mask)
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        let vectors = pooled
            .to_vec2::<f32>()
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;

        Ok(vectors)
    }

    /// Mean pooling over the sequence dimension, weighted by the mask.
    fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        let mask = attention_mask
            .unsqueeze(2)?
            .expand(hidden.shape())?
            .to_dtype(hidden.dtype())?;
        let summed = (hidden * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        summed.broadcast_div(&counts)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch_sync(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| CatalogError::Embedding("empty batch result".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch_sync(texts)
    }
}
