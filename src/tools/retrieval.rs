//! Catalog retrieval exposed as the `rag` tool

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::retrieval::{HybridEngine, SearchParams};
use crate::tools::Tool;

pub struct RetrievalTool {
    engine: Arc<HybridEngine>,
    params: SearchParams,
}

impl RetrievalTool {
    pub fn new(engine: Arc<HybridEngine>, params: SearchParams) -> Self {
        Self { engine, params }
    }
}

#[async_trait]
impl Tool for RetrievalTool {
    fn name(&self) -> &str {
        "rag"
    }

    async fn run(&self, input: &str) -> Result<String> {
        Ok(self.engine.search(input, &self.params).await)
    }
}
