//! Agent engine: route -> tool -> synthesize -> audit
//!
//! One tool per query, selected by the deterministic router. The selected
//! tool's output becomes the labeled context handed to the answer
//! generator, and the whole interaction is appended to the audit log.

pub mod audit;
pub mod router;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::errors::{CatalogError, Result};
use crate::llm::AnswerGenerator;
use crate::tools::Tool;

pub use audit::{AuditEntry, AuditLog, StepTrace};
pub use router::{route, Intent};

/// Final answer plus execution metadata
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub answer: String,
    pub tool: &'static str,
    pub latency_seconds: f64,
}

/// Orchestrates routing, tool execution, and answer synthesis
pub struct AgentEngine {
    generator: Arc<dyn AnswerGenerator>,
    tools: HashMap<String, Arc<dyn Tool>>,
    audit: AuditLog,
}

impl AgentEngine {
    pub fn new(
        generator: Arc<dyn AnswerGenerator>,
        tools: Vec<Arc<dyn Tool>>,
        audit: AuditLog,
    ) -> Self {
        let tools = tools
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self {
            generator,
            tools,
            audit,
        }
    }

    /// Context label the generator sees for each intent
    fn context_label(intent: Intent) -> &'static str {
        match intent {
            Intent::Verification => "Student Record System",
            Intent::Calculator => "Calculation Result",
            Intent::Retrieval => "Retrieved Documents",
        }
    }

    /// Answer one query end to end.
    pub async fn run(&self, query: &str) -> Result<AgentResponse> {
        let start = Instant::now();

        let intent = router::route(query);
        debug!(?intent, "routed query");

        let tool = self
            .tools
            .get(intent.tool_name())
            .ok_or_else(|| CatalogError::Tool {
                tool: intent.tool_name().to_string(),
                reason: "not registered".to_string(),
            })?;
        let tool_output = tool.run(query).await?;

        let context = format!("{}: {}", Self::context_label(intent), tool_output);
        let answer = self.generator.generate(query, &context).await?;

        let latency_seconds = start.elapsed().as_secs_f64();
        let steps = vec![StepTrace {
            tool: intent.tool_name().to_string(),
            output: tool_output,
        }];
        if let Err(e) = self
            .audit
            .log_interaction(query, steps, &answer, latency_seconds)
        {
            // The answer is still useful when the audit write fails.
            warn!(error = %e, "failed to write audit entry");
        }

        Ok(AgentResponse {
            answer,
            tool: intent.tool_name(),
            latency_seconds,
        })
    }
}
