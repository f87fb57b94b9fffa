//! Agent tools
//!
//! Each tool answers one category of question:
//! - `rag`: catalog retrieval through the hybrid engine
//! - `calculator`: arithmetic found inside free text
//! - `verification`: prerequisite eligibility against the student record

pub mod calculator;
pub mod retrieval;
pub mod verification;

use async_trait::async_trait;

use crate::errors::Result;

/// A tool takes the raw user query and returns labeled-context text for the
/// answer generator.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable name used by the router and the audit trail
    fn name(&self) -> &str;

    async fn run(&self, input: &str) -> Result<String>;
}

pub use calculator::CalculatorTool;
pub use retrieval::RetrievalTool;
pub use verification::VerificationTool;
