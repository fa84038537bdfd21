pub mod client;
pub mod prompts;
pub mod validation;

pub use client::*;
pub use prompts::*;
pub use validation::*;

use anyhow::Result;

use crate::models::{FeedbackResponse, Lens};

/// The external feedback-generation service.
///
/// The orchestrator only depends on this seam; tests substitute a scripted
/// implementation so the pipeline can be exercised without network access.
pub trait FeedbackProvider {
    /// Request diagnostics for the current document under one lens.
    fn generate_feedback(
        &self,
        document: &str,
        lens: Lens,
    ) -> impl Future<Output = Result<FeedbackResponse>>;

    /// Re-submit an earlier response that classified some sentences under
    /// more than one trait, asking for single-trait assignments.
    fn resolve_conflicts(
        &self,
        previous: &FeedbackResponse,
        lens: Lens,
    ) -> impl Future<Output = Result<FeedbackResponse>>;
}
