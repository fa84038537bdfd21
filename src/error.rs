use thiserror::Error;

use crate::models::Lens;
use crate::session::StageStatus;

/// Failures raised by the reconciliation pipeline.
///
/// All of these are local to one stage: a failure never rewrites a previous
/// stage's finalized snapshots.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The feedback service response is missing fields or has misaligned
    /// sentence/suggestion lists. Retryable: the stage stays in `Diagnosing`.
    #[error("feedback response violates the service contract: {0}")]
    SchemaViolation(String),

    /// An operation was attempted on a stage whose status does not allow it.
    #[error("{lens} is {status:?}; expected {expected:?}")]
    StageNotReady {
        lens: Lens,
        status: StageStatus,
        expected: StageStatus,
    },

    /// Mutation was requested before every diagnostic had a decision.
    #[error("stage has {decided} finalized decisions for {expected} diagnostics")]
    IncompleteDecisions { decided: usize, expected: usize },

    /// A decided sentence could not be located as an unclaimed literal span
    /// of the base document.
    #[error("decided sentence not found in document: {0:?}")]
    SpanNotFound(String),
}
