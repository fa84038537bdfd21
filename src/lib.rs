pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod session;

pub use error::PipelineError;
pub use io::{load_document, write_document, SessionReport, StageReport};
pub use llm::{AnthropicClient, AnthropicConfig, FeedbackProvider};
pub use models::{
    Decision, DecisionLedger, DiagnosticRecord, DocumentSnapshot, FeedbackResponse, Lens, Outcome,
    ResolvedDiagnostic,
};
pub use pipeline::{canonicalize, AlignConfig};
pub use session::{Session, StageState, StageStatus};
