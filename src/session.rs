use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::llm::FeedbackProvider;
use crate::models::{Decision, DecisionLedger, DocumentSnapshot, Lens, ResolvedDiagnostic};
use crate::pipeline::align::AlignConfig;
use crate::pipeline::mutate::apply_decisions;
use crate::pipeline::normalize::canonicalize;
use crate::pipeline::resolve::resolve_and_align;

/// Lifecycle of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The previous stage has not completed yet.
    NotStarted,
    /// Eligible to run or be skipped.
    AwaitingRunOrSkip,
    /// A feedback call is in flight or has failed retryably.
    Diagnosing,
    /// Diagnostics resolved; reviewer decisions outstanding.
    AwaitingDecisions,
    /// Snapshots produced (or the stage was skipped).
    Complete,
}

/// All state for one stage of the review.
#[derive(Debug)]
pub struct StageState {
    pub lens: Lens,
    pub status: StageStatus,
    /// Resolved diagnostics, in presentation order.
    pub diagnostics: Vec<ResolvedDiagnostic>,
    /// Reviewer decisions for this stage. Cleared after mutation.
    pub ledger: DecisionLedger,
    pub applied: Option<DocumentSnapshot>,
    pub annotated: Option<DocumentSnapshot>,
    /// True when the stage completed via skip.
    pub skipped: bool,
    /// Outcome tallies, recorded when the stage completes.
    pub accepted: usize,
    pub rejected: usize,
}

impl StageState {
    fn new(lens: Lens, status: StageStatus) -> Self {
        Self {
            lens,
            status,
            diagnostics: Vec::new(),
            ledger: DecisionLedger::new(),
            applied: None,
            annotated: None,
            skipped: false,
            accepted: 0,
            rejected: 0,
        }
    }
}

/// One reviewer's pass through the seven lenses.
///
/// The session exclusively owns all stage state; every operation is
/// synchronous with respect to the reviewer's sequence of actions, and the
/// only suspension point is the awaited feedback call inside [`run_stage`].
///
/// [`run_stage`]: Session::run_stage
pub struct Session {
    pub id: Uuid,
    /// Canonical source document all of stage 1 operates on.
    pub source: String,
    stages: Vec<StageState>,
    align_config: AlignConfig,
}

impl Session {
    /// Start a session from raw extracted text. The text is canonicalized
    /// once here; stage 1 becomes eligible immediately.
    pub fn new(raw_text: &str) -> Self {
        let mut stages: Vec<StageState> = Lens::ALL
            .iter()
            .map(|&lens| StageState::new(lens, StageStatus::NotStarted))
            .collect();
        stages[0].status = StageStatus::AwaitingRunOrSkip;

        Self {
            id: Uuid::new_v4(),
            source: canonicalize(raw_text),
            stages,
            align_config: AlignConfig::default(),
        }
    }

    pub fn stage(&self, lens: Lens) -> &StageState {
        &self.stages[lens.number() as usize - 1]
    }

    fn stage_mut(&mut self, lens: Lens) -> &mut StageState {
        &mut self.stages[lens.number() as usize - 1]
    }

    pub fn stages(&self) -> &[StageState] {
        &self.stages
    }

    /// Applied document feeding this stage: the previous stage's applied
    /// snapshot, or the canonical source for stage 1.
    pub fn input_applied(&self, lens: Lens) -> &str {
        match lens.previous() {
            Some(prev) => self
                .stage(prev)
                .applied
                .as_ref()
                .map(|s| s.text.as_str())
                .unwrap_or(&self.source),
            None => &self.source,
        }
    }

    /// Annotated document feeding this stage's feedback request.
    pub fn input_annotated(&self, lens: Lens) -> &str {
        match lens.previous() {
            Some(prev) => self
                .stage(prev)
                .annotated
                .as_ref()
                .map(|s| s.text.as_str())
                .unwrap_or(&self.source),
            None => &self.source,
        }
    }

    fn expect_status(&self, lens: Lens, expected: StageStatus) -> Result<(), PipelineError> {
        let status = self.stage(lens).status;
        if status != expected {
            return Err(PipelineError::StageNotReady {
                lens,
                status,
                expected,
            });
        }
        Ok(())
    }

    /// Run a stage: request feedback for the annotated input, reconcile it,
    /// and move to `AwaitingDecisions`.
    ///
    /// A failed or invalid service response leaves the stage in `Diagnosing`;
    /// calling `run_stage` again retries, and [`abandon_stage`] backs out.
    ///
    /// [`abandon_stage`]: Session::abandon_stage
    pub async fn run_stage<P: FeedbackProvider>(
        &mut self,
        provider: &P,
        lens: Lens,
    ) -> Result<&[ResolvedDiagnostic]> {
        let status = self.stage(lens).status;
        if status != StageStatus::AwaitingRunOrSkip && status != StageStatus::Diagnosing {
            return Err(PipelineError::StageNotReady {
                lens,
                status,
                expected: StageStatus::AwaitingRunOrSkip,
            }
            .into());
        }

        self.stage_mut(lens).status = StageStatus::Diagnosing;
        info!(%lens, "requesting feedback");

        let annotated_input = self.input_annotated(lens).to_string();
        let applied_input = self.input_applied(lens).to_string();

        let response = provider.generate_feedback(&annotated_input, lens).await?;
        let diagnostics = resolve_and_align(
            provider,
            lens,
            &applied_input,
            &response,
            &self.align_config,
        )
        .await?;

        info!(%lens, count = diagnostics.len(), "diagnostics resolved");

        let stage = self.stage_mut(lens);
        stage.diagnostics = diagnostics;
        stage.ledger.clear();
        stage.status = StageStatus::AwaitingDecisions;
        Ok(&self.stage(lens).diagnostics)
    }

    /// Abandon a stage whose feedback call failed, returning it to
    /// `AwaitingRunOrSkip`.
    pub fn abandon_stage(&mut self, lens: Lens) -> Result<()> {
        self.expect_status(lens, StageStatus::Diagnosing)?;
        self.stage_mut(lens).status = StageStatus::AwaitingRunOrSkip;
        Ok(())
    }

    /// Skip a stage: its document state passes through unchanged and the
    /// next stage becomes eligible. No diagnostics, no decisions.
    pub fn skip_stage(&mut self, lens: Lens) -> Result<()> {
        self.expect_status(lens, StageStatus::AwaitingRunOrSkip)?;

        let applied = self.input_applied(lens).to_string();
        let annotated = self.input_annotated(lens).to_string();

        let stage = self.stage_mut(lens);
        stage.applied = Some(DocumentSnapshot::new(lens, applied));
        stage.annotated = Some(DocumentSnapshot::new(lens, annotated));
        stage.skipped = true;
        stage.status = StageStatus::Complete;
        info!(%lens, "stage skipped");

        self.unlock_next(lens);
        Ok(())
    }

    /// Record one reviewer decision. Re-submission of an identical decision
    /// is idempotent via ledger finalization.
    pub fn record_decision(&mut self, lens: Lens, decision: Decision) -> Result<()> {
        self.expect_status(lens, StageStatus::AwaitingDecisions)?;
        self.stage_mut(lens).ledger.record(decision);
        Ok(())
    }

    /// True when every diagnostic of the stage has exactly one finalized
    /// decision.
    pub fn decisions_complete(&self, lens: Lens) -> bool {
        let stage = self.stage(lens);
        stage.ledger.covers(stage.diagnostics.len())
    }

    /// Apply the stage's finalized decisions, producing its applied and
    /// annotated snapshots and unlocking the next stage. Refuses unless
    /// every diagnostic has been decided.
    pub fn complete_stage(&mut self, lens: Lens) -> Result<()> {
        self.expect_status(lens, StageStatus::AwaitingDecisions)?;

        let stage = self.stage(lens);
        let decisions = stage.ledger.finalize();
        let expected = stage.diagnostics.len();
        let base = self.input_applied(lens).to_string();

        let output = apply_decisions(&base, &decisions, expected)?;

        let accepted = decisions
            .iter()
            .filter(|d| d.outcome == crate::models::Outcome::Accept)
            .count();
        info!(%lens, decided = decisions.len(), accepted, "stage complete");

        let stage = self.stage_mut(lens);
        stage.applied = Some(DocumentSnapshot::new(lens, output.applied));
        stage.annotated = Some(DocumentSnapshot::new(lens, output.annotated));
        stage.accepted = accepted;
        stage.rejected = decisions.len() - accepted;
        // ownership of the outcome transfers to the snapshots
        stage.ledger.clear();
        stage.status = StageStatus::Complete;

        self.unlock_next(lens);
        Ok(())
    }

    fn unlock_next(&mut self, lens: Lens) {
        if let Some(next) = lens.next() {
            let next_stage = self.stage_mut(next);
            if next_stage.status == StageStatus::NotStarted {
                next_stage.status = StageStatus::AwaitingRunOrSkip;
            }
        }
    }

    /// The final applied document, available once stage 7 is complete.
    pub fn final_document(&self) -> Option<&str> {
        let last = self.stage(Lens::Roadmap);
        if last.status == StageStatus::Complete {
            last.applied.as_ref().map(|s| s.text.as_str())
        } else {
            None
        }
    }
}
