//! Research loop controller
//!
//! Drives the bounded state machine `INIT -> RESEARCHING -> EVALUATING ->
//! {RESEARCHING | WRITING} -> DONE`. The controller owns the state record
//! exclusively: every step produces a delta and the controller merges it,
//! so there is exactly one writer and the append-only invariants hold by
//! construction.
//!
//! Two entry points share one engine: [`ResearchPipeline::run`] returns the
//! final state, [`ResearchPipeline::run_streamed`] additionally emits a
//! [`PhaseEvent`] snapshot after every transition.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::evaluator::SufficiencyEvaluator;
use crate::router::{route, RouteDecision};
use crate::scheduler::TaskScheduler;
use crate::writer::{synthesize_guarded, MemoWriter};
use memo_research::ResearchTask;
use memo_state::{Message, MessageRole, ResearchDelta, ResearchState, Subject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use ulid::Ulid;

/// State machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// State constructed, nothing ran yet
    Init,
    /// A research cycle just merged
    Researching,
    /// A sufficiency evaluation just merged
    Evaluating,
    /// The memo just merged
    Writing,
    /// Run complete
    Done,
}

impl Phase {
    /// Stable name for logs
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Researching => "researching",
            Phase::Evaluating => "evaluating",
            Phase::Writing => "writing",
            Phase::Done => "done",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Ulid);

impl RunId {
    /// Generate a fresh run id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One streamed observation: the phase just completed and the state after it
///
/// States within one run form a chain: each event's accumulators are a
/// superset of the previous event's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvent {
    /// Phase whose transition just merged
    pub phase: Phase,
    /// Full state snapshot after the transition
    pub state: ResearchState,
}

/// The research pipeline: scheduler, evaluator, router and writer wired
/// into the bounded loop
#[derive(Debug)]
pub struct ResearchPipeline {
    scheduler: TaskScheduler,
    evaluator: SufficiencyEvaluator,
    writer: Arc<dyn MemoWriter>,
    config: PipelineConfig,
}

impl ResearchPipeline {
    /// Wire a pipeline from its collaborators
    #[must_use]
    pub fn new(
        tasks: Vec<Arc<dyn ResearchTask>>,
        writer: Arc<dyn MemoWriter>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            scheduler: TaskScheduler::new(tasks),
            evaluator: SufficiencyEvaluator::new(config.max_iterations),
            writer,
            config,
        }
    }

    /// Pipeline configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline to completion and return the final state
    ///
    /// Validates the subject and the task set before any state exists;
    /// after that the run cannot fail, only degrade.
    pub async fn run(&self, company: &str, ticker: &str) -> Result<ResearchState, PipelineError> {
        let subject = self.prepare(company, ticker)?;
        Ok(self.run_inner(subject, None).await)
    }

    /// Run the pipeline, streaming a [`PhaseEvent`] after every transition
    ///
    /// Precondition failures surface immediately; once the receiver exists
    /// the run is underway and terminates with a `Done` event. A dropped
    /// receiver aborts the stream but not the run.
    pub fn run_streamed(
        self: Arc<Self>,
        company: &str,
        ticker: &str,
    ) -> Result<mpsc::Receiver<PhaseEvent>, PipelineError> {
        let subject = self.prepare(company, ticker)?;
        let (tx, rx) = mpsc::channel(self.config.event_capacity);

        tokio::spawn(async move {
            self.run_inner(subject, Some(&tx)).await;
        });

        Ok(rx)
    }

    /// Validate everything that must hold before any state exists
    fn prepare(&self, company: &str, ticker: &str) -> Result<Subject, PipelineError> {
        if self.scheduler.task_count() == 0 {
            return Err(PipelineError::NoTasks);
        }
        Ok(Subject::new(company, ticker)?)
    }

    /// The shared engine behind both entry points
    async fn run_inner(
        &self,
        subject: Subject,
        events: Option<&mpsc::Sender<PhaseEvent>>,
    ) -> ResearchState {
        let run_id = RunId::new();
        tracing::info!(%run_id, subject = %subject, "research run starting");

        let mut state = ResearchState::new(subject.clone());
        state.apply(ResearchDelta::message(Message::new(
            MessageRole::Controller,
            format!("Beginning investment research for {subject}."),
        )));
        emit(events, Phase::Init, &state).await;

        loop {
            // RESEARCHING: fan out over one frozen snapshot, merge the fold.
            let snapshot = state.snapshot();
            let cycle_delta = self.scheduler.run_cycle(&snapshot).await;
            state.apply(cycle_delta);
            emit(events, Phase::Researching, &state).await;

            // EVALUATING: verdict and iteration increment as one transition.
            let evaluation = self.evaluator.evaluate(&state);
            let verdict = evaluation.is_sufficient.unwrap_or(false);
            state.apply(evaluation);
            emit(events, Phase::Evaluating, &state).await;

            match route(verdict) {
                RouteDecision::ContinueResearch => {
                    tracing::info!(
                        %run_id,
                        iteration = state.iteration_count(),
                        "research insufficient, looping"
                    );
                }
                RouteDecision::ProceedToWrite => break,
            }
        }

        // WRITING: write-once synthesis, degraded to the fallback memo on
        // any writer failure.
        let memo = synthesize_guarded(
            self.writer.as_ref(),
            state.subject(),
            state.financial_findings(),
            state.market_findings(),
        )
        .await;
        let draft_len = memo.full_draft().map_or(0, str::len);
        state.apply(ResearchDelta::memo(memo).with_message(Message::new(
            MessageRole::Writer,
            format!("Investment memo drafted ({draft_len} characters)."),
        )));
        emit(events, Phase::Writing, &state).await;

        tracing::info!(
            %run_id,
            iterations = state.iteration_count(),
            financial = state.financial_findings().len(),
            market = state.market_findings().len(),
            "research run complete"
        );
        emit(events, Phase::Done, &state).await;

        state
    }
}

/// Send one event to the stream, if any
async fn emit(events: Option<&mpsc::Sender<PhaseEvent>>, phase: Phase, state: &ResearchState) {
    if let Some(tx) = events {
        if tx
            .send(PhaseEvent {
                phase,
                state: state.snapshot(),
            })
            .await
            .is_err()
        {
            tracing::debug!(phase = %phase, "event receiver dropped");
        }
    }
}
