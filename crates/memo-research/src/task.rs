//! Research task contract
//!
//! A task reads a frozen snapshot of the research state and returns a
//! partial update for the one accumulator it owns. Tasks cannot address any
//! other field: the update type carries findings and conversation messages
//! only, and the scheduler routes the findings into the accumulator the task
//! declares. That static disjointness is what makes the unordered fan-in
//! merge safe.

use crate::sources::SourceError;
use async_trait::async_trait;
use memo_state::{Accumulator, Message, ResearchState};

/// Partial update produced by one task in one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    /// Entries for the task's own accumulator
    pub findings: Vec<String>,
    /// Conversation log entries
    pub messages: Vec<Message>,
}

impl TaskUpdate {
    /// Update carrying one finding
    #[must_use]
    pub fn finding(text: impl Into<String>) -> Self {
        Self {
            findings: vec![text.into()],
            messages: Vec::new(),
        }
    }

    /// Builder-style message attachment
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Task-boundary failure
///
/// The scheduler normalizes these into diagnostic findings in the failing
/// task's own accumulator; they never propagate further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFailure {
    /// Web search collaborator failed
    #[error("search failed: {0}")]
    Search(#[from] SourceError),

    /// Document store collaborator failed
    #[error("retrieval failed: {0}")]
    Retrieval(SourceError),
}

/// A polymorphic unit of research work
///
/// Implementations must tolerate empty accumulators (first iteration) and
/// must keep any internal sub-querying invisible to the scheduler: one call,
/// one update.
#[async_trait]
pub trait ResearchTask: Send + Sync + std::fmt::Debug {
    /// Stable task name for logs and diagnostics
    fn name(&self) -> &'static str;

    /// The accumulator this task owns
    fn accumulator(&self) -> Accumulator;

    /// Produce a partial update from a frozen snapshot
    ///
    /// # Errors
    /// Returns `TaskFailure` only for failures the task cannot degrade
    /// internally; the scheduler converts it into a diagnostic finding.
    async fn produce_update(&self, snapshot: &ResearchState) -> Result<TaskUpdate, TaskFailure>;
}
