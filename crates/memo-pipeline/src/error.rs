//! Pipeline error types
//!
//! Only precondition failures surface here. Task and synthesis failures are
//! normalized into data values (diagnostic findings, fallback memo) at their
//! boundaries, so the running state machine has no error branches.

use memo_state::SubjectError;

/// Errors that abort a run before any state exists
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Subject identifiers failed validation
    #[error("invalid subject: {0}")]
    InvalidSubject(#[from] SubjectError),

    /// Pipeline constructed without any research tasks
    #[error("no research tasks configured")]
    NoTasks,
}
