//! Post-evaluation router
//!
//! A first-class state-machine transition rather than inlined logic, so the
//! wiring is testable independently of the sufficiency policy. Pure: no
//! router call mutates state.

use serde::{Deserialize, Serialize};

/// Where the controller goes after an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteDecision {
    /// Loop back for another research cycle
    ContinueResearch,
    /// Hand off to the synthesis step
    ProceedToWrite,
}

impl RouteDecision {
    /// Stable name for logs
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::ContinueResearch => "continue_research",
            RouteDecision::ProceedToWrite => "proceed_to_write",
        }
    }
}

/// Map the sufficiency verdict to the next phase
#[inline]
#[must_use]
pub fn route(is_sufficient: bool) -> RouteDecision {
    if is_sufficient {
        RouteDecision::ProceedToWrite
    } else {
        RouteDecision::ContinueResearch
    }
}
