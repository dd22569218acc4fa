//! Shared research state
//!
//! The single record threaded through every pipeline step. Owned exclusively
//! by the controller; tasks see clones (snapshots) and all mutation goes
//! through [`ResearchState::apply`] with the delta merge law.

use crate::delta::{Accumulator, ResearchDelta};
use crate::memo::MemoSections;
use crate::message::Message;
use crate::subject::Subject;
use serde::{Deserialize, Serialize};

/// Accumulated state of one research run
///
/// # Invariants
/// - finding accumulators only ever grow (strict superset after each merge)
/// - `iteration_count` increases by exactly one per completed cycle
/// - `is_sufficient` is recomputed from accumulator lengths and the
///   iteration count, nothing else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    /// Immutable research target
    subject: Subject,
    /// Financial findings (append-only)
    financial_findings: Vec<String>,
    /// Market findings (append-only)
    market_findings: Vec<String>,
    /// Conversation log (append-only)
    conversation_log: Vec<Message>,
    /// Memo sections (replaced by the synthesis step)
    memo_sections: MemoSections,
    /// Completed research cycles
    iteration_count: u32,
    /// Latest sufficiency verdict
    is_sufficient: bool,
}

impl ResearchState {
    /// Fresh state for a research run: empty accumulators, zero iterations
    #[must_use]
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            financial_findings: Vec::new(),
            market_findings: Vec::new(),
            conversation_log: Vec::new(),
            memo_sections: MemoSections::new(),
            iteration_count: 0,
            is_sufficient: false,
        }
    }

    /// Research target
    #[inline]
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Financial findings merged so far
    #[inline]
    #[must_use]
    pub fn financial_findings(&self) -> &[String] {
        &self.financial_findings
    }

    /// Market findings merged so far
    #[inline]
    #[must_use]
    pub fn market_findings(&self) -> &[String] {
        &self.market_findings
    }

    /// Findings for one accumulator
    #[inline]
    #[must_use]
    pub fn findings(&self, accumulator: Accumulator) -> &[String] {
        match accumulator {
            Accumulator::Financial => &self.financial_findings,
            Accumulator::Market => &self.market_findings,
        }
    }

    /// Conversation log merged so far
    #[inline]
    #[must_use]
    pub fn conversation_log(&self) -> &[Message] {
        &self.conversation_log
    }

    /// Memo sections (empty until the synthesis step ran)
    #[inline]
    #[must_use]
    pub fn memo_sections(&self) -> &MemoSections {
        &self.memo_sections
    }

    /// Completed research cycles
    #[inline]
    #[must_use]
    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    /// Latest sufficiency verdict
    #[inline]
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.is_sufficient
    }

    /// Merge a delta into the state
    ///
    /// Appends never remove existing entries; overwrite fields replace only
    /// when the delta sets them.
    pub fn apply(&mut self, delta: ResearchDelta) {
        self.financial_findings.extend(delta.financial_findings);
        self.market_findings.extend(delta.market_findings);
        self.conversation_log.extend(delta.messages);
        if let Some(sections) = delta.memo_sections {
            self.memo_sections = sections;
        }
        if let Some(flag) = delta.is_sufficient {
            self.is_sufficient = flag;
        }
        self.iteration_count += delta.iteration_increment;
    }

    /// Frozen copy handed to every task of one cycle
    ///
    /// Tasks all see the identical pre-cycle state; their updates become
    /// visible only in the next cycle's snapshot.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}
