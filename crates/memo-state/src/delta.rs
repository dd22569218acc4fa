//! Per-field merge law
//!
//! Every mutation of [`ResearchState`](crate::ResearchState) travels as a
//! [`ResearchDelta`]. The merge semantics are declared statically, field by
//! field:
//!
//! - finding accumulators and the conversation log: **append** (never lose
//!   previously merged entries)
//! - memo sections and the sufficiency flag: **overwrite** (single writer)
//! - iteration counter: **additive** (controller-owned)
//!
//! Appends to disjoint accumulators commute, which is what makes the
//! scheduler's unordered fan-in safe without locks.

use crate::memo::MemoSections;
use crate::message::Message;
use serde::{Deserialize, Serialize};

/// The append-only accumulators a research task can own
///
/// Each task declares exactly one; the scheduler routes the task's findings
/// into it. A task has no way to address the other accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accumulator {
    /// `financial_findings` — document-store extractions
    Financial,
    /// `market_findings` — web intelligence
    Market,
}

impl Accumulator {
    /// Stable field name for logs
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Accumulator::Financial => "financial_findings",
            Accumulator::Market => "market_findings",
        }
    }
}

/// A partial state update
///
/// Deltas compose: [`ResearchDelta::merge`] concatenates the append-only
/// fields and lets the later delta win on the overwrite fields. Merging
/// deltas that touch disjoint accumulators is commutative up to append
/// order within a single accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchDelta {
    /// Entries to append to `financial_findings`
    pub financial_findings: Vec<String>,
    /// Entries to append to `market_findings`
    pub market_findings: Vec<String>,
    /// Entries to append to the conversation log
    pub messages: Vec<Message>,
    /// Replacement memo sections (overwrite, synthesis step only)
    pub memo_sections: Option<MemoSections>,
    /// Recomputed sufficiency flag (overwrite, evaluator only)
    pub is_sufficient: Option<bool>,
    /// Iteration counter increment (evaluator only)
    pub iteration_increment: u32,
}

impl ResearchDelta {
    /// Empty delta (identity under [`merge`](Self::merge))
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Delta appending findings to one accumulator
    #[must_use]
    pub fn findings(accumulator: Accumulator, entries: Vec<String>) -> Self {
        let mut delta = Self::default();
        match accumulator {
            Accumulator::Financial => delta.financial_findings = entries,
            Accumulator::Market => delta.market_findings = entries,
        }
        delta
    }

    /// Delta appending one conversation message
    #[must_use]
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
            ..Self::default()
        }
    }

    /// Evaluator transition: recomputed flag plus one completed cycle
    #[must_use]
    pub fn evaluation(is_sufficient: bool) -> Self {
        Self {
            is_sufficient: Some(is_sufficient),
            iteration_increment: 1,
            ..Self::default()
        }
    }

    /// Synthesis transition: replace the memo sections
    #[must_use]
    pub fn memo(sections: MemoSections) -> Self {
        Self {
            memo_sections: Some(sections),
            ..Self::default()
        }
    }

    /// Builder-style message attachment
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Combine two deltas into one
    ///
    /// Append fields concatenate (`self` first); overwrite fields take
    /// `other` when it sets them; increments add.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.financial_findings.extend(other.financial_findings);
        self.market_findings.extend(other.market_findings);
        self.messages.extend(other.messages);
        if other.memo_sections.is_some() {
            self.memo_sections = other.memo_sections;
        }
        if other.is_sufficient.is_some() {
            self.is_sufficient = other.is_sufficient;
        }
        self.iteration_increment += other.iteration_increment;
        self
    }

    /// Whether the delta changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.financial_findings.is_empty()
            && self.market_findings.is_empty()
            && self.messages.is_empty()
            && self.memo_sections.is_none()
            && self.is_sufficient.is_none()
            && self.iteration_increment == 0
    }
}
