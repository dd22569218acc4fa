//! Investment memo sections
//!
//! Section-name to text mapping produced by the synthesis step. The one
//! field of the research state with replace semantics: it has a single
//! writer that runs exactly once, at the very end.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mandatory section every memo must carry
pub const FULL_DRAFT: &str = "full_draft";

/// Canonical section names, in memo order
///
/// Follows the standard VC/PE memo structure. Writers may emit a subset;
/// only [`FULL_DRAFT`] is mandatory.
pub const SECTION_ORDER: &[&str] = &[
    "executive_summary",
    "company_overview",
    "market_analysis",
    "financial_performance",
    "strategic_moat",
    "risks_mitigations",
    "conclusion",
    FULL_DRAFT,
];

/// Ordered section-name to text mapping
///
/// Insertion order is preserved so serialized memos render sections in the
/// order the writer produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoSections(IndexMap<String, String>);

impl MemoSections {
    /// Create an empty memo
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style section insert
    #[inline]
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Insert or replace a section
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.0.insert(name.into(), text.into());
    }

    /// Look up a section by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The mandatory full-draft section, if present
    #[inline]
    #[must_use]
    pub fn full_draft(&self) -> Option<&str> {
        self.get(FULL_DRAFT)
    }

    /// Whether the memo satisfies the synthesis contract
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.full_draft().is_some_and(|draft| !draft.trim().is_empty())
    }

    /// Number of sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no sections exist
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate sections in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
