//! External data source boundary
//!
//! Narrow trait seams for the collaborators the pipeline excludes: the web
//! search API, the vector document store, the LLM summarizer, and the exact
//! arithmetic executor. Responses are tagged types resolved once here; no
//! downstream code re-inspects collaborator payload shapes.

use async_trait::async_trait;
use memo_state::Subject;
use serde::{Deserialize, Serialize};

/// One retrieved web document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Document title
    pub title: String,
    /// Source URL
    pub url: String,
    /// Extracted text content
    pub content: String,
}

impl SearchRecord {
    /// Create a record
    #[inline]
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}

/// A resolved search response
///
/// Providers may attach a pre-synthesized answer alongside the raw records;
/// tasks prefer their own synthesis and fall back to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Retrieved documents
    pub records: Vec<SearchRecord>,
    /// Provider-level synthesized answer, if any
    pub answer: Option<String>,
}

impl SearchResponse {
    /// Response carrying only records
    #[inline]
    #[must_use]
    pub fn from_records(records: Vec<SearchRecord>) -> Self {
        Self {
            records,
            answer: None,
        }
    }

    /// Builder-style answer attachment
    #[inline]
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

/// Errors a collaborator can report
///
/// These never cross the scheduler boundary; tasks convert them into
/// diagnostic findings or a [`TaskFailure`](crate::TaskFailure).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Downstream service unreachable
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Downstream service refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No response within the collaborator's own deadline
    #[error("timed out after {0}s")]
    Timeout(u64),
}

/// Web search collaborator
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Run one query, returning records and an optional provider answer
    async fn search(&self, query: &str) -> Result<SearchResponse, SourceError>;
}

/// Vector document store collaborator
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Top-k textual chunks for a query, filtered by ticker
    async fn query(
        &self,
        query: &str,
        ticker: &str,
        top_k: usize,
    ) -> Result<Vec<String>, SourceError>;
}

/// Summarization collaborator
///
/// Collapses raw material into one concise textual insight for the subject.
#[async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// Summarize material about the subject
    async fn summarize(&self, subject: &Subject, material: &str) -> Result<String, SourceError>;
}

/// Exact-arithmetic collaborator
///
/// Executes a calculation expression and returns the textual result, so
/// numeric claims are computed rather than estimated.
#[async_trait]
pub trait Calculator: Send + Sync + std::fmt::Debug {
    /// Evaluate one expression
    async fn execute(&self, expression: &str) -> Result<String, SourceError>;
}
