//! Financial metrics task
//!
//! Extracts structured financial context from the document store: four
//! canonical investor questions, retrieved per-query with a ticker filter,
//! summarized, and folded into a single finding. Arithmetic the summarizer
//! requests via fenced `calc` blocks is executed through the calculator
//! collaborator so numbers are computed, not estimated.

use crate::sources::{Calculator, DocumentStore, Summarizer};
use crate::task::{ResearchTask, TaskFailure, TaskUpdate};
use async_trait::async_trait;
use memo_state::{Accumulator, Message, MessageRole, ResearchState, Subject};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Fenced calculation block emitted by the summarizer
static CALC_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```calc\s*\n(.*?)```").unwrap());

/// Default chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Document-store research task writing to `financial_findings`
#[derive(Debug)]
pub struct FinancialMetricsTask {
    store: Arc<dyn DocumentStore>,
    summarizer: Arc<dyn Summarizer>,
    calculator: Arc<dyn Calculator>,
    top_k: usize,
}

impl FinancialMetricsTask {
    /// Create the task with its injected collaborators
    #[inline]
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        summarizer: Arc<dyn Summarizer>,
        calculator: Arc<dyn Calculator>,
    ) -> Self {
        Self {
            store,
            summarizer,
            calculator,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// With retrieval depth
    #[inline]
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// The canonical investor questions
    fn queries(subject: &Subject) -> [String; 4] {
        let company = subject.company();
        [
            format!("What is {company}'s revenue trend over the last three years?"),
            format!("What are the key risk factors for {company}?"),
            format!("What is {company}'s debt-to-equity ratio?"),
            format!("What are {company}'s operating margins?"),
        ]
    }

    /// Answer one query from retrieved chunks
    async fn answer_query(&self, subject: &Subject, query: &str) -> String {
        let chunks = match self
            .store
            .query(query, subject.ticker(), self.top_k)
            .await
        {
            Ok(chunks) => chunks,
            Err(err) => {
                tracing::warn!(query, error = %err, "document retrieval failed");
                return format!("**{query}**\nError retrieving data: {err}");
            }
        };

        if chunks.is_empty() {
            return format!("**{query}**\nNo data available in the document store.");
        }

        let material = format!("{query}\n\n{}", chunks.join("\n\n"));
        match self.summarizer.summarize(subject, &material).await {
            Ok(answer) => {
                let resolved = self.fold_calculations(&answer).await;
                format!("**{query}**\n{resolved}")
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "financial extraction failed");
                format!("**{query}**\nExtraction failed: {err}")
            }
        }
    }

    /// Replace fenced `calc` blocks with exact results
    ///
    /// Each block is executed through the calculator; a failed execution
    /// leaves an inline note instead of a number.
    async fn fold_calculations(&self, text: &str) -> String {
        let blocks: Vec<(std::ops::Range<usize>, String)> = CALC_BLOCK
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let expr = caps.get(1)?.as_str().trim().to_string();
                Some((whole.range(), expr))
            })
            .collect();

        if blocks.is_empty() {
            return text.to_string();
        }

        let mut resolved = String::with_capacity(text.len());
        let mut cursor = 0;
        for (range, expr) in blocks {
            resolved.push_str(&text[cursor..range.start]);
            match self.calculator.execute(&expr).await {
                Ok(result) => {
                    resolved.push_str(&format!("{expr} = {}", result.trim()));
                }
                Err(err) => {
                    tracing::warn!(expression = %expr, error = %err, "calculation failed");
                    resolved.push_str(&format!("{expr} (calculation failed: {err})"));
                }
            }
            cursor = range.end;
        }
        resolved.push_str(&text[cursor..]);
        resolved
    }
}

#[async_trait]
impl ResearchTask for FinancialMetricsTask {
    fn name(&self) -> &'static str {
        "financial_metrics"
    }

    fn accumulator(&self) -> Accumulator {
        Accumulator::Financial
    }

    async fn produce_update(&self, snapshot: &ResearchState) -> Result<TaskUpdate, TaskFailure> {
        let subject = snapshot.subject();
        let queries = Self::queries(subject);

        // Per-query failures degrade into diagnostic lines inside the folded
        // finding; the task itself always returns a well-formed update.
        let mut sections = Vec::with_capacity(queries.len());
        for query in &queries {
            sections.push(self.answer_query(subject, query).await);
        }

        tracing::debug!(
            company = subject.company(),
            queries = queries.len(),
            "financial research folded"
        );

        Ok(TaskUpdate::finding(sections.join("\n\n")).with_message(Message::new(
            MessageRole::FinancialAnalyst,
            format!(
                "answered {} financial queries for {}",
                queries.len(),
                subject.ticker()
            ),
        )))
    }
}
