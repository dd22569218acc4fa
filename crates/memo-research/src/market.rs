//! Market intelligence task
//!
//! Gathers real-time market context through the search collaborator: one
//! broad query plus targeted follow-ups (earnings, competitors, risks),
//! folded through the summarizer into a single finding. The sub-query plan
//! is owned entirely by the task; the scheduler sees one call and one
//! update.

use crate::sources::{SearchProvider, SearchRecord, Summarizer};
use crate::task::{ResearchTask, TaskFailure, TaskUpdate};
use async_trait::async_trait;
use memo_state::{Accumulator, Message, MessageRole, ResearchState, Subject};
use std::sync::Arc;

/// Web research task writing to `market_findings`
#[derive(Debug)]
pub struct MarketIntelligenceTask {
    provider: Arc<dyn SearchProvider>,
    summarizer: Arc<dyn Summarizer>,
}

impl MarketIntelligenceTask {
    /// Create the task with its injected collaborators
    #[inline]
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            provider,
            summarizer,
        }
    }

    /// Opening broad query
    fn broad_query(subject: &Subject) -> String {
        format!(
            "{} {} recent news market analysis",
            subject.company(),
            subject.ticker()
        )
    }

    /// Targeted follow-up queries
    fn targeted_queries(subject: &Subject) -> [String; 3] {
        let company = subject.company();
        let ticker = subject.ticker();
        [
            format!("{company} {ticker} financial results earnings revenue"),
            format!("{company} {ticker} competitors competitive analysis market share"),
            format!("{company} risks challenges regulatory"),
        ]
    }

    /// Collapse collected material into one finding
    ///
    /// Fallback ladder: own synthesis, then provider answers, then a
    /// deterministic digest of record titles.
    async fn synthesize(
        &self,
        subject: &Subject,
        records: &[SearchRecord],
        answers: &[String],
    ) -> String {
        if records.is_empty() {
            if answers.is_empty() {
                return format!(
                    "No detailed research results available for {}.",
                    subject.company()
                );
            }
            return answers.join("\n\n");
        }

        let material = records
            .iter()
            .map(|r| format!("Title: {}\nURL: {}\nContent: {}", r.title, r.url, r.content))
            .collect::<Vec<_>>()
            .join("\n---\n");

        match self.summarizer.summarize(subject, &material).await {
            Ok(synthesis) if !synthesis.trim().is_empty() => synthesis,
            Ok(_) | Err(_) => {
                tracing::warn!(
                    company = subject.company(),
                    "market synthesis unavailable, using fallback digest"
                );
                if !answers.is_empty() {
                    return answers.join("\n\n");
                }
                Self::title_digest(subject, records)
            }
        }
    }

    fn title_digest(subject: &Subject, records: &[SearchRecord]) -> String {
        let mut digest = format!("Market research digest for {}:\n", subject.company());
        for (i, record) in records.iter().enumerate() {
            digest.push_str(&format!("{}. {} - {}\n", i + 1, record.title, record.url));
        }
        digest
    }
}

#[async_trait]
impl ResearchTask for MarketIntelligenceTask {
    fn name(&self) -> &'static str {
        "market_intelligence"
    }

    fn accumulator(&self) -> Accumulator {
        Accumulator::Market
    }

    async fn produce_update(&self, snapshot: &ResearchState) -> Result<TaskUpdate, TaskFailure> {
        let subject = snapshot.subject();
        let mut query_count = 1usize;

        // The broad query is load-bearing: if it fails there is nothing to
        // fold, and the failure surfaces as a diagnostic finding upstream.
        let broad = self.provider.search(&Self::broad_query(subject)).await?;

        let mut records = broad.records;
        let mut answers: Vec<String> = broad.answer.into_iter().collect();

        for query in Self::targeted_queries(subject) {
            match self.provider.search(&query).await {
                Ok(response) => {
                    query_count += 1;
                    records.extend(response.records);
                    answers.extend(response.answer);
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "targeted search failed, skipping");
                }
            }
        }

        tracing::debug!(
            company = subject.company(),
            records = records.len(),
            queries = query_count,
            "market research collected"
        );

        let finding = self.synthesize(subject, &records, &answers).await;

        Ok(TaskUpdate::finding(finding).with_message(Message::new(
            MessageRole::MarketResearcher,
            format!(
                "folded {} records from {} queries into one market finding",
                records.len(),
                query_count
            ),
        )))
    }
}
