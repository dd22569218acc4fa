//! Memo synthesis boundary
//!
//! The controller invokes the synthesis collaborator exactly once, at
//! `WRITING`. Failures are absorbed here: a failed or incomplete synthesis
//! degrades to a deterministic fallback document, so the `WRITING` step
//! itself cannot fail. Honesty about missing data lives in the memo text.

use async_trait::async_trait;
use memo_state::{MemoSections, Subject, FULL_DRAFT, SECTION_ORDER};

/// Synthesis collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriterError {
    /// Memo generation failed downstream
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// Response arrived without the mandatory full draft
    #[error("synthesis response missing the {FULL_DRAFT} section")]
    MissingDraft,
}

/// Investment memo synthesis collaborator
///
/// Given the subject and both accumulated finding sets, returns the memo
/// sections including the mandatory `full_draft`.
#[async_trait]
pub trait MemoWriter: Send + Sync + std::fmt::Debug {
    /// Synthesize the memo from accumulated research
    async fn synthesize(
        &self,
        subject: &Subject,
        financial_findings: &[String],
        market_findings: &[String],
    ) -> Result<MemoSections, WriterError>;
}

/// Deterministic always-succeeding memo
///
/// Embeds whatever findings exist and says so where research came up empty.
#[must_use]
pub fn fallback_memo(
    subject: &Subject,
    financial_findings: &[String],
    market_findings: &[String],
) -> MemoSections {
    let financial = if financial_findings.is_empty() {
        "Data not available.".to_string()
    } else {
        financial_findings.join("\n\n")
    };
    let market = if market_findings.is_empty() {
        "Data not available.".to_string()
    } else {
        market_findings.join("\n\n")
    };

    let summary = format!(
        "Automatically generated memo for {subject}. Research coverage was \
         incomplete; treat all conclusions as provisional."
    );

    let draft = format!(
        "# Investment Memo: {subject}\n\n\
         ## Executive Summary\n{summary}\n\n\
         ## Financial Performance\n{financial}\n\n\
         ## Market Analysis\n{market}\n"
    );

    let sections = [
        ("executive_summary", summary),
        ("market_analysis", market),
        ("financial_performance", financial),
        (FULL_DRAFT, draft),
    ];

    // Insert in canonical memo order.
    let mut memo = MemoSections::new();
    for name in SECTION_ORDER {
        if let Some((_, text)) = sections.iter().find(|(n, _)| n == name) {
            memo.insert(*name, text.clone());
        }
    }
    memo
}

/// Invoke the writer, degrading every failure mode to the fallback memo
///
/// The returned memo always satisfies the `full_draft` contract.
pub(crate) async fn synthesize_guarded(
    writer: &dyn MemoWriter,
    subject: &Subject,
    financial_findings: &[String],
    market_findings: &[String],
) -> MemoSections {
    match writer
        .synthesize(subject, financial_findings, market_findings)
        .await
    {
        Ok(memo) if memo.is_complete() => memo,
        Ok(_) => {
            tracing::warn!(subject = %subject, "synthesis returned no full draft, using fallback memo");
            fallback_memo(subject, financial_findings, market_findings)
        }
        Err(err) => {
            tracing::warn!(subject = %subject, error = %err, "synthesis failed, using fallback memo");
            fallback_memo(subject, financial_findings, market_findings)
        }
    }
}
