//! Stub collaborators and fixtures shared across the pipeline test suites
//!
//! Every external seam gets a deterministic stand-in: static responders,
//! always-failing responders, a tiny exact calculator, and a template memo
//! writer. Fixtures wire them into ready-to-run task sets.

#![allow(missing_docs)]

use async_trait::async_trait;
use memo_pipeline::{MemoWriter, WriterError};
use memo_research::{
    Calculator, DocumentStore, FinancialMetricsTask, MarketIntelligenceTask, ResearchTask,
    SearchProvider, SearchRecord, SearchResponse, SourceError, Summarizer, TaskFailure,
    TaskUpdate,
};
use memo_state::{Accumulator, MemoSections, ResearchState, Subject, FULL_DRAFT};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

/// Install a test tracing subscriber once per process
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Search provider returning the same response for every query
#[derive(Debug, Clone)]
pub struct StaticSearchProvider {
    response: SearchResponse,
}

impl StaticSearchProvider {
    pub fn new(response: SearchResponse) -> Self {
        Self { response }
    }

    /// Provider with one plausible market record
    pub fn sample() -> Self {
        Self::new(SearchResponse::from_records(vec![SearchRecord::new(
            "Q4 earnings beat expectations",
            "https://example.com/q4",
            "Revenue grew 12% year over year on strong deliveries.",
        )]))
    }

    /// Provider returning empty responses
    pub fn empty() -> Self {
        Self::new(SearchResponse::default())
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    async fn search(&self, _query: &str) -> Result<SearchResponse, SourceError> {
        Ok(self.response.clone())
    }
}

/// Search provider failing every query
#[derive(Debug, Clone)]
pub struct FailingSearchProvider {
    error: SourceError,
    calls: Arc<AtomicUsize>,
}

impl FailingSearchProvider {
    pub fn new(error: SourceError) -> Self {
        Self {
            error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(SourceError::Unavailable("search api offline".to_string()))
    }

    /// Queries attempted so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FailingSearchProvider {
    async fn search(&self, _query: &str) -> Result<SearchResponse, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Document store returning the same chunks for every query
#[derive(Debug, Clone)]
pub struct StaticDocumentStore {
    chunks: Vec<String>,
}

impl StaticDocumentStore {
    pub fn new(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    /// Store with one plausible filing excerpt
    pub fn sample() -> Self {
        Self::new(vec![
            "Total revenue was $96.8B, up from $81.5B the prior year.".to_string(),
        ])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DocumentStore for StaticDocumentStore {
    async fn query(
        &self,
        _query: &str,
        _ticker: &str,
        top_k: usize,
    ) -> Result<Vec<String>, SourceError> {
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }
}

/// Document store failing every query
#[derive(Debug, Clone)]
pub struct FailingDocumentStore {
    error: SourceError,
}

impl FailingDocumentStore {
    pub fn new(error: SourceError) -> Self {
        Self { error }
    }

    pub fn unavailable() -> Self {
        Self::new(SourceError::Unavailable("vector index offline".to_string()))
    }
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn query(
        &self,
        _query: &str,
        _ticker: &str,
        _top_k: usize,
    ) -> Result<Vec<String>, SourceError> {
        Err(self.error.clone())
    }
}

/// Summarizer returning fixed text, whatever the material
#[derive(Debug, Clone)]
pub struct StaticSummarizer {
    text: String,
}

impl StaticSummarizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Summarizer for StaticSummarizer {
    async fn summarize(&self, _subject: &Subject, _material: &str) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }
}

/// Summarizer failing every request
#[derive(Debug, Clone, Default)]
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _subject: &Subject, _material: &str) -> Result<String, SourceError> {
        Err(SourceError::Rejected("summarizer quota exceeded".to_string()))
    }
}

/// Exact calculator for `a op b` expressions (`+`, `-`, `*`, `/`)
#[derive(Debug, Clone, Default)]
pub struct ArithmeticCalculator;

#[async_trait]
impl Calculator for ArithmeticCalculator {
    async fn execute(&self, expression: &str) -> Result<String, SourceError> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        let [lhs, op, rhs] = parts.as_slice() else {
            return Err(SourceError::Malformed(expression.to_string()));
        };
        let a: f64 = lhs
            .parse()
            .map_err(|_| SourceError::Malformed(expression.to_string()))?;
        let b: f64 = rhs
            .parse()
            .map_err(|_| SourceError::Malformed(expression.to_string()))?;
        let result = match *op {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => a / b,
            _ => return Err(SourceError::Malformed(expression.to_string())),
        };
        Ok(format!("{result}"))
    }
}

/// Task producing an empty update every cycle
///
/// Keeps its accumulator empty however many cycles run, which is what the
/// iteration-ceiling scenarios need.
#[derive(Debug)]
pub struct SilentTask {
    accumulator: Accumulator,
}

impl SilentTask {
    pub fn new(accumulator: Accumulator) -> Self {
        Self { accumulator }
    }
}

#[async_trait]
impl ResearchTask for SilentTask {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn accumulator(&self) -> Accumulator {
        self.accumulator
    }

    async fn produce_update(&self, _snapshot: &ResearchState) -> Result<TaskUpdate, TaskFailure> {
        Ok(TaskUpdate::default())
    }
}

/// Memo writer producing a deterministic template memo
#[derive(Debug, Clone, Default)]
pub struct TemplateWriter;

#[async_trait]
impl MemoWriter for TemplateWriter {
    async fn synthesize(
        &self,
        subject: &Subject,
        financial_findings: &[String],
        market_findings: &[String],
    ) -> Result<MemoSections, WriterError> {
        let draft = format!(
            "# Investment Memo: {subject}\n\n\
             ## Financial Performance\n{}\n\n\
             ## Market Analysis\n{}\n",
            financial_findings.join("\n\n"),
            market_findings.join("\n\n"),
        );
        Ok(MemoSections::new()
            .with_section("executive_summary", format!("Summary for {subject}."))
            .with_section(FULL_DRAFT, draft))
    }
}

/// Memo writer failing every request
#[derive(Debug, Clone, Default)]
pub struct FailingMemoWriter;

#[async_trait]
impl MemoWriter for FailingMemoWriter {
    async fn synthesize(
        &self,
        _subject: &Subject,
        _financial_findings: &[String],
        _market_findings: &[String],
    ) -> Result<MemoSections, WriterError> {
        Err(WriterError::Synthesis("model overloaded".to_string()))
    }
}

/// Both research tasks wired to populated static collaborators
///
/// One run against these completes in a single cycle: each task lands one
/// finding in its accumulator.
pub fn populated_tasks() -> Vec<Arc<dyn ResearchTask>> {
    let financial = FinancialMetricsTask::new(
        Arc::new(StaticDocumentStore::sample()),
        Arc::new(StaticSummarizer::new("Revenue grew 18.8% year over year.")),
        Arc::new(ArithmeticCalculator),
    );
    let market = MarketIntelligenceTask::new(
        Arc::new(StaticSearchProvider::sample()),
        Arc::new(StaticSummarizer::new(
            "Strong market momentum on delivery growth.",
        )),
    );
    vec![Arc::new(financial), Arc::new(market)]
}

/// Both research tasks with a dead search API
///
/// The market task fails its broad query every cycle; the financial task
/// still succeeds.
pub fn tasks_with_failing_search() -> Vec<Arc<dyn ResearchTask>> {
    let financial = FinancialMetricsTask::new(
        Arc::new(StaticDocumentStore::sample()),
        Arc::new(StaticSummarizer::new("Revenue grew 18.8% year over year.")),
        Arc::new(ArithmeticCalculator),
    );
    let market = MarketIntelligenceTask::new(
        Arc::new(FailingSearchProvider::unavailable()),
        Arc::new(StaticSummarizer::new("unused")),
    );
    vec![Arc::new(financial), Arc::new(market)]
}

/// Both research tasks with a dead document store
///
/// The financial task degrades every query into a diagnostic line; the
/// market task still succeeds.
pub fn tasks_with_failing_store() -> Vec<Arc<dyn ResearchTask>> {
    let financial = FinancialMetricsTask::new(
        Arc::new(FailingDocumentStore::unavailable()),
        Arc::new(StaticSummarizer::new("unused")),
        Arc::new(ArithmeticCalculator),
    );
    let market = MarketIntelligenceTask::new(
        Arc::new(StaticSearchProvider::sample()),
        Arc::new(StaticSummarizer::new(
            "Strong market momentum on delivery growth.",
        )),
    );
    vec![Arc::new(financial), Arc::new(market)]
}

/// Both research tasks against sources that answer with nothing
///
/// Each task lands a placeholder finding, so accumulators still fill.
pub fn empty_source_tasks() -> Vec<Arc<dyn ResearchTask>> {
    let financial = FinancialMetricsTask::new(
        Arc::new(StaticDocumentStore::empty()),
        Arc::new(StaticSummarizer::new("unused")),
        Arc::new(ArithmeticCalculator),
    );
    let market = MarketIntelligenceTask::new(
        Arc::new(StaticSearchProvider::empty()),
        Arc::new(StaticSummarizer::new("unused")),
    );
    vec![Arc::new(financial), Arc::new(market)]
}

/// Two silent tasks, one per accumulator
///
/// Accumulators stay empty, so a run only terminates via the iteration
/// ceiling.
pub fn silent_tasks() -> Vec<Arc<dyn ResearchTask>> {
    vec![
        Arc::new(SilentTask::new(Accumulator::Financial)),
        Arc::new(SilentTask::new(Accumulator::Market)),
    ]
}
