//! End-to-end pipeline tests over stub collaborators

use memo_pipeline::{Phase, PipelineConfig, PipelineError, ResearchPipeline};
use memo_research::{FinancialMetricsTask, MarketIntelligenceTask, ResearchTask};
use memo_state::MessageRole;
use memo_test_utils::{
    empty_source_tasks, init_tracing, populated_tasks, silent_tasks, tasks_with_failing_search,
    tasks_with_failing_store, ArithmeticCalculator, FailingMemoWriter, FailingSearchProvider,
    FailingSummarizer, StaticDocumentStore, StaticSearchProvider, StaticSummarizer,
    TemplateWriter,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn pipeline_with(tasks: Vec<Arc<dyn ResearchTask>>, config: PipelineConfig) -> ResearchPipeline {
    ResearchPipeline::new(tasks, Arc::new(TemplateWriter), config)
}

#[tokio::test]
async fn happy_path_completes_in_one_cycle() {
    init_tracing();
    let pipeline = pipeline_with(populated_tasks(), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    assert_eq!(state.iteration_count(), 1);
    assert!(state.is_sufficient());
    assert_eq!(state.financial_findings().len(), 1);
    assert_eq!(state.market_findings().len(), 1);

    let draft = state.memo_sections().full_draft().unwrap();
    assert!(draft.contains("Tesla (TSLA)"));
    assert!(draft.contains("Revenue grew 18.8% year over year."));
    assert!(draft.contains("Strong market momentum on delivery growth."));
}

#[tokio::test]
async fn happy_path_logs_every_participant() {
    init_tracing();
    let pipeline = pipeline_with(populated_tasks(), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    let roles: Vec<MessageRole> = state.conversation_log().iter().map(|m| m.role).collect();
    assert!(roles.contains(&MessageRole::Controller));
    assert!(roles.contains(&MessageRole::FinancialAnalyst));
    assert!(roles.contains(&MessageRole::MarketResearcher));
    assert!(roles.contains(&MessageRole::Writer));
}

#[tokio::test]
async fn empty_research_terminates_at_iteration_ceiling() {
    init_tracing();
    let pipeline =
        ResearchPipeline::new(silent_tasks(), Arc::new(FailingMemoWriter), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    // Three empty cycles, then the ceiling forces a write.
    assert_eq!(state.iteration_count(), 3);
    assert!(state.is_sufficient());
    assert!(state.financial_findings().is_empty());
    assert!(state.market_findings().is_empty());

    // Writer failed too, so the memo is the deterministic fallback.
    let memo = state.memo_sections();
    assert!(memo.is_complete());
    assert_eq!(memo.get("financial_performance"), Some("Data not available."));
    assert_eq!(memo.get("market_analysis"), Some("Data not available."));
}

#[tokio::test]
async fn iteration_count_never_exceeds_configured_ceiling() {
    init_tracing();
    for max in 1..=4u32 {
        let pipeline = pipeline_with(
            silent_tasks(),
            PipelineConfig::new().with_max_iterations(max),
        );
        let state = pipeline.run("Tesla", "TSLA").await.unwrap();
        assert_eq!(state.iteration_count(), max);
    }
}

#[tokio::test]
async fn failed_search_becomes_diagnostic_finding() {
    init_tracing();
    let pipeline = pipeline_with(tasks_with_failing_search(), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    // The failure is contained in the market accumulator; the run still
    // completes in one cycle with the financial side intact.
    assert_eq!(state.iteration_count(), 1);
    assert_eq!(
        state.market_findings(),
        ["search failed: service unavailable: search api offline"]
    );
    assert_eq!(state.financial_findings().len(), 1);
    assert!(state.financial_findings()[0].contains("Revenue grew 18.8% year over year."));
    assert!(state.memo_sections().is_complete());
}

#[tokio::test]
async fn dead_document_store_degrades_into_per_query_diagnostics() {
    init_tracing();
    let pipeline = pipeline_with(tasks_with_failing_store(), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    // Every query degrades to a diagnostic line inside one finding; the run
    // still completes in a single cycle.
    assert_eq!(state.iteration_count(), 1);
    assert_eq!(state.financial_findings().len(), 1);
    assert_eq!(
        state.financial_findings()[0]
            .matches("Error retrieving data: service unavailable: vector index offline")
            .count(),
        4
    );
    assert_eq!(
        state.market_findings(),
        ["Strong market momentum on delivery growth."]
    );
    assert!(state.memo_sections().is_complete());
}

#[tokio::test]
async fn empty_sources_produce_placeholder_findings() {
    init_tracing();
    let pipeline = pipeline_with(empty_source_tasks(), PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    // Placeholder findings still count as data, so one cycle suffices.
    assert_eq!(state.iteration_count(), 1);
    assert!(state.financial_findings()[0].contains("No data available in the document store."));
    assert_eq!(
        state.market_findings(),
        ["No detailed research results available for Tesla."]
    );
}

#[tokio::test]
async fn failed_broad_query_skips_targeted_queries() {
    init_tracing();
    let provider = FailingSearchProvider::unavailable();
    let market = MarketIntelligenceTask::new(
        Arc::new(provider.clone()),
        Arc::new(StaticSummarizer::new("unused")),
    );
    let tasks: Vec<Arc<dyn ResearchTask>> = vec![Arc::new(market)];
    let pipeline = pipeline_with(tasks, PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    // Market-only task set with a dead API: the financial accumulator never
    // fills, so the run hits the ceiling. Each cycle attempts exactly the
    // broad query and no targeted follow-ups.
    assert_eq!(state.iteration_count(), 3);
    assert_eq!(provider.call_count(), 3);
    assert_eq!(state.market_findings().len(), 3);
}

#[tokio::test]
async fn summarizer_outage_falls_back_to_title_digest() {
    init_tracing();
    let financial = FinancialMetricsTask::new(
        Arc::new(StaticDocumentStore::sample()),
        Arc::new(StaticSummarizer::new("Revenue grew 18.8% year over year.")),
        Arc::new(ArithmeticCalculator),
    );
    let market = MarketIntelligenceTask::new(
        Arc::new(StaticSearchProvider::sample()),
        Arc::new(FailingSummarizer),
    );
    let tasks: Vec<Arc<dyn ResearchTask>> = vec![Arc::new(financial), Arc::new(market)];
    let pipeline = pipeline_with(tasks, PipelineConfig::new());

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    assert_eq!(state.iteration_count(), 1);
    assert!(state.market_findings()[0].contains("Market research digest for Tesla"));
    assert!(state.market_findings()[0].contains("https://example.com/q4"));
}

#[tokio::test]
async fn writer_failure_degrades_to_fallback_with_findings() {
    init_tracing();
    let pipeline = ResearchPipeline::new(
        populated_tasks(),
        Arc::new(FailingMemoWriter),
        PipelineConfig::new(),
    );

    let state = pipeline.run("Tesla", "TSLA").await.unwrap();

    let memo = state.memo_sections();
    assert!(memo.is_complete());
    assert!(memo
        .get("financial_performance")
        .unwrap()
        .contains("Revenue grew 18.8% year over year."));
}

#[tokio::test]
async fn invalid_subject_fails_before_any_research() {
    init_tracing();
    let pipeline = pipeline_with(populated_tasks(), PipelineConfig::new());

    let err = pipeline.run("", "TSLA").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidSubject(_)));

    let err = pipeline.run("Tesla", "   ").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidSubject(_)));
}

#[tokio::test]
async fn empty_task_set_is_rejected() {
    init_tracing();
    let pipeline = pipeline_with(Vec::new(), PipelineConfig::new());

    let err = pipeline.run("Tesla", "TSLA").await.unwrap_err();
    assert_eq!(err, PipelineError::NoTasks);
}

#[tokio::test]
async fn streamed_run_emits_phases_in_order() {
    init_tracing();
    let pipeline = Arc::new(pipeline_with(populated_tasks(), PipelineConfig::new()));

    let mut rx = pipeline.run_streamed("Tesla", "TSLA").unwrap();
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Init,
            Phase::Researching,
            Phase::Evaluating,
            Phase::Writing,
            Phase::Done,
        ]
    );

    // The final event carries the completed state.
    let last = events.last().unwrap();
    assert!(last.state.memo_sections().is_complete());
    assert_eq!(last.state.iteration_count(), 1);
}

#[tokio::test]
async fn streamed_states_form_an_append_only_chain() {
    init_tracing();
    let pipeline = Arc::new(pipeline_with(
        silent_tasks(),
        PipelineConfig::new().with_max_iterations(3),
    ));

    let mut rx = pipeline.run_streamed("Tesla", "TSLA").unwrap();
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    // Init + 3 * (Researching, Evaluating) + Writing + Done.
    assert_eq!(events.len(), 9);

    for pair in events.windows(2) {
        let (earlier, later) = (&pair[0].state, &pair[1].state);
        assert!(later.financial_findings().len() >= earlier.financial_findings().len());
        assert!(later.market_findings().len() >= earlier.market_findings().len());
        assert!(later.conversation_log().len() >= earlier.conversation_log().len());
        assert!(later.iteration_count() >= earlier.iteration_count());
    }
}

#[tokio::test]
async fn streamed_run_rejects_bad_input_synchronously() {
    init_tracing();
    let pipeline = Arc::new(pipeline_with(populated_tasks(), PipelineConfig::new()));

    let err = pipeline.run_streamed("", "TSLA").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidSubject(_)));
}

#[tokio::test]
async fn repeated_runs_are_independent() {
    init_tracing();
    let pipeline = pipeline_with(populated_tasks(), PipelineConfig::new());

    let first = pipeline.run("Tesla", "TSLA").await.unwrap();
    let second = pipeline.run("Tesla", "TSLA").await.unwrap();

    // No state bleeds between runs.
    assert_eq!(first.iteration_count(), second.iteration_count());
    assert_eq!(first.financial_findings(), second.financial_findings());
    assert_eq!(first.market_findings(), second.market_findings());
}
