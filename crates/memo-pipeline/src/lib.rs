//! # memo-pipeline
//!
//! Orchestration for the investment-memo research loop:
//!
//! - **Scheduler**: fan-out / join over the research tasks, one frozen
//!   snapshot per cycle, failures normalized into diagnostic findings
//! - **Evaluator**: pure sufficiency policy with a hard iteration ceiling
//! - **Router**: deterministic verdict-to-phase mapping
//! - **Writer**: write-once memo synthesis with a deterministic fallback
//! - **Controller**: the bounded `INIT -> RESEARCHING -> EVALUATING ->
//!   {RESEARCHING | WRITING} -> DONE` loop, batch and streaming
//!
//! ## Example
//!
//! ```no_run
//! use memo_pipeline::{PipelineConfig, ResearchPipeline};
//! # use memo_pipeline::MemoWriter;
//! # use memo_research::ResearchTask;
//! # use std::sync::Arc;
//! # async fn demo(tasks: Vec<Arc<dyn ResearchTask>>, writer: Arc<dyn MemoWriter>) {
//! let pipeline = ResearchPipeline::new(tasks, writer, PipelineConfig::new());
//! let state = pipeline.run("Tesla", "TSLA").await.unwrap();
//! assert!(state.memo_sections().is_complete());
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod controller;
mod error;
mod evaluator;
mod router;
mod scheduler;
mod writer;

pub use config::{PipelineConfig, DEFAULT_MAX_ITERATIONS};
pub use controller::{Phase, PhaseEvent, ResearchPipeline, RunId};
pub use error::PipelineError;
pub use evaluator::{is_sufficient, SufficiencyEvaluator};
pub use router::{route, RouteDecision};
pub use scheduler::TaskScheduler;
pub use writer::{fallback_memo, MemoWriter, WriterError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
