//! Memo Research - collaborator boundary and research tasks
//!
//! The two producer tasks of the research loop and the trait seams to the
//! excluded collaborators:
//! - [`SearchProvider`], [`DocumentStore`], [`Summarizer`], [`Calculator`]:
//!   injected external services, resolved into tagged responses at the
//!   boundary
//! - [`ResearchTask`]: snapshot in, `Result<TaskUpdate, TaskFailure>` out,
//!   with statically declared accumulator ownership
//! - [`MarketIntelligenceTask`] and [`FinancialMetricsTask`]: the concrete
//!   task set with disjoint write sets
//!
//! # Example
//!
//! ```rust,ignore
//! use memo_research::{MarketIntelligenceTask, ResearchTask};
//!
//! let task = MarketIntelligenceTask::new(provider, summarizer);
//! let update = task.produce_update(&snapshot).await?;
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod financial;
mod market;
mod sources;
mod task;

pub use financial::{FinancialMetricsTask, DEFAULT_TOP_K};
pub use market::MarketIntelligenceTask;
pub use sources::{
    Calculator, DocumentStore, SearchProvider, SearchRecord, SearchResponse, SourceError,
    Summarizer,
};
pub use task::{ResearchTask, TaskFailure, TaskUpdate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
