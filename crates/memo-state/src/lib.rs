//! Memo State - shared research state and merge law
//!
//! The single source of truth for a research run:
//! - [`Subject`]: the immutable `(company, ticker)` research target
//! - [`ResearchState`]: accumulators, memo sections, control-flow flags
//! - [`ResearchDelta`]: the statically declared per-field merge law
//!   (append for findings and messages, overwrite for memo/sufficiency,
//!   additive for the iteration counter)
//!
//! Tasks receive snapshots and return deltas; only the controller applies
//! deltas to the authoritative state.
//!
//! # Example
//!
//! ```rust
//! use memo_state::{Accumulator, ResearchDelta, ResearchState, Subject};
//!
//! let subject = Subject::new("Tesla", "TSLA")?;
//! let mut state = ResearchState::new(subject);
//!
//! state.apply(ResearchDelta::findings(
//!     Accumulator::Market,
//!     vec!["EV demand holding up".to_string()],
//! ));
//! assert_eq!(state.market_findings().len(), 1);
//! # Ok::<(), memo_state::SubjectError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod delta;
mod memo;
mod message;
mod state;
mod subject;

pub use delta::{Accumulator, ResearchDelta};
pub use memo::{MemoSections, FULL_DRAFT, SECTION_ORDER};
pub use message::{Message, MessageRole};
pub use state::ResearchState;
pub use subject::{Subject, SubjectError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
