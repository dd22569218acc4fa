//! Data sufficiency evaluator
//!
//! A pure decision over `(financial count, market count, iteration count)`:
//! sufficient once both accumulators hold data after at least one full
//! cycle, or unconditionally once the iteration ceiling is reached (give up
//! and write with whatever exists). Evaluation and the per-cycle iteration
//! increment form one state transition, so after N cycles the count is N.

use crate::config::DEFAULT_MAX_ITERATIONS;
use memo_state::{ResearchDelta, ResearchState};

/// The sufficiency policy
///
/// Pure function of its arguments; `iterations` is the number of completed
/// research cycles at evaluation time.
#[inline]
#[must_use]
pub fn is_sufficient(
    financial_count: usize,
    market_count: usize,
    iterations: u32,
    max_iterations: u32,
) -> bool {
    let has_financial = financial_count > 0;
    let has_market = market_count > 0;

    (has_financial && has_market && iterations >= 1) || iterations >= max_iterations
}

/// Evaluator coupling the policy with iteration bookkeeping
#[derive(Debug, Clone, Copy)]
pub struct SufficiencyEvaluator {
    max_iterations: u32,
}

impl SufficiencyEvaluator {
    /// Create an evaluator with the given cycle ceiling
    #[inline]
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    /// Cycle ceiling
    #[inline]
    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Evaluate a just-completed research cycle
    ///
    /// The returned delta carries the recomputed flag and the +1 iteration
    /// increment as one transition. The verdict is computed against the
    /// post-increment count: the cycle being evaluated has completed.
    #[must_use]
    pub fn evaluate(&self, state: &ResearchState) -> ResearchDelta {
        let iterations = state.iteration_count() + 1;
        let financial = state.financial_findings().len();
        let market = state.market_findings().len();
        let verdict = is_sufficient(financial, market, iterations, self.max_iterations);

        tracing::info!(
            financial,
            market,
            iterations,
            max_iterations = self.max_iterations,
            sufficient = verdict,
            "data sufficiency evaluated"
        );

        ResearchDelta::evaluation(verdict)
    }
}

impl Default for SufficiencyEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}
