//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Default research cycle ceiling
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Pipeline configuration
///
/// `max_iterations` bounds the research loop: the evaluator forces
/// sufficiency once the iteration count reaches it, so every run terminates
/// within that many research phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Research cycle ceiling
    pub max_iterations: u32,
    /// Streaming event channel capacity
    pub event_capacity: usize,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With research cycle ceiling
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// With streaming channel capacity
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_capacity: 16,
        }
    }
}
