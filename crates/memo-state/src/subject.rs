//! Research subject identification
//!
//! The immutable `(company, ticker)` pair that a research run is about.
//! Set once at state creation; everything downstream borrows it.

use serde::{Deserialize, Serialize};

/// The company under research
///
/// Both identifiers must be non-empty; an empty subject is a configuration
/// error and is rejected before any state exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    company: String,
    ticker: String,
}

impl Subject {
    /// Create a validated subject
    ///
    /// # Errors
    /// Returns `SubjectError` if either identifier is empty or whitespace.
    pub fn new(company: impl Into<String>, ticker: impl Into<String>) -> Result<Self, SubjectError> {
        let company = company.into();
        let ticker = ticker.into();

        if company.trim().is_empty() {
            return Err(SubjectError::EmptyCompany);
        }
        if ticker.trim().is_empty() {
            return Err(SubjectError::EmptyTicker);
        }

        Ok(Self { company, ticker })
    }

    /// Company name
    #[inline]
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Stock ticker symbol
    #[inline]
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.company, self.ticker)
    }
}

/// Subject validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// Company name missing
    #[error("company name must not be empty")]
    EmptyCompany,

    /// Ticker symbol missing
    #[error("ticker symbol must not be empty")]
    EmptyTicker,
}
