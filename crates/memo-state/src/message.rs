//! Conversation log records
//!
//! Shared context across research cycles. Append-only, same merge law as the
//! finding accumulators; nothing in the core policy reads it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageRole {
    /// Pipeline controller
    Controller,
    /// Market intelligence task
    MarketResearcher,
    /// Financial metrics task
    FinancialAnalyst,
    /// Memo synthesis step
    Writer,
}

impl MessageRole {
    /// Stable lowercase name for logs
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Controller => "controller",
            MessageRole::MarketResearcher => "market_researcher",
            MessageRole::FinancialAnalyst => "financial_analyst",
            MessageRole::Writer => "writer",
        }
    }
}

/// One conversation log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Producer role
    pub role: MessageRole,
    /// Entry text
    pub content: String,
    /// Creation time (UTC)
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message timestamped now
    #[inline]
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_role_names() {
        assert_eq!(MessageRole::Controller.as_str(), "controller");
        assert_eq!(MessageRole::Writer.as_str(), "writer");
    }

    #[test]
    fn message_carries_content() {
        let msg = Message::new(MessageRole::MarketResearcher, "searched 4 queries");
        assert_eq!(msg.role, MessageRole::MarketResearcher);
        assert_eq!(msg.content, "searched 4 queries");
    }
}
