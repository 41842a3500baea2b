//! Completion provider contract.
//!
//! The hosted language model is a black box: a system preamble and ordered
//! turns go in, text or a [`ProviderError`] comes out. Backends live in
//! `solace-interaction`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a turn as the provider sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One conversation turn sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ProviderTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A provider-ready request.
///
/// Built only by the context builder, which guarantees that `turns` never
/// holds two consecutive assistant turns and always ends on a user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub system_preamble: String,
    pub turns: Vec<ProviderTurn>,
}

impl ProviderRequest {
    /// The final user turn, which carries the new message.
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .last()
            .filter(|turn| turn.role == TurnRole::User)
            .map(|turn| turn.content.as_str())
    }
}

/// Failures of the completion call. Always recovered by the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport failure before a response arrived
    #[error("Provider request failed: {message}")]
    Request { message: String, is_retryable: bool },

    /// Non-2xx response
    #[error("Provider returned HTTP {status_code}: {message}")]
    Status { status_code: u16, message: String },

    /// 2xx response whose body held no usable text
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// No backend configured (e.g. missing API key)
    #[error("Provider not configured: {0}")]
    Unconfigured(String),
}

impl ProviderError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self::Unconfigured(message.into())
    }
}

/// Text-in/text-out completion collaborator.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Runs one completion. No retries, no streaming.
    async fn complete(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_user_text() {
        let request = ProviderRequest {
            system_preamble: "be kind".to_string(),
            turns: vec![ProviderTurn::assistant("hi"), ProviderTurn::user("hello")],
        };
        assert_eq!(request.last_user_text(), Some("hello"));

        let ends_on_assistant = ProviderRequest {
            system_preamble: String::new(),
            turns: vec![ProviderTurn::assistant("hi")],
        };
        assert_eq!(ends_on_assistant.last_user_text(), None);
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Status {
            status_code: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Provider returned HTTP 503: overloaded");
    }
}
