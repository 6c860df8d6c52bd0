//! Chat-completion provider abstractions and implementations.
//!
//! The pipeline only sees the [`ChatProvider`] trait, so tests substitute
//! deterministic stubs for both the reply call and the reply-analysis
//! call without a real model endpoint.

pub mod mock;
pub mod openai;

use crate::models::ChatTurn;
use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockChatProvider;
pub use openai::{OpenAiChatProvider, OpenAiProviderConfig};

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// A completed (non-streaming) generation.
pub struct ProviderReply {
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    pub finish_reason: FinishReason,
}

/// Decoding parameters for a completion request.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Model override; providers fall back to their configured default.
    pub model: Option<String>,

    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,

    pub presence_penalty: Option<f32>,

    pub frequency_penalty: Option<f32>,
}

/// Trait for chat-completion providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a reply for the given conversation.
    async fn complete(
        &self,
        messages: &[ChatTurn],
        params: &GenerationParams,
    ) -> Result<ProviderReply, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
