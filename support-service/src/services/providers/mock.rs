//! Mock provider implementation for testing.

use super::{ChatProvider, FinishReason, GenerationParams, ProviderError, ProviderReply};
use crate::models::{ChatTurn, Role};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock chat provider.
///
/// Replies can be scripted per call; once the script runs out (or when
/// none was given) it echoes the last user message. `failing()` builds a
/// provider whose every call errors, for exercising the fallback path.
pub struct MockChatProvider {
    enabled: bool,
    fail: bool,
    scripted: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl MockChatProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fail: false,
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that errors on every completion call.
    pub fn failing() -> Self {
        Self {
            enabled: true,
            fail: true,
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that answers successive calls with the given replies.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(true);
        {
            let mut scripted = provider.scripted.lock().unwrap();
            scripted.extend(replies.into_iter().map(Into::into));
        }
        provider
    }

    /// Message lists this provider has been called with, in order.
    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        messages: &[ChatTurn],
        _params: &GenerationParams,
    ) -> Result<ProviderReply, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        self.calls.lock().unwrap().push(messages.to_vec());

        if self.fail {
            return Err(ProviderError::ApiError(
                "Mock provider failure".to_string(),
            ));
        }

        let input_tokens: i32 = messages.iter().map(|m| m.content.len() as i32 / 4).sum();

        let text = match self.scripted.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or("");
                format!("Mock response for: {}", last_user)
            }
        };

        let output_tokens = text.len() as i32 / 4;

        Ok(ProviderReply {
            text,
            input_tokens,
            output_tokens,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ))
        }
    }
}
