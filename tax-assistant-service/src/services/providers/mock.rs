//! Mock provider implementation for testing.

use std::sync::Mutex;

use super::{GenerationParams, ProviderError, TextProvider};
use crate::models::Conversation;
use async_trait::async_trait;

/// What the mock does when called.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always answer with this text.
    Reply(String),
    /// Answer with the message that was sent.
    Echo,
    /// Always fail with this error.
    Fail(ProviderError),
}

/// One captured `send_message` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system_instruction: String,
    pub message: String,
    pub params: GenerationParams,
}

/// Deterministic text provider that records every call it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockBehavior::Fail(error))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn send_message(
        &self,
        conversation: &Conversation<'_>,
        message: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system_instruction: conversation.system_instruction().to_string(),
                message: message.to_string(),
                params: *params,
            });
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Echo => Ok(message.to_string()),
            MockBehavior::Fail(error) => Err(error.clone()),
        }
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
