//! Chat service
//!
//! Wraps one provider with the website-chatbot conversation contract: a fixed
//! system prompt, retried and timed backend calls, and a polite apology
//! instead of an error when the backend cannot answer.

use crate::monitoring::{PerformanceMonitor, TimingGuard};
use crate::protocol::{parse_conversation, Generation, GenerationOptions, Message};
use crate::providers::adapter::{Provider, ProviderInfo};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::retry::{RetryExecutor, RetryPolicy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const SYSTEM_PROMPT: &str = "You are a helpful, friendly AI assistant embedded in a website \
chatbot. Provide concise, helpful responses.";

pub const APOLOGY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

/// Reply handed back to the caller of [`ChatService::chat`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ChatReply {
    fn apology(error: &ProviderError) -> Self {
        Self {
            reply: APOLOGY.to_string(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

pub struct ChatService {
    provider: Arc<dyn Provider>,
    monitor: Arc<PerformanceMonitor>,
    retry: RetryExecutor,
    options: GenerationOptions,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn Provider>,
        monitor: Arc<PerformanceMonitor>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            monitor,
            retry: RetryExecutor::new(retry_policy),
            options: GenerationOptions::default(),
        }
    }

    /// Per-call overrides sent with every request
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// `[system prompt] ++ history ++ [user message]`
    pub fn compose(message: &str, history: &[Message]) -> Vec<Message> {
        let mut conversation = Vec::with_capacity(history.len() + 2);
        conversation.push(Message::system(SYSTEM_PROMPT));
        conversation.extend_from_slice(history);
        conversation.push(Message::user(message));
        conversation
    }

    /// Answer `message` in the context of `history`.
    ///
    /// A blank message is an error; every other failure becomes an apology
    /// reply carrying the error description.
    pub async fn chat(&self, message: &str, history: &[Message]) -> ProviderResult<ChatReply> {
        if message.trim().is_empty() {
            return Err(ProviderError::InvalidInput(
                "Message cannot be empty".to_string(),
            ));
        }

        let conversation = Self::compose(message, history);
        info!(
            "Processing chat message with {} ({} history messages)",
            self.provider.name(),
            history.len()
        );

        let result = self
            .retry
            .execute_if(|| self.attempt(&conversation), ProviderError::is_retryable)
            .await;

        Ok(match result {
            Ok(generation) => ChatReply {
                reply: generation.text,
                success: true,
                error: None,
            },
            Err(e) => {
                error!("Chat request via {} failed: {}", self.provider.name(), e);
                ChatReply::apology(&e)
            }
        })
    }

    /// Like [`chat`](Self::chat) with an untyped history.
    ///
    /// `null` and `[]` mean no history. A malformed history degrades to the
    /// apology without calling the backend.
    pub async fn chat_json(&self, message: &str, history: &Value) -> ProviderResult<ChatReply> {
        let history = match history {
            Value::Null => Vec::new(),
            Value::Array(items) if items.is_empty() => Vec::new(),
            other => match parse_conversation(other) {
                Ok(messages) => messages,
                Err(e) => {
                    if message.trim().is_empty() {
                        return Err(ProviderError::InvalidInput(
                            "Message cannot be empty".to_string(),
                        ));
                    }
                    error!("Rejected conversation history: {}", e);
                    return Ok(ChatReply::apology(&e));
                }
            },
        };

        self.chat(message, &history).await
    }

    pub fn status(&self) -> ProviderInfo {
        self.provider.info()
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    async fn attempt(&self, conversation: &[Message]) -> ProviderResult<Generation> {
        let guard = TimingGuard::start(&self.monitor, self.provider.name(), self.provider.model());
        let result = self
            .provider
            .generate_with_usage(conversation, &self.options)
            .await;
        let tokens_used = result.as_ref().ok().and_then(|g| g.tokens_used);
        guard.finish_with_tokens(&result, tokens_used);
        result
    }
}
