//! Groq provider implementation
//!
//! Groq serves Llama, Mixtral and other hosted models behind an
//! OpenAI-compatible chat-completions endpoint.

use crate::protocol::{Generation, GenerationOptions, Message};
use crate::providers::adapter::{Provider, ProviderConfig};
use crate::providers::error::ProviderResult;
use crate::providers::openai::ChatCompletionsClient;
use async_trait::async_trait;

/// Groq provider implementation
pub struct GroqProvider {
    inner: ChatCompletionsClient,
}

impl GroqProvider {
    /// Create a new Groq provider
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            inner: ChatCompletionsClient::new("Groq", config),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        self.inner.config()
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model(&self) -> &str {
        &self.inner.config().model
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    async fn generate_with_usage(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> ProviderResult<Generation> {
        self.inner.complete(messages, options).await
    }
}
