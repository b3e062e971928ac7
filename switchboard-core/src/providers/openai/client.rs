//! Chat-completion client and the OpenAI provider

use super::converter::{from_openai_response, to_openai_request};
use super::types::OpenAIResponse;
use crate::http::{build_client, join_url, map_http_error, request_id, REQUEST_ID_HEADER};
use crate::protocol::{validate_messages, Generation, GenerationOptions, Message};
use crate::providers::adapter::{Provider, ProviderConfig};
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Client for any backend speaking the chat-completions format
pub struct ChatCompletionsClient {
    provider_name: &'static str,
    config: ProviderConfig,
    client: Option<Client>,
}

impl ChatCompletionsClient {
    /// Create a client. No HTTP client is built when the API key is empty.
    pub fn new(provider_name: &'static str, config: ProviderConfig) -> Self {
        let client = if config.api_key.is_empty() {
            warn!("{} API key is empty; client not initialized", provider_name);
            None
        } else {
            match build_client(Duration::from_secs(config.timeout_secs)) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Failed to create {} HTTP client: {}", provider_name, e);
                    None
                }
            }
        };

        Self {
            provider_name,
            config,
            client,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some() && !self.config.api_key.is_empty()
    }

    /// Send one chat completion request
    pub async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> ProviderResult<Generation> {
        validate_messages(messages)?;

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ProviderError::BackendUnavailable {
                provider: self.provider_name.to_string(),
            })?;

        let request_id = request_id();
        let url = join_url(&self.config.base_url, "chat/completions");
        let body = to_openai_request(&self.config, messages, options);

        info!(
            "Calling {} API with model: {} [request_id: {}]",
            self.provider_name, self.config.model, request_id
        );
        debug!("Request URL: {}", url);

        let response = client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "{} request error [request_id: {}]: {}",
                    self.provider_name, request_id, e
                );
                ProviderError::from_transport(self.provider_name, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(
                "{} request failed with status {} [request_id: {}]",
                self.provider_name, status, request_id
            );
            return Err(map_http_error(self.provider_name, status, body, request_id));
        }

        let parsed: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_transport(self.provider_name, e))?;

        let generation = from_openai_response(parsed).map_err(|reason| {
            error!(
                "{} returned an unusable response [request_id: {}]: {}",
                self.provider_name, request_id, reason
            );
            ProviderError::call_failed(self.provider_name, format!("malformed response: {reason}"))
        })?;

        info!(
            "{} response received: {} characters [request_id: {}]",
            self.provider_name,
            generation.text.chars().count(),
            request_id
        );

        Ok(generation)
    }
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    inner: ChatCompletionsClient,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            inner: ChatCompletionsClient::new("OpenAI", config),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        self.inner.config()
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::adapter::ProviderType;

    #[test]
    fn test_empty_key_leaves_provider_unavailable() {
        let provider = OpenAIProvider::new(ProviderConfig::for_type(ProviderType::OpenAI, ""));
        assert!(!provider.is_available());
        assert_eq!(provider.name(), "OpenAI");
    }

    #[tokio::test]
    async fn test_unavailable_provider_reports_backend_unavailable() {
        let provider = OpenAIProvider::new(ProviderConfig::for_type(ProviderType::OpenAI, ""));
        let err = provider
            .generate_response(&[Message::user("Hi")], &GenerationOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::BackendUnavailable {
                provider: "OpenAI".to_string()
            }
        );
    }
}
