//! WatsonX client implementation

use super::prompt::messages_to_prompt;
use super::types::{
    IamTokenResponse, TextGenerationParameters, TextGenerationRequest, TextGenerationResponse,
};
use crate::http::{build_client, join_url, map_http_error, request_id, REQUEST_ID_HEADER};
use crate::protocol::{validate_messages, Generation, GenerationOptions, Message};
use crate::providers::adapter::{Provider, ProviderConfig};
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const PROVIDER_NAME: &str = "WatsonX";

/// Version date pinned for the text generation API
const API_VERSION: &str = "2023-05-29";

/// IBM Cloud IAM endpoint exchanging an API key for a bearer token
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// `ProviderConfig::extra` key holding the WatsonX project id
pub const EXTRA_PROJECT_ID: &str = "project_id";

/// `ProviderConfig::extra` key overriding the IAM endpoint
pub const EXTRA_IAM_URL: &str = "iam_url";

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

const DEFAULT_TOP_P: f64 = 1.0;
const DEFAULT_TOP_K: u32 = 50;

/// WatsonX provider implementation
pub struct WatsonXProvider {
    config: ProviderConfig,
    project_id: Option<String>,
    iam_url: String,
    client: Option<Client>,
}

impl WatsonXProvider {
    /// Create a new WatsonX provider.
    ///
    /// The project id is read from `config.extra["project_id"]`. Without both
    /// an API key and a project id no client is built.
    pub fn new(config: ProviderConfig) -> Self {
        let project_id = config.extra_str(EXTRA_PROJECT_ID).map(str::to_string);
        let iam_url = config
            .extra_str(EXTRA_IAM_URL)
            .unwrap_or(DEFAULT_IAM_URL)
            .to_string();

        let client = if config.api_key.is_empty() || project_id.is_none() {
            warn!("WatsonX API key or project id missing; model not initialized");
            None
        } else {
            match build_client(Duration::from_secs(config.timeout_secs)) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Failed to initialize WatsonX client: {}", e);
                    None
                }
            }
        };

        Self {
            config,
            project_id,
            iam_url,
            client,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Exchange the API key for a bearer token; done on every call
    async fn fetch_token(&self, client: &Client, request_id: Uuid) -> ProviderResult<String> {
        debug!("Requesting IAM token from {} [request_id: {}]", self.iam_url, request_id);

        let response = client
            .post(&self.iam_url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .form(&[
                ("grant_type", IAM_GRANT_TYPE),
                ("apikey", self.config.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(PROVIDER_NAME, e))?;

        let token: IamTokenResponse = Self::read_json(response, request_id).await?;
        Ok(token.access_token)
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        request_id: Uuid,
    ) -> ProviderResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(
                "WatsonX request failed with status {} [request_id: {}]",
                status, request_id
            );
            return Err(map_http_error(PROVIDER_NAME, status, body, request_id));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::from_transport(PROVIDER_NAME, e))
    }

    fn parameters(&self, options: &GenerationOptions) -> TextGenerationParameters {
        let (max_new_tokens, temperature) = self.config.resolve(options);

        TextGenerationParameters {
            max_new_tokens,
            temperature,
            top_p: options
                .extra
                .get("top_p")
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_TOP_P),
            top_k: options
                .extra
                .get("top_k")
                .and_then(|v| v.as_u64())
                .and_then(|k| u32::try_from(k).ok())
                .unwrap_or(DEFAULT_TOP_K),
        }
    }
}

#[async_trait]
impl Provider for WatsonXProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_available(&self) -> bool {
        self.client.is_some() && !self.config.api_key.is_empty() && self.project_id.is_some()
    }

    async fn generate_with_usage(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> ProviderResult<Generation> {
        validate_messages(messages)?;

        let (client, project_id) = match (&self.client, &self.project_id) {
            (Some(client), Some(project_id)) => (client, project_id),
            _ => {
                return Err(ProviderError::BackendUnavailable {
                    provider: PROVIDER_NAME.to_string(),
                })
            }
        };

        let request_id = request_id();
        info!(
            "Calling WatsonX API with model: {} [request_id: {}]",
            self.config.model, request_id
        );

        let token = self.fetch_token(client, request_id).await?;

        let body = TextGenerationRequest {
            model_id: self.config.model.clone(),
            input: messages_to_prompt(messages),
            project_id: project_id.clone(),
            parameters: self.parameters(options),
        };

        let url = join_url(&self.config.base_url, "ml/v1/text/generation");
        debug!("Request URL: {}", url);

        let response = client
            .post(&url)
            .query(&[("version", API_VERSION)])
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("WatsonX request error [request_id: {}]: {}", request_id, e);
                ProviderError::from_transport(PROVIDER_NAME, e)
            })?;

        let parsed: TextGenerationResponse = Self::read_json(response, request_id).await?;

        let result = parsed.results.into_iter().next().ok_or_else(|| {
            ProviderError::call_failed(PROVIDER_NAME, "malformed response: no results returned")
        })?;

        info!(
            "WatsonX response received: {} characters [request_id: {}]",
            result.generated_text.chars().count(),
            request_id
        );

        Ok(Generation {
            tokens_used: result.tokens_used(),
            text: result.generated_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::adapter::ProviderType;
    use serde_json::json;

    fn config() -> ProviderConfig {
        ProviderConfig::for_type(ProviderType::WatsonX, "ibm-key")
            .with_extra(EXTRA_PROJECT_ID, json!("proj-1"))
    }

    #[test]
    fn test_available_with_key_and_project() {
        let provider = WatsonXProvider::new(config());
        assert!(provider.is_available());
        assert_eq!(provider.project_id(), Some("proj-1"));
        assert_eq!(provider.model(), "ibm/granite-13b-chat-v2");
    }

    #[test]
    fn test_unavailable_without_project() {
        let provider =
            WatsonXProvider::new(ProviderConfig::for_type(ProviderType::WatsonX, "ibm-key"));
        assert!(!provider.is_available());
    }

    #[test]
    fn test_parameters_defaults_and_overrides() {
        let provider = WatsonXProvider::new(config());

        let params = provider.parameters(&GenerationOptions::new());
        assert_eq!(params.max_new_tokens, 500);
        assert_eq!(params.top_p, 1.0);
        assert_eq!(params.top_k, 50);

        let options = GenerationOptions::new()
            .with_max_tokens(20)
            .with_extra("top_p", json!(0.5))
            .with_extra("top_k", json!(10));
        let params = provider.parameters(&options);
        assert_eq!(params.max_new_tokens, 20);
        assert_eq!(params.top_p, 0.5);
        assert_eq!(params.top_k, 10);
    }
}
