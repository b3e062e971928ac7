//! Provider error types and handling

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when creating or calling a provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Malformed conversation; never reaches the network
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend client was never constructed (missing or invalid credentials)
    #[error("{provider} client not initialized. Check API key.")]
    BackendUnavailable { provider: String },

    /// The remote call failed
    #[error("{provider} API call failed: {message}")]
    BackendCallFailed {
        provider: String,
        message: String,
        /// HTTP status, when the backend answered at all
        status: Option<u16>,
    },

    #[error("Unsupported provider type: {received}. Supported types: openai, groq, watsonx")]
    UnsupportedProviderType { received: String },

    #[error("{provider} requires {field} in configuration")]
    MissingRequiredConfig { provider: String, field: String },

    /// Post-construction availability check failed
    #[error("{provider} provider is not properly configured")]
    ProviderNotConfigured { provider: String },
}

impl ProviderError {
    pub fn call_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::BackendCallFailed {
            provider: provider.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Build a call failure from a transport error raised by `reqwest`
    pub fn from_transport(provider: impl Into<String>, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else if err.is_decode() {
            format!("malformed response: {err}")
        } else {
            err.to_string()
        };

        ProviderError::BackendCallFailed {
            provider: provider.into(),
            message,
            status: err.status().map(|s| s.as_u16()),
        }
    }

    /// HTTP status attached to a backend failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::BackendCallFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Validation and configuration errors are deterministic. Backend failures
    /// are transient unless the backend rejected the request itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::BackendCallFailed { status, .. } => {
                !matches!(status, Some(400 | 401 | 403 | 404))
            }
            ProviderError::InvalidInput(_)
            | ProviderError::BackendUnavailable { .. }
            | ProviderError::UnsupportedProviderType { .. }
            | ProviderError::MissingRequiredConfig { .. }
            | ProviderError::ProviderNotConfigured { .. } => false,
        }
    }
}
