//! HTTP error mapping utilities

use crate::providers::error::ProviderError;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

/// Map a non-success status and its response body to a provider error
pub fn map_http_error(
    provider: &str,
    status: StatusCode,
    body: Option<String>,
    request_id: Uuid,
) -> ProviderError {
    let detail = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_message(&v))
        .or_else(|| body.filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    ProviderError::BackendCallFailed {
        provider: provider.to_string(),
        message: format!(
            "HTTP {}: {} [request_id: {}]",
            status.as_u16(),
            detail,
            request_id
        ),
        status: Some(status.as_u16()),
    }
}

/// Extract an error message from the JSON body formats the backends use
fn extract_error_message(json: &Value) -> Option<String> {
    // OpenAI / Groq: { "error": { "message": "...", "type": "...", "code": "..." } }
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    // WatsonX: { "errors": [ { "code": "...", "message": "..." } ], "trace": "..." }
    if let Some(message) = json
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    // IBM IAM: { "errorCode": "...", "errorMessage": "..." }
    if let Some(message) = json.get("errorMessage").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    // Generic: { "message": "..." } or { "error": "..." }
    json.get("message")
        .or_else(|| json.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_error_body() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        let err = map_http_error(
            "OpenAI",
            StatusCode::TOO_MANY_REQUESTS,
            Some(body.to_string()),
            Uuid::nil(),
        );
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("Rate limit reached"));
        assert!(err.to_string().starts_with("OpenAI API call failed: HTTP 429"));
    }

    #[test]
    fn test_watsonx_error_body() {
        let body = r#"{"errors":[{"code":"invalid_input","message":"model_id is invalid"}]}"#;
        let err = map_http_error(
            "WatsonX",
            StatusCode::BAD_REQUEST,
            Some(body.to_string()),
            Uuid::nil(),
        );
        assert!(err.to_string().contains("model_id is invalid"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let err = map_http_error("Groq", StatusCode::BAD_GATEWAY, None, Uuid::nil());
        assert!(err.to_string().contains("Bad Gateway"));
        assert!(err.is_retryable());
    }
}
