//! Chat-completion wire types
//!
//! These types match the OpenAI chat-completions format. Groq serves the same
//! shape from its OpenAI-compatible endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Chat completion request
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Caller-supplied parameters such as `top_p` or `stop`
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Message in a chat completion request or response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    pub choices: Vec<OpenAIChoice>,

    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// One completion choice
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub index: u32,

    pub message: OpenAIMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub completion_tokens: u64,

    #[serde(default)]
    pub total_tokens: u64,
}
