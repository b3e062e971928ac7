//! WatsonX wire types

use serde::{Deserialize, Serialize};

/// IBM Cloud IAM token response
#[derive(Debug, Deserialize)]
pub struct IamTokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Text generation request
#[derive(Debug, Serialize)]
pub struct TextGenerationRequest {
    pub model_id: String,
    pub input: String,
    pub project_id: String,
    pub parameters: TextGenerationParameters,
}

/// Sampling parameters for text generation
#[derive(Debug, Serialize)]
pub struct TextGenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f64,
    pub top_k: u32,
}

/// Text generation response
#[derive(Debug, Deserialize)]
pub struct TextGenerationResponse {
    #[serde(default)]
    pub model_id: Option<String>,

    pub results: Vec<TextGenerationResult>,
}

#[derive(Debug, Deserialize)]
pub struct TextGenerationResult {
    pub generated_text: String,

    #[serde(default)]
    pub generated_token_count: Option<u64>,

    #[serde(default)]
    pub input_token_count: Option<u64>,

    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl TextGenerationResult {
    /// Prompt plus generated tokens, when the backend reported either
    pub fn tokens_used(&self) -> Option<u64> {
        match (self.input_token_count, self.generated_token_count) {
            (None, None) => None,
            (input, generated) => Some(input.unwrap_or(0) + generated.unwrap_or(0)),
        }
    }
}
