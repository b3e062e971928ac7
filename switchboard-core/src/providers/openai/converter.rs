//! Conversion between the conversation model and the chat-completion format

use super::types::{OpenAIMessage, OpenAIRequest, OpenAIResponse};
use crate::protocol::{Generation, GenerationOptions, Message};
use crate::providers::adapter::ProviderConfig;
use tracing::warn;

/// Request fields owned by the converter; `extra` cannot override them
const RESERVED_FIELDS: [&str; 4] = ["model", "messages", "max_tokens", "temperature"];

/// Build a chat completion request for a validated conversation
pub fn to_openai_request(
    config: &ProviderConfig,
    messages: &[Message],
    options: &GenerationOptions,
) -> OpenAIRequest {
    let (max_tokens, temperature) = config.resolve(options);

    OpenAIRequest {
        model: config.model.clone(),
        messages: messages.iter().map(to_openai_message).collect(),
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        extra: options
            .extra
            .iter()
            .filter(|(key, _)| {
                let reserved = RESERVED_FIELDS.contains(&key.as_str());
                if reserved {
                    warn!("Ignoring extra parameter '{}': set it through the typed option", key);
                }
                !reserved
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    }
}

fn to_openai_message(message: &Message) -> OpenAIMessage {
    OpenAIMessage {
        role: message.role.as_str().to_string(),
        content: Some(message.content.clone()),
    }
}

/// Take the text of the top choice.
///
/// Returns a description of what was missing when the response has no usable
/// content.
pub fn from_openai_response(response: OpenAIResponse) -> Result<Generation, String> {
    let tokens_used = response.usage.map(|u| u.total_tokens);

    let choice = response
        .choices
        .into_iter()
        .min_by_key(|c| c.index)
        .ok_or_else(|| "response contained no choices".to_string())?;

    let text = choice
        .message
        .content
        .ok_or_else(|| "top choice has no message content".to_string())?;

    Ok(Generation { text, tokens_used })
}
