//! OpenAI provider implementation
//!
//! The chat-completion client here is shared with the Groq provider, which
//! speaks the same wire format against a different endpoint.

mod client;
pub mod converter;
pub mod types;

pub use client::{ChatCompletionsClient, OpenAIProvider};
pub use types::{OpenAIRequest, OpenAIResponse};
