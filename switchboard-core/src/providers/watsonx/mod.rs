//! IBM WatsonX provider implementation
//!
//! WatsonX exposes text generation, not chat completion, so the conversation
//! is flattened into a single prompt before it is sent.

mod client;
pub mod prompt;
pub mod types;

pub use client::{WatsonXProvider, DEFAULT_IAM_URL, EXTRA_IAM_URL, EXTRA_PROJECT_ID};
pub use prompt::messages_to_prompt;
