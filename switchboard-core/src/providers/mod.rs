//! Provider abstraction layer
//!
//! One [`Provider`] implementation per backend, the factory that builds them
//! from a type tag and credentials, and the retry policy applied to calls.

pub mod adapter;
pub mod error;
pub mod factory;
pub mod groq;
pub mod openai;
pub mod retry;
pub mod watsonx;

pub use adapter::{Provider, ProviderConfig, ProviderInfo, ProviderType};
pub use error::{ProviderError, ProviderResult};
pub use factory::{FactoryOptions, ProviderFactory};
pub use retry::{RetryExecutor, RetryPolicy, RetryResult};

// Re-export concrete providers
pub use groq::GroqProvider;
pub use openai::OpenAIProvider;
pub use watsonx::WatsonXProvider;
