//! Switchboard Core Library
//!
//! A uniform calling convention over several hosted text-generation backends
//! (OpenAI, Groq, IBM WatsonX). Callers pick a backend at configuration time
//! through [`ProviderFactory`], wrap calls with [`RetryExecutor`], and time
//! them with a [`PerformanceMonitor`].

pub mod config;
pub mod http;
pub mod monitoring;
pub mod protocol;
pub mod providers;
pub mod service;

pub use config::{ConfigError, ConfigValidator, Settings};
pub use monitoring::{PerformanceMonitor, RequestMetric, Stats};
pub use protocol::{Generation, GenerationOptions, Message, MessageRole};
pub use providers::{
    FactoryOptions, Provider, ProviderError, ProviderFactory, ProviderInfo, ProviderResult,
    ProviderType, RetryExecutor, RetryPolicy,
};
pub use service::{ChatReply, ChatService};

/// Returns the version of the Switchboard Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
