//! Protocol module for conversation structures
//!
//! This module defines the provider-agnostic conversation model and the
//! validation every provider applies before dispatch.

pub mod types;
pub mod validate;

pub use types::{Generation, GenerationOptions, Message, MessageRole};
pub use validate::{parse_conversation, validate_messages};
