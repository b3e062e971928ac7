//! Conversation validation
//!
//! Every provider runs [`validate_messages`] before touching the network.
//! [`parse_conversation`] is the entry point for untyped input (for example a
//! JSON conversation history received by an outer layer); it catches the
//! shape errors that typed [`Message`] values cannot express.

use super::types::{Message, MessageRole};
use crate::providers::error::{ProviderError, ProviderResult};
use serde_json::Value;

/// Check that a typed conversation is non-empty and has no empty content
pub fn validate_messages(messages: &[Message]) -> ProviderResult<()> {
    if messages.is_empty() {
        return Err(ProviderError::InvalidInput(
            "conversation must contain at least one message".to_string(),
        ));
    }

    if let Some(index) = messages.iter().position(|m| m.content.is_empty()) {
        return Err(ProviderError::InvalidInput(format!(
            "message {index} has empty content"
        )));
    }

    Ok(())
}

/// Parse and validate an untyped conversation
pub fn parse_conversation(value: &Value) -> ProviderResult<Vec<Message>> {
    let items = value.as_array().ok_or_else(|| {
        ProviderError::InvalidInput("conversation must be an array of messages".to_string())
    })?;

    let messages = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_message(index, item))
        .collect::<ProviderResult<Vec<_>>>()?;

    validate_messages(&messages)?;
    Ok(messages)
}

fn parse_message(index: usize, item: &Value) -> ProviderResult<Message> {
    let object = item.as_object().ok_or_else(|| {
        ProviderError::InvalidInput(format!("message {index} is not an object"))
    })?;

    let role = object
        .get("role")
        .ok_or_else(|| ProviderError::InvalidInput(format!("message {index} is missing 'role'")))?;
    let content = object.get("content").ok_or_else(|| {
        ProviderError::InvalidInput(format!("message {index} is missing 'content'"))
    })?;

    let role = role
        .as_str()
        .and_then(MessageRole::parse)
        .ok_or_else(|| {
            ProviderError::InvalidInput(format!(
                "message {index} has unknown role {role}; expected one of system, user, assistant"
            ))
        })?;

    let content = content.as_str().ok_or_else(|| {
        ProviderError::InvalidInput(format!("message {index} content must be a string"))
    })?;

    Ok(Message::new(role, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_valid_conversation() {
        let value = json!([
            {"role": "system", "content": "Be brief"},
            {"role": "user", "content": "Hi"}
        ]);
        let messages = parse_conversation(&value).unwrap();
        assert_eq!(messages, vec![Message::system("Be brief"), Message::user("Hi")]);
    }

    #[test]
    fn test_empty_conversation_rejected() {
        assert!(matches!(
            validate_messages(&[]),
            Err(ProviderError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_conversation(&json!([])),
            Err(ProviderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_role_names_index() {
        let value = json!([
            {"role": "user", "content": "Hi"},
            {"role": "tool", "content": "x"}
        ]);
        let err = parse_conversation(&value).unwrap_err();
        assert!(err.to_string().contains("message 1"));
        assert!(err.to_string().contains("unknown role"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let value = json!([{"role": "user", "content": "Hi", "name": "bob"}]);
        assert_eq!(parse_conversation(&value).unwrap().len(), 1);
    }

    #[test_case(json!({"a": 1}), "conversation must be an array of messages" ; "not an array")]
    #[test_case(json!(["x"]), "message 0 is not an object" ; "non object element")]
    #[test_case(json!([{"content": "Hi"}]), "message 0 is missing 'role'" ; "missing role")]
    #[test_case(json!([{"role": "user"}]), "message 0 is missing 'content'" ; "missing content")]
    #[test_case(
        json!([{"role": "user", "content": "Hi"}, {"role": "user", "content": 5}]),
        "message 1 content must be a string" ;
        "non string content"
    )]
    #[test_case(
        json!([{"role": "user", "content": "Hi"}, {"role": "assistant", "content": ""}]),
        "message 1 has empty content" ;
        "empty content"
    )]
    fn test_malformed_conversation_is_invalid_input(value: Value, expected: &str) {
        assert_eq!(
            parse_conversation(&value),
            Err(ProviderError::InvalidInput(expected.to_string()))
        );
    }
}
