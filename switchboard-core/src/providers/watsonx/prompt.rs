//! Conversation flattening for text-generation backends

use crate::protocol::Message;

/// Cue line that asks the model to answer as the assistant
pub const ASSISTANT_CUE: &str = "Assistant:";

/// Render a conversation as a single prompt.
///
/// Each turn becomes `"<Role>: <content>"` followed by a newline, turns are
/// joined with a newline, and the prompt ends with the assistant cue.
pub fn messages_to_prompt(messages: &[Message]) -> String {
    let mut parts: Vec<String> = messages
        .iter()
        .map(|m| format!("{}: {}\n", m.role.label(), m.content))
        .collect();
    parts.push(ASSISTANT_CUE.to_string());
    parts.join("\n")
}
