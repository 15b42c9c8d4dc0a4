//! Transcript messages

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Identifier correlating a tool call request with its result.
///
/// Assigned by the generation provider; unique within one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// The task or follow-up supplied by the caller
    UserText { text: String },
    /// Free text produced by the model
    AssistantText { text: String },
    /// The model asked for a tool to be invoked
    ToolCallRequest(ToolCall),
    /// Output (or stringified error) of a previously requested call
    ToolCallResult { call_id: CallId, output: String },
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::UserText { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Message::AssistantText { text: text.into() }
    }

    pub fn tool_result(call_id: impl Into<CallId>, output: impl Into<String>) -> Self {
        Message::ToolCallResult {
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::UserText { .. } => "user_text",
            Message::AssistantText { .. } => "assistant_text",
            Message::ToolCallRequest(_) => "tool_call_request",
            Message::ToolCallResult { .. } => "tool_call_result",
        }
    }

    /// The call id this message refers to, for request/result messages.
    pub fn call_id(&self) -> Option<&CallId> {
        match self {
            Message::ToolCallRequest(call) => Some(&call.call_id),
            Message::ToolCallResult { call_id, .. } => Some(call_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_with_kind_tag() {
        let msg = Message::tool_result("call_1", "ok");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "tool_call_result");
        assert_eq!(json["call_id"], "call_1");

        let request = Message::ToolCallRequest(ToolCall::new("call_2", "search_brave"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "tool_call_request");
        assert_eq!(json["tool_name"], "search_brave");
    }

    #[test]
    fn test_call_id_accessor() {
        assert_eq!(Message::user("hi").call_id(), None);
        assert_eq!(
            Message::tool_result("x", "y").call_id().map(CallId::as_str),
            Some("x")
        );
    }
}
