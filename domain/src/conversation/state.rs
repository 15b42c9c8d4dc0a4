//! Append-only conversation state with call correlation.

use super::message::{CallId, Message};
use crate::tool::entities::ToolCall;
use std::collections::HashSet;
use thiserror::Error;

/// An append that would break transcript correlation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Tool call id '{0}' was already requested")]
    DuplicateCallId(CallId),

    #[error("Tool result for '{0}' has no preceding request")]
    UnmatchedResult(CallId),

    #[error("Tool call '{0}' already has a result")]
    DuplicateResult(CallId),
}

/// Ordered transcript of one planning run.
///
/// Invariants, checked on every append:
/// - call ids are unique among requests
/// - every `ToolCallResult` follows the `ToolCallRequest` with the same id
/// - a request receives at most one result
///
/// There is no way to remove or reorder messages.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    requested: HashSet<CallId>,
    resolved: HashSet<CallId>,
}

impl ConversationState {
    /// Start a transcript holding only the initiating user text.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(task)],
            requested: HashSet::new(),
            resolved: HashSet::new(),
        }
    }

    pub fn push(&mut self, message: Message) -> Result<(), ConversationError> {
        match &message {
            Message::ToolCallRequest(call) => {
                if self.requested.contains(&call.call_id) {
                    return Err(ConversationError::DuplicateCallId(call.call_id.clone()));
                }
                self.requested.insert(call.call_id.clone());
            }
            Message::ToolCallResult { call_id, .. } => {
                if !self.requested.contains(call_id) {
                    return Err(ConversationError::UnmatchedResult(call_id.clone()));
                }
                if !self.resolved.insert(call_id.clone()) {
                    return Err(ConversationError::DuplicateResult(call_id.clone()));
                }
            }
            Message::UserText { .. } | Message::AssistantText { .. } => {}
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }

    pub fn push_request(&mut self, call: ToolCall) -> Result<(), ConversationError> {
        self.push(Message::ToolCallRequest(call))
    }

    pub fn push_result(
        &mut self,
        call_id: &CallId,
        output: impl Into<String>,
    ) -> Result<(), ConversationError> {
        self.push(Message::tool_result(call_id.clone(), output))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Requests that do not yet have a result.
    pub fn pending_calls(&self) -> impl Iterator<Item = &CallId> {
        self.requested.difference(&self.resolved)
    }

    pub fn tool_call_count(&self) -> usize {
        self.requested.len()
    }

    /// Most recent free text from the model, if any.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::AssistantText { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holds_only_user_text() {
        let state = ConversationState::new("Research the topic");
        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0], Message::user("Research the topic"));
    }

    #[test]
    fn test_result_follows_request() {
        let mut state = ConversationState::new("task");
        state.push_request(ToolCall::new("c1", "search_brave")).unwrap();
        assert_eq!(state.pending_calls().count(), 1);

        state.push_result(&CallId::from("c1"), "3 results").unwrap();
        assert_eq!(state.pending_calls().count(), 0);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_result_without_request_rejected() {
        let mut state = ConversationState::new("task");
        let err = state.push_result(&CallId::from("ghost"), "x").unwrap_err();
        assert_eq!(err, ConversationError::UnmatchedResult(CallId::from("ghost")));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_duplicate_call_id_rejected() {
        let mut state = ConversationState::new("task");
        state.push_request(ToolCall::new("c1", "a")).unwrap();
        let err = state.push_request(ToolCall::new("c1", "b")).unwrap_err();
        assert!(matches!(err, ConversationError::DuplicateCallId(_)));
    }

    #[test]
    fn test_second_result_rejected() {
        let mut state = ConversationState::new("task");
        state.push_request(ToolCall::new("c1", "a")).unwrap();
        state.push_result(&CallId::from("c1"), "one").unwrap();
        let err = state.push_result(&CallId::from("c1"), "two").unwrap_err();
        assert!(matches!(err, ConversationError::DuplicateResult(_)));
    }

    #[test]
    fn test_last_assistant_text() {
        let mut state = ConversationState::new("task");
        assert_eq!(state.last_assistant_text(), None);
        state.push_assistant("first");
        state.push_assistant("second");
        assert_eq!(state.last_assistant_text(), Some("second"));
    }
}
