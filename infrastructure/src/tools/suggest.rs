//! `suggest_searches` tool: templated research queries for a topic.
//!
//! Pure; never touches the network.

use async_trait::async_trait;
use deepcast_application::ports::tool_executor::{Tool, ToolInvokeError};
use deepcast_domain::tool::{ParamType, ToolCall, ToolDescriptor, ToolError, ToolParameter};

/// Canonical tool name.
pub const SUGGEST_SEARCHES: &str = "suggest_searches";

const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Research angles, most general first. `{}` is replaced by the topic.
const TEMPLATES: [&str; 11] = [
    "Who is {}",
    "What is {}'s background",
    "{} latest news",
    "{} controversies",
    "{} achievements",
    "{} timeline",
    "{} impact on industry",
    "{} criticisms",
    "{} awards",
    "interviews with {}",
    "quotes by {}",
];

/// Up to `max` queries for `topic`; an empty topic yields none.
pub fn suggest_searches(topic: &str, max: usize) -> Vec<String> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Vec::new();
    }
    TEMPLATES
        .iter()
        .take(max)
        .map(|template| template.replace("{}", topic))
        .collect()
}

pub struct SuggestSearchesTool {
    descriptor: ToolDescriptor,
}

impl SuggestSearchesTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                SUGGEST_SEARCHES,
                "Given a topic, suggest up to max_suggestions search queries to research it in depth.",
            )
            .with_parameter(ToolParameter::new("topic", "Person, company or subject to research"))
            .with_parameter(
                ToolParameter::new(
                    "max_suggestions",
                    "Maximum number of queries to return (1-11, default 10)",
                )
                .with_type(ParamType::Integer),
            ),
        }
    }
}

impl Default for SuggestSearchesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SuggestSearchesTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
        let topic = call.require_string("topic").map_err(ToolError::invalid_argument)?;
        let max = match call.get_i64("max_suggestions") {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_MAX_SUGGESTIONS,
        };

        serde_json::to_string(&suggest_searches(topic, max))
            .map_err(|e| ToolError::execution_failed(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_fill_topic() {
        let queries = suggest_searches("Ada Lovelace", 3);
        assert_eq!(
            queries,
            vec![
                "Who is Ada Lovelace",
                "What is Ada Lovelace's background",
                "Ada Lovelace latest news",
            ]
        );
        assert_eq!(suggest_searches("Ada", 50).len(), TEMPLATES.len());
        assert!(suggest_searches("  ", 5).is_empty());
    }

    #[tokio::test]
    async fn test_invoke_returns_json_list() {
        let call = ToolCall::new("c1", SUGGEST_SEARCHES)
            .with_arg("topic", "Grace Hopper")
            .with_arg("max_suggestions", 0);
        let output = SuggestSearchesTool::new().invoke(&call).await.unwrap();

        let queries: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(queries.len(), DEFAULT_MAX_SUGGESTIONS);
        assert_eq!(queries[9], "interviews with Grace Hopper");
    }

    #[tokio::test]
    async fn test_missing_topic_is_invalid_argument() {
        let err = SuggestSearchesTool::new()
            .invoke(&ToolCall::new("c1", SUGGEST_SEARCHES))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolInvokeError::Tool(e) if e.code == "INVALID_ARGUMENT"));
    }
}
