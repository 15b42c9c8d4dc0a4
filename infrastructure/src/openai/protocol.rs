//! Responses API wire types.
//!
//! Transcript messages map onto input items:
//!
//! | Message             | Input item                                   |
//! |---------------------|----------------------------------------------|
//! | `UserText`          | `{"role": "user", "content": ...}`           |
//! | `AssistantText`     | `{"role": "assistant", "content": ...}`      |
//! | `ToolCallRequest`   | `{"type": "function_call", ...}`             |
//! | `ToolCallResult`    | `{"type": "function_call_output", ...}`      |
//!
//! Output items map back onto [`ContentBlock`]s in order.

use super::error::{OpenAiError, Result};
use deepcast_application::{GenerationRequest, ToolChoice};
use deepcast_domain::{ContentBlock, GenerationResponse, Message, ToolCall};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /v1/responses`
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub instructions: String,
    pub input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    pub stream: bool,
}

impl ResponsesRequest {
    pub fn from_generation(model: &str, request: &GenerationRequest, stream: bool) -> Self {
        let tool_choice = match (request.tools.is_empty(), request.tool_choice) {
            (true, _) => None,
            (false, ToolChoice::Auto) => Some("auto"),
            (false, ToolChoice::None) => Some("none"),
        };
        Self {
            model: model.to_string(),
            instructions: request.instructions.clone(),
            input: request.messages.iter().map(InputItem::from).collect(),
            tools: request.tools.clone(),
            tool_choice,
            stream,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputItem {
    Message {
        role: &'static str,
        content: String,
    },
    FunctionCall {
        #[serde(rename = "type")]
        item_type: &'static str,
        call_id: String,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        #[serde(rename = "type")]
        item_type: &'static str,
        call_id: String,
        output: String,
    },
}

impl From<&Message> for InputItem {
    fn from(message: &Message) -> Self {
        match message {
            Message::UserText { text } => InputItem::Message {
                role: "user",
                content: text.clone(),
            },
            Message::AssistantText { text } => InputItem::Message {
                role: "assistant",
                content: text.clone(),
            },
            Message::ToolCallRequest(call) => InputItem::FunctionCall {
                item_type: "function_call",
                call_id: call.call_id.to_string(),
                name: call.tool_name.clone(),
                arguments: call.arguments_json().to_string(),
            },
            Message::ToolCallResult { call_id, output } => InputItem::FunctionCallOutput {
                item_type: "function_call_output",
                call_id: call_id.to_string(),
                output: output.clone(),
            },
        }
    }
}

/// Response body (also the `response` field of `response.completed`)
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl ResponsesResponse {
    pub fn into_generation(self) -> Result<GenerationResponse> {
        if self.status.as_deref() == Some("failed") {
            let message = self
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(OpenAiError::ResponseFailed(message));
        }

        let mut content = Vec::new();
        for item in self.output {
            match item {
                OutputItem::Message { content: parts } => {
                    content.extend(parts.into_iter().filter_map(|part| match part {
                        OutputContent::OutputText { text } => Some(ContentBlock::Text(text)),
                        OutputContent::Other => None,
                    }));
                }
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => content.push(ContentBlock::ToolCall(ToolCall::from_raw_arguments(
                    call_id, name, &arguments,
                ))),
                OutputItem::Other => {}
            }
        }

        Ok(GenerationResponse {
            content,
            model: self.model,
        })
    }
}

/// One server-sent event of a streaming response, keyed by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamPayload {
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta { delta: String },
    #[serde(rename = "response.completed")]
    Completed { response: ResponsesResponse },
    #[serde(rename = "response.failed")]
    Failed { response: ResponsesResponse },
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

/// Incremental parser for `text/event-stream` bodies.
///
/// Raw bytes are buffered until a blank line ends an event, so a multibyte
/// character split across network chunks is decoded whole. Only `data:`
/// lines are kept; `[DONE]` sentinels are dropped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some((end, sep_len)) = Self::event_boundary(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + sep_len).collect();
            let block = String::from_utf8_lossy(&block[..end]);
            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(str::trim_start)
                .collect();
            if !data.is_empty() {
                let data = data.join("\n");
                if data != "[DONE]" {
                    events.push(data);
                }
            }
        }
        events
    }

    /// Position and length of the first blank-line separator.
    fn event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
        let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
        let crlf = buffer
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|i| (i, 4));
        match (lf, crlf) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_maps_to_input_items() {
        let call = ToolCall::new("call_1", "search_brave").with_arg("query", "Ada");
        let request = GenerationRequest::new(
            "plan",
            vec![
                Message::user("Who is Ada?"),
                Message::ToolCallRequest(call),
                Message::tool_result("call_1", "[]"),
                Message::assistant("Nothing found"),
            ],
        )
        .with_tools(vec![json!({"type": "function", "name": "search_brave"})]);

        let body = serde_json::to_value(ResponsesRequest::from_generation(
            "gpt-4.1-mini",
            &request,
            false,
        ))
        .unwrap();

        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["input"][0], json!({"role": "user", "content": "Who is Ada?"}));
        assert_eq!(body["input"][1]["type"], "function_call");
        assert_eq!(body["input"][1]["arguments"], r#"{"query":"Ada"}"#);
        assert_eq!(
            body["input"][2],
            json!({"type": "function_call_output", "call_id": "call_1", "output": "[]"})
        );
        assert_eq!(body["input"][3]["role"], "assistant");
    }

    #[test]
    fn test_tool_choice_none_and_omitted() {
        let request = GenerationRequest::new("s", vec![])
            .with_tools(vec![json!({"name": "x"})])
            .with_tool_choice(ToolChoice::None);
        let body = ResponsesRequest::from_generation("m", &request, true);
        assert_eq!(body.tool_choice, Some("none"));

        let body = ResponsesRequest::from_generation("m", &GenerationRequest::new("s", vec![]), true);
        let value = serde_json::to_value(body).unwrap();
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_output_items_become_content_blocks() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "model": "gpt-4.1-mini-2025-04-14",
            "status": "completed",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [{"type": "output_text", "text": "Searching."}]},
                {"type": "function_call", "call_id": "c1", "name": "search_brave",
                 "arguments": "{\"query\":\"Ada\",\"count\":5}"},
                {"type": "function_call", "call_id": "c2", "name": "scrape_website",
                 "arguments": "not json"}
            ]
        }))
        .unwrap();

        let generation = response.into_generation().unwrap();
        assert_eq!(generation.text_content(), "Searching.");
        let calls = generation.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_i64("count"), Some(5));
        assert!(calls[1].arguments.is_empty());
        assert_eq!(generation.model.as_deref(), Some("gpt-4.1-mini-2025-04-14"));
    }

    #[test]
    fn test_failed_status_is_error() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "status": "failed",
            "error": {"message": "server overloaded"},
            "output": []
        }))
        .unwrap();
        let err = response.into_generation().unwrap_err();
        assert!(err.to_string().contains("server overloaded"));
    }

    #[test]
    fn test_sse_decoder_handles_split_chunks() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"event: response.output_text.delta\ndata: {\"a\"").is_empty());
        let events = decoder.push(b":1}\n\ndata: [DONE]\n\ndata: {\"b\":2}\r\n\r\n");
        assert_eq!(events, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn test_sse_decoder_keeps_split_multibyte_char() {
        let event = "data: {\"delta\":\"Café\"}\n\n".as_bytes();
        let split = event.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::default();
        assert!(decoder.push(&event[..split]).is_empty());
        let events = decoder.push(&event[split..]);
        assert_eq!(events, vec![r#"{"delta":"Café"}"#]);

        let payload: StreamPayload = serde_json::from_str(
            r#"{"type":"response.output_text.delta","delta":"Café"}"#,
        )
        .unwrap();
        assert!(matches!(payload, StreamPayload::OutputTextDelta { delta } if delta == "Café"));
    }

    #[test]
    fn test_stream_payload_variants() {
        let delta: StreamPayload =
            serde_json::from_str(r#"{"type":"response.output_text.delta","delta":"Hi"}"#).unwrap();
        assert!(matches!(delta, StreamPayload::OutputTextDelta { delta } if delta == "Hi"));

        let other: StreamPayload =
            serde_json::from_str(r#"{"type":"response.created","response":{}}"#).unwrap();
        assert!(matches!(other, StreamPayload::Other));
    }
}
