//! OpenAI Responses API gateway implementation

use super::error::{OpenAiError, Result};
use super::protocol::{ResponsesRequest, ResponsesResponse, SseDecoder, StreamPayload};
use async_trait::async_trait;
use deepcast_application::{
    GatewayError, GenerationGateway, GenerationRequest, ModelTier, ModelTiers, StreamHandle,
};
use deepcast_domain::{GenerationResponse, StreamEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Request timeout for a whole (non-streaming) generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Longest error body kept in [`OpenAiError::Api`] messages.
const ERROR_BODY_CHARS: usize = 500;

/// Generation gateway backed by `POST {base_url}/responses`.
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tiers: ModelTiers,
}

impl OpenAiGateway {
    pub fn new(api_key: impl Into<String>, tiers: ModelTiers) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OpenAiError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        info!(
            "OpenAiGateway initialized (planning: {}, final: {})",
            tiers.planning, tiers.final_model
        );
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            tiers,
        })
    }

    /// Create a gateway from `OPENAI_API_KEY`.
    pub fn from_env(tiers: ModelTiers) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| OpenAiError::MissingApiKey)?;
        Self::new(api_key, tiers)
    }

    /// Point the gateway at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn tiers(&self) -> &ModelTiers {
        &self.tiers
    }

    async fn send(&self, body: &ResponsesRequest) -> Result<reqwest::Response> {
        debug!(
            "POST /responses model={} items={} tools={}",
            body.model,
            body.input.len(),
            body.tools.len()
        );

        let mut request = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body);
        if !body.stream {
            request = request.timeout(REQUEST_TIMEOUT);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }
        Ok(response)
    }
}

/// Prefer the API's `error.message`; fall back to a prefix of the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(ERROR_BODY_CHARS).collect())
}

/// Pump SSE chunks from `response` into `tx` until a terminal event.
async fn pump_stream(mut response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut decoder = SseDecoder::default();
    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                warn!("Response stream ended without response.completed");
                return;
            }
            Err(e) => {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };

        for data in decoder.push(&chunk) {
            let payload = match serde_json::from_str::<StreamPayload>(&data) {
                Ok(payload) => payload,
                Err(e) => {
                    debug!("Skipping unparseable stream event: {}", e);
                    continue;
                }
            };

            let event = match payload {
                StreamPayload::OutputTextDelta { delta } => StreamEvent::Delta(delta),
                StreamPayload::Completed { response } | StreamPayload::Failed { response } => {
                    match response.into_generation() {
                        Ok(generation) => StreamEvent::Completed(generation),
                        Err(e) => StreamEvent::Error(e.to_string()),
                    }
                }
                StreamPayload::Error { message } => StreamEvent::Error(message),
                StreamPayload::Other => continue,
            };

            let terminal = event.is_terminal();
            if tx.send(event).await.is_err() || terminal {
                return;
            }
        }
    }
}

#[async_trait]
impl GenerationGateway for OpenAiGateway {
    async fn generate(
        &self,
        tier: ModelTier,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResponse, GatewayError> {
        let body = ResponsesRequest::from_generation(self.tiers.model_for(tier), request, false);
        let response = self.send(&body).await?;
        let text = response.text().await.map_err(OpenAiError::from)?;
        let parsed: ResponsesResponse = serde_json::from_str(&text)
            .map_err(|e| OpenAiError::ParseError(format!("{}: {}", e, api_error_message(&text))))?;
        Ok(parsed.into_generation()?)
    }

    async fn generate_streaming(
        &self,
        tier: ModelTier,
        request: &GenerationRequest,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        let body = ResponsesRequest::from_generation(self.tiers.model_for(tier), request, true);
        let response = self.send(&body).await?;

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(pump_stream(response, tx));
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use deepcast_domain::Message;
    use serde_json::json;

    fn gateway(base_url: &str) -> OpenAiGateway {
        OpenAiGateway::new("sk-test", ModelTiers::default())
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            OpenAiGateway::new("  ", ModelTiers::default()),
            Err(OpenAiError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_generate_uses_tier_model() {
        let body = json!({
            "model": "gpt-4.1",
            "status": "completed",
            "output": [{"type": "message", "content": [{"type": "output_text", "text": "Done"}]}]
        });
        let (url, captured) = serve_once(200, "application/json", body.to_string()).await;

        let response = gateway(&url)
            .generate(
                ModelTier::Final,
                &GenerationRequest::new("answer", vec![Message::user("q")]),
            )
            .await
            .unwrap();
        assert_eq!(response.text_content(), "Done");

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("post /responses"));
        assert!(request.head.contains("authorization: bearer sk-test"));
        let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent["model"], "gpt-4.1");
        assert_eq!(sent["stream"], false);
    }

    #[tokio::test]
    async fn test_http_error_maps_to_request_failed() {
        let (url, _) = serve_once(
            429,
            "application/json",
            json!({"error": {"message": "Rate limit reached"}}).to_string(),
        )
        .await;

        let err = gateway(&url)
            .generate(ModelTier::Planning, &GenerationRequest::new("p", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg.contains("Rate limit reached")));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = gateway(&url)
            .generate(ModelTier::Planning, &GenerationRequest::new("p", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_streaming_forwards_deltas_then_completes() {
        let completed = json!({
            "type": "response.completed",
            "response": {
                "model": "gpt-4.1-mini",
                "status": "completed",
                "output": [
                    {"type": "message", "content": [{"type": "output_text", "text": "Hello"}]},
                    {"type": "function_call", "call_id": "c1", "name": "search_brave",
                     "arguments": "{\"query\":\"Ada\"}"}
                ]
            }
        });
        let sse = format!(
            "event: response.created\ndata: {{\"type\":\"response.created\",\"response\":{{}}}}\n\n\
             data: {{\"type\":\"response.output_text.delta\",\"delta\":\"Hel\"}}\n\n\
             data: {{\"type\":\"response.output_text.delta\",\"delta\":\"lo\"}}\n\n\
             data: {}\n\n",
            completed
        );
        let (url, _) = serve_once(200, "text/event-stream", sse).await;

        let handle = gateway(&url)
            .generate_streaming(ModelTier::Planning, &GenerationRequest::new("p", vec![]))
            .await
            .unwrap();
        let mut chunks = Vec::new();
        let response = handle
            .collect_with(|chunk| chunks.push(chunk.to_string()))
            .await
            .unwrap();

        assert_eq!(chunks, vec!["Hel", "lo"]);
        assert_eq!(response.tool_calls()[0].get_string("query"), Some("Ada"));
    }

    #[tokio::test]
    async fn test_truncated_stream_is_transport_closed() {
        let sse = "data: {\"type\":\"response.output_text.delta\",\"delta\":\"Hel\"}\n\n";
        let (url, _) = serve_once(200, "text/event-stream", sse).await;

        let err = gateway(&url)
            .generate_streaming(ModelTier::Planning, &GenerationRequest::new("p", vec![]))
            .await
            .unwrap()
            .collect()
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::TransportClosed));
    }
}
