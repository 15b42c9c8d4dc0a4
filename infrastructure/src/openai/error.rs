//! Error types for the OpenAI adapter

use deepcast_application::GatewayError;
use thiserror::Error;

/// Result type alias for OpenAI operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

/// Errors that can occur when talking to the Responses API
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Response failed: {0}")]
    ResponseFailed(String),

    #[error("Stream ended before response.completed")]
    TransportClosed,
}

impl From<OpenAiError> for GatewayError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::MissingApiKey => GatewayError::ConnectionError(err.to_string()),
            OpenAiError::SerializationError(_) | OpenAiError::ParseError(_) => {
                GatewayError::InvalidResponse(err.to_string())
            }
            OpenAiError::TransportClosed => GatewayError::TransportClosed,
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
