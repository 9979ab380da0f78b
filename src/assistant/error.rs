//! Error types for the assistant provider layer

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to an assistant provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or rejected credentials, displayed as the provider's own text
    #[error("{0}")]
    AuthenticationError(String),

    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// SSE stream parsing or transport failures
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error reported by the provider API itself
    #[error("{message}")]
    Api { code: String, message: String },
}

/// Error envelope returned by the provider on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ProviderError {
    /// Build an error from a failed HTTP response
    ///
    /// When the body carries the provider's `{"error": {"message": ...}}`
    /// envelope, the message is surfaced directly so callers see the same
    /// text the provider reported.
    pub fn from_response(status: u16, body: String) -> Self {
        if status == 401 {
            return match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => ProviderError::AuthenticationError(envelope.error.message),
                Err(_) => ProviderError::AuthenticationError(body),
            };
        }

        match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => ProviderError::Api {
                code: envelope
                    .error
                    .code
                    .or(envelope.error.error_type)
                    .unwrap_or_else(|| status.to_string()),
                message: envelope.error.message,
            },
            Err(_) => ProviderError::HttpError { status, body },
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
