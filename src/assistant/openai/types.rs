//! OpenAI Assistants v2 request and response types
//!
//! Only the fields the relay reads are modelled; everything else in the
//! provider's payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};

use crate::assistant::error::ProviderError;

/// Body of `POST /threads`
#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadBody {
    pub messages: Vec<OpenAiMessage>,
}

/// A message in a thread creation request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

/// Body of `POST /threads/{thread_id}/runs`
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunBody {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Thread object returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadObject {
    pub id: String,
}

/// Run object returned by the API and carried by `thread.run.*` events
#[derive(Debug, Clone, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

/// Failure details attached to a failed run
#[derive(Debug, Clone, Deserialize)]
pub struct RunLastError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Payload of a `thread.message.delta` event
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeltaObject {
    /// Message id; content part indices are scoped to it
    pub id: String,
    pub delta: MessageDelta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDelta {
    #[serde(default)]
    pub content: Vec<MessageDeltaContent>,
}

/// One content part fragment inside a message delta
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageDeltaContent {
    Text {
        index: usize,
        #[serde(default)]
        text: Option<TextDelta>,
    },
    /// Image files, refusals and other non-text parts
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextDelta {
    #[serde(default)]
    pub value: Option<String>,
}

/// Payload of an `error` event
///
/// The API documents a bare error object; some gateways wrap it in the usual
/// `{"error": {...}}` envelope, so both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamErrorPayload {
    Wrapped { error: StreamErrorObject },
    Bare(StreamErrorObject),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamErrorObject {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl StreamErrorPayload {
    pub fn into_message(self) -> String {
        match self {
            StreamErrorPayload::Wrapped { error } | StreamErrorPayload::Bare(error) => {
                error.message
            }
        }
    }
}

/// The subset of assistant stream events the relay acts on
#[derive(Debug, Clone)]
pub enum AssistantStreamEvent {
    /// `thread.message.delta`
    MessageDelta(MessageDeltaObject),
    /// `thread.run.failed`, `thread.run.expired` or `thread.run.cancelled`
    RunEnded(RunObject),
    /// `error`
    Error(StreamErrorPayload),
    /// `done`
    Done,
    /// Any other event name; carried so callers can log it
    Other(String),
}

impl AssistantStreamEvent {
    /// Decode an SSE record by its event name and data payload
    pub fn from_sse(event: Option<&str>, data: &str) -> Result<Self, ProviderError> {
        let name = event.unwrap_or("message");

        let parsed = match name {
            "thread.message.delta" => Self::MessageDelta(serde_json::from_str(data)?),
            "thread.run.failed" | "thread.run.expired" | "thread.run.cancelled" => {
                Self::RunEnded(serde_json::from_str(data)?)
            }
            "error" => Self::Error(serde_json::from_str(data)?),
            "done" => Self::Done,
            _ if data == "[DONE]" => Self::Done,
            other => Self::Other(other.to_string()),
        };

        Ok(parsed)
    }
}
