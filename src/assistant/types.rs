//! Provider-neutral types for threads, runs and streamed output

use serde::{Deserialize, Serialize};

/// Opaque identifier of a provider-managed conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadHandle {
    pub thread_id: String,
}

/// A generation run started against a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: String,
    pub status: String,
}

/// Role of a message seeded into a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A message used to seed a new thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ThreadMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Events produced by a streaming run, in provider order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The assistant began a new text part
    Started,
    /// Incremental text fragment
    Delta { text: String },
    /// The run finished
    Done,
    /// The run failed; nothing follows
    Error { message: String },
}

impl StreamEvent {
    /// Create a text delta
    pub fn delta(text: impl Into<String>) -> Self {
        StreamEvent::Delta { text: text.into() }
    }

    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }

    /// Returns true if no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error { .. })
    }
}
