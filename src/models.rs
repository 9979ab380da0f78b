// Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use crate::relay::ThreadCreated;

// Request Types
//
// Missing fields deserialize as empty strings so the relay can reject them
// with a 400 and a readable message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub assistant_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamQuery {
    pub assistant_id: Option<String>,
}

// Response Types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadResponse {
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl From<ThreadCreated> for CreateThreadResponse {
    fn from(created: ThreadCreated) -> Self {
        Self {
            thread_id: created.thread.thread_id,
            run_id: created.run.map(|run| run.run_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
