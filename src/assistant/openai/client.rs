//! OpenAI Assistants client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::assistant::{
    error::ProviderError,
    provider::{AssistantProvider, EventStream},
    types::{MessageRole, RunHandle, StreamEvent, ThreadHandle, ThreadMessage},
};

use super::mapper::{from_openai_event, TextPartTracker};
use super::sse::parse_sse_stream;
use super::types::{
    AssistantStreamEvent, CreateRunBody, CreateThreadBody, OpenAiMessage, RunObject, ThreadObject,
};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Beta header value required by the Assistants v2 endpoints
const ASSISTANTS_BETA: &str = "assistants=v2";

/// Client for the OpenAI Assistants thread/run API
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer credential
    api_key: String,
    /// API root, without trailing slash
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "API key must not be empty".to_string(),
            ));
        }

        // No overall timeout: run streams stay open as long as the run does.
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| ProviderError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build an endpoint URL under the API root
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a POST with auth and beta headers
    fn post(&self, path: &str) -> RequestBuilder {
        self.http_client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    /// Turn a non-2xx response into an error
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| String::new());
        Err(ProviderError::from_response(status.as_u16(), body))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AssistantProvider for OpenAiClient {
    async fn create_thread(
        &self,
        messages: Vec<ThreadMessage>,
    ) -> Result<ThreadHandle, ProviderError> {
        let body = CreateThreadBody {
            messages: messages
                .into_iter()
                .map(|m| OpenAiMessage {
                    role: match m.role {
                        MessageRole::User => "user".to_string(),
                        MessageRole::Assistant => "assistant".to_string(),
                    },
                    content: m.content,
                })
                .collect(),
        };

        let response = self.post("threads").json(&body).send().await?;
        let thread: ThreadObject = Self::read_json(response).await?;

        Ok(ThreadHandle {
            thread_id: thread.id,
        })
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunHandle, ProviderError> {
        let body = CreateRunBody {
            assistant_id: assistant_id.to_string(),
            stream: None,
        };

        let response = self
            .post(&format!("threads/{}/runs", thread_id))
            .json(&body)
            .send()
            .await?;
        let run: RunObject = Self::read_json(response).await?;

        Ok(RunHandle {
            run_id: run.id,
            status: run.status,
        })
    }

    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<EventStream, ProviderError> {
        let body = CreateRunBody {
            assistant_id: assistant_id.to_string(),
            stream: Some(true),
        };

        let response = self
            .post(&format!("threads/{}/runs", thread_id))
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let mut sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let event_stream = async_stream::stream! {
            let mut tracker = TextPartTracker::new();

            while let Some(result) = sse_stream.next().await {
                let event = match result {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                if let AssistantStreamEvent::Other(name) = &event {
                    debug!(event = %name, "Ignoring assistant stream event");
                }

                for mapped in from_openai_event(event, &mut tracker) {
                    let terminal = mapped.is_terminal();
                    yield Ok(mapped);
                    if terminal {
                        return;
                    }
                }
            }

            // Upstream closed without a `done` record
            warn!("Assistant stream ended without a done event");
            yield Ok(StreamEvent::Done);
        };

        Ok(Box::pin(event_stream))
    }
}
