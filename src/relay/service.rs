//! Relay between the assistant provider and HTTP clients

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::assistant::{
    AssistantProvider, EventStream, RunHandle, StreamEvent, ThreadHandle, ThreadMessage,
};
use crate::sse::{
    create_delta_record, create_done_record, create_error_record, create_text_created_record,
    SseRecord,
};

use super::error::RelayError;
use super::sink::ResponseSink;

/// Identifiers produced by thread creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadCreated {
    pub thread: ThreadHandle,
    /// Present when runs are started at creation time
    pub run: Option<RunHandle>,
}

/// How a streaming relay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// `done` record written
    Completed,
    /// `error` record written
    Failed,
    /// The client went away; the provider stream was dropped
    Disconnected,
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamOutcome::Completed => "completed",
            StreamOutcome::Failed => "failed",
            StreamOutcome::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Stateless service shared by all requests
pub struct RelayService {
    provider: Arc<dyn AssistantProvider>,
    /// Used by streaming requests that do not name an assistant
    default_assistant_id: Option<String>,
    /// Start a run as part of thread creation and return its id
    start_run_on_create: bool,
}

impl RelayService {
    /// Create a relay over the given provider
    pub fn new(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            provider,
            default_assistant_id: None,
            start_run_on_create: false,
        }
    }

    /// Set the fallback assistant id for streaming requests
    pub fn with_default_assistant(mut self, assistant_id: Option<String>) -> Self {
        self.default_assistant_id = assistant_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Start runs at thread creation
    pub fn with_run_on_create(mut self, enabled: bool) -> Self {
        self.start_run_on_create = enabled;
        self
    }

    /// Create a thread seeded with the user's message
    ///
    /// Also starts a run when configured to, returning both identifiers.
    ///
    /// # Errors
    ///
    /// `RelayError::Validation` for empty inputs, `RelayError::Provider` when
    /// the provider call fails.
    pub async fn create_thread(
        &self,
        assistant_id: &str,
        message: &str,
    ) -> Result<ThreadCreated, RelayError> {
        if assistant_id.trim().is_empty() {
            return Err(RelayError::Validation("assistantId is required".to_string()));
        }
        if message.trim().is_empty() {
            return Err(RelayError::Validation("message is required".to_string()));
        }

        debug!(assistant_id, "Creating thread");
        let thread = self
            .provider
            .create_thread(vec![ThreadMessage::user(message)])
            .await?;
        info!(thread_id = %thread.thread_id, "Thread created");

        let run = if self.start_run_on_create {
            let run = self
                .provider
                .create_run(&thread.thread_id, assistant_id)
                .await?;
            info!(
                thread_id = %thread.thread_id,
                run_id = %run.run_id,
                status = %run.status,
                "Run started"
            );
            Some(run)
        } else {
            None
        };

        Ok(ThreadCreated { thread, run })
    }

    /// Stream a run on `thread_id` onto `sink`
    ///
    /// Writes one record per provider event, in order, and closes the sink
    /// after `done` or `error`. If the sink becomes unwritable the provider
    /// stream is dropped and nothing more is written.
    pub async fn stream_run<S: ResponseSink>(
        &self,
        thread_id: &str,
        assistant_id: Option<&str>,
        mut sink: S,
    ) -> StreamOutcome {
        let events = tokio::select! {
            biased;
            _ = sink.closed() => {
                info!(thread_id, "Client disconnected before stream opened");
                return StreamOutcome::Disconnected;
            }
            opened = self.open_stream(thread_id, assistant_id) => opened,
        };

        let outcome = match events {
            Ok(events) => relay_events(thread_id, events, &mut sink).await,
            Err(e) => {
                error!(thread_id, error = %e, "Failed to open stream");
                finish(&mut sink, create_error_record(), StreamOutcome::Failed).await
            }
        };

        info!(thread_id, outcome = %outcome, "Stream finished");
        outcome
    }

    /// Resolve the assistant and open the provider stream
    async fn open_stream(
        &self,
        thread_id: &str,
        assistant_id: Option<&str>,
    ) -> Result<EventStream, RelayError> {
        if thread_id.trim().is_empty() {
            return Err(RelayError::Validation("threadId is required".to_string()));
        }

        let assistant_id = self.resolve_assistant(assistant_id).ok_or_else(|| {
            RelayError::Validation("assistantId is required".to_string())
        })?;

        info!(thread_id, assistant_id, "Streaming run");
        Ok(self.provider.stream_run(thread_id, assistant_id).await?)
    }

    /// Request value first, then the configured default
    fn resolve_assistant<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested
            .filter(|id| !id.trim().is_empty())
            .or(self.default_assistant_id.as_deref())
    }
}

/// Forward provider events until a terminal event or disconnect
async fn relay_events<S: ResponseSink>(
    thread_id: &str,
    mut events: EventStream,
    sink: &mut S,
) -> StreamOutcome {
    loop {
        let next = tokio::select! {
            biased;
            _ = sink.closed() => None,
            next = events.next() => Some(next),
        };

        // Returning drops `events`, which releases the upstream connection.
        let Some(next) = next else {
            info!(thread_id, "Client disconnected, dropping provider stream");
            return StreamOutcome::Disconnected;
        };

        let record = match next {
            Some(Ok(StreamEvent::Started)) => {
                debug!(thread_id, "Assistant started responding");
                create_text_created_record()
            }
            Some(Ok(StreamEvent::Delta { text })) => create_delta_record(text),
            Some(Ok(StreamEvent::Done)) | None => {
                return finish(sink, create_done_record(), StreamOutcome::Completed).await;
            }
            Some(Ok(StreamEvent::Error { message })) => {
                let err = RelayError::Stream(message);
                error!(thread_id, error = %err, "Streaming error");
                return finish(sink, create_error_record(), StreamOutcome::Failed).await;
            }
            Some(Err(e)) => {
                let err = RelayError::Stream(e.to_string());
                error!(thread_id, error = %err, "Streaming error");
                return finish(sink, create_error_record(), StreamOutcome::Failed).await;
            }
        };

        if sink.write(record).await.is_err() {
            info!(thread_id, "Client disconnected, dropping provider stream");
            return StreamOutcome::Disconnected;
        }
    }
}

/// Write a terminal record and close the sink
async fn finish<S: ResponseSink>(
    sink: &mut S,
    record: SseRecord,
    outcome: StreamOutcome,
) -> StreamOutcome {
    debug_assert!(record.is_terminal(), "finish takes a done or error record");
    let written = sink.write(record).await;
    sink.close();

    match written {
        Ok(()) => outcome,
        Err(_) => {
            warn!("Client disconnected before terminal record");
            StreamOutcome::Disconnected
        }
    }
}
