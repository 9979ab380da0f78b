//! Provider trait for assistant implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::ProviderError,
    types::{RunHandle, StreamEvent, ThreadHandle, ThreadMessage},
};

/// Stream of events produced by a streaming run
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ProviderError>> + Send>>;

/// Thread/run capability offered by a hosted assistant API
///
/// Implementations hold no per-request state; one instance is shared by
/// every request the server handles.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Create a thread seeded with the given messages
    async fn create_thread(&self, messages: Vec<ThreadMessage>)
        -> Result<ThreadHandle, ProviderError>;

    /// Start a (non-streaming) run of `assistant_id` against a thread
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<RunHandle, ProviderError>;

    /// Start a run and stream its output
    ///
    /// Dropping the returned stream releases the upstream connection.
    ///
    /// # Returns
    /// A pinned boxed stream of `StreamEvent` results. The stream ends after
    /// the first terminal event.
    async fn stream_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<EventStream, ProviderError>;
}
