//! Destinations for relayed SSE records

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::sse::SseRecord;

/// Records buffered between the relay task and the HTTP body
pub const SINK_CAPACITY: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The peer went away or the sink was closed
    #[error("response sink is closed")]
    Closed,
}

/// Where a streaming relay writes its records
///
/// A sink belongs to exactly one HTTP response. After `close` every write
/// fails with `SinkError::Closed`.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Write one record
    async fn write(&mut self, record: SseRecord) -> Result<(), SinkError>;

    /// Resolves once the sink can no longer be written to
    async fn closed(&self);

    /// End the response
    fn close(&mut self);
}

/// Sink backed by a bounded channel whose receiver feeds the response body
///
/// Dropping the receiver (warp does this when the client disconnects) makes
/// writes fail and `closed` resolve.
pub struct ChannelSink {
    tx: Option<mpsc::Sender<SseRecord>>,
}

impl ChannelSink {
    /// Create a sink and the receiver for its records
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SseRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx: Some(tx) }, rx)
    }
}

#[async_trait]
impl ResponseSink for ChannelSink {
    async fn write(&mut self, record: SseRecord) -> Result<(), SinkError> {
        match &self.tx {
            Some(tx) => tx.send(record).await.map_err(|_| SinkError::Closed),
            None => Err(SinkError::Closed),
        }
    }

    async fn closed(&self) {
        if let Some(tx) = &self.tx {
            tx.closed().await;
        }
    }

    fn close(&mut self) {
        self.tx = None;
    }
}
