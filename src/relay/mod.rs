//! Relay service: thread creation and streaming runs onto SSE sinks

pub mod error;
pub mod service;
pub mod sink;

pub use error::RelayError;
pub use service::{RelayService, StreamOutcome, ThreadCreated};
pub use sink::{ChannelSink, ResponseSink, SinkError, SINK_CAPACITY};
