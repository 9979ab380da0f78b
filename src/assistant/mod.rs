//! Assistant provider layer
//!
//! This module provides a provider-neutral interface to hosted assistant
//! APIs (threads, runs and streamed run output) and the OpenAI implementation.

pub mod error;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use error::ProviderError;
pub use openai::OpenAiClient;
pub use provider::{AssistantProvider, EventStream};
pub use types::{MessageRole, RunHandle, StreamEvent, ThreadHandle, ThreadMessage};
