//! OpenAI Assistants provider implementation
//!
//! This module provides a client for the OpenAI Assistants v2 thread/run API,
//! including the streaming run endpoint.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, DEFAULT_BASE_URL};
