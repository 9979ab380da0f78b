//! Mapping from assistant stream events to relay stream events

use std::collections::HashSet;

use crate::assistant::types::StreamEvent;

use super::types::{AssistantStreamEvent, MessageDeltaContent};

/// Text parts already announced, keyed by (message id, content index)
#[derive(Debug, Default)]
pub struct TextPartTracker {
    seen: HashSet<(String, usize)>,
}

impl TextPartTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a text part is observed
    fn first_sight(&mut self, message_id: &str, index: usize) -> bool {
        self.seen.insert((message_id.to_string(), index))
    }
}

/// Convert an assistant stream event into zero or more relay events
///
/// A text part produces `Started` on its first fragment, then one `Delta`
/// per non-empty fragment. Run failures and `error` events become `Error`.
pub fn from_openai_event(
    event: AssistantStreamEvent,
    tracker: &mut TextPartTracker,
) -> Vec<StreamEvent> {
    match event {
        AssistantStreamEvent::MessageDelta(message) => {
            let mut events = Vec::new();
            for part in message.delta.content {
                if let MessageDeltaContent::Text { index, text } = part {
                    if tracker.first_sight(&message.id, index) {
                        events.push(StreamEvent::Started);
                    }
                    if let Some(value) = text.and_then(|t| t.value) {
                        if !value.is_empty() {
                            events.push(StreamEvent::Delta { text: value });
                        }
                    }
                }
            }
            events
        }
        AssistantStreamEvent::RunEnded(run) => {
            let message = run
                .last_error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("Run {} ended with status {}", run.id, run.status));
            vec![StreamEvent::Error { message }]
        }
        AssistantStreamEvent::Error(payload) => vec![StreamEvent::Error {
            message: payload.into_message(),
        }],
        AssistantStreamEvent::Done => vec![StreamEvent::Done],
        AssistantStreamEvent::Other(_) => Vec::new(),
    }
}
