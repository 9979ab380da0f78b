#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assistant_relay::assistant::{
    AssistantProvider, EventStream, ProviderError, RunHandle, StreamEvent, ThreadHandle,
    ThreadMessage,
};
use assistant_relay::sse::SseRecord;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One step of a scripted run stream
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Event(StreamEvent),
    /// Transport failure mid-stream
    Fail(String),
    /// Never produce another item
    Hang,
}

/// Sets its flag when dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// In-memory provider that replays scripted run streams
#[derive(Default)]
pub struct ScriptedProvider {
    default_script: Vec<ScriptStep>,
    scripts: HashMap<String, Vec<ScriptStep>>,
    create_error: Option<String>,
    /// Raw (status, body) of a failed provider response for thread creation
    create_response: Option<(u16, String)>,
    open_error: Option<String>,
    next_id: AtomicUsize,
    /// (thread id, assistant id) for every stream_run call
    pub stream_calls: Mutex<Vec<(String, String)>>,
    /// Set once a stream handed out by stream_run has been dropped
    pub stream_dropped: Arc<AtomicBool>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script used for threads without their own script
    pub fn with_script(mut self, steps: Vec<ScriptStep>) -> Self {
        self.default_script = steps;
        self
    }

    pub fn with_thread_script(mut self, thread_id: &str, steps: Vec<ScriptStep>) -> Self {
        self.scripts.insert(thread_id.to_string(), steps);
        self
    }

    /// Make thread and run creation fail with `message`
    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    /// Make thread creation fail as if the provider answered `status` with `body`
    pub fn failing_create_response(mut self, status: u16, body: &str) -> Self {
        self.create_response = Some((status, body.to_string()));
        self
    }

    /// Make opening a run stream fail with `message`
    pub fn failing_open(mut self, message: &str) -> Self {
        self.open_error = Some(message.to_string());
        self
    }

    pub fn stream_call_count(&self) -> usize {
        self.stream_calls.lock().unwrap().len()
    }

    fn api_error(message: &str) -> ProviderError {
        ProviderError::Api {
            code: "invalid_request_error".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AssistantProvider for ScriptedProvider {
    async fn create_thread(
        &self,
        messages: Vec<ThreadMessage>,
    ) -> Result<ThreadHandle, ProviderError> {
        if let Some(message) = &self.create_error {
            return Err(Self::api_error(message));
        }
        if let Some((status, body)) = &self.create_response {
            return Err(ProviderError::from_response(*status, body.clone()));
        }
        assert_eq!(messages.len(), 1, "threads are seeded with one message");

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ThreadHandle {
            thread_id: format!("thread_{}", n),
        })
    }

    async fn create_run(
        &self,
        thread_id: &str,
        _assistant_id: &str,
    ) -> Result<RunHandle, ProviderError> {
        if let Some(message) = &self.create_error {
            return Err(Self::api_error(message));
        }

        Ok(RunHandle {
            run_id: format!("run_for_{}", thread_id),
            status: "queued".to_string(),
        })
    }

    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<EventStream, ProviderError> {
        self.stream_calls
            .lock()
            .unwrap()
            .push((thread_id.to_string(), assistant_id.to_string()));

        if let Some(message) = &self.open_error {
            return Err(Self::api_error(message));
        }

        let steps = self
            .scripts
            .get(thread_id)
            .unwrap_or(&self.default_script)
            .clone();
        let guard = DropFlag(self.stream_dropped.clone());

        let stream = async_stream::stream! {
            let _guard = guard;
            for step in steps {
                match step {
                    ScriptStep::Event(event) => {
                        // Let other relays interleave
                        tokio::task::yield_now().await;
                        yield Ok(event);
                    }
                    ScriptStep::Fail(message) => yield Err(ProviderError::StreamError(message)),
                    ScriptStep::Hang => futures::future::pending::<()>().await,
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

pub fn started() -> ScriptStep {
    ScriptStep::Event(StreamEvent::Started)
}

pub fn delta(text: &str) -> ScriptStep {
    ScriptStep::Event(StreamEvent::delta(text))
}

pub fn done() -> ScriptStep {
    ScriptStep::Event(StreamEvent::Done)
}

/// Drain a sink receiver until the relay closes it
pub async fn collect_records(mut rx: mpsc::Receiver<SseRecord>) -> Vec<SseRecord> {
    let mut records = Vec::new();
    while let Some(record) = rx.recv().await {
        records.push(record);
    }
    records
}

/// Concatenated wire form of the records
pub fn wire(records: &[SseRecord]) -> String {
    records.iter().map(|r| r.to_string()).collect()
}
