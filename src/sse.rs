use std::fmt;

use warp::sse::Event;

/// Event name announcing that the assistant began writing
pub const TEXT_CREATED_EVENT: &str = "textCreated";
pub const TEXT_CREATED_DATA: &str = "Assistant started responding";

pub const DONE_EVENT: &str = "done";
pub const DONE_DATA: &str = "END";

pub const ERROR_EVENT: &str = "error";
pub const ERROR_DATA: &str = "Streaming failed";

/// One outbound SSE record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseRecord {
    pub event: Option<String>,
    pub data: String,
}

impl SseRecord {
    /// True for `done` and `error` records
    pub fn is_terminal(&self) -> bool {
        matches!(self.event.as_deref(), Some(DONE_EVENT) | Some(ERROR_EVENT))
    }

    /// Convert into a warp SSE event
    ///
    /// warp writes `field:value` with no separator, and SSE clients strip
    /// exactly one leading space, so a space is prepended to every value to
    /// keep leading whitespace in text fragments intact.
    pub fn to_event(&self) -> Event {
        let data = normalize_line_breaks(&self.data).replace('\n', "\n ");
        let event = Event::default().data(format!(" {}", data));
        match &self.event {
            Some(name) => event.event(format!(" {}", name)),
            None => event,
        }
    }
}

/// Wire format, as written to the client
impl fmt::Display for SseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(event) = &self.event {
            writeln!(f, "event: {}", event)?;
        }
        for line in normalize_line_breaks(&self.data).split('\n') {
            writeln!(f, "data: {}", line)?;
        }
        writeln!(f)
    }
}

/// Rewrite `\r\n` and bare `\r` as `\n`
///
/// SSE clients end a line on any of the three, so each must become its own
/// `data:` line or the text after it is read as an unknown field.
fn normalize_line_breaks(data: &str) -> String {
    data.replace("\r\n", "\n").replace('\r', "\n")
}

/// Create the textCreated record sent when a text part begins
pub fn create_text_created_record() -> SseRecord {
    SseRecord {
        event: Some(TEXT_CREATED_EVENT.to_string()),
        data: TEXT_CREATED_DATA.to_string(),
    }
}

/// Create an unnamed record carrying a text fragment
pub fn create_delta_record(text: impl Into<String>) -> SseRecord {
    SseRecord {
        event: None,
        data: text.into(),
    }
}

/// Create a done record to signal stream completion
pub fn create_done_record() -> SseRecord {
    SseRecord {
        event: Some(DONE_EVENT.to_string()),
        data: DONE_DATA.to_string(),
    }
}

/// Create an error record; details stay in the server log
pub fn create_error_record() -> SseRecord {
    SseRecord {
        event: Some(ERROR_EVENT.to_string()),
        data: ERROR_DATA.to_string(),
    }
}
