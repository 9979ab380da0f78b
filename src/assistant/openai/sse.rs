//! Server-Sent Events (SSE) parser for assistant run streams

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::assistant::error::ProviderError;

use super::types::AssistantStreamEvent;

/// Parse a stream of bytes as assistant SSE events
///
/// The run stream uses named events with JSON payloads:
/// ```text
/// event: thread.message.delta
/// data: {"id":"msg_123","object":"thread.message.delta","delta":{...}}
///
/// event: done
/// data: [DONE]
/// ```
///
/// Bytes are buffered until a blank line closes a record, so records (and
/// multi-byte characters) split across chunks are reassembled before decoding.
/// A record left unterminated when the byte stream ends is still parsed.
pub fn parse_sse_stream(
    mut byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<AssistantStreamEvent, ProviderError>> + Send>> {
    let event_stream = async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(ProviderError::StreamError(e.to_string()));
                    continue;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some((end, delimiter_len)) = find_record_end(&buffer) {
                let record: Vec<u8> = buffer.drain(..end + delimiter_len).take(end).collect();
                if let Some(parsed) = decode_record(&record) {
                    yield parsed;
                }
            }
        }

        // Upstream closed mid-record
        if let Some(parsed) = decode_record(&buffer) {
            yield parsed;
        }
    };

    Box::pin(event_stream)
}

/// Decode and parse one record's bytes, `None` for records with no fields
fn decode_record(record: &[u8]) -> Option<Result<AssistantStreamEvent, ProviderError>> {
    match std::str::from_utf8(record) {
        Ok(text) => parse_event(text),
        Err(e) => Some(Err(ProviderError::StreamError(format!(
            "Invalid UTF-8 in stream: {}",
            e
        )))),
    }
}

/// Locate the first record terminator, returning its offset and length
fn find_record_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Parse a single SSE record from its text representation
fn parse_event(event_text: &str) -> Option<Result<AssistantStreamEvent, ProviderError>> {
    let mut event_type: Option<String> = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in event_text.lines() {
        let line = line.trim_end_matches('\r');

        // Comments and keep-alives
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        if let Some(type_val) = line.strip_prefix("event:") {
            event_type = Some(type_val.trim().to_string());
        } else if let Some(data_val) = line.strip_prefix("data:") {
            data_lines.push(data_val.strip_prefix(' ').unwrap_or(data_val));
        }
    }

    if data_lines.is_empty() && event_type.is_none() {
        return None;
    }

    let data = data_lines.join("\n");

    Some(
        AssistantStreamEvent::from_sse(event_type.as_deref(), &data).map_err(|e| match e {
            ProviderError::SerializationError(msg) => ProviderError::SerializationError(format!(
                "Failed to parse SSE event (type: {:?}): {}. Data: {}",
                event_type, msg, data
            )),
            other => other,
        }),
    )
}
