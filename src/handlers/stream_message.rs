// GET /stream-message/{threadId} handler

use std::convert::Infallible;
use std::sync::Arc;

use futures_util::stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use crate::models::StreamQuery;
use crate::relay::{ChannelSink, RelayService, SINK_CAPACITY};

pub async fn stream_message_handler(
    thread_id: String,
    query: StreamQuery,
    relay: Arc<RelayService>,
) -> Result<impl warp::Reply, Infallible> {
    let (sink, rx) = ChannelSink::channel(SINK_CAPACITY);

    // The relay owns the sink; the response body ends when it closes it.
    tokio::spawn(async move {
        relay
            .stream_run(&thread_id, query.assistant_id.as_deref(), sink)
            .await;
    });

    let event_stream =
        ReceiverStream::new(rx).map(|record| Ok::<_, Infallible>(record.to_event()));

    Ok(warp::reply::with_header(
        warp::sse::reply(warp::sse::keep_alive().stream(event_stream)),
        "connection",
        "keep-alive",
    ))
}
