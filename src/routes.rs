// Route definitions and handlers

use std::convert::Infallible;
use std::sync::Arc;

use warp::Filter;

use crate::handlers;
use crate::models::StreamQuery;
use crate::relay::RelayService;

/// Largest accepted JSON body
const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_relay(
    relay: Arc<RelayService>,
) -> impl Filter<Extract = (Arc<RelayService>,), Error = Infallible> + Clone {
    warp::any().map(move || relay.clone())
}

pub fn configure_routes(
    relay: Arc<RelayService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // POST /create-thread
    let create_thread = warp::path("create-thread")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_relay(relay.clone()))
        .and_then(handlers::create_thread_handler);

    // GET /stream-message/{threadId}?assistantId=...
    let stream_message = warp::path("stream-message")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<StreamQuery>())
        .and(with_relay(relay))
        .and_then(handlers::stream_message_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type"]);

    // Combine routes
    create_thread
        .or(stream_message)
        .or(health)
        .recover(handlers::handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}
