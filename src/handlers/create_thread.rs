// POST /create-thread handler

use std::convert::Infallible;
use std::sync::Arc;

use tracing::{error, warn};
use warp::http::StatusCode;

use crate::models::{CreateThreadRequest, CreateThreadResponse, ErrorResponse};
use crate::relay::{RelayError, RelayService};

pub async fn create_thread_handler(
    request: CreateThreadRequest,
    relay: Arc<RelayService>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    match relay
        .create_thread(&request.assistant_id, &request.message)
        .await
    {
        Ok(created) => Ok(warp::reply::with_status(
            warp::reply::json(&CreateThreadResponse::from(created)),
            StatusCode::OK,
        )),
        Err(err) => {
            match &err {
                RelayError::Validation(_) => warn!(error = %err, "Rejected create-thread request"),
                _ => error!(error = %err, "Error creating thread"),
            }
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse::new(err.to_string())),
                err.status_code(),
            ))
        }
    }
}
