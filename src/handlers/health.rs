// GET /health handler

use std::convert::Infallible;

use crate::models::HealthResponse;

pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse { status: "ok" }))
}
