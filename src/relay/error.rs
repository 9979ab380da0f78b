use thiserror::Error;
use warp::http::StatusCode;

use crate::assistant::ProviderError;

/// Errors surfaced by the relay service
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    /// Thread or run creation failed at the provider
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Failure before or during a streaming run
    #[error("{0}")]
    Stream(String),
}

impl RelayError {
    /// HTTP status used when the error is returned as a JSON response
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Provider(_) | RelayError::Stream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
