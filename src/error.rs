use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Everything that can go wrong while relaying one request.
///
/// Client input problems map to 400; upstream problems map to 500 with a
/// generic message. The upstream error body is logged where it is caught and
/// never surfaced to the caller.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("No photos provided")]
    MissingPhotos,

    #[error("No valid image provided")]
    NoValidImage,

    #[error("API response format not recognized")]
    UnrecognizedFormat,

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream request failed with status {0}")]
    UpstreamStatus(u16),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingPhotos | RelayError::NoValidImage => StatusCode::BAD_REQUEST,
            RelayError::UnrecognizedFormat
            | RelayError::Upstream(_)
            | RelayError::UpstreamStatus(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message string placed in the `error` field of the response body.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::MissingPhotos | RelayError::NoValidImage => self.to_string(),
            _ => format!("Server error: {}", self),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!("Rejecting request: {}", self);
        } else {
            error!("Error processing request: {}", self);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
