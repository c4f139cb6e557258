//! Error types shared across the portal.
//!
//! Every failure the client can hit collapses, from the user's point of view,
//! into "go back to login". These types keep the distinction for callers and logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the local key/value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(serde_json::Error),
    #[error("failed to serialize storage entry: {0}")]
    Serialize(serde_json::Error),
}

/// Failures surfaced by the HTTP client wrapper.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered 401. The session has already been cleared.
    #[error("unauthorized: session expired or missing")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response payload: {0}")]
    Decode(serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of client-side route resolution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches `{0}`")]
    NotFound(String),
    #[error("too many redirects while resolving `{0}`")]
    RedirectLoop(String),
}

/// Error returned by the shell server handlers.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    /// A proxied path that would escape the backend's `/api` prefix.
    #[error("invalid backend path `{0}`")]
    InvalidPath(String),
}

impl PortalError {
    pub fn status(&self) -> StatusCode {
        match self {
            PortalError::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            PortalError::Api(ApiError::Status { status, .. }) => *status,
            PortalError::Api(ApiError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Api(_) => StatusCode::BAD_GATEWAY,
            PortalError::Navigation(NavigationError::NotFound(_)) => StatusCode::NOT_FOUND,
            PortalError::Navigation(NavigationError::RedirectLoop(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PortalError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
