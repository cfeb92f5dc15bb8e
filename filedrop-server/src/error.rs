use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use filedrop_lifecycle::LifecycleError;

use crate::api::schemas::ErrorResponse;

/// Errors that can occur when running the filedrop server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The multipart request had no `file` part.
    #[error("no file provided")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("invalid multipart request: {0}")]
    Multipart(String),

    /// The `duration` field was not a known retention key.
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    /// A lifecycle-level outcome surfaced through the API.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl ServerError {
    /// The HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingFile => (StatusCode::BAD_REQUEST, "NO_FILE"),
            Self::Multipart(_) => (StatusCode::BAD_REQUEST, "INVALID_MULTIPART"),
            Self::InvalidDuration(_) => (StatusCode::BAD_REQUEST, "INVALID_DURATION"),
            Self::Lifecycle(inner) => match inner {
                LifecycleError::EmptyFile => (StatusCode::BAD_REQUEST, "EMPTY_FILE"),
                LifecycleError::FileTooLarge { .. } => (StatusCode::BAD_REQUEST, "FILE_TOO_LARGE"),
                LifecycleError::UnsupportedType(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE")
                }
                LifecycleError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                LifecycleError::Expired(_) => (StatusCode::GONE, "FILE_EXPIRED"),
                LifecycleError::Storage(_) | LifecycleError::Registry(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            Self::Config(_) | Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal detail stays in the logs, not the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_owned(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_map_to_expected_statuses() {
        let cases = [
            (
                ServerError::from(LifecycleError::EmptyFile),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::from(LifecycleError::NotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::from(LifecycleError::Expired("x".into())),
                StatusCode::GONE,
            ),
            (
                ServerError::from(LifecycleError::Storage("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServerError::MissingFile, StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_code().0, expected);
        }
    }
}
