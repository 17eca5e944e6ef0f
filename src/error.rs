use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Domain error taxonomy. Every variant leaves the originating flow in a
/// safe idle state; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not access camera: {0}")]
    CameraUnavailable(String),

    #[error("barcode detection is not supported on this host")]
    UnsupportedCapability,

    #[error("could not fetch nutritional data")]
    LookupFailed,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Store(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::CameraUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UnsupportedCapability => StatusCode::NOT_IMPLEMENTED,
            AppError::LookupFailed => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
