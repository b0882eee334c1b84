//! Error types for spendboard-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use spendboard_core::{CoreError, ErrorCode};
use thiserror::Error;

/// Body of a failed full export. Upstream detail is only logged.
pub const EXPORT_FAILURE_BODY: &str = "Error generating CSV";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("CSV export failed")]
    ExportFailed,

    #[error("Upstream data source unavailable")]
    UpstreamUnavailable { code: ErrorCode },

    #[error("Internal server error")]
    InternalError,
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::ValidationError { message } => ApiError::BadRequest { message },
            CoreError::Csv { .. } => ApiError::InternalError,
            other => ApiError::UpstreamUnavailable { code: other.code() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ExportFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, EXPORT_FAILURE_BODY).into_response()
            }
            ApiError::BadRequest { ref message } => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::UpstreamUnavailable { code } => (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": self.to_string(), "code": code })),
            )
                .into_response(),
            ApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
