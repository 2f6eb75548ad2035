//! Request-boundary error taxonomy.
//!
//! Every typed error maps to exactly one HTTP status and a JSON body with a
//! human-readable `error` and, where available, `details` from the wrapped
//! cause. Nothing is retried or recovered silently.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Everything that can go wrong while processing one upload.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded.")]
    MissingFile,

    #[error("Invalid file type. Only image files are allowed.")]
    InvalidFileType,

    #[error("Error performing OCR on the image.")]
    Ocr(anyhow::Error),

    #[error("No text extracted from the image.")]
    EmptyText,

    #[error("Error generating content from Gemini API.")]
    Generation(anyhow::Error),

    /// Catch-all: the underlying message becomes the `error` field, matching
    /// the outermost-guard behavior at the request boundary.
    #[error("{0}")]
    Unexpected(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Unexpected(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::InvalidFileType | ApiError::EmptyText => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Ocr(_) | ApiError::Generation(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Ocr(cause) | ApiError::Generation(cause) => Some(cause.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {} ({:?})", self, self.details());
        }
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Ocr(anyhow::anyhow!("engine crashed")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Generation(anyhow::anyhow!("timeout")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_details_only_for_wrapped_causes() {
        let err = ApiError::Ocr(anyhow::anyhow!("corrupt image"));
        assert_eq!(err.details().as_deref(), Some("corrupt image"));
        assert!(ApiError::MissingFile.details().is_none());
        assert!(ApiError::EmptyText.details().is_none());
    }
}
