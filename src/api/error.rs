//! API error types with the `{success: false, error}` JSON shape.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::orchestrator::AnalysisError;
use crate::pipeline::CollaboratorError;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST requests are allowed";
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Failure body returned by every API route.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or oversized upload, with the status axum assigned.
    #[error("Invalid upload: {message}")]
    Upload { status: StatusCode, message: String },
    #[error("{}", METHOD_NOT_ALLOWED_MESSAGE)]
    MethodNotAllowed,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Upload { status, message } => (*status, message.clone()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            ),
            ApiError::Analysis(AnalysisError::Collaborator(CollaboratorError::InvalidImage)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Analysis(AnalysisError::Collaborator(err)) => {
                tracing::warn!(error = %err, "Collaborator failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ApiError::Analysis(AnalysisError::Database(err)) => {
                tracing::error!(error = %err, "Analysis could not be saved");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        let body = FailureBody {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Upload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
