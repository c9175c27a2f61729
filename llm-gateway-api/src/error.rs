use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use llm_gateway_core::CoreError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Message shown to the caller. Persistence details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Core(CoreError::Persistence(_)) => "storage error".to_string(),
            ApiError::Core(CoreError::InvalidArgument(msg)) => msg.clone(),
            ApiError::Core(err) => err.to_string(),
            ApiError::Validation(msg) | ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Failures are reported in the envelope; the HTTP status is always 200.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Core(CoreError::Persistence(err)) => {
                tracing::error!(error = %err, "Persistence error");
            }
            ApiError::Core(CoreError::Upstream(err)) => {
                tracing::warn!(error = %err, "Upstream error");
            }
            other => {
                tracing::debug!(error = %other, "Request rejected");
            }
        }

        ApiResponse::<()>::failure(self.public_message()).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
