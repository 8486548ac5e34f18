//! Mapping of recorder failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use novel_model::StoreError;
use novel_recorder::{ErrorClass, RecorderError};
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    /// The request carried an identity that cannot be used.
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("failed to persist store snapshot: {0}")]
    Snapshot(#[from] StoreError),

    #[error("snapshot writer stopped: {0}")]
    Background(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status_code: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl ApiError {
    fn class(&self) -> ErrorClass {
        match self {
            ApiError::Recorder(err) => err.class(),
            ApiError::Unauthenticated(_) => ErrorClass::Unauthenticated,
            ApiError::Snapshot(_) | ApiError::Background(_) => ErrorClass::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Recorder(
                RecorderError::Conflict { .. } | RecorderError::Protected { .. },
            ) => StatusCode::CONFLICT,
            _ => match self.class() {
                ErrorClass::Unauthenticated => StatusCode::UNAUTHORIZED,
                ErrorClass::AccessDenied => StatusCode::FORBIDDEN,
                ErrorClass::Validation => StatusCode::BAD_REQUEST,
                ErrorClass::Conflict => StatusCode::CONFLICT,
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::DataIntegrity | ErrorClass::Internal => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (detail, field) = match &self {
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "request failed");
                ("Internal server error".to_string(), None)
            }
            ApiError::Recorder(RecorderError::Validation { field, message }) => {
                (message.clone(), Some(*field))
            }
            other => (other.to_string(), None),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            detail,
            field,
        };
        (status, Json(body)).into_response()
    }
}
