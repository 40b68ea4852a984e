use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jotter_core::FieldErrors;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid note: {0}")]
    Validation(FieldErrors),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<jotter_core::Error> for AppError {
    fn from(error: jotter_core::Error) -> Self {
        match error {
            jotter_core::Error::NotFound(_) => Self::NotFound(error.to_string()),
            jotter_core::Error::InvalidInput(message) => Self::BadRequest(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if matches!(self, Self::Internal(_)) {
            tracing::error!("{self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
            fields: match self {
                Self::Validation(fields) => Some(fields),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}
