//! HTTP error responses.
//!
//! Two kinds reach clients: schema violations (`422`, with the details of
//! what was wrong) and internal failures (`500`, opaque body, cause logged).

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::SentimentError;

/// One schema violation in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ValidationDetail {
    fn body(kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum ApiError {
    /// Request body does not match the declared schema.
    Validation(Vec<ValidationDetail>),
    /// Any other rejection raised by the framework before the handler ran.
    Rejected { status: StatusCode, message: String },
    /// Failure while serving the request.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SentimentError> for ApiError {
    fn from(e: SentimentError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = match rejection {
            JsonRejection::JsonDataError(e) => ValidationDetail::body("value_error", e.body_text()),
            JsonRejection::JsonSyntaxError(e) => {
                ValidationDetail::body("json_invalid", e.body_text())
            }
            JsonRejection::MissingJsonContentType(e) => {
                ValidationDetail::body("content_type", e.body_text())
            }
            other => {
                return ApiError::Rejected {
                    status: other.status(),
                    message: other.body_text(),
                };
            }
        };
        ApiError::Validation(vec![detail])
    }
}

#[derive(Serialize)]
struct ValidationResponse {
    detail: Vec<ValidationDetail>,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(detail) => {
                (status, Json(ValidationResponse { detail })).into_response()
            }
            ApiError::Rejected { message, .. } => {
                (status, Json(ErrorResponse { detail: message })).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    status,
                    Json(ErrorResponse {
                        detail: "Internal Server Error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
