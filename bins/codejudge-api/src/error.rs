// Error types for the proxy endpoints and their outbound clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use codejudge_common::types::ErrorBody;
use thiserror::Error;

pub const MISSING_FIELDS: &str = "Missing required fields: language and code";

/// Failure talking to an external API
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("No response from AI")]
    EmptyCompletion,

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ProxyError {
    /// HTTP status the external API answered with, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::Upstream { status, .. } => Some(*status),
            ProxyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error returned by a handler, rendered as the JSON error body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: language and code")]
    MissingFields,

    #[error("{0}")]
    BadRequest(String),

    #[error("Code execution failed: {0}")]
    Execution(ProxyError),

    #[error("AI code review failed: {0}")]
    Review(ProxyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Execution(_) | ApiError::Review(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::MissingFields => ErrorBody::validation(MISSING_FIELDS),
            ApiError::BadRequest(msg) => ErrorBody::validation(msg.clone()),
            ApiError::Execution(e) => ErrorBody::downstream("Code execution failed", e.to_string()),
            ApiError::Review(e) => ErrorBody::downstream("AI code review failed", e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
