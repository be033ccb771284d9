//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors returned by API handlers as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<crux_common::Error> for ApiError {
    fn from(err: crux_common::Error) -> Self {
        match err {
            crux_common::Error::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
