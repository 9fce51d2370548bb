//! Client-facing error responses.
//!
//! Clients only ever see three outcomes with fixed bodies. The detail of
//! what went wrong is logged by the handler, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::error::RosterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    NotFound,
    BadRequest,
    Internal,
}

impl ApiError {
    /// Map a service error for a handler whose generic failure is `fallback`.
    /// Missing resources are always [`ApiError::NotFound`].
    pub fn classify(err: &RosterError, fallback: ApiError) -> ApiError {
        if err.is_not_found() {
            ApiError::NotFound
        } else {
            fallback
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::NotFound => "Resource not found",
            ApiError::BadRequest => "Bad Request",
            ApiError::Internal => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
