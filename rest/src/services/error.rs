//! Error handling utilities for route handlers

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::domain::feed::FeedError;
use crate::services::youtube::YouTubeError;

/// Error envelope returned by every route: `{okay: false, error, detail?}`
#[derive(Debug)]
pub struct RestError {
    pub status: StatusCode,
    pub code: &'static str,
    pub detail: Option<Value>,
}

impl RestError {
    pub fn new(status: StatusCode, code: &'static str) -> Self {
        Self {
            status,
            code,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let mut body = json!({ "okay": false, "error": self.code });
        if let Some(detail) = self.detail {
            body["detail"] = detail;
        }
        (self.status, Json(body)).into_response()
    }
}

/// Errors that can describe themselves to a client without leaking request
/// URLs, headers or upstream bodies
pub trait ErrorDetail {
    fn detail(&self) -> Value;
}

impl ErrorDetail for YouTubeError {
    fn detail(&self) -> Value {
        YouTubeError::detail(self)
    }
}

impl ErrorDetail for FeedError {
    fn detail(&self) -> Value {
        FeedError::detail(self)
    }
}

/// Extension trait for logging errors and converting to a `RestError`
pub trait LogErr<T> {
    /// Log error with context and return INTERNAL_SERVER_ERROR with `code`
    fn log_500(self, context: &str, code: &'static str) -> Result<T, RestError>;

    /// Log error with context and return a custom status with `code`
    fn log_status(self, context: &str, status: StatusCode, code: &'static str)
    -> Result<T, RestError>;
}

impl<T, E: std::fmt::Display + ErrorDetail> LogErr<T> for Result<T, E> {
    fn log_500(self, context: &str, code: &'static str) -> Result<T, RestError> {
        self.map_err(|e| {
            tracing::error!(error = %e, code, "{}", context);
            RestError::new(StatusCode::INTERNAL_SERVER_ERROR, code).with_detail(e.detail())
        })
    }

    fn log_status(
        self,
        context: &str,
        status: StatusCode,
        code: &'static str,
    ) -> Result<T, RestError> {
        self.map_err(|e| {
            tracing::warn!(error = %e, code, status = status.as_u16(), "{}", context);
            RestError::new(status, code).with_detail(e.detail())
        })
    }
}
