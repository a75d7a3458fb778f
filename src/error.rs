// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{resolver::ResolveError, store::StoreError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// The message that is safe to show a client.
    /// Internal detail is logged here and never returned.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }

    /// Wraps the error for endpoints answering `{ success: false, <field>: message }`.
    pub fn enveloped(self, field: &'static str) -> EnvelopeError {
        EnvelopeError {
            error: self,
            field,
            fallback: None,
            status: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

/// An `AppError` rendered in the `{ success: false, ... }` envelope.
#[derive(Debug)]
pub struct EnvelopeError {
    error: AppError,
    field: &'static str,
    fallback: Option<&'static str>,
    status: Option<StatusCode>,
}

impl EnvelopeError {
    /// Replaces the generic 500 message with an endpoint-specific one.
    pub fn internal_message(mut self, message: &'static str) -> Self {
        self.fallback = Some(message);
        self
    }

    /// Answers with `status` instead of the one mapped from the error kind.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or_else(|| self.error.status());
        let message = match (&self.error, self.fallback) {
            (AppError::InternalServerError(_), Some(fallback)) => {
                // Still log the real cause.
                self.error.public_message();
                fallback.to_string()
            }
            _ => self.error.public_message(),
        };

        let mut body = serde_json::Map::new();
        body.insert("success".to_string(), json!(false));
        body.insert(self.field.to_string(), json!(message));

        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

/// Storage failures are never shown to clients.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(msg) => AppError::NotFound(msg),
            ResolveError::InvalidInput(msg) => AppError::BadRequest(msg),
            ResolveError::Store(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::InternalServerError("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_hidden() {
        let err = AppError::InternalServerError("connection refused on 10.0.0.3".into());
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn resolve_errors_map_to_status_codes() {
        let not_found: AppError = ResolveError::NotFound("Exam not found".into()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: AppError = ResolveError::InvalidInput("Invalid examId".into()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let store: AppError =
            ResolveError::Store(StoreError::Unavailable("down".into())).into();
        assert_eq!(store.public_message(), "Internal Server Error");
    }
}
