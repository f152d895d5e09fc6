use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

use crate::middleware::CorrelationId;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please contact support.";
pub const VALIDATION_FAILED: &str = "Validation failed";

/// JSON error body. `errors` and `correlationId` are omitted when empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: Vec::new(), correlation_id: None }
    }

    pub fn validation(errors: Vec<String>) -> Self {
        Self { errors, ..Self::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED) }
    }

    /// Rejected business operation, e.g. unknown car or no free car.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal() -> Self {
        Self {
            correlation_id: CorrelationId::current().map(|id| id.to_string()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let correlation_id = CorrelationId::current().map(|id| id.to_string()).unwrap_or_default();
        error!(%correlation_id, error = %e, "unhandled service error");
        Self::internal()
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Turns a handler panic into the same 500 body as a service fault.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    let correlation_id = CorrelationId::current().map(|id| id.to_string()).unwrap_or_default();
    error!(%correlation_id, %detail, "handler panicked");
    JsonApiError::internal().into_response()
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
