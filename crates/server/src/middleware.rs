//! Per-request correlation identifier.
//!
//! Every request gets a fresh UUID, held in task-local storage while the
//! request is handled and echoed back in the `X-Correlation-ID` header.
//! Task-locals do not follow `tokio::spawn`; wrap spawned work in
//! [`CorrelationId::scope`] to keep the identifier.

use std::fmt;
use std::future::Future;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tokio::task_local;
use tracing::info;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

task_local! {
    static CORRELATION_ID: CorrelationId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn generate() -> Self { Self(Uuid::new_v4()) }

    /// The identifier of the request being handled, if any.
    pub fn current() -> Option<Self> { CORRELATION_ID.try_with(|id| *id).ok() }

    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CORRELATION_ID.scope(self, fut).await
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logs the request and response lines and tags the response with the header.
pub async fn correlate(req: Request, next: Next) -> Response {
    let id = CorrelationId::generate();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    info!(correlation_id = %id, %method, %path, "request");

    let mut response = id.scope(next.run(req)).await;

    info!(correlation_id = %id, status = response.status().as_u16(), "response");
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
