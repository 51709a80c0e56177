use std::any::Any;

use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Json, http::StatusCode};
use devcamper_core::{Failure, HttpError};
use devcamper_pipeline::{Delivery, Pipeline, ResponseSlot};
use devcamper_store::StoreError;

pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Error returned by handlers
///
/// Carries the unclassified [`Failure`] to [`normalize_failures`], which
/// turns it into the failure envelope. Handlers never pick a status or a
/// client message themselves.
#[derive(Debug)]
pub struct ApiError(Failure);

impl ApiError {
    pub const fn failure(&self) -> &Failure {
        &self.0
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        Self(failure)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self(error.to_failure())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Failure::with_status(rejection.status(), rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

/// Marks the request's slot aborted if the request future is dropped early
struct AbortOnDrop(ResponseSlot);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.0.abort() {
            tracing::debug!("request cancelled before a response was produced");
        }
    }
}

/// Turn failures raised anywhere below into the failure envelope
///
/// Installs a [`ResponseSlot`] in the request extensions. When the inner
/// response carries a [`Failure`], it is replaced by the envelope. Only the
/// delivery that claims the slot logs the failure; a slot claimed or aborted
/// earlier still gets the envelope, without a second log line.
pub async fn normalize_failures(pipeline: Pipeline, mut request: Request, next: Next) -> Response {
    let slot = ResponseSlot::new();
    request.extensions_mut().insert(slot.clone());
    let _guard = AbortOnDrop(slot.clone());

    let mut response = next.run(request).await;

    let Some(failure) = response.extensions_mut().remove::<Failure>() else {
        slot.mark_sent();
        return response;
    };

    // `response` is the `ApiError` placeholder and is never forwarded.
    let (status, envelope) = match pipeline.deliver(&slot, &failure) {
        Delivery::Respond { status, envelope, rule } => {
            log_failure(&failure, status, rule.as_deref());
            (status, envelope)
        }
        Delivery::AlreadySent => {
            tracing::debug!(%failure, "slot claimed before the failure surfaced");
            pipeline.handle(&failure)
        }
        Delivery::Aborted => {
            tracing::debug!(%failure, "request aborted, failure not logged");
            pipeline.handle(&failure)
        }
    };

    (status, Json(envelope)).into_response()
}

fn log_failure(failure: &Failure, status: StatusCode, rule: Option<&str>) {
    let kind: &str = failure.kind.as_ref();
    let native_code = failure.native_code.as_ref().map(ToString::to_string);
    let native_code = native_code.as_deref();
    let message = failure.message.as_deref().unwrap_or_default();

    if status.is_server_error() {
        tracing::error!(
            kind,
            native_code,
            rule,
            status = status.as_u16(),
            message,
            "request failed"
        );
    } else {
        tracing::debug!(
            kind,
            native_code,
            rule,
            status = status.as_u16(),
            message,
            "request rejected"
        );
    }
}

/// Response for a panicking handler
///
/// The panic payload is logged but never sent, so the client sees the
/// generic server error.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = detail, "handler panicked");

    ApiError(Failure::default()).into_response()
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    Failure::with_status(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND).into()
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    Failure::with_status(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED).into()
}
