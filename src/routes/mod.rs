//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host CMS proxies its backend ajax calls here after authenticating the
//! editor, forwarding the backend user id in `X-Backend-User`. Everything is
//! JSON under `/ajax/cowriter`, plus an unauthenticated `/healthz`.

pub mod ajax;

use std::any::Any;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::dto::CompleteResponse;
use crate::state::AppState;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/ajax/cowriter/complete", post(ajax::complete))
        .route("/ajax/cowriter/chat", post(ajax::chat))
        .route("/ajax/cowriter/configurations", get(ajax::configurations))
        .route("/ajax/cowriter/tasks", get(ajax::tasks))
        .route("/ajax/cowriter/task", post(ajax::execute_task))
        .route("/healthz", get(healthz))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Turn a handler panic into a generic 500 so no internal detail leaks.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(%detail, "cowriter: handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(CompleteResponse::error(UNEXPECTED_ERROR_MESSAGE))).into_response()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
