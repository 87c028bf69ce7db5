//! Editor ajax routes: complete, chat, task execution, and pickers.
//!
//! DESIGN
//! ======
//! Bodies arrive as raw bytes plus the `Content-Type` header so the DTO
//! factories, not axum extractors, decide how to read them. A malformed body
//! therefore never becomes an axum rejection; it becomes a 400 with the
//! same JSON shape as every other failure.
//!
//! AI routes check the caller's rate limit before parsing anything. Every
//! admitted response carries the `X-RateLimit-*` headers, success or not.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, RETRY_AFTER};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use tracing::{debug, info, warn};

use crate::dto::{ChatRequest, CompleteRequest, CompleteResponse, ConfigurationList, ExecuteTaskRequest, TaskList};
use crate::error::ErrorCode;
use crate::rate_limit::RateLimitResult;
use crate::services::completion::{self, CompletionError};
use crate::services::task;
use crate::state::AppState;

pub const BACKEND_USER_HEADER: &str = "x-backend-user";
pub const UNAUTHENTICATED_MESSAGE: &str = "Backend user not authenticated";

// =============================================================================
// CALLER EXTRACTOR
// =============================================================================

/// Backend user id forwarded by the host CMS.
/// Use as a handler parameter to require an authenticated editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUser(pub String);

impl<S> axum::extract::FromRequestParts<S> for BackendUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(BACKEND_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();
        if user.is_empty() {
            return Err((StatusCode::UNAUTHORIZED, Json(CompleteResponse::error(UNAUTHENTICATED_MESSAGE))).into_response());
        }
        Ok(Self(user.to_owned()))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /ajax/cowriter/complete`: single prompt, optional `#cw:` override.
pub async fn complete(State(state): State<AppState>, user: BackendUser, headers: HeaderMap, body: Bytes) -> Response {
    let limit = state.rate_limiter.check_limit(&user.0);
    if !limit.allowed() {
        return rate_limited(&user, &limit);
    }
    let request = CompleteRequest::from_body(content_type(&headers), &body);
    respond(&user, &limit, completion::complete(&state, &request).await)
}

/// `POST /ajax/cowriter/chat`: multi-turn conversation.
pub async fn chat(State(state): State<AppState>, user: BackendUser, headers: HeaderMap, body: Bytes) -> Response {
    let limit = state.rate_limiter.check_limit(&user.0);
    if !limit.allowed() {
        return rate_limited(&user, &limit);
    }
    let request = ChatRequest::from_body(content_type(&headers), &body);
    respond(&user, &limit, completion::chat(&state, &request).await)
}

/// `POST /ajax/cowriter/task`: run a stored task on editor content.
pub async fn execute_task(State(state): State<AppState>, user: BackendUser, headers: HeaderMap, body: Bytes) -> Response {
    let limit = state.rate_limiter.check_limit(&user.0);
    if !limit.allowed() {
        return rate_limited(&user, &limit);
    }
    let request = ExecuteTaskRequest::from_body(content_type(&headers), &body);
    respond(&user, &limit, task::execute(&state, &request).await)
}

/// `GET /ajax/cowriter/configurations`: picker list; not rate limited.
pub async fn configurations(State(state): State<AppState>, _user: BackendUser) -> Json<ConfigurationList> {
    Json(completion::list_configurations(&state))
}

/// `GET /ajax/cowriter/tasks`: active tasks; not rate limited.
pub async fn tasks(State(state): State<AppState>, _user: BackendUser) -> Json<TaskList> {
    Json(task::list(&state))
}

// =============================================================================
// RESPONSES
// =============================================================================

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

fn respond(user: &BackendUser, limit: &RateLimitResult, result: Result<CompleteResponse, CompletionError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, limit.headers(), Json(body)).into_response(),
        Err(e) => {
            let status = completion_error_to_status(&e);
            if status.is_server_error() {
                warn!(user = %user.0, error = %e, code = e.error_code(), %status, "cowriter: request failed");
            } else {
                debug!(user = %user.0, error = %e, code = e.error_code(), %status, "cowriter: request rejected");
            }
            (status, limit.headers(), Json(CompleteResponse::error(e.user_message()))).into_response()
        }
    }
}

fn rate_limited(user: &BackendUser, limit: &RateLimitResult) -> Response {
    let retry_after = limit.retry_after();
    info!(user = %user.0, retry_after, "cowriter: rate limited");
    (
        StatusCode::TOO_MANY_REQUESTS,
        limit.headers(),
        [(RETRY_AFTER, retry_after.to_string())],
        Json(CompleteResponse::rate_limited(retry_after)),
    )
        .into_response()
}

pub(crate) fn completion_error_to_status(err: &CompletionError) -> StatusCode {
    match err {
        CompletionError::Validation(_) => StatusCode::BAD_REQUEST,
        CompletionError::ConfigurationNotFound(_) | CompletionError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        CompletionError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        CompletionError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "ajax_test.rs"]
mod tests;
