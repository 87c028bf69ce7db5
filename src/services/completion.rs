//! Completion service: validated request → configuration → LLM → response.
//!
//! DESIGN
//! ======
//! Handlers hand over an already-parsed DTO. This module validates it,
//! resolves which configuration applies, calls the LLM, and wraps the result
//! in an escaped `CompleteResponse`. Every failure is a `CompletionError`; the
//! route layer alone maps those to HTTP statuses and fixed messages.
//!
//! Rate limiting happens before any of this, in the route layer, because it
//! also has to set response headers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::dto::{ChatRequest, CompleteRequest, CompleteResponse, ConfigurationList, ValidationError};
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{ChatMessage, ChatOptions, CompletionResponse, LlmError};
use crate::repository::Configuration;
use crate::state::AppState;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("configuration not found: {0}")]
    ConfigurationNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(i64),
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Provider(#[from] LlmError),
}

impl ErrorCode for CompletionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::ConfigurationNotFound(_) => "E_CONFIGURATION_NOT_FOUND",
            Self::TaskNotFound(_) => "E_TASK_NOT_FOUND",
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Provider(_) => "E_PROVIDER_ERROR",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Provider(e) if e.retryable())
    }
}

impl CompletionError {
    /// The message shown to the editor. Never includes provider detail.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.message(),
            Self::ConfigurationNotFound(_) => "No LLM configuration available",
            Self::TaskNotFound(_) => "Task not found",
            Self::LlmNotConfigured => "LLM provider is not configured",
            Self::Provider(_) => "LLM provider error. Please try again later.",
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Single-prompt completion with optional `#cw:` model override.
///
/// # Errors
///
/// Validation, configuration lookup, missing LLM, or provider failure.
pub async fn complete(state: &AppState, request: &CompleteRequest) -> Result<CompleteResponse, CompletionError> {
    request.validate()?;
    let configuration = resolve_configuration(state, request.configuration())?;
    let llm = require_llm(state)?;

    let mut options = request.options().apply(configuration.to_chat_options());
    if let Some(model) = request.model_override() {
        options = options.with_model(model);
    }
    info!(
        configuration = %configuration.identifier,
        model_override = request.model_override().unwrap_or(""),
        prompt_len = request.prompt().len(),
        "cowriter: complete"
    );

    let messages = [ChatMessage::user(request.prompt())];
    let result = call(&llm, &messages, &options, &configuration).await?;
    Ok(CompleteResponse::success(&result))
}

/// Multi-turn chat against the default configuration.
///
/// # Errors
///
/// Validation, configuration lookup, missing LLM, or provider failure.
pub async fn chat(state: &AppState, request: &ChatRequest) -> Result<CompleteResponse, CompletionError> {
    request.validate()?;
    let configuration = resolve_configuration(state, None)?;
    let llm = require_llm(state)?;

    let options = request.options().apply(configuration.to_chat_options());
    info!(
        configuration = %configuration.identifier,
        messages = request.messages().len(),
        "cowriter: chat"
    );

    let result = call(&llm, request.messages(), &options, &configuration).await?;
    Ok(CompleteResponse::chat_success(&result))
}

/// Active configurations for the editor's picker, in repository order.
#[must_use]
pub fn list_configurations(state: &AppState) -> ConfigurationList {
    ConfigurationList::new(&state.configurations.find_active())
}

// =============================================================================
// SHARED STEPS
// =============================================================================

/// The named configuration, or the default one when no name is given.
pub(crate) fn resolve_configuration(
    state: &AppState,
    identifier: Option<&str>,
) -> Result<Configuration, CompletionError> {
    match identifier {
        Some(id) => state
            .configurations
            .find_one_by_identifier(id)
            .ok_or_else(|| CompletionError::ConfigurationNotFound(id.to_owned())),
        None => state
            .configurations
            .find_default()
            .ok_or_else(|| CompletionError::ConfigurationNotFound("default".into())),
    }
}

pub(crate) fn require_llm(state: &AppState) -> Result<Arc<dyn LlmChat>, CompletionError> {
    state.llm.clone().ok_or(CompletionError::LlmNotConfigured)
}

/// Call the LLM and price the usage from the configuration when the
/// provider did not report a cost.
pub(crate) async fn call(
    llm: &Arc<dyn LlmChat>,
    messages: &[ChatMessage],
    options: &ChatOptions,
    configuration: &Configuration,
) -> Result<CompletionResponse, CompletionError> {
    let mut result = llm.chat(messages, options).await.map_err(|e| {
        warn!(
            error = %e,
            code = e.error_code(),
            retryable = e.retryable(),
            configuration = %configuration.identifier,
            "cowriter: provider call failed"
        );
        CompletionError::Provider(e)
    })?;
    if result.usage.estimated_cost.is_none() {
        result.usage = result
            .usage
            .with_pricing(configuration.input_price_per_mtok, configuration.output_price_per_mtok);
    }
    info!(
        model = %result.model,
        provider = %result.provider,
        prompt_tokens = result.usage.prompt_tokens,
        completion_tokens = result.usage.completion_tokens,
        "cowriter: completion finished"
    );
    Ok(result)
}

#[cfg(test)]
#[path = "completion_test.rs"]
mod tests;
