//! LLM types: provider-neutral messages, options, results, and errors.
//!
//! Shared by the Anthropic and `OpenAI` clients and by everything that calls
//! the `LlmChat` capability.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS: u32 = 4096;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[cfg(test)]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Per-call generation options.
///
/// `model: None` means "use the client's configured default model".
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub system_prompt: Option<String>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self { model: None, max_tokens: DEFAULT_MAX_TOKENS, temperature: None, system_prompt: None }
    }
}

impl ChatOptions {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Token accounting for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStatistics {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost: Option<f64>,
}

impl UsageStatistics {
    #[must_use]
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
            estimated_cost: None,
        }
    }

    /// Attach a cost estimate from per-million-token prices. Both prices are
    /// required; with either missing the estimate stays `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn with_pricing(mut self, input_per_mtok: Option<f64>, output_per_mtok: Option<f64>) -> Self {
        self.estimated_cost = match (input_per_mtok, output_per_mtok) {
            (Some(input), Some(output)) => {
                Some((self.prompt_tokens as f64 * input + self.completion_tokens as f64 * output) / 1_000_000.0)
            }
            _ => None,
        };
        self
    }
}

/// Result of an LLM chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: UsageStatistics,
    pub finish_reason: String,
    pub provider: String,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a chat request to the LLM provider.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is
    /// malformed.
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
