//! Multi-provider LLM adapter behind the `chat(messages, options)` capability.
//!
//! DESIGN
//! ======
//! Uses environment variables for provider credentials. The `LlmClient`
//! dispatches to Anthropic or `OpenAI` based on `LLM_PROVIDER`. Callers pick
//! the model per request through `ChatOptions`; the env model is only the
//! fallback.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmChat;
use types::{ChatMessage, ChatOptions, CompletionResponse, LlmError};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either Anthropic or OpenAI.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let model = config.model.clone();
        let inner = match config.provider {
            LlmProviderKind::Anthropic => {
                LlmProvider::Anthropic(anthropic::AnthropicClient::new(config.api_key, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.api_key,
                config.openai_base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, model })
    }

    /// Return the fallback model name (e.g. `"claude-sonnet-4-5-20250929"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Return the provider name reported in responses.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self.inner {
            LlmProvider::Anthropic(_) => LlmProviderKind::Anthropic.as_str(),
            LlmProvider::OpenAi(_) => LlmProviderKind::OpenAi.as_str(),
        }
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<CompletionResponse, LlmError> {
        let model = options.model.as_deref().unwrap_or(&self.model);
        match &self.inner {
            LlmProvider::Anthropic(c) => c.chat(model, messages, options).await,
            LlmProvider::OpenAi(c) => c.chat(model, messages, options).await,
        }
    }
}
