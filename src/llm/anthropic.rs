//! Anthropic Messages API client.
//!
//! Thin HTTP wrapper for `/v1/messages`. System-role messages are folded into
//! the top-level `system` field because the Messages API rejects them inline.
//! Pure parsing in `parse_response` for testability.

use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{ChatMessage, ChatOptions, CompletionResponse, LlmError, UsageStatistics};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "anthropic";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key })
    }

    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let body = build_request(model, messages, options);

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    content: Vec<ResponseBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum ResponseBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(serde::Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

fn build_request<'a>(model: &'a str, messages: &'a [ChatMessage], options: &ChatOptions) -> ApiRequest<'a> {
    let system_parts: Vec<&str> = options
        .system_prompt
        .as_deref()
        .into_iter()
        .chain(messages.iter().filter(|m| m.is_system()).map(|m| m.content.as_str()))
        .filter(|s| !s.trim().is_empty())
        .collect();
    let system = if system_parts.is_empty() { None } else { Some(system_parts.join("\n\n")) };

    ApiRequest {
        model,
        max_tokens: options.max_tokens,
        system,
        messages: messages.iter().filter(|m| !m.is_system()).collect(),
        temperature: options.temperature,
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<CompletionResponse, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let content = api
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseBlock::Text { text } => Some(text),
            ResponseBlock::Other => None,
        })
        .collect::<String>();

    Ok(CompletionResponse {
        content,
        model: api.model,
        usage: UsageStatistics::new(api.usage.input_tokens, api.usage.output_tokens),
        finish_reason: api.stop_reason.unwrap_or_default(),
        provider: PROVIDER.to_owned(),
    })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
