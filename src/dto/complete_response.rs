//! Outward-facing completion payloads.
//!
//! An LLM can be prompt-injected into emitting markup, so every string taken
//! from a completion is HTML-escaped on construction. Fields that do not
//! apply to a branch are omitted from the JSON rather than sent as `null`.

use serde::Serialize;

use crate::llm::types::{CompletionResponse, UsageStatistics};

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please wait before making more requests.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<UsageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl CompleteResponse {
    /// `{success, content, model, usage}` from a completion.
    #[must_use]
    pub fn success(result: &CompletionResponse) -> Self {
        Self {
            success: true,
            content: Some(escape(&result.content)),
            model: Some(escape(&result.model)),
            finish_reason: None,
            usage: Some(UsageData::from_usage_statistics(&result.usage)),
            error: None,
            retry_after: None,
        }
    }

    /// Like [`CompleteResponse::success`] plus the escaped finish reason.
    #[must_use]
    pub fn chat_success(result: &CompletionResponse) -> Self {
        Self { finish_reason: Some(escape(&result.finish_reason)), ..Self::success(result) }
    }

    /// Failure with a fixed message. Only compile-time strings are accepted
    /// so provider errors cannot leak into the body.
    #[must_use]
    pub fn error(message: &'static str) -> Self {
        Self {
            success: false,
            content: None,
            model: None,
            finish_reason: None,
            usage: None,
            error: Some(message),
            retry_after: None,
        }
    }

    #[must_use]
    pub fn rate_limited(retry_after: u64) -> Self {
        Self { retry_after: Some(retry_after), ..Self::error(RATE_LIMITED_MESSAGE) }
    }
}

#[cfg(test)]
impl CompleteResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    #[must_use]
    pub fn usage(&self) -> Option<&UsageData> {
        self.usage.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error
    }

    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageData {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl UsageData {
    #[must_use]
    pub fn from_usage_statistics(usage: &UsageStatistics) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            estimated_cost: usage.estimated_cost,
        }
    }
}

/// Escape `& < > " '` to named entities for safe use in HTML content and
/// quoted attributes.
#[must_use]
pub fn escape(raw: &str) -> String {
    // A literal `&#x27;` in the input is already `&amp;#x27;` here, so only
    // the encoder's own apostrophes are rewritten.
    html_escape::encode_quoted_attribute(raw).replace("&#x27;", "&apos;")
}

#[cfg(test)]
#[path = "complete_response_test.rs"]
mod tests;
