//! `complete` request: a single prompt with an optional inline model override.
//!
//! OVERRIDE SYNTAX
//! ===============
//! A prompt starting with `#cw:<model>` followed by whitespace selects a model
//! for that one request:
//!
//! ```text
//! #cw:gpt-4o Improve this paragraph
//! ```
//!
//! Matching is two steps. The prefix pattern captures any non-whitespace
//! token, then the token must pass the model-name allow-list. Only when both
//! pass is the directive stripped. A directive with a bad token stays in the
//! prompt verbatim so the editor sees exactly what they typed.
//!
//! Whitespace here is ASCII only. An ideographic space is part of the token.

use std::sync::LazyLock;

use regex::Regex;

use super::body::{self, Fields};
use super::{MAX_PROMPT_LENGTH, RequestOptions, ValidationError, codepoint_len, is_blank, trim_blank};

static OVERRIDE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#cw:([^ \t\n\x0B\x0C\r]+)[ \t\n\x0B\x0C\r]+").expect("static override prefix regex"));

static MODEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-_.:/]*$").expect("static model name regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRequest {
    prompt: String,
    configuration: Option<String>,
    model_override: Option<String>,
    options: RequestOptions,
}

impl CompleteRequest {
    /// Build from a raw body. Never fails; unusable bodies give an empty
    /// prompt that [`CompleteRequest::validate`] rejects.
    #[must_use]
    pub fn from_body(content_type: Option<&str>, raw: &[u8]) -> Self {
        Self::from_fields(&body::parse_fields(content_type, raw).unwrap_or_default())
    }

    #[must_use]
    pub fn from_fields(fields: &Fields) -> Self {
        let raw_prompt = body::scalar_string(fields.get("prompt"));
        let (model_override, prompt) = match extract_model_override(&raw_prompt) {
            Some((model, rest)) => (Some(model.to_owned()), rest.to_owned()),
            None => (None, raw_prompt),
        };
        Self {
            prompt,
            configuration: body::optional_scalar_string(fields.get("configuration")),
            model_override,
            options: RequestOptions::from_value(fields.get("options")),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
    }

    #[must_use]
    pub fn model_override(&self) -> Option<&str> {
        self.model_override.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> RequestOptions {
        self.options
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// # Errors
    ///
    /// Returns the first rule the prompt breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.prompt) {
            return Err(ValidationError::EmptyPrompt);
        }
        if codepoint_len(&self.prompt) > MAX_PROMPT_LENGTH {
            return Err(ValidationError::PromptTooLong);
        }
        Ok(())
    }
}

/// Split `#cw:<model> rest` into `(model, rest)` with `rest` trimmed.
///
/// `None` when there is no directive or the model token fails the allow-list.
#[must_use]
pub fn extract_model_override(prompt: &str) -> Option<(&str, &str)> {
    let captures = OVERRIDE_PREFIX.captures(prompt)?;
    let directive = captures.get(0)?;
    let model = captures.get(1)?.as_str();
    if !MODEL_NAME.is_match(model) {
        return None;
    }
    Some((model, trim_blank(&prompt[directive.end()..])))
}

#[cfg(test)]
#[path = "complete_request_test.rs"]
mod tests;
