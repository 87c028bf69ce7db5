//! Per-request generation options sent by the editor.

use serde_json::Value;

use super::body;
use crate::llm::types::ChatOptions;

pub const MAX_TEMPERATURE: f64 = 2.0;
pub const MAX_OPTION_TOKENS: u32 = 32_768;

/// Optional overrides layered on top of a configuration's options.
///
/// Out-of-range or wrongly typed values are dropped silently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequestOptions {
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl RequestOptions {
    /// Read `{temperature, maxTokens}` from an `options` field. Anything that
    /// is not an object yields no overrides.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = value else {
            return Self::default();
        };
        let temperature = body::number_value(map.get("temperature"))
            .filter(|t| (0.0..=MAX_TEMPERATURE).contains(t));
        let max_tokens = map
            .get("maxTokens")
            .or_else(|| map.get("max_tokens"))
            .and_then(token_count)
            .filter(|n| (1..=MAX_OPTION_TOKENS).contains(n));
        Self { temperature, max_tokens }
    }

    #[cfg(test)]
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    #[cfg(test)]
    #[must_use]
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    #[must_use]
    pub fn apply(&self, mut options: ChatOptions) -> ChatOptions {
        if let Some(t) = self.temperature {
            options = options.with_temperature(t);
        }
        if let Some(n) = self.max_tokens {
            options = options.with_max_tokens(n);
        }
        options
    }
}

fn token_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
