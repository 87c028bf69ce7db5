//! LLM configurations: named presets of model and generation options.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use super::RepositoryError;
use crate::llm::types::{ChatOptions, DEFAULT_MAX_TOKENS};

/// One named LLM preset selectable from the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub identifier: String,
    pub name: String,
    #[serde(default, rename = "default")]
    pub is_default: bool,
    #[serde(default = "active_by_default", rename = "active")]
    pub is_active: bool,
    /// Provider model name; `None` uses the provider's fallback model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub input_price_per_mtok: Option<f64>,
    #[serde(default)]
    pub output_price_per_mtok: Option<f64>,
}

fn active_by_default() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Configuration {
    #[must_use]
    pub fn to_chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_prompt: self.system_prompt.clone(),
        }
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// Lookup contract the endpoints depend on.
pub trait ConfigurationRepository: Send + Sync {
    /// The active configuration flagged as default, if any.
    fn find_default(&self) -> Option<Configuration>;

    /// The active configuration with this identifier, if any.
    fn find_one_by_identifier(&self, identifier: &str) -> Option<Configuration>;

    /// All active configurations in declaration order.
    fn find_active(&self) -> Vec<Configuration>;
}

/// In-memory configuration list, validated on construction.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationStore {
    items: Vec<Configuration>,
}

impl ConfigurationStore {
    /// Validate and wrap a list of configurations.
    ///
    /// Only the first `default: true` entry keeps its flag.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or duplicate identifiers.
    pub fn new(mut items: Vec<Configuration>) -> Result<Self, RepositoryError> {
        let mut seen = HashSet::new();
        let mut default_seen = false;
        for item in &mut items {
            item.identifier = item.identifier.trim().to_owned();
            if item.identifier.is_empty() {
                return Err(RepositoryError::EmptyIdentifier);
            }
            if !seen.insert(item.identifier.clone()) {
                return Err(RepositoryError::DuplicateIdentifier(item.identifier.clone()));
            }
            if item.is_default {
                if default_seen {
                    warn!(identifier = %item.identifier, "multiple default configurations, clearing flag");
                    item.is_default = false;
                }
                default_seen = true;
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ConfigurationRepository for ConfigurationStore {
    fn find_default(&self) -> Option<Configuration> {
        self.items
            .iter()
            .find(|c| c.is_active && c.is_default)
            .cloned()
    }

    fn find_one_by_identifier(&self, identifier: &str) -> Option<Configuration> {
        self.items
            .iter()
            .find(|c| c.is_active && c.identifier == identifier)
            .cloned()
    }

    fn find_active(&self) -> Vec<Configuration> {
        self.items.iter().filter(|c| c.is_active).cloned().collect()
    }
}
