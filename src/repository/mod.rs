//! Read-only repositories for LLM configurations and editor tasks.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host CMS owns these records; this service only reads them. Both live
//! in one YAML file loaded at startup:
//!
//! ```yaml
//! configurations:
//!   - identifier: default
//!     name: Default (GPT-4o)
//!     default: true
//!     model: gpt-4o
//! tasks:
//!   - uid: 1
//!     identifier: improve
//!     name: Improve writing
//!     prompt: "Improve the following text: {{input}}"
//! ```
//!
//! Entries that do not deserialize into a usable record are skipped with a
//! warning rather than failing the whole file, so one bad row never takes
//! the editor offline.

pub mod configuration;
pub mod task;

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub use configuration::{Configuration, ConfigurationRepository, ConfigurationStore};
pub use task::{Task, TaskRepository, TaskStore};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("configuration identifier must not be empty")]
    EmptyIdentifier,
    #[error("duplicate configuration identifier: {0}")]
    DuplicateIdentifier(String),
    #[error("task uid must be positive")]
    InvalidTaskUid,
    #[error("duplicate task uid: {0}")]
    DuplicateTaskUid(u32),
}

impl crate::error::ErrorCode for RepositoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_REPOSITORY_IO",
            Self::Yaml(_) => "E_REPOSITORY_YAML",
            Self::EmptyIdentifier => "E_EMPTY_IDENTIFIER",
            Self::DuplicateIdentifier(_) => "E_DUPLICATE_IDENTIFIER",
            Self::InvalidTaskUid => "E_INVALID_TASK_UID",
            Self::DuplicateTaskUid(_) => "E_DUPLICATE_TASK_UID",
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

#[derive(Deserialize, Default)]
struct RawFile {
    #[serde(default)]
    configurations: Vec<serde_yaml::Value>,
    #[serde(default)]
    tasks: Vec<serde_yaml::Value>,
}

/// Both repositories, loaded together from one file.
#[derive(Debug, Clone, Default)]
pub struct Repositories {
    pub configurations: ConfigurationStore,
    pub tasks: TaskStore,
}

impl Repositories {
    /// Load repositories from a YAML file. A missing file yields empty
    /// repositories so the service can start before the CMS exports data.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, RepositoryError> {
        if !path.exists() {
            warn!(path = %path.display(), "cowriter config file not found, no configurations or tasks");
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .map_err(|source| RepositoryError::Io { path: path.display().to_string(), source })?;
        let repos = Self::from_yaml_str(&yaml)?;
        if repos.configurations.is_empty() {
            warn!(path = %path.display(), "cowriter config file defines no usable configurations");
        }
        if repos.tasks.is_empty() {
            info!(path = %path.display(), "cowriter config file defines no tasks");
        }
        info!(
            path = %path.display(),
            configurations = repos.configurations.len(),
            tasks = repos.tasks.len(),
            "cowriter config loaded"
        );
        Ok(repos)
    }

    /// Parse repositories from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML, empty or duplicate identifiers,
    /// and duplicate or non-positive task uids.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RepositoryError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawFile = serde_yaml::from_str(yaml)?;
        let configurations = ConfigurationStore::new(parse_entries(raw.configurations, "configuration"))?;
        let tasks = TaskStore::new(parse_entries(raw.tasks, "task"))?;
        Ok(Self { configurations, tasks })
    }
}

/// Deserialize each entry independently, skipping the ones that don't fit.
fn parse_entries<T: DeserializeOwned>(values: Vec<serde_yaml::Value>, kind: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_yaml::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, kind, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
