//! Editor tasks: reusable prompt templates invoked by uid.

use std::collections::HashSet;

use serde::Deserialize;

use super::RepositoryError;

/// Placeholder in a task template that receives the editor content.
pub const INPUT_PLACEHOLDER: &str = "{{input}}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: u32,
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "prompt")]
    pub prompt_template: String,
    /// Configuration identifier; `None` uses the default configuration.
    #[serde(default)]
    pub configuration: Option<String>,
    #[serde(default = "active_by_default", rename = "active")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

pub trait TaskRepository: Send + Sync {
    /// The active task with this uid, if any.
    fn find_by_uid(&self, uid: u32) -> Option<Task>;

    /// All active tasks in declaration order.
    fn find_active(&self) -> Vec<Task>;
}

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    items: Vec<Task>,
}

impl TaskStore {
    /// Validate and wrap a list of tasks.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero uid or a uid used twice.
    pub fn new(items: Vec<Task>) -> Result<Self, RepositoryError> {
        let mut seen = HashSet::new();
        for task in &items {
            if task.uid == 0 {
                return Err(RepositoryError::InvalidTaskUid);
            }
            if !seen.insert(task.uid) {
                return Err(RepositoryError::DuplicateTaskUid(task.uid));
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

impl TaskRepository for TaskStore {
    fn find_by_uid(&self, uid: u32) -> Option<Task> {
        self.items
            .iter()
            .find(|t| t.is_active && t.uid == uid)
            .cloned()
    }

    fn find_active(&self) -> Vec<Task> {
        self.items.iter().filter(|t| t.is_active).cloned().collect()
    }
}
