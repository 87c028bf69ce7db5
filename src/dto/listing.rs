//! Listing payloads for the configuration and task pickers.

use serde::Serialize;

use crate::repository::{Configuration, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    pub identifier: String,
    pub name: String,
    pub is_default: bool,
}

impl From<&Configuration> for ConfigurationSummary {
    fn from(c: &Configuration) -> Self {
        Self { identifier: c.identifier.clone(), name: c.name.clone(), is_default: c.is_default }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationList {
    pub success: bool,
    pub configurations: Vec<ConfigurationSummary>,
}

impl ConfigurationList {
    #[must_use]
    pub fn new(configurations: &[Configuration]) -> Self {
        Self { success: true, configurations: configurations.iter().map(ConfigurationSummary::from).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub uid: u32,
    pub identifier: String,
    pub name: String,
    pub description: String,
}

impl From<&Task> for TaskSummary {
    fn from(t: &Task) -> Self {
        Self { uid: t.uid, identifier: t.identifier.clone(), name: t.name.clone(), description: t.description.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub success: bool,
    pub tasks: Vec<TaskSummary>,
}

impl TaskList {
    #[must_use]
    pub fn new(tasks: &[Task]) -> Self {
        Self { success: true, tasks: tasks.iter().map(TaskSummary::from).collect() }
    }
}
