//! Task service: run a stored prompt template against editor content.
//!
//! PROMPT LAYOUT
//! =============
//! User message:
//!
//! ```text
//! <template with {{input}} replaced by the context>
//!
//! Additional rules:
//! <ad-hoc rules, when given>
//!
//! Editor capabilities:
//! <capabilities, when given>
//! ```
//!
//! A template without the placeholder gets the context appended after a
//! blank line. The system prompt is the configuration's own system prompt
//! followed by a line naming what part of the document is being edited.

use tracing::info;

use super::completion::{CompletionError, call, require_llm, resolve_configuration};
use crate::dto::{CompleteResponse, ContextType, ExecuteTaskRequest, TaskList, ValidationError};
use crate::llm::types::ChatMessage;
use crate::repository::Task;
use crate::repository::task::INPUT_PLACEHOLDER;
use crate::state::AppState;

/// Execute the task named by `request.task_uid()`.
///
/// The request's configuration wins over the task's, which wins over the
/// default configuration.
///
/// # Errors
///
/// Validation, unknown task or configuration, missing LLM, or provider
/// failure.
pub async fn execute(state: &AppState, request: &ExecuteTaskRequest) -> Result<CompleteResponse, CompletionError> {
    request.validate()?;
    let context_type = request
        .context_type()
        .ok_or(CompletionError::Validation(ValidationError::InvalidContextType))?;
    let task = u32::try_from(request.task_uid())
        .ok()
        .and_then(|uid| state.tasks.find_by_uid(uid))
        .ok_or(CompletionError::TaskNotFound(request.task_uid()))?;
    let identifier = request.configuration().or(task.configuration.as_deref());
    let configuration = resolve_configuration(state, identifier)?;
    let llm = require_llm(state)?;

    let system_prompt = build_system_prompt(configuration.system_prompt.as_deref(), context_type);
    let options = request
        .options()
        .apply(configuration.to_chat_options())
        .with_system_prompt(system_prompt);
    info!(
        task = %task.identifier,
        configuration = %configuration.identifier,
        context_type = context_type.as_str(),
        context_len = request.context().len(),
        "cowriter: execute task"
    );

    let messages = [ChatMessage::user(build_user_prompt(
        &task,
        request.context(),
        request.ad_hoc_rules(),
        request.editor_capabilities(),
    ))];
    let result = call(&llm, &messages, &options, &configuration).await?;
    Ok(CompleteResponse::success(&result))
}

/// Active tasks in declaration order.
#[must_use]
pub fn list(state: &AppState) -> TaskList {
    TaskList::new(&state.tasks.find_active())
}

// =============================================================================
// PROMPT BUILDING
// =============================================================================

pub(crate) fn build_user_prompt(task: &Task, context: &str, ad_hoc_rules: &str, editor_capabilities: &str) -> String {
    let mut prompt = if task.prompt_template.contains(INPUT_PLACEHOLDER) {
        task.prompt_template.replace(INPUT_PLACEHOLDER, context)
    } else {
        format!("{}\n\n{context}", task.prompt_template)
    };

    let rules = ad_hoc_rules.trim();
    if !rules.is_empty() {
        prompt.push_str("\n\nAdditional rules:\n");
        prompt.push_str(rules);
    }

    let capabilities = editor_capabilities.trim();
    if !capabilities.is_empty() {
        prompt.push_str("\n\nEditor capabilities:\n");
        prompt.push_str(capabilities);
        prompt.push_str("\nOnly use markup the editor supports.");
    }
    prompt
}

pub(crate) fn build_system_prompt(base: Option<&str>, context_type: ContextType) -> String {
    let mut prompt = base.map(str::trim).filter(|s| !s.is_empty()).map(|s| format!("{s}\n\n")).unwrap_or_default();
    prompt.push_str("You are editing ");
    prompt.push_str(context_type.hint());
    prompt.push_str(" of a web page. Return only the resulting content, without explanations.");
    prompt
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
