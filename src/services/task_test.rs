use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::llm::LlmChat;
use crate::state::test_helpers::{self, MockLlm};

fn task(template: &str) -> Task {
    Task {
        uid: 9,
        identifier: "t".into(),
        name: "T".into(),
        description: String::new(),
        prompt_template: template.into(),
        configuration: None,
        is_active: true,
    }
}

fn request(body: serde_json::Value) -> ExecuteTaskRequest {
    ExecuteTaskRequest::from_body(Some("application/json"), body.to_string().as_bytes())
}

// =============================================================================
// build_user_prompt
// =============================================================================

#[test]
fn placeholder_is_replaced() {
    let prompt = build_user_prompt(&task("Fix: {{input}} (thanks)"), "teh cat", "", "");
    assert_eq!(prompt, "Fix: teh cat (thanks)");
}

#[test]
fn context_appended_without_placeholder() {
    let prompt = build_user_prompt(&task("Summarize."), "Long text", "", "");
    assert_eq!(prompt, "Summarize.\n\nLong text");
}

#[test]
fn rules_and_capabilities_sections() {
    let prompt = build_user_prompt(&task("{{input}}"), "ctx", "  Use British spelling ", "bold, lists");
    assert_eq!(
        prompt,
        "ctx\n\nAdditional rules:\nUse British spelling\n\nEditor capabilities:\nbold, lists\nOnly use markup the editor supports."
    );
}

#[test]
fn blank_rules_are_skipped() {
    let prompt = build_user_prompt(&task("{{input}}"), "ctx", "   ", "\n");
    assert_eq!(prompt, "ctx");
}

// =============================================================================
// build_system_prompt
// =============================================================================

#[test]
fn system_prompt_names_context_type() {
    let prompt = build_system_prompt(None, ContextType::Selection);
    assert!(prompt.starts_with("You are editing the selected text"));

    let prompt = build_system_prompt(Some("Be formal. "), ContextType::ContentElement);
    assert!(prompt.starts_with("Be formal.\n\nYou are editing the whole content element"));
}

#[test]
fn blank_base_prompt_is_ignored() {
    let prompt = build_system_prompt(Some("  "), ContextType::Selection);
    assert!(prompt.starts_with("You are editing"));
}

// =============================================================================
// execute
// =============================================================================

#[tokio::test]
async fn execute_runs_template_with_default_configuration() {
    let mock = Arc::new(MockLlm::replying("Improved"));
    let state = test_helpers::test_app_state_with_llm(mock.clone() as Arc<dyn LlmChat>);
    let resp = execute(
        &state,
        &request(json!({"taskUid": 1, "context": "<p>draft</p>", "contextType": "selection"})),
    )
    .await
    .unwrap();
    assert_eq!(resp.content(), Some("Improved"));

    let calls = mock.calls();
    assert_eq!(calls[0].messages[0].content, "Improve the following text:\n\n<p>draft</p>");
    assert_eq!(calls[0].options.model.as_deref(), Some("gpt-4o"));
    let system = calls[0].options.system_prompt.as_deref().unwrap();
    assert!(system.starts_with("You are a helpful writing assistant."));
    assert!(system.contains("the selected text"));
}

#[tokio::test]
async fn execute_uses_task_configuration() {
    let mock = Arc::new(MockLlm::replying("Short"));
    let state = test_helpers::test_app_state_with_llm(mock.clone() as Arc<dyn LlmChat>);
    execute(
        &state,
        &request(json!({"taskUid": 2, "context": "text", "contextType": "content_element"})),
    )
    .await
    .unwrap();
    let calls = mock.calls();
    assert_eq!(calls[0].options.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(calls[0].messages[0].content, "Summarize the content below.\n\ntext");
}

#[tokio::test]
async fn request_configuration_overrides_task_configuration() {
    let mock = Arc::new(MockLlm::replying("ok"));
    let state = test_helpers::test_app_state_with_llm(mock.clone() as Arc<dyn LlmChat>);
    execute(
        &state,
        &request(json!({"taskUid": 2, "context": "text", "contextType": "selection", "configuration": "default"})),
    )
    .await
    .unwrap();
    assert_eq!(mock.calls()[0].options.model.as_deref(), Some("gpt-4o"));
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let state = test_helpers::test_app_state_with_llm(Arc::new(MockLlm::replying("never")) as Arc<dyn LlmChat>);
    let err = execute(&state, &request(json!({"taskUid": 99, "context": "x", "contextType": "selection"})))
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::TaskNotFound(99)));

    let err = execute(
        &state,
        &request(json!({"taskUid": i64::MAX, "context": "x", "contextType": "selection"})),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CompletionError::TaskNotFound(_)));
}

#[tokio::test]
async fn invalid_request_is_rejected_first() {
    let state = test_helpers::test_app_state();
    let err = execute(&state, &request(json!({"taskUid": 1, "context": "x", "contextType": "page"})))
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Validation(ValidationError::InvalidContextType)));
}

#[test]
fn list_returns_active_tasks() {
    let state = test_helpers::test_app_state();
    let listed = list(&state);
    assert!(listed.success);
    let uids: Vec<u32> = listed.tasks.iter().map(|t| t.uid).collect();
    assert_eq!(uids, [1, 2]);
    assert_eq!(listed.tasks[0].description, "Improve the writing");
    assert_eq!(listed.tasks[1].description, "");
}
