use super::*;
use proptest::prelude::*;
use serde_json::{Value, json};

fn request(value: Value) -> ExecuteTaskRequest {
    ExecuteTaskRequest::from_body(Some("application/json"), value.to_string().as_bytes())
}

fn valid() -> Value {
    json!({
        "taskUid": 3,
        "context": "<p>Some text</p>",
        "contextType": "selection",
    })
}

fn with(key: &str, value: Value) -> ExecuteTaskRequest {
    let mut body = valid();
    body[key] = value;
    request(body)
}

#[test]
fn parses_all_fields() {
    let req = request(json!({
        "taskUid": "12",
        "context": "ctx",
        "contextType": "content_element",
        "adHocRules": "Use British spelling",
        "editorCapabilities": "bold, italic",
        "configuration": "fast",
        "options": {"temperature": 1},
    }));
    assert_eq!(req.task_uid(), 12);
    assert_eq!(req.context(), "ctx");
    assert_eq!(req.context_type(), Some(ContextType::ContentElement));
    assert_eq!(req.ad_hoc_rules(), "Use British spelling");
    assert_eq!(req.editor_capabilities(), "bold, italic");
    assert_eq!(req.configuration(), Some("fast"));
    assert_eq!(req.options().temperature(), Some(1.0));
    assert!(req.is_valid());
}

#[test]
fn minimal_request_is_valid() {
    let req = request(valid());
    assert!(req.is_valid());
    assert_eq!(req.ad_hoc_rules(), "");
    assert_eq!(req.configuration(), None);
}

#[test]
fn task_uid_must_be_positive() {
    for uid in [json!(0), json!(-1), json!("abc"), json!(null), json!([4]), json!(false)] {
        assert_eq!(with("taskUid", uid).validate(), Err(ValidationError::InvalidTaskUid));
    }
    assert_eq!(with("taskUid", json!("7 tasks")).task_uid(), 7);
}

#[test]
fn context_is_required_and_bounded() {
    assert_eq!(with("context", json!("   ")).validate(), Err(ValidationError::EmptyContext));
    assert_eq!(with("context", json!("\0\u{0B}\r\n")).validate(), Err(ValidationError::EmptyContext));
    assert_eq!(with("context", json!({"a": 1})).validate(), Err(ValidationError::EmptyContext));
    assert!(with("context", json!("x".repeat(MAX_PROMPT_LENGTH))).is_valid());
    assert_eq!(
        with("context", json!("x".repeat(MAX_PROMPT_LENGTH + 1))).validate(),
        Err(ValidationError::ContextTooLong)
    );
}

#[test]
fn context_type_allow_list() {
    for bad in [json!("Selection"), json!("page"), json!(""), json!(1), json!(null)] {
        assert_eq!(with("contextType", bad).validate(), Err(ValidationError::InvalidContextType));
    }
}

#[test]
fn ad_hoc_rules_boundary() {
    assert!(with("adHocRules", json!("\u{00e9}".repeat(MAX_AD_HOC_RULES_LENGTH))).is_valid());
    assert_eq!(
        with("adHocRules", json!("r".repeat(MAX_AD_HOC_RULES_LENGTH + 1))).validate(),
        Err(ValidationError::AdHocRulesTooLong)
    );
}

#[test]
fn editor_capabilities_boundary() {
    assert!(with("editorCapabilities", json!("c".repeat(MAX_EDITOR_CAPABILITIES_LENGTH))).is_valid());
    assert_eq!(
        with("editorCapabilities", json!("c".repeat(MAX_EDITOR_CAPABILITIES_LENGTH + 1))).validate(),
        Err(ValidationError::EditorCapabilitiesTooLong)
    );
}

#[test]
fn first_failing_rule_wins() {
    let req = request(json!({"taskUid": 0, "context": "", "contextType": "bogus"}));
    assert_eq!(req.validate(), Err(ValidationError::InvalidTaskUid));

    let req = request(json!({"taskUid": 1, "context": "", "contextType": "bogus"}));
    assert_eq!(req.validate(), Err(ValidationError::EmptyContext));
}

#[test]
fn context_type_hints() {
    assert_eq!(ContextType::Selection.hint(), "the selected text");
    assert_eq!(ContextType::ContentElement.hint(), "the whole content element");
    assert_eq!(ContextType::parse(ContextType::ContentElement.as_str()), Some(ContextType::ContentElement));
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_bytes(raw in proptest::collection::vec(any::<u8>(), 0..512)) {
        let req = ExecuteTaskRequest::from_body(Some("application/json"), &raw);
        prop_assert!(!req.is_valid());
    }

    #[test]
    fn never_panics_on_arbitrary_task_uids(uid in "\\PC{0,30}") {
        let req = with("taskUid", json!(uid));
        let _ = req.validate();
    }
}
