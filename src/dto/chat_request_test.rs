use super::*;
use proptest::prelude::*;
use serde_json::json;

fn request(raw: &str) -> ChatRequest {
    ChatRequest::from_body(Some("application/json"), raw.as_bytes())
}

#[test]
fn parses_conversation_in_order() {
    let req = request(
        &json!({
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hi"},
                {"role": "assistant", "content": "Hello!"},
                {"role": "user", "content": "Summarize <b>this</b>"},
            ],
            "options": {"maxTokens": 200},
        })
        .to_string(),
    );
    assert!(req.is_valid());
    let roles: Vec<&str> = req.messages().iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, ["system", "user", "assistant", "user"]);
    assert_eq!(req.messages()[3].content, "Summarize <b>this</b>");
    assert_eq!(req.options().max_tokens(), Some(200));
}

#[test]
fn invalid_json_is_invalid_body() {
    assert_eq!(request("{oops").validate(), Err(ValidationError::InvalidBody));
    assert_eq!(request("").validate(), Err(ValidationError::InvalidBody));
    assert_eq!(request("[]").validate(), Err(ValidationError::InvalidBody));
}

#[test]
fn missing_or_empty_messages() {
    assert_eq!(request("{}").validate(), Err(ValidationError::NoMessages));
    assert_eq!(request(r#"{"messages":[]}"#).validate(), Err(ValidationError::NoMessages));
    assert_eq!(request(r#"{"messages":"hi"}"#).validate(), Err(ValidationError::NoMessages));
}

#[test]
fn malformed_messages_are_rejected() {
    let cases = [
        r#"{"messages":[{"role":"user"}]}"#,
        r#"{"messages":[{"content":"hi"}]}"#,
        r#"{"messages":[{"role":"tool","content":"hi"}]}"#,
        r#"{"messages":[{"role":"user","content":"   "}]}"#,
        r#"{"messages":[{"role":"user","content":"\u0000\t"}]}"#,
        r#"{"messages":[{"role":"user","content":["a"]}]}"#,
        r#"{"messages":[{"role":"user","content":"ok"}, "stray"]}"#,
    ];
    for raw in cases {
        assert_eq!(request(raw).validate(), Err(ValidationError::InvalidMessage), "{raw}");
    }
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_bytes(raw in proptest::collection::vec(any::<u8>(), 0..512)) {
        let req = ChatRequest::from_body(Some("application/json"), &raw);
        let _ = req.validate();
    }

    #[test]
    fn messages_with_arbitrary_content(content in "\\PC{1,64}", role in "(system|user|assistant)") {
        let raw = json!({"messages": [{"role": role, "content": content}]}).to_string();
        let req = request(&raw);
        prop_assert_eq!(req.is_valid(), !crate::dto::is_blank(&content));
    }
}
