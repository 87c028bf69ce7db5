//! `chat` request: a conversation forwarded to the model as-is.

use serde_json::Value;

use super::body;
use super::{RequestOptions, ValidationError, is_blank};
use crate::llm::types::ChatMessage;

const ALLOWED_ROLES: [&str; 3] = ["system", "user", "assistant"];

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    body_parsed: bool,
    messages: Vec<ChatMessage>,
    rejected_messages: usize,
    options: RequestOptions,
}

impl ChatRequest {
    /// Build from a raw body. Messages that are not `{role, content}` objects
    /// with an allowed role and non-blank string content are counted and
    /// dropped; [`ChatRequest::validate`] rejects the request if any were.
    #[must_use]
    pub fn from_body(content_type: Option<&str>, raw: &[u8]) -> Self {
        let Some(fields) = body::parse_fields(content_type, raw) else {
            return Self {
                body_parsed: false,
                messages: Vec::new(),
                rejected_messages: 0,
                options: RequestOptions::default(),
            };
        };

        let entries: &[Value] = match fields.get("messages") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        };
        let messages: Vec<ChatMessage> = entries.iter().filter_map(parse_message).collect();
        Self {
            body_parsed: true,
            rejected_messages: entries.len() - messages.len(),
            messages,
            options: RequestOptions::from_value(fields.get("options")),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
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
    /// `InvalidBody` when the body was not a JSON object, `NoMessages` for an
    /// empty list, `InvalidMessage` when any entry was malformed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.body_parsed {
            return Err(ValidationError::InvalidBody);
        }
        if self.rejected_messages > 0 {
            return Err(ValidationError::InvalidMessage);
        }
        if self.messages.is_empty() {
            return Err(ValidationError::NoMessages);
        }
        Ok(())
    }
}

fn parse_message(value: &Value) -> Option<ChatMessage> {
    let Value::Object(map) = value else {
        return None;
    };
    let role = map.get("role")?.as_str()?;
    let content = map.get("content")?.as_str()?;
    if !ALLOWED_ROLES.contains(&role) || is_blank(content) {
        return None;
    }
    Some(ChatMessage { role: role.to_owned(), content: content.to_owned() })
}

#[cfg(test)]
#[path = "chat_request_test.rs"]
mod tests;
