//! `task` request: run a stored task template against editor content.

use super::body::{self, Fields};
use super::{MAX_PROMPT_LENGTH, RequestOptions, ValidationError, codepoint_len, is_blank};

pub const MAX_AD_HOC_RULES_LENGTH: usize = 4096;
pub const MAX_EDITOR_CAPABILITIES_LENGTH: usize = 2048;

/// What part of the document the editor sent as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextType {
    Selection,
    ContentElement,
}

impl ContextType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "selection" => Some(Self::Selection),
            "content_element" => Some(Self::ContentElement),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::ContentElement => "content_element",
        }
    }

    /// Phrase used in the system prompt to tell the model what it is editing.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Selection => "the selected text",
            Self::ContentElement => "the whole content element",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteTaskRequest {
    task_uid: i64,
    context: String,
    context_type: Option<ContextType>,
    ad_hoc_rules: String,
    editor_capabilities: String,
    configuration: Option<String>,
    options: RequestOptions,
}

impl ExecuteTaskRequest {
    #[must_use]
    pub fn from_body(content_type: Option<&str>, raw: &[u8]) -> Self {
        Self::from_fields(&body::parse_fields(content_type, raw).unwrap_or_default())
    }

    #[must_use]
    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            task_uid: body::int_value(fields.get("taskUid")),
            context: body::scalar_string(fields.get("context")),
            context_type: ContextType::parse(&body::scalar_string(fields.get("contextType"))),
            ad_hoc_rules: body::scalar_string(fields.get("adHocRules")),
            editor_capabilities: body::scalar_string(fields.get("editorCapabilities")),
            configuration: body::optional_scalar_string(fields.get("configuration")),
            options: RequestOptions::from_value(fields.get("options")),
        }
    }

    #[must_use]
    pub fn task_uid(&self) -> i64 {
        self.task_uid
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// `None` until the raw value matched the allow-list.
    #[must_use]
    pub fn context_type(&self) -> Option<ContextType> {
        self.context_type
    }

    #[must_use]
    pub fn ad_hoc_rules(&self) -> &str {
        &self.ad_hoc_rules
    }

    #[must_use]
    pub fn editor_capabilities(&self) -> &str {
        &self.editor_capabilities
    }

    #[must_use]
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
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

    /// Checks run in field order: uid, context, context type, rules,
    /// capabilities.
    ///
    /// # Errors
    ///
    /// Returns the first rule the request breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.task_uid <= 0 {
            return Err(ValidationError::InvalidTaskUid);
        }
        if is_blank(&self.context) {
            return Err(ValidationError::EmptyContext);
        }
        if codepoint_len(&self.context) > MAX_PROMPT_LENGTH {
            return Err(ValidationError::ContextTooLong);
        }
        if self.context_type.is_none() {
            return Err(ValidationError::InvalidContextType);
        }
        if codepoint_len(&self.ad_hoc_rules) > MAX_AD_HOC_RULES_LENGTH {
            return Err(ValidationError::AdHocRulesTooLong);
        }
        if codepoint_len(&self.editor_capabilities) > MAX_EDITOR_CAPABILITIES_LENGTH {
            return Err(ValidationError::EditorCapabilitiesTooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "execute_task_request_test.rs"]
mod tests;
