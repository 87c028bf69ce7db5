//! Request and response DTOs for the editor endpoints.
//!
//! DESIGN
//! ======
//! Request DTOs are built by total factories: any byte sequence produces a
//! well-typed value. Bad JSON, binary garbage, wrong field types, and
//! oversized numbers degrade to empty/default fields and are rejected later
//! by `validate()`, which returns a user-safe, field-specific message. Only
//! the route layer turns that into an HTTP status.
//!
//! Response DTOs escape every string that came from the LLM or echoes user
//! input before it is stored, so nothing unescaped can reach serialization.

pub mod body;
pub mod chat_request;
pub mod complete_request;
pub mod complete_response;
pub mod execute_task_request;
pub mod listing;
pub mod options;

pub use chat_request::ChatRequest;
pub use complete_request::CompleteRequest;
pub use complete_response::CompleteResponse;
pub use execute_task_request::{ContextType, ExecuteTaskRequest};
pub use listing::{ConfigurationList, TaskList};
pub use options::RequestOptions;

/// Maximum prompt/context length in Unicode codepoints.
pub const MAX_PROMPT_LENGTH: usize = 32_768;

/// Rejection reasons surfaced to the editor as 400 responses.
///
/// Messages are fixed strings so no user input is ever echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyPrompt,
    PromptTooLong,
    InvalidBody,
    NoMessages,
    InvalidMessage,
    InvalidTaskUid,
    EmptyContext,
    ContextTooLong,
    InvalidContextType,
    AdHocRulesTooLong,
    EditorCapabilitiesTooLong,
}

impl ValidationError {
    /// The fixed message shown to the editor.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyPrompt => "No prompt provided",
            Self::PromptTooLong => "Prompt exceeds maximum length",
            Self::InvalidBody => "Invalid JSON body",
            Self::NoMessages => "No messages provided",
            Self::InvalidMessage => "Invalid message format",
            Self::InvalidTaskUid => "Invalid task UID",
            Self::EmptyContext => "No context provided",
            Self::ContextTooLong => "Context exceeds maximum length",
            Self::InvalidContextType => "Invalid context type",
            Self::AdHocRulesTooLong => "Ad-hoc rules exceed maximum length",
            Self::EditorCapabilitiesTooLong => "Editor capabilities exceed maximum length",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

impl crate::error::ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::PromptTooLong => "E_PROMPT_TOO_LONG",
            Self::InvalidBody => "E_INVALID_BODY",
            Self::NoMessages => "E_NO_MESSAGES",
            Self::InvalidMessage => "E_INVALID_MESSAGE",
            Self::InvalidTaskUid => "E_INVALID_TASK_UID",
            Self::EmptyContext => "E_EMPTY_CONTEXT",
            Self::ContextTooLong => "E_CONTEXT_TOO_LONG",
            Self::InvalidContextType => "E_INVALID_CONTEXT_TYPE",
            Self::AdHocRulesTooLong => "E_AD_HOC_RULES_TOO_LONG",
            Self::EditorCapabilitiesTooLong => "E_EDITOR_CAPABILITIES_TOO_LONG",
        }
    }
}

/// Characters stripped by [`trim_blank`]: ASCII space, tab, newline,
/// carriage return, NUL, and vertical tab. Unicode spaces are content.
const BLANK: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

pub(crate) fn trim_blank(s: &str) -> &str {
    s.trim_matches(BLANK)
}

pub(crate) fn is_blank(s: &str) -> bool {
    trim_blank(s).is_empty()
}

/// Length in Unicode codepoints, not bytes.
pub(crate) fn codepoint_len(s: &str) -> usize {
    s.chars().count()
}
