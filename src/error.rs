//! Shared error-code contract.
//!
//! Every error enum in the service reports a grepable `E_*` code and whether
//! a client may retry. Routes log the code next to the message so operators
//! can search for failures without parsing free text.

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
