//! Domain services used by the ajax routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, configuration resolution, and the LLM
//! call so route handlers stay focused on HTTP translation, caller identity,
//! and rate-limit headers.

pub mod completion;
pub mod task;
