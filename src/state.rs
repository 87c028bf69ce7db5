//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is cloned into every axum handler. All members are cheap to
//! clone: trait objects behind `Arc`, and a `RateLimiter` that itself holds
//! an `Arc` to the window cache. Nothing here is mutated after startup
//! except the cache contents.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::rate_limit::RateLimiter;
use crate::repository::{ConfigurationRepository, Repositories, TaskRepository};

#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub configurations: Arc<dyn ConfigurationRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    /// Per-user sliding-window limiter for AI requests.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, repositories: Repositories, rate_limiter: RateLimiter) -> Self {
        Self {
            llm,
            configurations: Arc::new(repositories.configurations),
            tasks: Arc::new(repositories.tasks),
            rate_limiter,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
