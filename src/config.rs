//! Service configuration parsed from environment variables.
//!
//! Provider credentials live in `llm::config`; this module covers the HTTP
//! listener, the rate limiter, the cache sweeper, and the location of the
//! YAML file that holds LLM configurations and tasks.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 20;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_CONFIG_FILE: &str = "config/cowriter.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self { requests: DEFAULT_RATE_LIMIT_REQUESTS, window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub rate_limit: RateLimitSettings,
    pub cache_sweep_interval: Duration,
    pub config_file: PathBuf,
}

impl AppConfig {
    /// Build typed service config from environment variables.
    ///
    /// All values are optional; unparsable values fall back to defaults.
    /// - `PORT`: default 3000
    /// - `RATE_LIMIT_REQUESTS`: default 20 (values below 1 are raised to 1)
    /// - `RATE_LIMIT_WINDOW_SECS`: default 60 (values below 1 are raised to 1)
    /// - `CACHE_SWEEP_INTERVAL_SECS`: default 60
    /// - `COWRITER_CONFIG_FILE`: default `config/cowriter.yaml`
    #[must_use]
    pub fn from_env() -> Self {
        let rate_limit = RateLimitSettings {
            requests: env_parse("RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS).max(1),
            window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", DEFAULT_RATE_LIMIT_WINDOW_SECS).max(1),
        };
        let sweep_secs = env_parse("CACHE_SWEEP_INTERVAL_SECS", DEFAULT_CACHE_SWEEP_INTERVAL_SECS).max(1);
        let config_file = std::env::var("COWRITER_CONFIG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);

        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            rate_limit,
            cache_sweep_interval: Duration::from_secs(sweep_secs),
            config_file,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
