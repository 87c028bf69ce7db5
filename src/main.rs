mod cache;
mod config;
mod dto;
mod error;
mod llm;
mod rate_limit;
mod repository;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env();

    let repositories = repository::Repositories::load(&config.config_file).expect("cowriter config file invalid");

    // Initialize LLM client (non-fatal: AI endpoints answer 503 if config missing).
    let llm: Option<Arc<dyn llm::LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), provider = client.provider(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI endpoints disabled");
            None
        }
    };

    let cache = cache::MemoryCache::new();
    let _sweeper = cache::spawn_sweeper(cache.clone(), config.cache_sweep_interval);
    let rate_limiter = rate_limit::RateLimiter::new(Arc::new(cache), config.rate_limit);
    tracing::info!(
        requests = config.rate_limit.requests,
        window_secs = config.rate_limit.window_secs,
        "rate limiter configured"
    );

    let state = state::AppState::new(llm, repositories, rate_limiter);
    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "cowriter listening");
    axum::serve(listener, app).await.expect("server failed");
}
