mod config;
mod errors;
mod interview;
mod llm_client;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::model::MAX_ROUNDS;
use crate::interview::view::MISSING_API_KEY_WARNING;
use crate::llm_client::{LlmClient, GEMINI_MODEL, QWEN_MODEL};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    if config.llm_enabled() {
        info!(
            "LLM client initialized (endpoint: {}, models: {GEMINI_MODEL}, {QWEN_MODEL})",
            config.openrouter_base_url
        );
    } else {
        error!("{MISSING_API_KEY_WARNING}");
    }
    info!("Interviews run for {MAX_ROUNDS} rounds");

    let state = AppState::new(config.clone(), Arc::new(llm));
    state
        .sessions
        .spawn_idle_eviction(Duration::from_secs(config.session_idle_secs));
    info!("Idle sessions expire after {}s", config.session_idle_secs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
