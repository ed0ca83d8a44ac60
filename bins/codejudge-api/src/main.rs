mod compiler;
mod error;
mod handlers;
mod llm;
mod prompt;
mod routes;

use anyhow::Context;
use codejudge_common::config::{CompilerConfig, Config, ReviewConfig};
use compiler::CompilerClient;
use llm::ReviewClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub struct AppState {
    pub compiler: CompilerClient,
    pub review: ReviewClient,
}

impl AppState {
    /// Both clients share one connection pool
    pub fn new(http: reqwest::Client, compiler: CompilerConfig, review: ReviewConfig) -> Self {
        Self {
            compiler: CompilerClient::new(http.clone(), compiler),
            review: ReviewClient::new(http, review),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .with_target(false)
        .init();

    info!("CodeJudge API booting...");

    let config = Config::from_env().context("Failed to load configuration")?;

    if !config.compiler.has_credentials() {
        warn!("RAPIDAPI_KEY is not set; /run calls will be rejected upstream");
    }
    if !config.review.has_credentials() {
        warn!("GROQ_API_KEY is not set; /review calls will be rejected upstream");
    }
    info!(url = %config.compiler.url, "Execution API configured");
    info!(url = %config.review.url, model = %config.review.model, "Review API configured");

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(http, config.compiler, config.review));

    // Build router
    let app = routes::build_router(state);

    // Start server
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
