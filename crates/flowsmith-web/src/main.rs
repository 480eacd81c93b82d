//! Flowsmith server binary.
//!
//! Reads configuration from the environment (and an optional `.env` file),
//! builds the orchestrator, and serves the HTTP API.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use flowsmith_orchestrator::{GeneratorConfig, WorkflowGenerator};
use flowsmith_web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // A missing .env file is fine; the environment itself still applies.
    let _ = dotenvy::dotenv();
    init_tracing("info");

    let generator_config = GeneratorConfig::from_env();
    if !generator_config.ai_available() {
        tracing::warn!(
            "no AI credential configured; generation requests will receive remediation guidance"
        );
    }

    let generator = Arc::new(WorkflowGenerator::from_config(generator_config)?);
    let server = WebServer::new(WebConfig::from_env(), generator);

    tracing::info!(addr = %server.addr(), "flowsmith server ready");
    server.start().await
}

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
