//! Web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and starts
//! the HTTP listener.

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use flowsmith_orchestrator::WorkflowGenerator;

use crate::WebConfig;
use crate::api;
use crate::state::AppState;

/// The Flowsmith HTTP server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server around an orchestrator.
    pub fn new(config: WebConfig, generator: Arc<WorkflowGenerator>) -> Self {
        let state = Arc::new(AppState::new(generator));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        Router::new()
            .route("/api/status", get(api::status))
            .route("/api/generate", post(api::generate))
            .route("/api/analyze", post(api::analyze))
            // Review lifecycle.
            .route("/api/reviews/{id}", get(api::get_review))
            .route("/api/reviews/{id}/edit", post(api::edit_review))
            .route("/api/reviews/{id}/approve", post(api::approve_review))
            .route("/api/reviews/{id}/reject", post(api::reject_review))
            .layer(cors)
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let router = self.router();

        tracing::info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
