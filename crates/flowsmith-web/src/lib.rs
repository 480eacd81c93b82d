//! HTTP interface for Flowsmith.
//!
//! Exposes the orchestration core over a JSON REST API:
//!
//! - `POST /api/generate` for one-shot prompt-to-workflow generation.
//! - `POST /api/analyze` to produce a reviewable blueprint.
//! - `POST /api/reviews/{id}/edit|approve|reject` for the review lifecycle.
//! - `GET /api/status` for a liveness and configuration summary.
//!
//! Every generation outcome is a structured body; the transport status
//! encodes the outcome class (400 validation, 200 success or remediation,
//! 500 runtime failure).

pub mod api;
pub mod server;
pub mod state;

pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl WebConfig {
    /// Resolve the bind address and port from `FLOWSMITH_BIND_ADDR` and
    /// `FLOWSMITH_PORT`, keeping the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("FLOWSMITH_BIND_ADDR") {
            if !addr.trim().is_empty() {
                config.bind_addr = addr;
            }
        }
        if let Some(port) = std::env::var("FLOWSMITH_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            config.port = port;
        }
        config
    }
}
