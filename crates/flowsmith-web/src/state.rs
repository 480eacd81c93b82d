//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  Reviews live in memory for the lifetime of the process;
//! approving or rejecting a review leaves its terminal record in place so
//! repeated requests get a meaningful conflict instead of a 404.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use flowsmith_orchestrator::{BlueprintReview, WorkflowGenerator};

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The orchestration core every request goes through.
    pub generator: Arc<WorkflowGenerator>,

    /// In-flight and settled blueprint reviews, keyed by review id.
    pub reviews: Arc<RwLock<HashMap<Uuid, BlueprintReview>>>,
}

impl AppState {
    /// Build the shared state around an orchestrator.
    pub fn new(generator: Arc<WorkflowGenerator>) -> Self {
        Self {
            generator,
            reviews: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
