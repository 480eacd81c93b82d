//! Orchestrator error types.
//!
//! Validation and configuration conditions are converted to structured
//! envelopes before they reach a caller; [`OrchestratorError`] covers the
//! paths that legitimately surface as errors (review misuse, internal
//! serialization).

use crate::review::ReviewState;

/// Unified error type for the orchestration core.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// A review transition was attempted from a state that does not allow it.
    #[error("cannot {action} a review in state `{state:?}`")]
    InvalidReviewState {
        state: ReviewState,
        action: &'static str,
    },

    /// An error propagated from the engine crate.
    #[error("engine error: {0}")]
    Engine(#[from] flowsmith_engine::EngineError),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the orchestrator crate.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
