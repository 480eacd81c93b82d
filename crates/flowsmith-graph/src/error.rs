//! Graph error types.

/// Unified error type for the graph crate.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node kind string did not match any known kind.
    #[error("unknown node kind: `{kind}`")]
    UnknownNodeKind { kind: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the graph crate.
pub type Result<T> = std::result::Result<T, GraphError>;
