//! Engine error types.
//!
//! All engine implementations surface failures through [`EngineError`].
//! The variants are typed so the orchestrator can classify faults without
//! scanning message text; [`EngineError::Reported`] exists for engine
//! variants that only hand back free text.

/// Unified error type for generation engines.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // -- Configuration faults ------------------------------------------------
    /// No credential is configured for the provider.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    /// The provider rejected the configured credential.
    #[error("credential rejected by {provider} (status {status})")]
    AuthRejected { provider: String, status: u16 },

    // -- Transport / protocol faults -----------------------------------------
    /// An HTTP request to the provider failed.
    #[error("engine request failed: {reason}")]
    RequestFailed { reason: String },

    /// The engine output could not be parsed into the expected shape.
    #[error("engine response parse error: {reason}")]
    ParseFailed { reason: String },

    /// The engine ran but reported a failure in its own result, with only
    /// free text to explain it.
    #[error("engine reported failure: {message}")]
    Reported { message: String },

    // -- Serialization -------------------------------------------------------
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}
