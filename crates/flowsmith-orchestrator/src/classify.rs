//! Fault classification.
//!
//! Configuration faults (missing or rejected credential) map to the
//! remediation envelope; everything else is an engine fault and maps to the
//! fallback-error envelope.  Typed [`EngineError`] variants decide most
//! cases; the text heuristic exists only for engine variants that hand back
//! free text, and lives behind one function so it stays easy to update and
//! test in isolation.

use flowsmith_engine::EngineError;

/// How a fault should be surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Missing or rejected credential; remediation, not failure.
    Configuration,
    /// Transient or technical engine failure.
    Engine,
}

/// Classify an engine fault.
pub fn classify(error: &EngineError) -> FaultKind {
    match error {
        EngineError::MissingApiKey { .. } | EngineError::AuthRejected { .. } => {
            FaultKind::Configuration
        }
        EngineError::Reported { message } if looks_like_credential_failure(message) => {
            FaultKind::Configuration
        }
        EngineError::RequestFailed { reason } if looks_like_credential_failure(reason) => {
            FaultKind::Configuration
        }
        _ => FaultKind::Engine,
    }
}

/// Heuristic for credential failures reported only as text.
pub fn looks_like_credential_failure(text: &str) -> bool {
    const PATTERNS: &[&str] = &[
        "api key",
        "api-key",
        "api_key",
        "credential",
        "unauthorized",
        "authentication",
        "invalid key",
    ];

    let lowered = text.to_lowercase();
    PATTERNS.iter().any(|p| lowered.contains(p))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_credential_faults_classify_as_configuration() {
        let missing = EngineError::MissingApiKey {
            provider: "anthropic".into(),
        };
        let rejected = EngineError::AuthRejected {
            provider: "openai".into(),
            status: 401,
        };

        assert_eq!(classify(&missing), FaultKind::Configuration);
        assert_eq!(classify(&rejected), FaultKind::Configuration);
    }

    #[test]
    fn reported_credential_text_classifies_as_configuration() {
        let error = EngineError::Reported {
            message: "upstream says: invalid API key supplied".into(),
        };
        assert_eq!(classify(&error), FaultKind::Configuration);
    }

    #[test]
    fn other_faults_classify_as_engine() {
        let timeout = EngineError::RequestFailed {
            reason: "connection timed out".into(),
        };
        let parse = EngineError::ParseFailed {
            reason: "missing `content` array".into(),
        };
        let reported = EngineError::Reported {
            message: "tool execution failed".into(),
        };

        assert_eq!(classify(&timeout), FaultKind::Engine);
        assert_eq!(classify(&parse), FaultKind::Engine);
        assert_eq!(classify(&reported), FaultKind::Engine);
    }

    #[test]
    fn heuristic_matches_known_patterns() {
        assert!(looks_like_credential_failure("Missing API key"));
        assert!(looks_like_credential_failure("401 Unauthorized"));
        assert!(looks_like_credential_failure("bad credential material"));
        assert!(!looks_like_credential_failure("model produced invalid JSON"));
        assert!(!looks_like_credential_failure("connection reset by peer"));
    }
}
