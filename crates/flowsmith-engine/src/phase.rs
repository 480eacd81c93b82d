//! Generation phases.
//!
//! One canonical [`Phase`] enumeration drives progress reporting; the
//! coarser [`LoadingStage`] vocabulary used by loading indicators is a pure
//! presentation mapping over it, so the two lists cannot drift apart.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Canonical phases
// ---------------------------------------------------------------------------

/// The linear phases of one generation run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Understanding the prompt and identifying the automation intent.
    Discovery,
    /// Looking up candidate integrations and capabilities.
    Research,
    /// Wiring integrations and connection details.
    Integration,
    /// Producing the workflow graph itself.
    Generation,
    /// Terminal phase; reported at most once, last.
    Complete,
}

impl Phase {
    /// The canonical lowercase name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Research => "research",
            Self::Integration => "integration",
            Self::Generation => "generation",
            Self::Complete => "complete",
        }
    }

    /// The nominal progress percentage a run reaches in this phase.
    pub fn default_percentage(&self) -> u8 {
        match self {
            Self::Discovery => 10,
            Self::Research => 35,
            Self::Integration => 60,
            Self::Generation => 85,
            Self::Complete => 100,
        }
    }

    /// True for the terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Presentation mapping
// ---------------------------------------------------------------------------

/// The coarser phase vocabulary loading indicators display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStage {
    /// Reading and interpreting the prompt.
    Analyzing,
    /// Choosing the approach and integrations.
    Planning,
    /// Building the workflow.
    Generating,
    /// Finalizing connections.
    Connecting,
}

impl From<Phase> for LoadingStage {
    /// Map a canonical phase onto the four-stage display vocabulary.
    ///
    /// The mapping follows the linear progress value, not the phase names:
    /// the terminal phase displays as the final "connecting" stage because
    /// the indicator is being torn down at that point.
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Discovery => Self::Analyzing,
            Phase::Research => Self::Planning,
            Phase::Integration | Phase::Generation => Self::Generating,
            Phase::Complete => Self::Connecting,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Discovery < Phase::Research);
        assert!(Phase::Research < Phase::Integration);
        assert!(Phase::Integration < Phase::Generation);
        assert!(Phase::Generation < Phase::Complete);
    }

    #[test]
    fn default_percentages_are_non_decreasing() {
        let phases = [
            Phase::Discovery,
            Phase::Research,
            Phase::Integration,
            Phase::Generation,
            Phase::Complete,
        ];
        for pair in phases.windows(2) {
            assert!(pair[0].default_percentage() <= pair[1].default_percentage());
        }
    }

    #[test]
    fn only_complete_is_terminal() {
        assert!(Phase::Complete.is_terminal());
        assert!(!Phase::Generation.is_terminal());
    }

    #[test]
    fn phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Discovery).unwrap();
        assert_eq!(json, "\"discovery\"");
    }

    #[test]
    fn every_phase_maps_to_a_loading_stage() {
        assert_eq!(LoadingStage::from(Phase::Discovery), LoadingStage::Analyzing);
        assert_eq!(LoadingStage::from(Phase::Research), LoadingStage::Planning);
        assert_eq!(
            LoadingStage::from(Phase::Integration),
            LoadingStage::Generating
        );
        assert_eq!(
            LoadingStage::from(Phase::Generation),
            LoadingStage::Generating
        );
        assert_eq!(LoadingStage::from(Phase::Complete), LoadingStage::Connecting);
    }
}
