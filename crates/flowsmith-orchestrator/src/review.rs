//! Blueprint review state machine.
//!
//! Holds an engine-produced [`Analysis`] while the user decides whether to
//! commit to final generation.  Only the blueprint text is editable; the
//! advisory fields (assumptions, recommendations, suggested nodes) are
//! immutable for the review's lifetime.  `Approved` and `Rejected` are
//! terminal: a new review is created for a new prompt, never by reviving
//! an old one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use flowsmith_engine::Analysis;

use crate::error::{OrchestratorError, Result};

// ---------------------------------------------------------------------------
// Review state
// ---------------------------------------------------------------------------

/// Where a review is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// The analysis is displayed, untouched.
    Proposed,
    /// The user is editing the blueprint draft.
    Editing,
    /// The review was committed to generation.  Terminal.
    Approved,
    /// The analysis was discarded.  Terminal.
    Rejected,
}

impl ReviewState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// The blueprint text a review handed to final generation on approval.
#[derive(Debug, Clone)]
pub struct ApprovedBlueprint {
    /// The prompt the analysis was produced for.
    pub prompt: String,

    /// The currently displayed blueprint, original or edited.
    pub blueprint: String,
}

/// One analysis under review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintReview {
    id: Uuid,
    prompt: String,
    analysis: Analysis,
    /// The blueprint text currently displayed; starts as the analysis
    /// blueprint and diverges once edited.
    draft: String,
    state: ReviewState,
    created_at: DateTime<Utc>,
}

impl BlueprintReview {
    /// Start a review for a freshly produced analysis.
    pub fn new(prompt: impl Into<String>, analysis: Analysis) -> Self {
        let draft = analysis.blueprint.clone();
        Self {
            id: Uuid::now_v7(),
            prompt: prompt.into(),
            analysis,
            draft,
            state: ReviewState::Proposed,
            created_at: Utc::now(),
        }
    }

    /// The review's identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The prompt the analysis answers.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The immutable advisory analysis.
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// The blueprint text currently displayed.
    pub fn blueprint(&self) -> &str {
        &self.draft
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReviewState {
        self.state
    }

    /// When the review was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the blueprint draft.  Enters (or stays in) `Editing`;
    /// re-editing is idempotent with respect to state.
    pub fn edit(&mut self, new_text: impl Into<String>) -> Result<()> {
        if self.state.is_terminal() {
            return Err(OrchestratorError::InvalidReviewState {
                state: self.state,
                action: "edit",
            });
        }
        self.draft = new_text.into();
        self.state = ReviewState::Editing;
        Ok(())
    }

    /// Commit the review.  The currently displayed blueprint (original or
    /// edited) is the one forwarded to final generation.
    pub fn approve(&mut self) -> Result<ApprovedBlueprint> {
        if self.state.is_terminal() {
            return Err(OrchestratorError::InvalidReviewState {
                state: self.state,
                action: "approve",
            });
        }
        self.state = ReviewState::Approved;
        info!(review_id = %self.id, "blueprint approved");
        Ok(ApprovedBlueprint {
            prompt: self.prompt.clone(),
            blueprint: self.draft.clone(),
        })
    }

    /// Discard the analysis.  The caller restarts from prompt entry; no
    /// partial workflow is produced.
    pub fn reject(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(OrchestratorError::InvalidReviewState {
                state: self.state,
                action: "reject",
            });
        }
        self.state = ReviewState::Rejected;
        info!(review_id = %self.id, "blueprint rejected");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> Analysis {
        Analysis {
            blueprint: "Watch the sheet, post to Slack".into(),
            assumptions: vec!["The sheet is shared".into()],
            recommendations: vec![],
            suggested_nodes: vec![],
        }
    }

    #[test]
    fn new_review_starts_proposed_with_original_draft() {
        let review = BlueprintReview::new("notify me", sample_analysis());
        assert_eq!(review.state(), ReviewState::Proposed);
        assert_eq!(review.blueprint(), "Watch the sheet, post to Slack");
    }

    #[test]
    fn approve_without_edit_forwards_original_text() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        let approved = review.approve().unwrap();

        assert_eq!(approved.blueprint, "Watch the sheet, post to Slack");
        assert_eq!(approved.prompt, "notify me");
        assert_eq!(review.state(), ReviewState::Approved);
    }

    #[test]
    fn edit_then_approve_forwards_edited_text() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        review.edit("new text").unwrap();
        let approved = review.approve().unwrap();

        assert_eq!(approved.blueprint, "new text");
    }

    #[test]
    fn edit_is_idempotent_on_state_and_keeps_latest_draft() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        review.edit("first pass").unwrap();
        assert_eq!(review.state(), ReviewState::Editing);

        review.edit("second pass").unwrap();
        assert_eq!(review.state(), ReviewState::Editing);
        assert_eq!(review.blueprint(), "second pass");
    }

    #[test]
    fn edit_does_not_touch_advisory_fields() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        review.edit("rewritten").unwrap();

        assert_eq!(review.analysis().assumptions.len(), 1);
        assert_eq!(
            review.analysis().blueprint,
            "Watch the sheet, post to Slack"
        );
    }

    #[test]
    fn reject_is_terminal() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        review.reject().unwrap();

        assert_eq!(review.state(), ReviewState::Rejected);
        assert!(review.approve().is_err());
        assert!(review.edit("too late").is_err());
        assert!(review.reject().is_err());
    }

    #[test]
    fn approve_is_terminal() {
        let mut review = BlueprintReview::new("notify me", sample_analysis());
        review.approve().unwrap();

        assert!(review.approve().is_err());
        assert!(review.edit("too late").is_err());
    }
}
