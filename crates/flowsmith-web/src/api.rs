//! REST API route handlers.
//!
//! Every generation outcome travels as a structured JSON body.  The
//! transport status encodes only the outcome class:
//!
//! - 400 for prompt validation failures (nothing ran);
//! - 200 for success and for the remediation body (a missing credential is
//!   an accepted request, not a failed one);
//! - 500 for runtime engine failures.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use flowsmith_engine::{Analysis, ProgressUpdate};
use flowsmith_orchestrator::{
    AnalysisOutcome, BlueprintReview, Envelope, FallbackKind, OrchestratorError, ReviewState,
};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Envelope to response mapping
// ---------------------------------------------------------------------------

fn envelope_response(envelope: Envelope) -> Response {
    let status = match &envelope {
        Envelope::Invalid(_) => StatusCode::BAD_REQUEST,
        Envelope::Success(_) => StatusCode::OK,
        Envelope::Fallback(body) if body.kind == FallbackKind::RuntimeFailure => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Envelope::Fallback(_) => StatusCode::OK,
    };
    (status, Json(envelope)).into_response()
}

// ---------------------------------------------------------------------------
// POST /api/generate
// ---------------------------------------------------------------------------

/// Request payload for one-shot generation.
#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Generate a workflow directly from a prompt, skipping review.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    envelope_response(state.generator.generate(&request.prompt).await)
}

// ---------------------------------------------------------------------------
// POST /api/analyze
// ---------------------------------------------------------------------------

/// Response payload when analysis produced a reviewable blueprint.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub review_id: Uuid,
    pub state: ReviewState,
    pub analysis: Analysis,
    pub progress_updates: Vec<ProgressUpdate>,
}

/// Produce a reviewable analysis and open a review for it.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match state.generator.analyze(&request.prompt).await {
        AnalysisOutcome::Ready {
            analysis,
            progress_updates,
        } => {
            let review = BlueprintReview::new(&request.prompt, analysis.clone());
            let review_id = review.id();
            let review_state = review.state();
            state.reviews.write().await.insert(review_id, review);

            tracing::info!(%review_id, "opened blueprint review");
            (
                StatusCode::OK,
                Json(AnalyzeResponse {
                    review_id,
                    state: review_state,
                    analysis,
                    progress_updates,
                }),
            )
                .into_response()
        }
        AnalysisOutcome::Invalid(body) => envelope_response(Envelope::from(body)),
        AnalysisOutcome::Fallback(body) => envelope_response(Envelope::from(body)),
    }
}

// ---------------------------------------------------------------------------
// Review lifecycle
// ---------------------------------------------------------------------------

/// Request payload for editing a review's blueprint draft.
#[derive(Deserialize)]
pub struct EditRequest {
    pub blueprint: String,
}

/// Summary of a review returned by the lifecycle endpoints.
#[derive(Serialize)]
pub struct ReviewSummary {
    pub review_id: Uuid,
    pub state: ReviewState,
    pub blueprint: String,
}

fn review_summary(review: &BlueprintReview) -> ReviewSummary {
    ReviewSummary {
        review_id: review.id(),
        state: review.state(),
        blueprint: review.blueprint().to_owned(),
    }
}

fn review_not_found(id: Uuid) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("no review with id {id}") })),
    )
        .into_response()
}

fn review_conflict(error: OrchestratorError) -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Replace a review's blueprint draft.
pub async fn edit_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditRequest>,
) -> Response {
    let mut reviews = state.reviews.write().await;
    let Some(review) = reviews.get_mut(&id) else {
        return review_not_found(id);
    };
    match review.edit(request.blueprint) {
        Ok(()) => (StatusCode::OK, Json(review_summary(review))).into_response(),
        Err(error) => review_conflict(error),
    }
}

/// Approve a review and generate the final workflow from its blueprint.
pub async fn approve_review(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    // Settle the review under the lock, then generate without holding it.
    let approved = {
        let mut reviews = state.reviews.write().await;
        let Some(review) = reviews.get_mut(&id) else {
            return review_not_found(id);
        };
        match review.approve() {
            Ok(approved) => approved,
            Err(error) => return review_conflict(error),
        }
    };

    envelope_response(state.generator.generate_from_blueprint(&approved).await)
}

/// Reject a review.  No workflow is produced; the caller starts over.
pub async fn reject_review(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let mut reviews = state.reviews.write().await;
    let Some(review) = reviews.get_mut(&id) else {
        return review_not_found(id);
    };
    match review.reject() {
        Ok(()) => (StatusCode::OK, Json(review_summary(review))).into_response(),
        Err(error) => review_conflict(error),
    }
}

/// Fetch a review's current state and draft.
pub async fn get_review(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let reviews = state.reviews.read().await;
    match reviews.get(&id) {
        Some(review) => (StatusCode::OK, Json(review_summary(review))).into_response(),
        None => review_not_found(id),
    }
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ai_available: bool,
    pub mock_data: bool,
    pub open_reviews: usize,
}

/// Return a liveness and configuration summary.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let open_reviews = state.reviews.read().await.len();
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ai_available: state.generator.ai_available(),
        mock_data: state.generator.uses_mock_data(),
        open_reviews,
    })
}
