//! Generation orchestration core for Flowsmith.
//!
//! This crate drives the end-to-end pipeline that turns one free-text
//! prompt into a reviewable blueprint and a final workflow graph:
//!
//! ```text
//! ┌────────┐    ┌───────────────┐    ┌────────────────┐    ┌──────────┐
//! │ Prompt │───>│ Config gate   │───>│ Engine session │───>│ Envelope │
//! │        │    │ (credential?) │    │ (progress out) │    │ builder  │
//! └────────┘    └───────────────┘    └───────┬────────┘    └──────────┘
//!                                            │
//!                                   ┌────────┴────────┐
//!                                   │ Blueprint review│
//!                                   │ (approve/edit/  │
//!                                   │  reject)        │
//!                                   └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] -- explicitly constructed generator configuration.
//! - [`classify`] -- fault classification (configuration vs engine).
//! - [`review`] -- the blueprint review state machine.
//! - [`envelope`] -- the uniform response envelopes callers receive.
//! - [`generator`] -- the orchestrator itself.
//! - [`error`] -- orchestrator error types.

pub mod classify;
pub mod config;
pub mod envelope;
pub mod error;
pub mod generator;
pub mod review;

pub use classify::{FaultKind, classify, looks_like_credential_failure};
pub use config::GeneratorConfig;
pub use envelope::{Envelope, FallbackEnvelope, FallbackKind, SuccessEnvelope, ValidationFailure};
pub use error::{OrchestratorError, Result};
pub use generator::{AnalysisOutcome, WorkflowGenerator};
pub use review::{ApprovedBlueprint, BlueprintReview, ReviewState};
