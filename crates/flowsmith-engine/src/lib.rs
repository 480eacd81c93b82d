//! Generation engine contract for Flowsmith.
//!
//! This crate defines everything the orchestrator consumes from the
//! AI-backed generation collaborator, plus two implementations:
//!
//! - [`phase`] -- the canonical generation [`Phase`] enumeration and its
//!   presentation-layer [`LoadingStage`] mapping.
//! - [`progress`] -- the ordered progress channel: [`ProgressSink`] records
//!   the run-owned trail and forwards to at most one observer.
//! - [`contract`] -- the [`GenerationEngine`] / [`EngineFactory`] traits and
//!   the request/report/analysis types that cross the seam.
//! - [`client`] -- a multi-provider LLM client (Anthropic Messages API and
//!   OpenAI Chat Completions).
//! - [`ai`] -- the live engine: analysis and generation calls against the
//!   LLM client with fence-tolerant JSON parsing.
//! - [`mock`] -- a deterministic keyword-driven engine for local
//!   development and tests.

pub mod ai;
pub mod client;
pub mod contract;
pub mod error;
pub mod mock;
pub mod phase;
pub mod progress;

pub use ai::{AiEngine, AiEngineFactory};
pub use client::{LlmClient, LlmClientConfig, LlmProvider};
pub use contract::{
    Analysis, EngineFactory, GenerationEngine, GenerationReport, GenerationRequest,
};
pub use error::{EngineError, Result};
pub use mock::{MockEngine, MockEngineFactory};
pub use phase::{LoadingStage, Phase};
pub use progress::{ProgressSink, ProgressUpdate};
