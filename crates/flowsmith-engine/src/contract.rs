//! The seam between the orchestrator and the generation collaborator.
//!
//! The orchestrator never knows *how* nodes are chosen; it holds a
//! [`GenerationEngine`] session for exactly one run and consumes these
//! types.  [`EngineFactory`] produces a fresh session per call; sessions
//! are stateless with respect to prior prompts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use flowsmith_graph::{Node, Workflow, WorkflowProject};

use crate::error::Result;
use crate::progress::ProgressSink;

// ---------------------------------------------------------------------------
// Analysis (blueprint)
// ---------------------------------------------------------------------------

/// The reviewable output of the analysis sub-phase.
///
/// The `blueprint` is the only user-editable field; the rest are advisory
/// and immutable for the lifetime of a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Natural-language description of the proposed workflow.
    pub blueprint: String,

    /// Assumptions the engine made about the prompt.
    #[serde(default)]
    pub assumptions: Vec<String>,

    /// Suggestions the engine offers beyond the literal prompt.
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// A preview of the nodes the engine expects to generate.
    #[serde(default)]
    pub suggested_nodes: Vec<Node>,
}

// ---------------------------------------------------------------------------
// Request / report
// ---------------------------------------------------------------------------

/// What the orchestrator asks an engine session to generate.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user's original prompt.  Never empty; validated upstream.
    pub prompt: String,

    /// An approved (possibly edited) blueprint to generate from, when the
    /// run went through review.
    pub blueprint: Option<String>,
}

impl GenerationRequest {
    /// A direct generation request with no reviewed blueprint.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            blueprint: None,
        }
    }

    /// Attach an approved blueprint as generation context.
    pub fn with_blueprint(mut self, blueprint: impl Into<String>) -> Self {
        self.blueprint = Some(blueprint.into());
        self
    }
}

/// The success-side result of an engine generation call.
///
/// Engine-reported failure is a typed [`crate::EngineError`], not a flag
/// on this struct.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// The generated graph; `None` when the engine produced no workflow on
    /// a nominal success (the envelope builder substitutes the empty
    /// graph).
    pub workflow: Option<Workflow>,

    /// Richer planning output, present only on the heavier path.
    pub project: Option<WorkflowProject>,

    /// Names of the tools the engine invoked while generating.
    pub tools_used: Vec<String>,
}

// ---------------------------------------------------------------------------
// Engine traits
// ---------------------------------------------------------------------------

/// One generation session, scoped to a single orchestrator call.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Produce the reviewable analysis for a prompt, emitting progress as
    /// work proceeds.  Zero progress updates is legal.
    async fn analyze(&self, prompt: &str, progress: &ProgressSink) -> Result<Analysis>;

    /// Generate the workflow graph for a request, emitting progress as
    /// work proceeds.  Implementations must not emit the terminal phase;
    /// the orchestrator owns run completion.
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &ProgressSink,
    ) -> Result<GenerationReport>;
}

/// Produces a fresh engine session per orchestrator call.
pub trait EngineFactory: Send + Sync {
    /// Create a session for one run.
    fn session(&self) -> Box<dyn GenerationEngine>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
