//! Result envelopes.
//!
//! Every `generate` call resolves to exactly one envelope: success,
//! remediation (missing configuration), runtime failure, or validation
//! failure.  The shapes are uniform JSON so callers never need an
//! exception path; the remediation and failure bodies differ only in the
//! cause they imply and the transport status the web layer picks.

use serde::Serialize;

use flowsmith_engine::{GenerationReport, ProgressUpdate};
use flowsmith_graph::{NodeKind, Workflow, WorkflowProject};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The single response type of a generation run.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    /// AI-backed generation completed.
    Success(SuccessEnvelope),
    /// Generation did not happen; the body says why and what to do.
    Fallback(FallbackEnvelope),
    /// The prompt failed validation; nothing ran.
    Invalid(ValidationFailure),
}

impl Envelope {
    /// True for the success shape.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for the missing-configuration shape (accepted, not failed).
    pub fn is_remediation(&self) -> bool {
        matches!(
            self,
            Self::Fallback(FallbackEnvelope {
                kind: FallbackKind::MissingConfiguration,
                ..
            })
        )
    }

    /// True for the runtime-failure shape.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Fallback(FallbackEnvelope {
                kind: FallbackKind::RuntimeFailure,
                ..
            })
        )
    }
}

/// The success-path response body.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,

    /// Short celebratory narrative.  Advisory text only.
    pub enthusiasm: String,

    /// One-line technical recap, including any repair degradation.
    pub technical_summary: String,

    /// The generated graph; never absent on a success (empty by default).
    pub workflow: Workflow,

    /// Richer planning output when the heavier path produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<WorkflowProject>,

    /// Observations derived from the generated graph.
    pub insights: Vec<String>,

    /// Set only when the success path completed.
    pub execution_ready: bool,

    /// The full progress trail, in emission order.
    pub progress_updates: Vec<ProgressUpdate>,
}

/// Distinguishes the two fallback causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// No usable credential; an environmental condition, not an error.
    MissingConfiguration,
    /// The engine ran (or was reached) and failed.
    RuntimeFailure,
}

/// The response body when AI-backed generation did not occur.
#[derive(Debug, Serialize)]
pub struct FallbackEnvelope {
    pub error: String,
    pub fallback: bool,
    pub message: String,

    /// Diagnostic detail, present only on runtime failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,

    /// Ordered, actionable steps for the user.
    pub instructions: Vec<String>,

    /// Cause discriminator; drives the transport status, not the body.
    #[serde(skip)]
    pub kind: FallbackKind,
}

/// The response body for an empty or missing prompt.
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Assemble the success body from a raw engine report.
///
/// The workflow always goes through the repair pass first; if the engine
/// returned no workflow on a nominal success, the empty graph stands in.
pub fn build_success(
    report: GenerationReport,
    progress_updates: Vec<ProgressUpdate>,
) -> SuccessEnvelope {
    let mut workflow = report.workflow.unwrap_or_else(Workflow::empty);
    let repair = workflow.repair();

    let mut technical_summary = format!(
        "Generated {} node(s) and {} edge(s) using {} tool(s)",
        workflow.nodes.len(),
        workflow.edges.len(),
        report.tools_used.len(),
    );
    if repair.degraded() {
        technical_summary.push_str(&format!("; graph repaired: {repair}"));
    }

    let enthusiasm = if workflow.is_empty() {
        "Your request went through, though no workflow steps came back this time.".to_owned()
    } else {
        format!(
            "Your automation is ready! {} step(s) wired together and waiting.",
            workflow.nodes.len()
        )
    };

    SuccessEnvelope {
        success: true,
        enthusiasm,
        technical_summary,
        insights: derive_insights(&workflow, report.project.as_ref()),
        workflow,
        project: report.project,
        execution_ready: true,
        progress_updates,
    }
}

/// The remediation body for a missing credential.  Never varies per run;
/// the instructions are ordered setup steps.
pub fn remediation() -> FallbackEnvelope {
    FallbackEnvelope {
        error: "AI generation is not configured".into(),
        fallback: true,
        message: "No AI credential was found, so the workflow was not generated. \
                  Follow the steps below and try again."
            .into(),
        error_details: None,
        instructions: vec![
            "Set ANTHROPIC_API_KEY (or OPENAI_API_KEY) in your environment or .env file".into(),
            "Restart the Flowsmith server so the credential is picked up".into(),
            "Optionally set FLOWSMITH_USE_MOCK_DATA=true to explore with synthetic workflows"
                .into(),
        ],
        kind: FallbackKind::MissingConfiguration,
    }
}

/// The fallback-error body for a runtime engine failure.  Preserves the
/// original error text for diagnostics.
pub fn failure(error: String, error_details: Option<String>) -> FallbackEnvelope {
    let error = if error.trim().is_empty() {
        "workflow generation failed for an unknown reason".to_owned()
    } else {
        error
    };

    FallbackEnvelope {
        error,
        fallback: true,
        message: "Workflow generation hit a technical problem. This is usually transient.".into(),
        error_details,
        instructions: vec![
            "Try the same prompt again in a moment".into(),
            "If it keeps failing, simplify or rephrase the prompt".into(),
            "Check the AI provider's status page for ongoing incidents".into(),
        ],
        kind: FallbackKind::RuntimeFailure,
    }
}

/// The validation-failure body for an empty prompt.
pub fn invalid_prompt() -> ValidationFailure {
    ValidationFailure {
        error: "prompt must not be empty".into(),
    }
}

impl From<SuccessEnvelope> for Envelope {
    fn from(body: SuccessEnvelope) -> Self {
        Self::Success(body)
    }
}

impl From<FallbackEnvelope> for Envelope {
    fn from(body: FallbackEnvelope) -> Self {
        Self::Fallback(body)
    }
}

impl From<ValidationFailure> for Envelope {
    fn from(body: ValidationFailure) -> Self {
        Self::Invalid(body)
    }
}

fn derive_insights(workflow: &Workflow, project: Option<&WorkflowProject>) -> Vec<String> {
    let mut insights = Vec::new();

    if !workflow.nodes.is_empty() {
        let count = |kind: NodeKind| workflow.nodes.iter().filter(|n| n.kind == kind).count();
        insights.push(format!(
            "{} trigger(s), {} action(s), {} condition(s), {} transform(s)",
            count(NodeKind::Trigger),
            count(NodeKind::Action),
            count(NodeKind::Condition),
            count(NodeKind::Transform),
        ));
    }

    if let Some(project) = project {
        if !project.integrations.is_empty() {
            let names: Vec<&str> = project
                .integrations
                .iter()
                .map(|i| i.name.as_str())
                .collect();
            insights.push(format!("Connects to: {}", names.join(", ")));
        }
        if !project.test_suite.is_empty() {
            insights.push(format!(
                "{} suggested test(s) included",
                project.test_suite.len()
            ));
        }
    }

    insights
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
