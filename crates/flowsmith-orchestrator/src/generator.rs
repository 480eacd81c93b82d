//! The workflow generator.
//!
//! Owns the full run lifecycle: prompt validation, the configuration gate,
//! one engine session per call, fault classification, and envelope
//! assembly.  A `generate` call never returns an error to its caller; every
//! outcome, including misconfiguration and engine failure, is a well-formed
//! [`Envelope`].

use std::sync::Arc;

use tracing::{info, warn};

use flowsmith_engine::{
    AiEngineFactory, Analysis, EngineError, EngineFactory, GenerationRequest, MockEngineFactory,
    ProgressSink, ProgressUpdate,
};

use crate::classify::{FaultKind, classify};
use crate::config::GeneratorConfig;
use crate::envelope::{self, Envelope, FallbackEnvelope, ValidationFailure};
use crate::error::Result;
use crate::review::ApprovedBlueprint;

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Drives prompt-to-workflow generation end to end.
pub struct WorkflowGenerator {
    config: GeneratorConfig,
    factory: Arc<dyn EngineFactory>,
}

impl WorkflowGenerator {
    /// Build a generator from configuration.
    ///
    /// The mock flag selects the deterministic engine; otherwise the live
    /// engine is built when a credential exists.  Without a credential the
    /// configuration gate short-circuits every run before the factory is
    /// consulted, so the mock factory stands in as an inert placeholder.
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        let factory: Arc<dyn EngineFactory> = if config.use_mock_data {
            Arc::new(MockEngineFactory::new())
        } else {
            match config.llm_config() {
                Some(llm) => Arc::new(AiEngineFactory::new(llm)?),
                None => Arc::new(MockEngineFactory::new()),
            }
        };
        Ok(Self { config, factory })
    }

    /// Build a generator over an explicit engine factory.
    pub fn with_factory(config: GeneratorConfig, factory: Arc<dyn EngineFactory>) -> Self {
        Self { config, factory }
    }

    /// Whether AI-backed generation can proceed at all.
    pub fn ai_available(&self) -> bool {
        self.config.ai_available()
    }

    /// Whether the deterministic mock engine is selected.
    pub fn uses_mock_data(&self) -> bool {
        self.config.use_mock_data
    }

    /// Generate a workflow from a prompt, collecting progress internally.
    pub async fn generate(&self, prompt: &str) -> Envelope {
        self.generate_with_progress(prompt, ProgressSink::new())
            .await
    }

    /// Generate a workflow from a prompt, streaming progress through the
    /// supplied sink.  The sink's recorded trail becomes the envelope's
    /// `progress_updates`.
    pub async fn generate_with_progress(&self, prompt: &str, sink: ProgressSink) -> Envelope {
        let Some(prompt) = valid_prompt(prompt) else {
            return envelope::invalid_prompt().into();
        };
        if !self.config.ai_available() {
            warn!("generation requested without a configured credential");
            return envelope::remediation().into();
        }

        info!(prompt_len = prompt.len(), "starting workflow generation");
        let session = self.factory.session();
        let request = GenerationRequest::new(prompt);

        match session.generate(&request, &sink).await {
            Ok(report) => {
                sink.finish("Workflow generated");
                info!(
                    tools = report.tools_used.len(),
                    "workflow generation complete"
                );
                envelope::build_success(report, sink.trail()).into()
            }
            Err(error) => self.fault_body(error).into(),
        }
    }

    /// Generate from an approved (possibly edited) blueprint.
    ///
    /// The blueprint was validated when its review was created, so the
    /// only gates here are configuration and the engine itself.
    pub async fn generate_from_blueprint(&self, approved: &ApprovedBlueprint) -> Envelope {
        if !self.config.ai_available() {
            warn!("blueprint generation requested without a configured credential");
            return envelope::remediation().into();
        }

        let sink = ProgressSink::new();
        let session = self.factory.session();
        let request =
            GenerationRequest::new(&approved.prompt).with_blueprint(&approved.blueprint);

        match session.generate(&request, &sink).await {
            Ok(report) => {
                sink.finish("Workflow generated");
                envelope::build_success(report, sink.trail()).into()
            }
            Err(error) => self.fault_body(error).into(),
        }
    }

    /// Run the analysis sub-phase only, producing a reviewable blueprint.
    pub async fn analyze(&self, prompt: &str) -> AnalysisOutcome {
        let Some(prompt) = valid_prompt(prompt) else {
            return AnalysisOutcome::Invalid(envelope::invalid_prompt());
        };
        if !self.config.ai_available() {
            return AnalysisOutcome::Fallback(envelope::remediation());
        }

        let sink = ProgressSink::new();
        let session = self.factory.session();
        match session.analyze(prompt, &sink).await {
            Ok(analysis) => AnalysisOutcome::Ready {
                analysis,
                progress_updates: sink.trail(),
            },
            Err(error) => AnalysisOutcome::Fallback(self.fault_body(error)),
        }
    }

    fn fault_body(&self, error: EngineError) -> FallbackEnvelope {
        match classify(&error) {
            FaultKind::Configuration => {
                warn!(%error, "engine fault classified as configuration");
                envelope::remediation()
            }
            FaultKind::Engine => {
                warn!(%error, "engine fault classified as runtime failure");
                envelope::failure(error.to_string(), Some(format!("{error:?}")))
            }
        }
    }
}

/// How an analysis request resolved.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The engine produced a reviewable analysis.
    Ready {
        analysis: Analysis,
        progress_updates: Vec<ProgressUpdate>,
    },
    /// The prompt failed validation.
    Invalid(ValidationFailure),
    /// Configuration or engine fault; same body shapes as generation.
    Fallback(FallbackEnvelope),
}

fn valid_prompt(prompt: &str) -> Option<&str> {
    let trimmed = prompt.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_prompt_is_rejected_without_engine_contact() {
        let generator =
            WorkflowGenerator::from_config(GeneratorConfig::anthropic("sk-test")).unwrap();

        let envelope = generator.generate("   ").await;
        assert!(matches!(envelope, Envelope::Invalid(_)));
    }

    #[tokio::test]
    async fn missing_credential_yields_remediation() {
        let generator =
            WorkflowGenerator::from_config(GeneratorConfig::unconfigured()).unwrap();

        let envelope = generator.generate("notify me about new rows").await;
        assert!(envelope.is_remediation());
    }

    #[tokio::test]
    async fn validation_outranks_the_configuration_gate() {
        let generator =
            WorkflowGenerator::from_config(GeneratorConfig::unconfigured()).unwrap();

        let envelope = generator.generate("").await;
        assert!(matches!(envelope, Envelope::Invalid(_)));
    }

    #[tokio::test]
    async fn mock_engine_generates_a_complete_envelope() {
        let config = GeneratorConfig::anthropic("sk-test").with_mock_data(true);
        let generator = WorkflowGenerator::from_config(config).unwrap();

        let envelope = generator
            .generate("send me a Slack message when a new row is added to my spreadsheet")
            .await;

        let Envelope::Success(body) = envelope else {
            panic!("expected success envelope");
        };
        assert!(body.success);
        assert!(body.execution_ready);
        assert_eq!(body.workflow.nodes.len(), 2);
        assert_eq!(body.workflow.edges.len(), 1);
        assert!(!body.progress_updates.is_empty());

        // Terminal update is owned by the orchestrator and comes last.
        let last = body.progress_updates.last().unwrap();
        assert_eq!(last.percentage, 100);
    }

    #[tokio::test]
    async fn mock_analysis_produces_a_reviewable_blueprint() {
        let config = GeneratorConfig::anthropic("sk-test").with_mock_data(true);
        let generator = WorkflowGenerator::from_config(config).unwrap();

        let outcome = generator.analyze("email me every day at 9am").await;
        let AnalysisOutcome::Ready { analysis, .. } = outcome else {
            panic!("expected a ready analysis");
        };
        assert!(!analysis.blueprint.is_empty());
    }

    #[tokio::test]
    async fn analyze_without_credential_yields_fallback() {
        let generator =
            WorkflowGenerator::from_config(GeneratorConfig::unconfigured()).unwrap();

        let outcome = generator.analyze("notify me").await;
        assert!(matches!(outcome, AnalysisOutcome::Fallback(_)));
    }
}
