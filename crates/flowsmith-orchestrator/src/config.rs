//! Generator configuration.
//!
//! Configuration is an explicitly constructed value injected into the
//! orchestrator at call-site construction, never read ad hoc from global
//! state.  [`GeneratorConfig::from_env`] is the single place that touches
//! the process environment, so tests substitute a literal value instead.

use flowsmith_engine::{LlmClientConfig, LlmProvider};

/// Default Anthropic model when none is configured.
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Default OpenAI model when none is configured.
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Everything the orchestrator needs to decide how a run proceeds.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Credential for the AI provider; absence gates the whole pipeline.
    pub api_key: Option<String>,

    /// Which provider the credential belongs to.
    pub provider: LlmProvider,

    /// Model identifier for the live engine.
    pub model: String,

    /// Use the deterministic mock engine instead of the live one.  Never
    /// overrides a missing credential: no key means the remediation path,
    /// mock or not.
    pub use_mock_data: bool,
}

impl GeneratorConfig {
    /// Configuration for an Anthropic-backed generator.
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            provider: LlmProvider::Anthropic,
            model: DEFAULT_ANTHROPIC_MODEL.into(),
            use_mock_data: false,
        }
    }

    /// Configuration for an OpenAI-backed generator.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            provider: LlmProvider::OpenAI,
            model: DEFAULT_OPENAI_MODEL.into(),
            use_mock_data: false,
        }
    }

    /// Configuration with no credential at all.
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            provider: LlmProvider::Anthropic,
            model: DEFAULT_ANTHROPIC_MODEL.into(),
            use_mock_data: false,
        }
    }

    /// Enable or disable mock data.
    pub fn with_mock_data(mut self, use_mock_data: bool) -> Self {
        self.use_mock_data = use_mock_data;
        self
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `ANTHROPIC_API_KEY` (preferred) or `OPENAI_API_KEY`, plus
    /// `FLOWSMITH_MODEL` and `FLOWSMITH_USE_MOCK_DATA`.
    pub fn from_env() -> Self {
        let mut config = match non_empty_var("ANTHROPIC_API_KEY") {
            Some(key) => Self::anthropic(key),
            None => match non_empty_var("OPENAI_API_KEY") {
                Some(key) => Self::openai(key),
                None => Self::unconfigured(),
            },
        };

        if let Some(model) = non_empty_var("FLOWSMITH_MODEL") {
            config.model = model;
        }

        config.use_mock_data = non_empty_var("FLOWSMITH_USE_MOCK_DATA")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        config
    }

    /// True iff a usable credential is present.
    pub fn ai_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The LLM client configuration for the live engine, when available.
    pub fn llm_config(&self) -> Option<LlmClientConfig> {
        let key = self.api_key.clone().filter(|k| !k.is_empty())?;
        Some(match self.provider {
            LlmProvider::Anthropic => LlmClientConfig::anthropic(key, self.model.clone()),
            LlmProvider::OpenAI => LlmClientConfig::openai(key, self.model.clone()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
