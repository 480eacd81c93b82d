//! The live AI-backed generation engine.
//!
//! Drives two LLM calls per run: an analysis call that produces the
//! reviewable blueprint, and a generation call that produces the workflow
//! graph (optionally with the richer project output).  Both calls ask for
//! structured JSON and tolerate markdown code fences around it.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flowsmith_graph::{Node, Workflow, WorkflowProject};

use crate::client::{LlmClient, LlmClientConfig};
use crate::contract::{
    Analysis, EngineFactory, GenerationEngine, GenerationReport, GenerationRequest,
};
use crate::error::{EngineError, Result};
use crate::phase::Phase;
use crate::progress::ProgressSink;

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an automation analyst. The user describes an automation in natural language; you produce a reviewable blueprint for it.

Respond with valid JSON (no markdown fencing) in this exact structure:
{
  "blueprint": "One-paragraph description of the proposed workflow",
  "assumptions": ["Assumptions you made about the prompt"],
  "recommendations": ["Suggestions beyond the literal prompt"],
  "suggested_nodes": [
    {"id": "trigger-1", "type": "trigger", "data": {"label": "What starts the automation"}}
  ]
}

Node types are: trigger, action, condition, transform. Keep the blueprint short enough to review at a glance."#;

const GENERATION_SYSTEM_PROMPT: &str = r#"You are a workflow generator. Turn the user's automation request into a directed graph of typed steps.

Respond with valid JSON (no markdown fencing) in this exact structure:
{
  "workflow": {
    "nodes": [
      {"id": "trigger-1", "type": "trigger", "data": {"label": "...", "integration": "..."}}
    ],
    "edges": [
      {"id": "e1", "source": "trigger-1", "target": "action-1"}
    ]
  },
  "project": {
    "name": "short-kebab-name",
    "description": "What the automation does",
    "components": [{"name": "...", "description": "..."}],
    "integrations": [{"name": "...", "purpose": "..."}],
    "test_suite": [{"name": "...", "description": "..."}]
  },
  "tools_used": ["names of capabilities you relied on"]
}

Rules:
- Node types are: trigger, action, condition, transform.
- Node ids must be unique; every edge endpoint must name an existing node id.
- Exactly one trigger starts the graph.
- Omit "project" if the request is simple enough not to need one."#;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One live generation session backed by an LLM provider.
pub struct AiEngine {
    client: LlmClient,
}

impl AiEngine {
    /// Create a session around an existing client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    fn generation_user_prompt(request: &GenerationRequest) -> String {
        match &request.blueprint {
            Some(blueprint) => format!(
                "Automation request:\n{}\n\nGenerate the workflow from this approved blueprint:\n{}",
                request.prompt, blueprint
            ),
            None => format!("Automation request:\n{}", request.prompt),
        }
    }
}

#[async_trait]
impl GenerationEngine for AiEngine {
    async fn analyze(&self, prompt: &str, progress: &ProgressSink) -> Result<Analysis> {
        progress.emit(Phase::Discovery, "Reading your automation request");

        let text = self.client.complete(ANALYSIS_SYSTEM_PROMPT, prompt).await?;

        progress.emit(Phase::Research, "Drafting the blueprint");
        let analysis = parse_analysis(&text)?;

        info!(
            provider = self.client.provider().name(),
            suggested_nodes = analysis.suggested_nodes.len(),
            "analysis produced"
        );
        Ok(analysis)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &ProgressSink,
    ) -> Result<GenerationReport> {
        progress.emit(Phase::Discovery, "Reading your automation request");
        progress.emit(Phase::Research, "Selecting integrations");

        let user = Self::generation_user_prompt(request);
        let text = self.client.complete(GENERATION_SYSTEM_PROMPT, &user).await?;

        progress.emit(Phase::Integration, "Wiring integrations");
        let report = parse_report(&text)?;
        progress.emit(Phase::Generation, "Assembling the workflow graph");

        info!(
            provider = self.client.provider().name(),
            nodes = report.workflow.as_ref().map(|w| w.nodes.len()).unwrap_or(0),
            tools = report.tools_used.len(),
            "workflow generated"
        );
        Ok(report)
    }
}

/// Produces [`AiEngine`] sessions sharing one HTTP client.
pub struct AiEngineFactory {
    client: LlmClient,
}

impl AiEngineFactory {
    /// Validate the configuration and build the factory.
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }
}

impl EngineFactory for AiEngineFactory {
    fn session(&self) -> Box<dyn GenerationEngine> {
        Box::new(AiEngine::new(self.client.clone()))
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Try to extract a JSON block from text that might be wrapped in markdown
/// code fences.
fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    // ```json ... ``` fences.
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // ``` ... ``` fences without a language tag.
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    trimmed
}

/// Parse the analysis call's JSON into an [`Analysis`].
fn parse_analysis(text: &str) -> Result<Analysis> {
    let json = extract_json_block(text);
    let v: Value = serde_json::from_str(json).map_err(|e| EngineError::ParseFailed {
        reason: format!("analysis is not valid JSON: {e}"),
    })?;

    let blueprint = v["blueprint"]
        .as_str()
        .ok_or_else(|| EngineError::ParseFailed {
            reason: "analysis JSON missing `blueprint` string".into(),
        })?
        .to_owned();

    let suggested_nodes: Vec<Node> = v["suggested_nodes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|n| serde_json::from_value(n.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Ok(Analysis {
        blueprint,
        assumptions: string_list(&v["assumptions"]),
        recommendations: string_list(&v["recommendations"]),
        suggested_nodes,
    })
}

/// Parse the generation call's JSON into a [`GenerationReport`].
///
/// Accepts either the full `{workflow, project, tools_used}` shape or a
/// bare graph (`{nodes, edges}` at the top level) from terser models.
fn parse_report(text: &str) -> Result<GenerationReport> {
    let json = extract_json_block(text);
    let v: Value = serde_json::from_str(json).map_err(|e| EngineError::ParseFailed {
        reason: format!("generation result is not valid JSON: {e}"),
    })?;

    // Bare graph at the top level.
    if v.get("nodes").is_some() {
        let workflow: Workflow =
            serde_json::from_value(v.clone()).map_err(|e| EngineError::ParseFailed {
                reason: format!("invalid bare workflow graph: {e}"),
            })?;
        return Ok(GenerationReport {
            workflow: Some(workflow),
            project: None,
            tools_used: Vec::new(),
        });
    }

    let workflow: Option<Workflow> = match v.get("workflow") {
        Some(w) if !w.is_null() => {
            Some(
                serde_json::from_value(w.clone()).map_err(|e| EngineError::ParseFailed {
                    reason: format!("invalid `workflow` field: {e}"),
                })?,
            )
        }
        _ => None,
    };

    let project: Option<WorkflowProject> = match v.get("project") {
        Some(p) if !p.is_null() => serde_json::from_value(p.clone()).ok(),
        _ => None,
    };

    Ok(GenerationReport {
        workflow,
        project,
        tools_used: string_list(&v["tools_used"]),
    })
}

fn string_list(v: &Value) -> Vec<String> {
    v.as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|s| s.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_from_fenced_block() {
        let text = "Here is the result:\n```json\n{\"blueprint\": \"x\"}\n```";
        assert_eq!(extract_json_block(text), r#"{"blueprint": "x"}"#);
    }

    #[test]
    fn extract_json_from_bare_fences() {
        let text = "```\n{\"blueprint\": \"x\"}\n```";
        assert_eq!(extract_json_block(text), r#"{"blueprint": "x"}"#);
    }

    #[test]
    fn extract_json_plain() {
        let text = r#"{"blueprint": "x"}"#;
        assert_eq!(extract_json_block(text), text);
    }

    #[test]
    fn parse_analysis_full() {
        let text = r#"{
            "blueprint": "Watch the sheet, post to Slack",
            "assumptions": ["The sheet is shared"],
            "recommendations": ["Add a digest mode"],
            "suggested_nodes": [
                {"id": "trigger-1", "type": "trigger", "data": {"label": "New row"}}
            ]
        }"#;

        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.blueprint, "Watch the sheet, post to Slack");
        assert_eq!(analysis.assumptions.len(), 1);
        assert_eq!(analysis.suggested_nodes.len(), 1);
    }

    #[test]
    fn parse_analysis_missing_blueprint_fails() {
        let result = parse_analysis(r#"{"assumptions": []}"#);
        assert!(matches!(result, Err(EngineError::ParseFailed { .. })));
    }

    #[test]
    fn parse_report_full_shape() {
        let text = r#"{
            "workflow": {
                "nodes": [
                    {"id": "trigger-1", "type": "trigger", "data": {"label": "New row"}},
                    {"id": "action-1", "type": "action", "data": {"label": "Post to Slack"}}
                ],
                "edges": [{"id": "e1", "source": "trigger-1", "target": "action-1"}]
            },
            "project": {"name": "row-to-slack", "description": "Notify on rows"},
            "tools_used": ["integration_catalog"]
        }"#;

        let report = parse_report(text).unwrap();
        assert_eq!(report.workflow.unwrap().nodes.len(), 2);
        assert_eq!(report.project.unwrap().name, "row-to-slack");
        assert_eq!(report.tools_used, vec!["integration_catalog"]);
    }

    #[test]
    fn parse_report_bare_graph() {
        let text = r#"{
            "nodes": [{"id": "trigger-1", "type": "trigger", "data": {"label": "New row"}}],
            "edges": []
        }"#;

        let report = parse_report(text).unwrap();
        assert_eq!(report.workflow.unwrap().nodes.len(), 1);
        assert!(report.project.is_none());
    }

    #[test]
    fn parse_report_without_workflow_is_nominal() {
        let report = parse_report(r#"{"tools_used": ["a", "b"]}"#).unwrap();
        assert!(report.workflow.is_none());
        assert_eq!(report.tools_used.len(), 2);
    }

    #[test]
    fn parse_report_garbage_fails() {
        assert!(parse_report("not json at all").is_err());
    }

    #[test]
    fn generation_prompt_includes_blueprint_when_present() {
        let request = GenerationRequest::new("notify me").with_blueprint("trigger then action");
        let prompt = AiEngine::generation_user_prompt(&request);
        assert!(prompt.contains("notify me"));
        assert!(prompt.contains("trigger then action"));
    }
}
