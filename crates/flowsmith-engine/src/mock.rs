//! Deterministic mock engine.
//!
//! Synthesizes a plausible workflow from prompt keywords without any
//! network traffic.  Used when mock data is enabled and throughout the
//! test suites; the same prompt always produces the same graph.

use async_trait::async_trait;
use tracing::debug;

use flowsmith_graph::{
    Component, Edge, Integration, Node, NodeKind, TestCase, Workflow, WorkflowProject,
};

use crate::contract::{
    Analysis, EngineFactory, GenerationEngine, GenerationReport, GenerationRequest,
};
use crate::error::Result;
use crate::phase::Phase;
use crate::progress::ProgressSink;

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

/// (keyword, integration, trigger label); first match wins.
const TRIGGERS: &[(&str, &str, &str)] = &[
    ("spreadsheet", "spreadsheet", "New spreadsheet row"),
    ("sheet", "spreadsheet", "New spreadsheet row"),
    ("form", "forms", "New form submission"),
    ("new email", "email", "New email received"),
    ("every day", "schedule", "Daily schedule"),
    ("every hour", "schedule", "Hourly schedule"),
    ("every week", "schedule", "Weekly schedule"),
];

/// (keyword, integration, action label); every match contributes a node.
const ACTIONS: &[(&str, &str, &str)] = &[
    ("slack", "slack", "Send Slack message"),
    ("discord", "discord", "Send Discord message"),
    ("notion", "notion", "Create Notion page"),
    ("webhook", "webhook", "Call webhook"),
    ("text message", "sms", "Send text message"),
    ("sms", "sms", "Send text message"),
];

/// Phrases that imply a condition gate.
const CONDITIONS: &[&str] = &["only if", "only when", "unless"];

/// Phrases that imply a transform step.
const TRANSFORMS: &[&str] = &["format", "summarize", "translate"];

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A generation engine that fabricates results from keywords.
#[derive(Debug, Default)]
pub struct MockEngine;

impl MockEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the node chain for a prompt.  Always yields at least a
    /// trigger and one action, connected in sequence.
    fn synthesize(prompt: &str) -> (Vec<Node>, Vec<Edge>, Vec<String>) {
        let lowered = prompt.to_lowercase();
        let mut nodes: Vec<Node> = Vec::new();
        let mut integrations: Vec<String> = Vec::new();

        let (integration, label) = TRIGGERS
            .iter()
            .find(|(kw, _, _)| lowered.contains(kw))
            .map(|(_, integration, label)| (*integration, *label))
            .unwrap_or(("manual", "Manual start"));
        nodes.push(Self::node("trigger-1", NodeKind::Trigger, label, integration));
        integrations.push(integration.to_owned());

        if CONDITIONS.iter().any(|kw| lowered.contains(kw)) {
            nodes.push(Self::node(
                "condition-1",
                NodeKind::Condition,
                "Check condition",
                "logic",
            ));
        }

        if TRANSFORMS.iter().any(|kw| lowered.contains(kw)) {
            nodes.push(Self::node(
                "transform-1",
                NodeKind::Transform,
                "Reshape data",
                "logic",
            ));
        }

        let mut action_index = 0;
        for (kw, integration, label) in ACTIONS {
            if lowered.contains(kw) {
                action_index += 1;
                nodes.push(Self::node(
                    format!("action-{action_index}"),
                    NodeKind::Action,
                    *label,
                    integration,
                ));
                integrations.push((*integration).to_owned());
            }
        }
        if action_index == 0 {
            nodes.push(Self::node("action-1", NodeKind::Action, "Record the event", "log"));
            integrations.push("log".to_owned());
        }

        let edges: Vec<Edge> = nodes
            .windows(2)
            .map(|pair| Edge::between(pair[0].id.clone(), pair[1].id.clone()))
            .collect();

        (nodes, edges, integrations)
    }

    fn node(
        id: impl Into<String>,
        kind: NodeKind,
        label: &str,
        integration: &str,
    ) -> Node {
        let mut node = Node::new(id, kind, label);
        node.data
            .extra
            .insert("integration".into(), integration.into());
        node
    }

    fn project_for(prompt: &str, nodes: &[Node], integrations: &[String]) -> WorkflowProject {
        let mut unique = integrations.to_vec();
        unique.dedup();

        WorkflowProject {
            name: "generated-automation".into(),
            description: format!("Automation for: {prompt}"),
            components: nodes
                .iter()
                .map(|n| Component {
                    name: n.id.clone(),
                    description: n.data.label.clone(),
                })
                .collect(),
            integrations: unique
                .into_iter()
                .map(|name| Integration {
                    name,
                    purpose: None,
                })
                .collect(),
            test_suite: vec![TestCase {
                name: "fires-end-to-end".into(),
                description: "Trigger once and verify every downstream step runs".into(),
            }],
        }
    }
}

#[async_trait]
impl GenerationEngine for MockEngine {
    async fn analyze(&self, prompt: &str, progress: &ProgressSink) -> Result<Analysis> {
        progress.emit(Phase::Discovery, "Reading your automation request");
        let (nodes, _, _) = Self::synthesize(prompt);
        progress.emit(Phase::Research, "Drafting the blueprint");

        let steps: Vec<String> = nodes.iter().map(|n| n.data.label.clone()).collect();
        debug!(steps = steps.len(), "mock analysis synthesized");

        Ok(Analysis {
            blueprint: format!("Proposed workflow: {}.", steps.join(" -> ")),
            assumptions: vec!["Connected accounts are already authorized".into()],
            recommendations: vec!["Add an error notification branch for failed runs".into()],
            suggested_nodes: nodes,
        })
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &ProgressSink,
    ) -> Result<GenerationReport> {
        progress.emit(Phase::Discovery, "Reading your automation request");
        progress.emit(Phase::Research, "Selecting integrations");

        let (nodes, edges, integrations) = Self::synthesize(&request.prompt);
        progress.emit(Phase::Integration, "Wiring integrations");

        let project = Self::project_for(&request.prompt, &nodes, &integrations);
        progress.emit(Phase::Generation, "Assembling the workflow graph");

        Ok(GenerationReport {
            workflow: Some(Workflow { nodes, edges }),
            project: Some(project),
            tools_used: vec!["integration_catalog".into(), "graph_composer".into()],
        })
    }
}

/// Produces [`MockEngine`] sessions.
#[derive(Debug, Default)]
pub struct MockEngineFactory;

impl MockEngineFactory {
    pub fn new() -> Self {
        Self
    }
}

impl EngineFactory for MockEngineFactory {
    fn session(&self) -> Box<dyn GenerationEngine> {
        Box::new(MockEngine::new())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SLACK_PROMPT: &str =
        "send me a Slack message when a new row is added to my spreadsheet";

    #[tokio::test]
    async fn slack_spreadsheet_prompt_yields_two_nodes_one_edge() {
        let engine = MockEngine::new();
        let sink = ProgressSink::new();
        let report = engine
            .generate(&GenerationRequest::new(SLACK_PROMPT), &sink)
            .await
            .unwrap();

        let workflow = report.workflow.unwrap();
        assert_eq!(workflow.nodes.len(), 2);
        assert_eq!(workflow.edges.len(), 1);
        assert_eq!(workflow.nodes[0].kind, NodeKind::Trigger);
        assert_eq!(workflow.nodes[1].kind, NodeKind::Action);
        assert_eq!(workflow.edges[0].source, "trigger-1");
        assert_eq!(workflow.edges[0].target, "action-1");
    }

    #[tokio::test]
    async fn conditional_prompt_adds_a_condition_node() {
        let engine = MockEngine::new();
        let sink = ProgressSink::new();
        let report = engine
            .generate(
                &GenerationRequest::new(
                    "post to slack only if the new form submission mentions billing",
                ),
                &sink,
            )
            .await
            .unwrap();

        let workflow = report.workflow.unwrap();
        assert!(workflow.nodes.iter().any(|n| n.kind == NodeKind::Condition));
        assert_eq!(workflow.edges.len(), workflow.nodes.len() - 1);
    }

    #[tokio::test]
    async fn unrecognized_prompt_falls_back_to_manual_chain() {
        let engine = MockEngine::new();
        let sink = ProgressSink::new();
        let report = engine
            .generate(&GenerationRequest::new("do the thing"), &sink)
            .await
            .unwrap();

        let workflow = report.workflow.unwrap();
        assert_eq!(workflow.nodes.len(), 2);
        assert_eq!(workflow.nodes[0].data.label, "Manual start");
    }

    #[tokio::test]
    async fn same_prompt_is_deterministic() {
        let engine = MockEngine::new();
        let a = engine
            .generate(&GenerationRequest::new(SLACK_PROMPT), &ProgressSink::new())
            .await
            .unwrap();
        let b = engine
            .generate(&GenerationRequest::new(SLACK_PROMPT), &ProgressSink::new())
            .await
            .unwrap();

        let (wa, wb) = (a.workflow.unwrap(), b.workflow.unwrap());
        assert_eq!(
            serde_json::to_value(&wa).unwrap(),
            serde_json::to_value(&wb).unwrap()
        );
    }

    #[tokio::test]
    async fn generate_emits_progress_without_terminal() {
        let engine = MockEngine::new();
        let sink = ProgressSink::new();
        engine
            .generate(&GenerationRequest::new(SLACK_PROMPT), &sink)
            .await
            .unwrap();

        let trail = sink.trail();
        assert!(!trail.is_empty());
        assert!(trail.iter().all(|u| u.phase != Phase::Complete));
    }

    #[tokio::test]
    async fn analyze_produces_reviewable_blueprint() {
        let engine = MockEngine::new();
        let sink = ProgressSink::new();
        let analysis = engine.analyze(SLACK_PROMPT, &sink).await.unwrap();

        assert!(analysis.blueprint.contains("New spreadsheet row"));
        assert_eq!(analysis.suggested_nodes.len(), 2);
        assert!(!analysis.assumptions.is_empty());
    }
}
