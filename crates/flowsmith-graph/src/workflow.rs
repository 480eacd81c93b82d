//! Workflow graph and the conservative repair pass.
//!
//! A [`Workflow`] holds the nodes and edges the generation engine produced.
//! Engines are not trusted to uphold the graph invariants, so before a
//! workflow reaches a caller it goes through [`Workflow::repair`]: duplicate
//! node ids are deduplicated (first occurrence wins) and edges whose
//! endpoints do not resolve are dropped.  The pass never fails; it reports
//! what it removed so the caller can surface the degradation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::node::{Edge, Node};

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A directed graph of typed automation steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    /// Graph nodes; ids are unique after [`Workflow::repair`].
    pub nodes: Vec<Node>,

    /// Directed edges; endpoints resolve after [`Workflow::repair`].
    pub edges: Vec<Edge>,
}

impl Workflow {
    /// The empty graph, the guaranteed default on every success path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Parse a workflow from engine-emitted JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Enforce the graph invariants in place.
    ///
    /// Duplicate node ids keep their first occurrence; edges referencing a
    /// node id that does not survive are dropped.  Self-loops are retained:
    /// both endpoints resolve, and the model defines no semantics that a
    /// self-loop would violate.
    pub fn repair(&mut self) -> RepairReport {
        let mut report = RepairReport::default();

        let mut seen: HashSet<String> = HashSet::with_capacity(self.nodes.len());
        self.nodes.retain(|node| {
            if seen.insert(node.id.clone()) {
                true
            } else {
                warn!(node_id = %node.id, "dropping node with duplicate id");
                report.duplicate_nodes_dropped += 1;
                false
            }
        });

        self.edges.retain(|edge| {
            let resolvable = seen.contains(&edge.source) && seen.contains(&edge.target);
            if !resolvable {
                warn!(
                    edge_id = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "dropping edge with unresolvable endpoint"
                );
                report.dangling_edges_dropped += 1;
            }
            resolvable
        });

        report
    }
}

// ---------------------------------------------------------------------------
// Repair report
// ---------------------------------------------------------------------------

/// What [`Workflow::repair`] removed from a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Nodes dropped because their id collided with an earlier node.
    pub duplicate_nodes_dropped: usize,

    /// Edges dropped because an endpoint did not resolve.
    pub dangling_edges_dropped: usize,
}

impl RepairReport {
    /// True when the repair pass changed the graph.
    pub fn degraded(&self) -> bool {
        self.duplicate_nodes_dropped > 0 || self.dangling_edges_dropped > 0
    }
}

impl std::fmt::Display for RepairReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} duplicate node(s) and {} dangling edge(s) removed",
            self.duplicate_nodes_dropped, self.dangling_edges_dropped
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn two_node_workflow() -> Workflow {
        Workflow {
            nodes: vec![
                Node::new("trigger-1", NodeKind::Trigger, "New spreadsheet row"),
                Node::new("action-1", NodeKind::Action, "Send Slack message"),
            ],
            edges: vec![Edge::between("trigger-1", "action-1")],
        }
    }

    #[test]
    fn valid_workflow_survives_repair_untouched() {
        let mut wf = two_node_workflow();
        let report = wf.repair();

        assert!(!report.degraded());
        assert_eq!(wf.nodes.len(), 2);
        assert_eq!(wf.edges.len(), 1);
    }

    #[test]
    fn duplicate_node_ids_keep_first_occurrence() {
        let mut wf = two_node_workflow();
        wf.nodes
            .push(Node::new("trigger-1", NodeKind::Action, "Impostor"));

        let report = wf.repair();

        assert_eq!(report.duplicate_nodes_dropped, 1);
        assert_eq!(wf.nodes.len(), 2);
        assert_eq!(wf.nodes[0].kind, NodeKind::Trigger);
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let mut wf = two_node_workflow();
        wf.edges.push(Edge::between("action-1", "ghost"));

        let report = wf.repair();

        assert_eq!(report.dangling_edges_dropped, 1);
        assert_eq!(wf.edges.len(), 1);
        assert_eq!(wf.edges[0].target, "action-1");
    }

    #[test]
    fn self_loops_are_retained() {
        let mut wf = two_node_workflow();
        wf.edges.push(Edge::between("action-1", "action-1"));

        let report = wf.repair();

        assert!(!report.degraded());
        assert_eq!(wf.edges.len(), 2);
    }

    #[test]
    fn empty_workflow_is_empty() {
        let wf = Workflow::empty();
        assert!(wf.is_empty());
        assert_eq!(wf.nodes.len(), 0);
    }

    #[test]
    fn workflow_parses_engine_json() {
        let json = r#"{
            "nodes": [
                {"id": "trigger-1", "type": "trigger", "data": {"label": "New row"}},
                {"id": "action-1", "type": "action", "data": {"label": "Notify"}}
            ],
            "edges": [
                {"id": "e1", "source": "trigger-1", "target": "action-1"}
            ]
        }"#;

        let wf = Workflow::from_json(json).unwrap();
        assert_eq!(wf.nodes.len(), 2);
        assert_eq!(wf.edges[0].source, "trigger-1");
    }

    #[test]
    fn repair_report_display_mentions_counts() {
        let report = RepairReport {
            duplicate_nodes_dropped: 1,
            dangling_edges_dropped: 2,
        };
        let text = report.to_string();
        assert!(text.contains('1'));
        assert!(text.contains('2'));
    }
}
