//! Node and edge types.
//!
//! A node is one typed step in an automation graph; an edge connects two
//! node ids.  These types mirror the wire shape the generation engine
//! emits, so they deserialize directly from engine JSON.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Node kind
// ---------------------------------------------------------------------------

/// The role a node plays in an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Starts the automation when an external event occurs.
    Trigger,
    /// Performs a side-effecting operation in an external service.
    Action,
    /// Routes the flow based on a predicate.
    Condition,
    /// Reshapes data between steps.
    Transform,
}

impl NodeKind {
    /// The canonical lowercase name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Action => "action",
            Self::Condition => "condition",
            Self::Transform => "transform",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trigger" => Ok(Self::Trigger),
            "action" => Ok(Self::Action),
            "condition" => Ok(Self::Condition),
            "transform" => Ok(Self::Transform),
            other => Err(GraphError::UnknownNodeKind { kind: other.into() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Display and configuration payload attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Human-readable label shown on the node.
    pub label: String,

    /// Additional engine-supplied fields (integration name, parameters,
    /// sample payloads).  Kept open-ended: the orchestrator never
    /// interprets these.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NodeData {
    /// Create node data with a label and no extra fields.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// A single typed step in a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within one workflow.
    pub id: String,

    /// What role this node plays.
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Display and configuration payload.
    pub data: NodeData,
}

impl Node {
    /// Create a node with the given id, kind, and label.
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            data: NodeData::labeled(label),
        }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Edge identifier.
    pub id: String,

    /// Id of the node this edge starts from.
    pub source: String,

    /// Id of the node this edge points to.
    pub target: String,
}

impl Edge {
    /// Create an edge between two node ids, deriving the edge id.
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}->{target}"),
            source,
            target,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_round_trips_through_str() {
        for kind in [
            NodeKind::Trigger,
            NodeKind::Action,
            NodeKind::Condition,
            NodeKind::Transform,
        ] {
            let parsed: NodeKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn node_kind_rejects_unknown() {
        let result = "webhook".parse::<NodeKind>();
        assert!(result.is_err());
    }

    #[test]
    fn node_serializes_kind_as_type() {
        let node = Node::new("trigger-1", NodeKind::Trigger, "New row added");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "trigger");
        assert_eq!(json["data"]["label"], "New row added");
    }

    #[test]
    fn node_data_preserves_extra_fields() {
        let json = serde_json::json!({
            "id": "action-1",
            "type": "action",
            "data": {
                "label": "Send message",
                "integration": "slack",
                "channel": "#general"
            }
        });

        let node: Node = serde_json::from_value(json).unwrap();
        assert_eq!(node.data.label, "Send message");
        assert_eq!(node.data.extra["integration"], "slack");

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["data"]["channel"], "#general");
    }

    #[test]
    fn edge_between_derives_id() {
        let edge = Edge::between("a", "b");
        assert_eq!(edge.id, "a->b");
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
    }
}
