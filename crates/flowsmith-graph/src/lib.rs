//! Workflow graph data model for Flowsmith.
//!
//! This crate provides:
//!
//! - **Graph types**: [`Node`], [`Edge`], and [`Workflow`], the directed
//!   graph of typed automation steps produced by the generation engine.
//! - **Project types**: [`WorkflowProject`], the richer planning output
//!   (components, integrations, test suite) some engine variants produce.
//! - **Repair**: [`Workflow::repair`], the conservative pass that upholds
//!   the graph invariants (unique node ids, resolvable edge endpoints)
//!   before a workflow is handed to a caller.

pub mod error;
pub mod node;
pub mod project;
pub mod workflow;

pub use error::{GraphError, Result};
pub use node::{Edge, Node, NodeData, NodeKind};
pub use project::{Component, Integration, TestCase, WorkflowProject};
pub use workflow::{RepairReport, Workflow};
