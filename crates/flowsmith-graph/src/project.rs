//! Workflow project types.
//!
//! The richer planning path produces a [`WorkflowProject`] alongside the
//! graph: named components, the external integrations they touch, and a
//! suggested test suite.  Absent when the lighter generation path was used.

use serde::{Deserialize, Serialize};

/// A buildable unit within a generated project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Component name (e.g. "row-watcher").
    pub name: String,

    /// What this component does.
    pub description: String,
}

/// An external service a generated project talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Service name (e.g. "slack").
    pub name: String,

    /// What the project uses the service for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// A suggested verification step for a generated project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Short test name.
    pub name: String,

    /// What the test checks.
    pub description: String,
}

/// The full planning output of the richer generation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowProject {
    /// Project name.
    pub name: String,

    /// One-paragraph project description.
    pub description: String,

    /// Buildable components.
    #[serde(default)]
    pub components: Vec<Component>,

    /// External services involved.
    #[serde(default)]
    pub integrations: Vec<Integration>,

    /// Suggested test suite.
    #[serde(default)]
    pub test_suite: Vec<TestCase>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
