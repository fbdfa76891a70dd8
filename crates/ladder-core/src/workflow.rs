//! Workflow definition model.
//!
//! These types mirror the workflow definition served by the approval backend.
//! Only the fields that matter for drawing a workflow are modeled; unknown
//! fields in the source document are ignored on deserialization.
//!
//! A workflow comes in one of two shapes:
//!
//! - **Staged**: an ordered list of [`Stage`]s, each holding its own [`Step`]s.
//! - **Flat** (legacy): no stages, a single ordered list of [`Step`]s.
//!
//! Steps that share an `order` value execute in parallel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A complete workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default)]
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    stages: Vec<Stage>,

    /// Legacy flat step list, only consulted when `stages` is empty.
    #[serde(default)]
    steps: Vec<Step>,
}

impl Workflow {
    /// Creates a staged workflow.
    pub fn staged(id: impl Into<String>, name: impl Into<String>, stages: Vec<Stage>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stages,
            steps: Vec::new(),
        }
    }

    /// Creates a legacy workflow made of a flat list of steps.
    pub fn flat(id: impl Into<String>, name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stages: Vec::new(),
            steps,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns true when the workflow is organised in stages.
    pub fn is_staged(&self) -> bool {
        !self.stages.is_empty()
    }
}

/// Rule deciding when a stage counts as complete.
///
/// Only displayed; Ladder never evaluates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionPolicy {
    /// Every step must be approved (default)
    #[default]
    All,
    /// A single approved step completes the stage
    Any,
    /// A fixed number of steps must be approved
    NOfM,
}

/// An ordered phase of a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    order: i32,

    #[serde(default)]
    completion_policy: CompletionPolicy,

    /// Number of approvals required by [`CompletionPolicy::NOfM`].
    #[serde(default)]
    required_approvals: Option<u32>,

    #[serde(default)]
    steps: Vec<Step>,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            ..Default::default()
        }
    }

    /// Sets the steps of this stage (builder style).
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the completion policy of this stage (builder style).
    pub fn with_completion_policy(
        mut self,
        policy: CompletionPolicy,
        required_approvals: Option<u32>,
    ) -> Self {
        self.completion_policy = policy;
        self.required_approvals = required_approvals;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        self.completion_policy
    }

    pub fn required_approvals(&self) -> Option<u32> {
        self.required_approvals
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Human readable summary of the completion policy, e.g. `2 of 3`.
    pub fn policy_label(&self) -> String {
        match self.completion_policy {
            CompletionPolicy::All => "All steps".to_string(),
            CompletionPolicy::Any => "Any step".to_string(),
            CompletionPolicy::NOfM => {
                let required = self.required_approvals.unwrap_or(1);
                format!("{required} of {}", self.steps.len())
            }
        }
    }
}

/// A single approval unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    order: i32,

    /// Opaque approval policy name, passed through for display.
    #[serde(default)]
    approval_policy: Option<String>,

    #[serde(default)]
    description: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            ..Default::default()
        }
    }

    /// Sets the approval policy (builder style).
    pub fn with_approval_policy(mut self, policy: impl Into<String>) -> Self {
        self.approval_policy = Some(policy.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn approval_policy(&self) -> Option<&str> {
        self.approval_policy.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order {})", self.name, self.order)
    }
}
