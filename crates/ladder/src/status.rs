//! Progress status overlay.
//!
//! When a work item moves through a workflow, the backend reports a status
//! per stage and step. The overlay attaches those statuses to diagram nodes.
//! It is a pure mapping: it returns new node values and never touches the
//! nodes it is given, so overlays computed for different work items can not
//! leak into each other.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::graph::Node;

/// Progress of a stage or step for one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Approved,
    Rejected,
    Skipped,
}

impl Status {
    /// Fill color used when drawing a node with this status.
    pub fn fill_color(self) -> &'static str {
        match self {
            Status::Pending => "#f3f4f6",
            Status::InProgress => "#dbeafe",
            Status::Approved => "#dcfce7",
            Status::Rejected => "#fee2e2",
            Status::Skipped => "#f5f5f4",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Pending => "Pending",
            Status::InProgress => "In progress",
            Status::Approved => "Approved",
            Status::Rejected => "Rejected",
            Status::Skipped => "Skipped",
        };
        f.write_str(label)
    }
}

/// Statuses keyed by the backend id of a stage or step.
pub type Progress = HashMap<String, Status>;

/// Returns copies of `nodes` carrying the statuses found in `progress`.
///
/// Nodes without an entry (including the start and end nodes) are returned
/// unchanged.
pub fn overlay(nodes: &[Node], progress: &Progress) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            match node
                .domain_id()
                .and_then(|domain_id| progress.get(domain_id))
            {
                Some(&status) => node.clone().with_status(status),
                None => node.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ladder_core::workflow::{Stage, Step, Workflow};

    use super::*;
    use crate::graph::Graph;

    fn graph() -> Graph {
        Graph::from_workflow(&Workflow::staged(
            "wf",
            "Staged",
            vec![Stage::new("a", "A", 1).with_steps(vec![Step::new("s1", "S1", 1)])],
        ))
    }

    #[test]
    fn test_overlay_sets_status_by_domain_id() {
        let graph = graph();
        let progress = Progress::from([
            ("a".to_string(), Status::InProgress),
            ("s1".to_string(), Status::Approved),
        ]);

        let overlaid = overlay(graph.nodes(), &progress);

        let status = |id: &str| {
            overlaid
                .iter()
                .find(|node| node.id() == id)
                .and_then(Node::status)
        };
        assert_eq!(status("stage-a"), Some(Status::InProgress));
        assert_eq!(status("step-s1"), Some(Status::Approved));
        assert_eq!(status("start"), None);
        assert_eq!(status("end"), None);
    }

    #[test]
    fn test_overlay_does_not_touch_input() {
        let graph = graph();
        let progress = Progress::from([("s1".to_string(), Status::Rejected)]);

        let first = overlay(graph.nodes(), &progress);
        let second = overlay(graph.nodes(), &Progress::new());

        assert!(graph.nodes().iter().all(|node| node.status().is_none()));
        assert!(first.iter().any(|node| node.status() == Some(Status::Rejected)));
        assert!(second.iter().all(|node| node.status().is_none()));
    }

    #[test]
    fn test_status_deserializes_snake_case() {
        let progress: Progress =
            serde_json::from_str(r#"{"a": "in_progress", "b": "skipped"}"#).unwrap();
        assert_eq!(progress["a"], Status::InProgress);
        assert_eq!(progress["b"].to_string(), "Skipped");
    }
}
