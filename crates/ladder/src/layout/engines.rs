//! Layout engine selection.
//!
//! A workflow graph is laid out by exactly one of two engines:
//!
//! - [`Strategy::StageAware`]: stages down a vertical spine with their steps
//!   branching to the right. Used whenever the graph holds a stage node.
//! - [`Strategy::Generic`]: Sugiyama layered layout for flat step graphs.
//!
//! The strategy is resolved once per call; a graph is never partially laid
//! out by both engines.

mod stage;
mod sugiyama;

use log::debug;

use crate::{
    config::LayoutOptions,
    graph::{Edge, Node, NodeKind},
};

/// Trait implemented by every layout engine.
///
/// Engines are stateless between calls: they receive the full graph and
/// return a positioned copy of every node, in input order.
pub trait Engine {
    fn calculate(&self, nodes: &[Node], edges: &[Edge]) -> Vec<Node>;
}

/// The layout algorithm used for one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    StageAware,
    Generic,
}

impl Strategy {
    /// Selects the strategy for a node set.
    pub fn select(nodes: &[Node]) -> Self {
        if nodes.iter().any(|node| node.kind() == NodeKind::Stage) {
            Strategy::StageAware
        } else {
            Strategy::Generic
        }
    }

    /// Short machine readable name, as written to exported documents.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::StageAware => "stage_aware",
            Strategy::Generic => "generic",
        }
    }

    /// Creates the engine implementing this strategy, configured from `options`.
    pub fn engine(self, options: &LayoutOptions) -> Box<dyn Engine> {
        match self {
            Strategy::StageAware => {
                let mut engine = stage::Engine::new();
                engine
                    .set_horizontal_spacing(options.horizontal_spacing())
                    .set_vertical_spacing(options.vertical_spacing())
                    .set_stage_spacing(options.stage_spacing());
                Box::new(engine)
            }
            Strategy::Generic => {
                let mut engine = sugiyama::Engine::new();
                engine
                    .set_horizontal_spacing(options.horizontal_spacing())
                    .set_vertical_spacing(options.vertical_spacing())
                    .set_direction(options.direction());
                Box::new(engine)
            }
        }
    }
}

/// Positions every node of a graph.
///
/// Returns the nodes in input order, each with its resolved size and its
/// top-left position. Edges referencing unknown nodes are ignored. An empty
/// node list yields an empty result.
pub fn layout(nodes: &[Node], edges: &[Edge], options: &LayoutOptions) -> Vec<Node> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let strategy = Strategy::select(nodes);
    debug!(
        strategy:? = strategy,
        nodes_len = nodes.len(),
        edges_len = edges.len();
        "Calculating layout",
    );

    strategy.engine(options).calculate(nodes, edges)
}

#[cfg(test)]
mod tests {
    use ladder_core::workflow::{Stage, Step};

    use super::*;
    use crate::graph::{NodeData, StepData};

    fn step_node(id: &str, order: i32) -> Node {
        Node::new(
            id,
            NodeData::Step(StepData::new(Step::new(id, id, order), false, None)),
        )
    }

    #[test]
    fn test_select_stage_aware_when_stage_present() {
        let nodes = vec![
            Node::new("start", NodeData::Start),
            Node::new("stage-a", NodeData::Stage(Stage::new("a", "A", 1))),
            Node::new("end", NodeData::End),
        ];
        assert_eq!(Strategy::select(&nodes), Strategy::StageAware);
    }

    #[test]
    fn test_select_generic_without_stage() {
        let nodes = vec![
            Node::new("start", NodeData::Start),
            step_node("step-a", 1),
            Node::new("end", NodeData::End),
        ];
        assert_eq!(Strategy::select(&nodes), Strategy::Generic);
        assert_eq!(Strategy::select(&[]), Strategy::Generic);
    }

    #[test]
    fn test_empty_graph_yields_empty_layout() {
        let positioned = layout(&[], &[], &LayoutOptions::default());
        assert!(positioned.is_empty());
    }

    #[test]
    fn test_layout_keeps_input_order() {
        let nodes = vec![
            Node::new("start", NodeData::Start),
            step_node("step-a", 1),
            Node::new("end", NodeData::End),
        ];
        let edges = vec![Edge::new("start", "step-a"), Edge::new("step-a", "end")];

        let positioned = layout(&nodes, &edges, &LayoutOptions::default());

        let ids: Vec<_> = positioned.iter().map(Node::id).collect();
        assert_eq!(ids, vec!["start", "step-a", "end"]);
    }
}
