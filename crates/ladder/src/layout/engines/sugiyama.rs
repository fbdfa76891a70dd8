//! Sugiyama layout engine for graphs without stages.
//!
//! Uses the rust-sugiyama implementation of the layered drawing method
//! (ranking, crossing minimization, coordinate assignment). Its output is
//! turned into diagram coordinates here:
//!
//! 1. Distinct Y values become ranks, oriented so that sources sit on top.
//! 2. Ranks are stacked with the vertical spacing between their tallest nodes.
//! 3. X values are scaled so that neighbouring columns never overlap, then a
//!    sweep per rank enforces the horizontal spacing.
//! 4. Center points are translated to top-left corners.
//!
//! A fresh graph is built for every call; nothing is shared between calls.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, error, trace, warn};
use petgraph::{Direction::Incoming, graphmap::DiGraphMap};
use rust_sugiyama::configure::Config;

use ladder_core::geometry::{Point, Size};

use crate::{
    config::Direction,
    graph::{Edge, Node},
    layout::{dimensions, engines, positioning::distribute_vertically},
};

/// Coordinates produced by rust-sugiyama for one connected component.
type Coordinates = [(usize, (f64, f64))];

pub struct Engine {
    /// Horizontal spacing between nodes of one rank
    horizontal_spacing: f32,

    /// Vertical spacing between ranks
    vertical_spacing: f32,

    direction: Direction,
}

impl Engine {
    /// Create a new Sugiyama layout engine with default spacing
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 60.0,
            vertical_spacing: 24.0,
            direction: Direction::TopToBottom,
        }
    }

    /// Set the horizontal spacing between nodes of one rank
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the vertical spacing between ranks
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the flow direction
    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    fn calculate_layout(&self, nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
        // Left-to-right is computed as a transposed top-to-bottom layout
        let transpose = self.direction == Direction::LeftToRight;
        let sizes: Vec<Size> = nodes
            .iter()
            .map(|node| {
                let size = dimensions::size_of(node.data());
                if transpose { size.transpose() } else { size }
            })
            .collect();

        let centers = self.centers(nodes, edges, &sizes);

        nodes
            .iter()
            .zip(centers)
            .map(|(node, center)| {
                let size = dimensions::size_of(node.data());
                match center {
                    Some(center) => {
                        let center = if transpose { center.transpose() } else { center };
                        node.clone()
                            .with_size(size)
                            .with_position(center.sub_point(size.half()))
                    }
                    None => {
                        warn!(node_id = node.id(); "Node missing from layered layout result, keeping its position");
                        node.clone().with_size(size)
                    }
                }
            })
            .collect()
    }

    /// Calculate the center point of every node, indexed like `nodes`.
    fn centers(&self, nodes: &[Node], edges: &[Edge], sizes: &[Size]) -> Vec<Option<Point>> {
        // Map node ids to sequential u32 ids for rust-sugiyama
        let mut node_ids: HashMap<&str, u32> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            node_ids.entry(node.id()).or_insert(i as u32);
        }

        let mut seen = HashSet::new();
        let mut layer_edges = Vec::new();
        for edge in edges {
            match (node_ids.get(edge.source()), node_ids.get(edge.target())) {
                (Some(&source_id), Some(&target_id)) if source_id != target_id => {
                    if seen.insert((source_id, target_id)) {
                        layer_edges.push((source_id, target_id));
                    }
                }
                (Some(_), Some(_)) => {
                    trace!(edge_id = edge.id(); "Skipping self-loop");
                }
                _ => {
                    debug!(edge_id = edge.id(); "Dropping edge with unknown endpoint");
                }
            }
        }

        if layer_edges.is_empty() {
            debug!("Graph has no edges. Stacking nodes top to bottom.");
            return self.stack(sizes);
        }

        debug!(
            "Applying Sugiyama algorithm to graph with {} nodes and {} edges",
            nodes.len(),
            layer_edges.len()
        );

        let mut centers = vec![None; nodes.len()];

        let sugiyama_edges = layer_edges.clone();
        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: 3.0,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&sugiyama_edges, &config)
        });

        let layouts = match layouts {
            Ok(layouts) => layouts,
            Err(err) => {
                let message = err
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| err.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown error");
                error!(message; "Rust-sugiyama layout engine panicked, keeping node positions");
                return centers;
            }
        };

        let graph: DiGraphMap<u32, ()> = DiGraphMap::from_edges(layer_edges.iter().copied());

        // Components are placed side by side, left to right
        let mut offset_x = 0.0;
        for (coords, _, _) in &layouts {
            let placed = self.place_component(coords, &graph, sizes, offset_x);

            let mut right = offset_x;
            for (id, center) in placed {
                right = right.max(center.x() + sizes[id].width() / 2.0);
                centers[id] = Some(center);
            }
            offset_x = right + self.horizontal_spacing;
        }

        debug!(
            positioned_len = centers.iter().filter(|center| center.is_some()).count(),
            components_len = layouts.len();
            "Layered layout generated",
        );

        centers
    }

    /// Converts one component's coordinates into center points.
    fn place_component(
        &self,
        coords: &Coordinates,
        graph: &DiGraphMap<u32, ()>,
        sizes: &[Size],
        offset_x: f32,
    ) -> Vec<(usize, Point)> {
        let mut levels: BTreeMap<i64, Vec<(usize, f64)>> = BTreeMap::new();
        for &(id, (x, y)) in coords {
            if id >= sizes.len() {
                debug!("Node ID {id} from rust-sugiyama result is out of valid range");
                continue;
            }
            levels.entry((y * 1000.0).round() as i64).or_default().push((id, x));
        }

        let mut ranks: Vec<Vec<(usize, f64)>> = levels.into_values().collect();

        // Every node of the first rank has no predecessor, so sources belong on top
        let is_source = |id: usize| {
            graph
                .neighbors_directed(id as u32, Incoming)
                .next()
                .is_none()
        };
        let top_has_source = ranks
            .first()
            .is_some_and(|rank| rank.iter().any(|&(id, _)| is_source(id)));
        if !top_has_source {
            ranks.reverse();
        }

        let widest = ranks
            .iter()
            .flatten()
            .map(|&(id, _)| sizes[id].width())
            .fold(0.0, f32::max);
        let min_x = ranks
            .iter()
            .flatten()
            .map(|&(_, x)| x)
            .fold(f64::INFINITY, f64::min);

        // Smallest distance between two neighbours of one rank, in algorithm units
        let unit = ranks
            .iter()
            .filter_map(|rank| {
                let mut xs: Vec<f64> = rank.iter().map(|&(_, x)| x).collect();
                xs.sort_by(f64::total_cmp);
                xs.windows(2)
                    .map(|pair| pair[1] - pair[0])
                    .filter(|distance| *distance > f64::EPSILON)
                    .reduce(f64::min)
            })
            .reduce(f64::min)
            .unwrap_or(1.0);
        let scale = (widest + self.horizontal_spacing) / unit as f32;

        let mut placed = Vec::with_capacity(coords.len());
        let mut top = 0.0;
        for rank in &mut ranks {
            rank.sort_by(|a, b| a.1.total_cmp(&b.1));

            let rank_height = rank
                .iter()
                .map(|&(id, _)| sizes[id].height())
                .fold(0.0, f32::max);
            let center_y = top + rank_height / 2.0;

            let mut min_left = f32::MIN;
            for &(id, x) in rank.iter() {
                let size = sizes[id];
                let mut center_x = offset_x + widest / 2.0 + (x - min_x) as f32 * scale;

                let left = center_x - size.width() / 2.0;
                if left < min_left {
                    center_x += min_left - left;
                }
                min_left = center_x + size.width() / 2.0 + self.horizontal_spacing;

                placed.push((id, Point::new(center_x, center_y)));
            }

            top += rank_height + self.vertical_spacing;
        }

        placed
    }

    /// Stacks nodes top to bottom in input order, centered on a common axis.
    fn stack(&self, sizes: &[Size]) -> Vec<Option<Point>> {
        let widest = sizes.iter().map(|size| size.width()).fold(0.0, f32::max);
        let (offsets, _) = distribute_vertically(sizes, self.vertical_spacing);

        sizes
            .iter()
            .zip(offsets)
            .map(|(size, top)| Some(Point::new(widest / 2.0, top + size.height() / 2.0)))
            .collect()
    }
}

impl engines::Engine for Engine {
    fn calculate(&self, nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
        self.calculate_layout(nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use ladder_core::workflow::{Step, Workflow};

    use super::*;
    use crate::{
        graph::{Graph, NodeData, StepData},
        layout::engines::Engine as _,
    };

    fn find<'a>(nodes: &'a [Node], id: &str) -> &'a Node {
        nodes
            .iter()
            .find(|node| node.id() == id)
            .unwrap_or_else(|| panic!("node {id} not found"))
    }

    fn parallel_workflow() -> Workflow {
        Workflow::flat(
            "wf",
            "Flat",
            vec![
                Step::new("a", "A", 1),
                Step::new("b", "B", 1),
                Step::new("c", "C", 2),
            ],
        )
    }

    fn assert_no_overlap(nodes: &[Node]) {
        for (i, first) in nodes.iter().enumerate() {
            for second in &nodes[i + 1..] {
                assert!(
                    !first.bounds().overlaps(&second.bounds()),
                    "{} overlaps {}",
                    first.id(),
                    second.id()
                );
            }
        }
    }

    #[test]
    fn test_parallel_flat_workflow() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let nodes = Engine::new().calculate(graph.nodes(), graph.edges());

        assert_eq!(nodes.len(), 5);
        assert_no_overlap(&nodes);

        let start = find(&nodes, "start");
        let a = find(&nodes, "step-a");
        let b = find(&nodes, "step-b");
        let c = find(&nodes, "step-c");
        let end = find(&nodes, "end");

        assert_approx_eq!(f32, a.position().y(), b.position().y());
        assert!(start.bounds().max_y() <= a.position().y());
        assert!(a.bounds().max_y() <= c.position().y());
        assert!(c.bounds().max_y() <= end.position().y());
    }

    #[test]
    fn test_ranks_are_separated_by_vertical_spacing() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let mut engine = Engine::new();
        engine.set_vertical_spacing(30.0);
        let nodes = engine.calculate(graph.nodes(), graph.edges());

        let a = find(&nodes, "step-a");
        let c = find(&nodes, "step-c");
        assert_approx_eq!(f32, c.position().y() - a.bounds().max_y(), 30.0, epsilon = 0.01);
    }

    #[test]
    fn test_edgeless_graph_is_stacked() {
        let graph = Graph::from_workflow(&Workflow::default());
        let nodes = Engine::new().calculate(graph.nodes(), graph.edges());

        let start = find(&nodes, "start");
        let end = find(&nodes, "end");
        assert!(end.position().y() > start.bounds().max_y());
        assert_approx_eq!(f32, start.position().x(), end.position().x());
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let mut edges = graph.edges().to_vec();
        edges.push(Edge::new("step-a", "ghost"));
        edges.push(Edge::new("ghost", "end"));
        edges.push(Edge::new("step-c", "step-c"));

        let with_dangling = Engine::new().calculate(graph.nodes(), &edges);
        let clean = Engine::new().calculate(graph.nodes(), graph.edges());
        assert_eq!(with_dangling, clean);
    }

    #[test]
    fn test_node_without_edges_keeps_position() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let mut nodes = graph.nodes().to_vec();
        let lonely_position = Point::new(-7.0, 3.0);
        nodes.push(
            Node::new(
                "step-lonely",
                NodeData::Step(StepData::new(Step::new("lonely", "Lonely", 9), false, None)),
            )
            .with_position(lonely_position),
        );

        let positioned = Engine::new().calculate(&nodes, graph.edges());
        assert_eq!(find(&positioned, "step-lonely").position(), lonely_position);
    }

    #[test]
    fn test_left_to_right_direction() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let mut engine = Engine::new();
        engine.set_direction(Direction::LeftToRight);
        let nodes = engine.calculate(graph.nodes(), graph.edges());

        assert_no_overlap(&nodes);
        let start = find(&nodes, "start");
        let a = find(&nodes, "step-a");
        let b = find(&nodes, "step-b");
        let end = find(&nodes, "end");

        assert_approx_eq!(f32, a.position().x(), b.position().x());
        assert!(start.bounds().max_x() <= a.position().x());
        assert!(a.bounds().max_x() <= end.position().x());
    }

    #[test]
    fn test_disconnected_components_side_by_side() {
        let nodes = vec![
            Node::new("start", NodeData::Start),
            Node::new("end", NodeData::End),
            Node::new(
                "step-x",
                NodeData::Step(StepData::new(Step::new("x", "X", 1), false, None)),
            ),
            Node::new(
                "step-y",
                NodeData::Step(StepData::new(Step::new("y", "Y", 2), false, None)),
            ),
        ];
        let edges = vec![Edge::new("start", "end"), Edge::new("step-x", "step-y")];

        let positioned = Engine::new().calculate(&nodes, &edges);
        assert_no_overlap(&positioned);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = Graph::from_workflow(&parallel_workflow());
        let first = Engine::new().calculate(graph.nodes(), graph.edges());
        let second = Engine::new().calculate(graph.nodes(), graph.edges());
        assert_eq!(first, second);
    }
}
