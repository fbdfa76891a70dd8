//! Workflow graph model.
//!
//! This module turns a [`Workflow`] definition into the node/edge graph that the
//! layout engines consume. The graph is rebuilt from scratch for every
//! definition change and its values are never mutated in place: layout,
//! status overlay and manual-position merging all return new [`Node`] values.
//!
//! # Edges
//!
//! Edges express execution precedence. Between two consecutive order groups
//! every node of the earlier group is connected to every node of the later
//! group, which gives parallel branches their fan-out and fan-in:
//!
//! ```text
//!            ┌─► a ─┐
//!   start ───┤      ├──► c ───► end
//!            └─► b ─┘
//! ```
//!
//! Staged workflows chain `start → stage → stage → … → end` and branch from
//! each stage into its first step group.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};
use serde::Serialize;

use ladder_core::{
    geometry::{Bounds, Point, Size},
    workflow::{Stage, Step, Workflow},
};

use crate::{layout::dimensions, status::Status};

/// Id of the single start node.
pub const START_ID: &str = "start";
/// Id of the single end node.
pub const END_ID: &str = "end";

/// Returns the node id used for a stage.
pub fn stage_node_id(stage_id: &str) -> String {
    format!("stage-{stage_id}")
}

/// Returns the node id used for a step.
pub fn step_node_id(step_id: &str) -> String {
    format!("step-{step_id}")
}

/// The kind tag of a node, used for dimension lookups and strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    End,
    Stage,
    Step,
}

/// Step specific node data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepData {
    step: Step,

    /// True when other steps of the same group share this step's order.
    parallel: bool,

    /// Node id of the owning stage, if the step belongs to one.
    stage: Option<String>,
}

impl StepData {
    pub fn new(step: Step, parallel: bool, stage: Option<String>) -> Self {
        Self {
            step,
            parallel,
            stage,
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }
}

/// The domain object a node stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    Start,
    End,
    Stage(Stage),
    Step(StepData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start => NodeKind::Start,
            NodeData::End => NodeKind::End,
            NodeData::Stage(_) => NodeKind::Stage,
            NodeData::Step(_) => NodeKind::Step,
        }
    }
}

/// A positioned diagram node.
///
/// `position` is the top-left corner of the node's box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    data: NodeData,
    size: Size,
    position: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<Status>,
}

impl Node {
    /// Creates a node at the origin, sized from the dimension table.
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        let size = dimensions::size_of(&data);
        Self {
            id: id.into(),
            data,
            size,
            position: Point::default(),
            status: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Returns the node's box.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    /// Returns the order of the stage or step this node stands for.
    pub fn order(&self) -> Option<i32> {
        match &self.data {
            NodeData::Stage(stage) => Some(stage.order()),
            NodeData::Step(data) => Some(data.step.order()),
            NodeData::Start | NodeData::End => None,
        }
    }

    /// Returns the backend id of the stage or step this node stands for.
    pub fn domain_id(&self) -> Option<&str> {
        match &self.data {
            NodeData::Stage(stage) => Some(stage.id()),
            NodeData::Step(data) => Some(data.step.id()),
            NodeData::Start | NodeData::End => None,
        }
    }

    /// Returns the display label of the node.
    pub fn label(&self) -> &str {
        match &self.data {
            NodeData::Start => "Start",
            NodeData::End => "End",
            NodeData::Stage(stage) => stage.name(),
            NodeData::Step(data) => data.step.name(),
        }
    }

    /// Returns a copy of this node at the given position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy of this node with the given size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Returns a copy of this node carrying the given status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

/// Rendering hint of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Smooth curved connector
    #[default]
    SmoothStep,
}

/// A directed edge expressing execution precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    style: EdgeStyle,
}

impl Edge {
    /// Creates an edge between two node ids.
    ///
    /// The id carries the byte length of the source so that distinct pairs
    /// never share an id, even when node ids themselves contain dashes.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{}-{source}-{target}", source.len()),
            source,
            target,
            style: EdgeStyle::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }
}

/// The node and edge lists of one workflow diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Builds the graph of a workflow definition.
    ///
    /// Staged workflows produce stage and step nodes, flat workflows produce
    /// step nodes only. A workflow with neither produces the start and end
    /// nodes and no edges.
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut builder = Builder::default();
        builder.add_node(Node::new(START_ID, NodeData::Start));

        let last = if workflow.is_staged() {
            builder.add_stages(workflow.stages())
        } else {
            builder.add_flat_steps(workflow.steps())
        };

        builder.add_node(Node::new(END_ID, NodeData::End));
        if last.iter().any(|id| id != START_ID) {
            builder.connect_all(&last, &[END_ID.to_string()]);
        }

        let graph = builder.build();
        debug!(
            workflow_id = workflow.id(),
            nodes_len = graph.nodes.len(),
            edges_len = graph.edges.len();
            "Workflow graph built",
        );
        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns a graph with the same edges and the given nodes.
    pub fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            edges: self.edges.clone(),
        }
    }
}

/// Incremental, insertion-ordered graph construction.
#[derive(Default)]
struct Builder {
    nodes: IndexMap<String, Node>,
    edges: IndexSet<(String, String)>,
}

impl Builder {
    /// Adds a node, returning false if its id is already taken.
    fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            warn!(node_id = node.id(); "Skipping node with duplicate id");
            return false;
        }
        trace!(node_id = node.id(), kind:? = node.kind(); "Adding node");
        self.nodes.insert(node.id().to_string(), node);
        true
    }

    /// Connects every source to every target.
    fn connect_all(&mut self, sources: &[String], targets: &[String]) {
        for source in sources {
            for target in targets {
                self.edges.insert((source.clone(), target.clone()));
            }
        }
    }

    /// Adds stage nodes and their steps, returning the id of the last stage.
    fn add_stages(&mut self, stages: &[Stage]) -> Vec<String> {
        let mut ordered: Vec<&Stage> = stages.iter().collect();
        ordered.sort_by_key(|stage| stage.order());

        let mut previous = vec![START_ID.to_string()];
        for stage in ordered {
            let stage_id = stage_node_id(stage.id());
            if !self.add_node(Node::new(&stage_id, NodeData::Stage(stage.clone()))) {
                continue;
            }
            self.connect_all(&previous, std::slice::from_ref(&stage_id));

            let mut branch_from = vec![stage_id.clone()];
            for group in order_groups(stage.steps()).into_values() {
                let ids = self.add_step_group(&group, Some(&stage_id));
                if !ids.is_empty() {
                    self.connect_all(&branch_from, &ids);
                    branch_from = ids;
                }
            }

            previous = vec![stage_id];
        }
        previous
    }

    /// Adds a legacy flat step list, returning the ids of the last group.
    fn add_flat_steps(&mut self, steps: &[Step]) -> Vec<String> {
        let mut previous = vec![START_ID.to_string()];
        for group in order_groups(steps).into_values() {
            let ids = self.add_step_group(&group, None);
            if !ids.is_empty() {
                self.connect_all(&previous, &ids);
                previous = ids;
            }
        }
        previous
    }

    /// Adds one order group of steps, returning the ids that were added.
    ///
    /// Steps whose id is already taken are dropped before the parallel flag
    /// is decided, so a lone survivor is never marked parallel.
    fn add_step_group(&mut self, group: &[&Step], stage: Option<&str>) -> Vec<String> {
        let mut fresh: IndexMap<String, &Step> = IndexMap::new();
        for step in group {
            let id = step_node_id(step.id());
            if self.nodes.contains_key(&id) || fresh.contains_key(&id) {
                warn!(node_id = id.as_str(); "Skipping node with duplicate id");
                continue;
            }
            fresh.insert(id, *step);
        }

        let parallel = fresh.len() > 1;
        for (id, step) in &fresh {
            let data = StepData::new((*step).clone(), parallel, stage.map(str::to_string));
            self.add_node(Node::new(id, NodeData::Step(data)));
        }
        fresh.into_keys().collect()
    }

    fn build(self) -> Graph {
        let nodes = self.nodes.into_values().collect();
        let edges = self
            .edges
            .into_iter()
            .map(|(source, target)| Edge::new(source, target))
            .collect();
        Graph { nodes, edges }
    }
}

/// Groups steps by order, ascending. Input order is kept within a group.
pub fn order_groups(steps: &[Step]) -> BTreeMap<i32, Vec<&Step>> {
    let mut groups: BTreeMap<i32, Vec<&Step>> = BTreeMap::new();
    for step in steps {
        groups.entry(step.order()).or_default().push(step);
    }
    groups
}
