//! Stage-aware layout engine.
//!
//! Stages flow top to bottom along a vertical spine; each stage's steps
//! branch out to the right of it, in its lane:
//!
//! ```text
//!              ┌───────┐
//!              │ start │
//!              └───────┘
//!          ┌─────────────┐     ┌────┐
//!          │   stage 1   │ ──► │ s1 │
//!          └─────────────┘     └────┘
//!                              ┌────┐
//!          ┌─────────────┐ ──► │ s2 │     ┌────┐
//!          │   stage 2   │     └────┘ ──► │ s4 │
//!          └─────────────┘ ──► ┌────┐     └────┘
//!                              │ s3 │
//!              ┌───────┐       └────┘
//!              │  end  │
//!              └───────┘
//! ```
//!
//! Vertical position encodes stage sequence; horizontal position inside a
//! lane encodes step sequence. Parallel steps (same order) share a column
//! and are stacked around the stage's vertical midpoint.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace, warn};

use ladder_core::geometry::{Point, Size};

use crate::{
    graph::{Edge, Node, NodeData, NodeKind},
    layout::{dimensions, engines, positioning::distribute_vertically},
};

/// X coordinate of the vertical spine.
const SPINE_X: f32 = 400.0;
/// Y coordinate of the top of the start node.
const TOP_MARGIN: f32 = 40.0;
/// Gap between the start node and the first stage.
const START_GAP: f32 = 60.0;
/// Gap between the last lane and the end node, on top of the stage spacing.
const END_GAP: f32 = 16.0;
/// Gap between a stage's right edge and its first step column.
const LANE_OFFSET: f32 = 48.0;

pub struct Engine {
    /// Gap between sequential step columns
    horizontal_spacing: f32,

    /// Gap between stacked parallel steps
    vertical_spacing: f32,

    /// Gap between a lane's bottom and the next stage
    stage_spacing: f32,
}

impl Engine {
    /// Create a new stage-aware layout engine with default spacing
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 60.0,
            vertical_spacing: 24.0,
            stage_spacing: 64.0,
        }
    }

    /// Set the gap between sequential step columns
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the gap between stacked parallel steps
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the gap between stages
    pub fn set_stage_spacing(&mut self, spacing: f32) -> &mut Self {
        self.stage_spacing = spacing;
        self
    }

    fn calculate_layout(&self, nodes: &[Node]) -> Vec<Node> {
        let mut positions: HashMap<&str, Point> = HashMap::new();

        let terminal_size = dimensions::size_of(&NodeData::Start);
        let start_position = Point::new(SPINE_X - terminal_size.width() / 2.0, TOP_MARGIN);
        let mut cursor = start_position.y() + terminal_size.height() + START_GAP;

        let steps_by_stage = steps_by_stage(nodes);

        let mut stages: Vec<&Node> = nodes
            .iter()
            .filter(|node| node.kind() == NodeKind::Stage)
            .collect();
        stages.sort_by_key(|stage| stage.order());

        for stage in stages {
            let steps = steps_by_stage
                .get(stage.id())
                .map(Vec::as_slice)
                .unwrap_or_default();
            cursor = self.place_stage(stage, steps, cursor, &mut positions);
        }

        let end_position = Point::new(SPINE_X - terminal_size.width() / 2.0, cursor + END_GAP);

        nodes
            .iter()
            .map(|node| {
                let size = dimensions::size_of(node.data());
                let position = match node.kind() {
                    NodeKind::Start => Some(start_position),
                    NodeKind::End => Some(end_position),
                    NodeKind::Stage | NodeKind::Step => positions.get(node.id()).copied(),
                };
                match position {
                    Some(position) => node.clone().with_size(size).with_position(position),
                    None => {
                        warn!(node_id = node.id(); "Step has no stage in the graph, keeping its position");
                        node.clone().with_size(size)
                    }
                }
            })
            .collect()
    }

    /// Places a stage and its steps with the stage's top at or below `cursor`.
    ///
    /// Returns the cursor for the next stage.
    fn place_stage<'a>(
        &self,
        stage: &'a Node,
        steps: &[&'a Node],
        cursor: f32,
        positions: &mut HashMap<&'a str, Point>,
    ) -> f32 {
        let stage_size = dimensions::size_of(stage.data());

        let mut groups: BTreeMap<i32, Vec<Size>> = BTreeMap::new();
        let mut group_nodes: BTreeMap<i32, Vec<&'a Node>> = BTreeMap::new();
        for &step in steps {
            let order = step.order().unwrap_or_default();
            groups
                .entry(order)
                .or_default()
                .push(dimensions::size_of(step.data()));
            group_nodes.entry(order).or_default().push(step);
        }

        let stacks: Vec<(Vec<f32>, f32)> = groups
            .values()
            .map(|sizes| distribute_vertically(sizes, self.vertical_spacing))
            .collect();

        // A stack taller than its stage would rise above the cursor into the previous lane.
        let tallest_stack = stacks
            .iter()
            .map(|(_, height)| *height)
            .fold(0.0, f32::max);
        let overhang = ((tallest_stack - stage_size.height()) / 2.0).max(0.0);

        let stage_position = Point::new(SPINE_X - stage_size.width() / 2.0, cursor + overhang);
        positions.insert(stage.id(), stage_position);

        let mid_y = stage_position.y() + stage_size.height() / 2.0;
        let mut bottom = stage_position.y() + stage_size.height();
        let mut column_x = stage_position.x() + stage_size.width() + LANE_OFFSET;

        for ((group, sizes), (offsets, stack_height)) in
            group_nodes.values().zip(groups.values()).zip(&stacks)
        {
            let top = mid_y - stack_height / 2.0;
            for ((step, size), offset) in group.iter().zip(sizes).zip(offsets) {
                let position = Point::new(column_x, top + offset);
                trace!(node_id = step.id(), x = position.x(), y = position.y(); "Placed step");
                positions.insert(step.id(), position);
                bottom = bottom.max(position.y() + size.height());
            }

            let column_width = sizes.iter().map(|size| size.width()).fold(0.0, f32::max);
            column_x += column_width + self.horizontal_spacing;
        }

        debug!(
            node_id = stage.id(),
            y = stage_position.y(),
            steps_len = steps.len(),
            groups_len = stacks.len();
            "Placed stage",
        );

        bottom + self.stage_spacing
    }
}

impl engines::Engine for Engine {
    fn calculate(&self, nodes: &[Node], _edges: &[Edge]) -> Vec<Node> {
        self.calculate_layout(nodes)
    }
}

/// Maps each stage node id to its step nodes, in input order.
fn steps_by_stage(nodes: &[Node]) -> HashMap<&str, Vec<&Node>> {
    let mut steps: HashMap<&str, Vec<&Node>> = HashMap::new();
    for node in nodes {
        if let NodeData::Step(data) = node.data() {
            if let Some(stage) = data.stage() {
                steps.entry(stage).or_default().push(node);
            }
        }
    }
    steps
}
