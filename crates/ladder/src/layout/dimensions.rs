//! Fixed node dimension table.
//!
//! Every node kind has a fixed size except stages, whose height grows with
//! the number of step rows listed inside them. Only the first
//! [`STAGE_VISIBLE_STEPS`] steps get a row; the rest are summarised as
//! `+N more`, so dense stages do not break the vertical rhythm.

use ladder_core::geometry::Size;

use crate::graph::NodeData;

pub const TERMINAL_WIDTH: f32 = 160.0;
pub const TERMINAL_HEIGHT: f32 = 48.0;

pub const STAGE_WIDTH: f32 = 280.0;
pub const STAGE_BASE_HEIGHT: f32 = 88.0;
pub const STAGE_ROW_HEIGHT: f32 = 28.0;
pub const STAGE_VISIBLE_STEPS: usize = 3;

pub const STEP_WIDTH: f32 = 220.0;
pub const STEP_HEIGHT: f32 = 72.0;

/// Height of a stage node holding `step_count` steps.
pub fn stage_height(step_count: usize) -> f32 {
    let rows = step_count.min(STAGE_VISIBLE_STEPS) as f32;
    STAGE_BASE_HEIGHT.max(STAGE_BASE_HEIGHT + rows * STAGE_ROW_HEIGHT)
}

/// Number of step rows listed inside a stage, and the number hidden behind `+N more`.
pub fn visible_step_rows(step_count: usize) -> (usize, usize) {
    let shown = step_count.min(STAGE_VISIBLE_STEPS);
    (shown, step_count - shown)
}

pub fn step_size() -> Size {
    Size::new(STEP_WIDTH, STEP_HEIGHT)
}

/// Looks up the size of a node.
pub fn size_of(data: &NodeData) -> Size {
    match data {
        NodeData::Start | NodeData::End => Size::new(TERMINAL_WIDTH, TERMINAL_HEIGHT),
        NodeData::Stage(stage) => Size::new(STAGE_WIDTH, stage_height(stage.steps().len())),
        NodeData::Step(_) => step_size(),
    }
}
