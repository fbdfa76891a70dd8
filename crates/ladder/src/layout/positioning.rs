//! Positioning helpers shared by the layout engines and their consumers.

use std::collections::HashMap;

use log::debug;

use ladder_core::geometry::{Bounds, Point, Size};

use crate::graph::Node;

/// Distribute elements vertically with a fixed gap between them.
///
/// # Arguments
/// * `sizes` - Sizes of the elements to stack, top to bottom
/// * `spacing` - Gap between the bottom of one element and the top of the next
///
/// # Returns
/// The top Y offset of each element relative to the top of the stack, and the
/// total height of the stack.
pub fn distribute_vertically(sizes: &[Size], spacing: f32) -> (Vec<f32>, f32) {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut y_position: f32 = 0.0;

    for (i, size) in sizes.iter().enumerate() {
        if i > 0 {
            y_position += spacing;
        }
        offsets.push(y_position);
        y_position += size.height();
    }

    (offsets, y_position)
}

/// Replaces computed positions with manually saved ones.
///
/// Layout output is only a default: a node the user has dragged keeps its
/// saved position. Saved entries for unknown node ids are ignored.
pub fn apply_saved_positions(nodes: &[Node], saved: &HashMap<String, Point>) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| match saved.get(node.id()) {
            Some(&position) => {
                debug!(node_id = node.id(); "Using saved node position");
                node.clone().with_position(position)
            }
            None => node.clone(),
        })
        .collect()
}

/// Returns the box enclosing every node, or `None` when there are no nodes.
pub fn diagram_bounds(nodes: &[Node]) -> Option<Bounds> {
    nodes
        .iter()
        .map(Node::bounds)
        .reduce(|acc, bounds| acc.merge(&bounds))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::graph::NodeData;

    #[test]
    fn test_distribute_vertically_empty() {
        let (offsets, height) = distribute_vertically(&[], 10.0);
        assert!(offsets.is_empty());
        assert_approx_eq!(f32, height, 0.0);
    }

    #[test]
    fn test_distribute_vertically_stacks_with_gap() {
        let sizes = [Size::new(10.0, 20.0), Size::new(10.0, 30.0), Size::new(10.0, 5.0)];
        let (offsets, height) = distribute_vertically(&sizes, 4.0);

        assert_eq!(offsets.len(), 3);
        assert_approx_eq!(f32, offsets[0], 0.0);
        assert_approx_eq!(f32, offsets[1], 24.0);
        assert_approx_eq!(f32, offsets[2], 58.0);
        assert_approx_eq!(f32, height, 63.0);
    }

    #[test]
    fn test_saved_positions_override_computed() {
        let nodes = vec![
            Node::new("start", NodeData::Start).with_position(Point::new(1.0, 2.0)),
            Node::new("end", NodeData::End).with_position(Point::new(3.0, 4.0)),
        ];
        let saved = HashMap::from([
            ("end".to_string(), Point::new(100.0, 200.0)),
            ("ghost".to_string(), Point::new(0.0, 0.0)),
        ]);

        let merged = apply_saved_positions(&nodes, &saved);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].position(), Point::new(1.0, 2.0));
        assert_eq!(merged[1].position(), Point::new(100.0, 200.0));
        // Inputs are untouched
        assert_eq!(nodes[1].position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_diagram_bounds() {
        assert!(diagram_bounds(&[]).is_none());

        let nodes = vec![
            Node::new("start", NodeData::Start).with_position(Point::new(0.0, 0.0)),
            Node::new("end", NodeData::End).with_position(Point::new(40.0, 100.0)),
        ];
        let bounds = diagram_bounds(&nodes).unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.max_x(), 40.0 + nodes[1].size().width());
        assert_approx_eq!(f32, bounds.max_y(), 100.0 + nodes[1].size().height());
    }
}
