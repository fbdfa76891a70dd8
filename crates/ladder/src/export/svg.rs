//! SVG export of a positioned diagram.

use std::collections::HashMap;

use log::debug;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use ladder_core::geometry::{Bounds, Point};

use super::{Error, Exporter};
use crate::{
    Diagram,
    config::StyleConfig,
    graph::{Edge, Node, NodeData},
    layout::{dimensions, positioning},
};

const MARGIN: f32 = 40.0;
const FONT_SIZE: f32 = 14.0;
const SMALL_FONT_SIZE: f32 = 12.0;
const DEFAULT_FILL: &str = "#ffffff";
const STROKE: &str = "#4b5563";
const ARROW_MARKER_ID: &str = "arrow";

/// SVG exporter
pub struct Svg {
    style: StyleConfig,
}

impl Svg {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    fn render(&self, diagram: &Diagram) -> Result<Document, Error> {
        let nodes = diagram.graph().nodes();
        let bounds = positioning::diagram_bounds(nodes).unwrap_or_default();
        let width = bounds.width() + MARGIN * 2.0;
        let height = bounds.height() + MARGIN * 2.0;

        debug!(width, height; "Final SVG dimensions");

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(self.marker_definitions());

        let background = self.style.background_color().map_err(Error::Render)?;
        if let Some(color) = background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", color.to_string()),
            );
        }

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - bounds.min_x(),
                MARGIN - bounds.min_y()
            ),
        );

        // Edges are drawn first so that nodes cover their ends
        let by_id: HashMap<&str, &Node> = nodes.iter().map(|node| (node.id(), node)).collect();
        for edge in diagram.graph().edges() {
            if let (Some(source), Some(target)) =
                (by_id.get(edge.source()), by_id.get(edge.target()))
            {
                main_group = main_group.add(self.render_edge(edge, source, target));
            }
        }

        for node in nodes {
            main_group = main_group.add(self.render_node(node));
        }

        Ok(doc.add(main_group))
    }

    fn marker_definitions(&self) -> svg_element::Definitions {
        let marker = svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", STROKE),
            );
        svg_element::Definitions::new().add(marker)
    }

    fn render_edge(&self, edge: &Edge, source: &Node, target: &Node) -> svg_element::Path {
        svg_element::Path::new()
            .set("id", edge.id())
            .set("d", smooth_path_data(source.bounds(), target.bounds()))
            .set("fill", "none")
            .set("stroke", STROKE)
            .set("stroke-width", 1.5)
            .set("marker-end", format!("url(#{ARROW_MARKER_ID})"))
    }

    fn render_node(&self, node: &Node) -> svg_element::Group {
        let bounds = node.bounds();
        let fill = node
            .status()
            .map(|status| status.fill_color())
            .unwrap_or(DEFAULT_FILL);
        let radius = match node.data() {
            NodeData::Start | NodeData::End => bounds.height() / 2.0,
            NodeData::Stage(_) | NodeData::Step(_) => 6.0,
        };

        let mut group = svg_element::Group::new().set("id", node.id()).add(
            svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("rx", radius)
                .set("fill", fill)
                .set("stroke", STROKE),
        );

        for text in self.node_text(node) {
            group = group.add(text);
        }

        group
    }

    fn node_text(&self, node: &Node) -> Vec<svg_element::Text> {
        let bounds = node.bounds();
        let center_x = bounds.center().x();

        match node.data() {
            NodeData::Start | NodeData::End => {
                vec![self.text(node.label(), bounds.center(), FONT_SIZE)]
            }
            NodeData::Stage(stage) => {
                let mut lines = vec![
                    self.text(
                        stage.name(),
                        Point::new(center_x, bounds.min_y() + 24.0),
                        FONT_SIZE,
                    ),
                    self.text(
                        &stage.policy_label(),
                        Point::new(center_x, bounds.min_y() + 48.0),
                        SMALL_FONT_SIZE,
                    ),
                ];

                let (shown, hidden) = dimensions::visible_step_rows(stage.steps().len());
                let mut row_y = bounds.min_y() + dimensions::STAGE_BASE_HEIGHT - 16.0;
                for step in stage.steps().iter().take(shown) {
                    lines.push(self.text(
                        step.name(),
                        Point::new(center_x, row_y),
                        SMALL_FONT_SIZE,
                    ));
                    row_y += dimensions::STAGE_ROW_HEIGHT;
                }
                if hidden > 0 {
                    // The overflow line sits in the stage's bottom padding
                    lines.push(self.text(
                        &format!("+{hidden} more"),
                        Point::new(center_x, bounds.max_y() - 12.0),
                        SMALL_FONT_SIZE,
                    ));
                }
                lines
            }
            NodeData::Step(data) => {
                let step = data.step();
                let mut detail = match step.approval_policy() {
                    Some(policy) => format!("{policy} · order {}", step.order()),
                    None => format!("order {}", step.order()),
                };
                if data.is_parallel() {
                    detail.push_str(" · parallel");
                }

                vec![
                    self.text(
                        step.name(),
                        Point::new(center_x, bounds.min_y() + 26.0),
                        FONT_SIZE,
                    ),
                    self.text(
                        &detail,
                        Point::new(center_x, bounds.min_y() + 50.0),
                        SMALL_FONT_SIZE,
                    ),
                ]
            }
        }
    }

    fn text(&self, content: &str, position: Point, font_size: f32) -> svg_element::Text {
        svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.style.font_family())
            .set("font-size", font_size)
            .add(SvgText::new(content))
    }
}

impl Exporter for Svg {
    fn export(&self, diagram: &Diagram) -> Result<String, Error> {
        let doc = self.render(diagram)?;
        debug!("SVG document rendered");
        Ok(doc.to_string())
    }
}

/// Creates a cubic bezier between two boxes.
///
/// Targets to the right of the source are joined side to side, everything
/// else bottom to top.
fn smooth_path_data(source: Bounds, target: Bounds) -> String {
    let (start, end, horizontal) = if target.min_x() >= source.max_x() {
        (
            Point::new(source.max_x(), source.center().y()),
            Point::new(target.min_x(), target.center().y()),
            true,
        )
    } else {
        (
            Point::new(source.center().x(), source.max_y()),
            Point::new(target.center().x(), target.min_y()),
            false,
        )
    };

    let (ctrl1, ctrl2) = if horizontal {
        let mid_x = (start.x() + end.x()) / 2.0;
        (start.with_x(mid_x), end.with_x(mid_x))
    } else {
        let mid_y = (start.y() + end.y()) / 2.0;
        (start.with_y(mid_y), end.with_y(mid_y))
    };

    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        start.x(),
        start.y(),
        ctrl1.x(),
        ctrl1.y(),
        ctrl2.x(),
        ctrl2.y(),
        end.x(),
        end.y()
    )
}
