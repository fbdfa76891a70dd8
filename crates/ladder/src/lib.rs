//! Ladder - layout engine for approval workflow diagrams.
//!
//! A workflow definition (ordered stages holding ordered steps, or a legacy
//! flat step list) is turned into a node/edge graph and every node is given
//! a position. Staged workflows get a stage-aware layout with stages on a
//! vertical spine and their steps branching to the right; flat workflows are
//! laid out by a generic layered algorithm.

pub mod config;
pub mod export;
pub mod graph;
pub mod layout;
pub mod status;

mod error;

pub use ladder_core::{geometry, workflow};

pub use error::LadderError;

use std::collections::HashMap;

use log::{debug, info, trace};

use config::AppConfig;
use export::Exporter;
use geometry::Point;
use graph::{Graph, Node};
use layout::{Strategy, positioning};
use status::Progress;
use workflow::Workflow;

/// Persisted manual positions, keyed by node id.
pub type SavedPositions = HashMap<String, Point>;

/// A positioned workflow diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    name: String,
    graph: Graph,
    strategy: Strategy,
}

impl Diagram {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The layout strategy the diagram was positioned with.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    /// Returns a copy of the diagram carrying the progress of one work item.
    pub fn with_progress(&self, progress: &Progress) -> Self {
        Self {
            name: self.name.clone(),
            graph: self.graph.with_nodes(status::overlay(self.nodes(), progress)),
            strategy: self.strategy,
        }
    }

    /// Returns a copy of the diagram where persisted manual positions win
    /// over computed ones.
    pub fn with_saved_positions(&self, saved: &SavedPositions) -> Self {
        Self {
            name: self.name.clone(),
            graph: self
                .graph
                .with_nodes(positioning::apply_saved_positions(self.nodes(), saved)),
            strategy: self.strategy,
        }
    }
}

/// Builder for parsing, laying out and rendering workflow diagrams.
///
/// # Examples
///
/// ```rust
/// use ladder::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"{"id": "wf", "name": "Expense", "steps": [
///     {"id": "a", "name": "Manager", "order": 1},
///     {"id": "b", "name": "Finance", "order": 2}
/// ]}"#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let workflow = builder.parse(source).expect("Failed to parse");
/// let diagram = builder.build(&workflow);
///
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.contains("Manager"));
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a workflow definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Parse` if the source is not a valid workflow
    /// definition.
    pub fn parse(&self, source: &str) -> Result<Workflow, LadderError> {
        info!("Parsing workflow definition");
        let workflow: Workflow = serde_json::from_str(source)
            .map_err(|err| LadderError::new_parse_error("workflow definition", err))?;

        debug!(
            workflow_id = workflow.id(),
            stages_len = workflow.stages().len(),
            steps_len = workflow.steps().len();
            "Workflow parsed",
        );
        trace!(workflow:?; "Parsed workflow");
        Ok(workflow)
    }

    /// Parse a progress document mapping stage and step ids to statuses.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Parse` on malformed JSON or unknown statuses.
    pub fn parse_progress(&self, source: &str) -> Result<Progress, LadderError> {
        serde_json::from_str(source).map_err(|err| LadderError::new_parse_error("progress", err))
    }

    /// Parse persisted manual positions keyed by node id.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Parse` on malformed JSON.
    pub fn parse_positions(&self, source: &str) -> Result<SavedPositions, LadderError> {
        serde_json::from_str(source)
            .map_err(|err| LadderError::new_parse_error("saved positions", err))
    }

    /// Build the graph of a workflow and lay it out.
    ///
    /// Layout does not fail: every workflow, including an empty one, yields a
    /// positioned diagram.
    pub fn build(&self, workflow: &Workflow) -> Diagram {
        info!(workflow_id = workflow.id(); "Building workflow graph");
        let graph = Graph::from_workflow(workflow);

        let strategy = Strategy::select(graph.nodes());
        let nodes = layout::layout(graph.nodes(), graph.edges(), self.config.layout());
        info!(strategy:? = strategy, nodes_len = nodes.len(); "Layout calculated");

        Diagram {
            name: workflow.name().to_string(),
            graph: graph.with_nodes(nodes),
            strategy,
        }
    }

    /// Render a positioned diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Export` if the configured style is invalid.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, LadderError> {
        info!("Rendering SVG");
        let svg = export::svg::Svg::new(self.config.style().clone()).export(diagram)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render a positioned diagram to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Export` if serialization fails.
    pub fn render_json(&self, diagram: &Diagram) -> Result<String, LadderError> {
        info!("Rendering JSON");
        let json = export::json::Json::new().with_pretty(true).export(diagram)?;
        Ok(json)
    }
}
