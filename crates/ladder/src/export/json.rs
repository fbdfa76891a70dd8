//! JSON export of a positioned diagram.

use serde::Serialize;

use super::{Error, Exporter};
use crate::{
    Diagram,
    graph::{Edge, Node},
};

#[derive(Serialize)]
struct Document<'a> {
    name: &'a str,
    strategy: &'static str,
    nodes: &'a [Node],
    edges: &'a [Edge],
}

/// Serializes nodes (with position, size and status) and edges.
#[derive(Debug, Default)]
pub struct Json {
    pretty: bool,
}

impl Json {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable indented output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for Json {
    fn export(&self, diagram: &Diagram) -> Result<String, Error> {
        let document = Document {
            name: diagram.name(),
            strategy: diagram.strategy().name(),
            nodes: diagram.graph().nodes(),
            edges: diagram.graph().edges(),
        };

        let output = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(output)
    }
}
