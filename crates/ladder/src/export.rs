//! Diagram exporters.
//!
//! - [`json::Json`] serializes the positioned graph for a rendering client.
//! - [`svg::Svg`] draws a standalone SVG picture of the diagram.

pub mod json;
pub mod svg;

use thiserror::Error;

use crate::Diagram;

/// A single Exporter trait shared by every output format
pub trait Exporter {
    /// Renders the diagram to a string in the exporter's format.
    fn export(&self, diagram: &Diagram) -> Result<String, Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
