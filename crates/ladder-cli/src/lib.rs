//! CLI logic for the Ladder workflow diagram tool.
//!
//! Reads a workflow definition, lays it out, optionally overlays progress
//! and saved manual positions, and writes the result as SVG or JSON.

mod args;
mod config;
pub mod error_adapter;

pub use args::{Args, Format};

use std::fs;

use log::{debug, info};

use ladder::{DiagramBuilder, LadderError};

/// Run the Ladder CLI application
///
/// # Errors
///
/// Returns `LadderError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed workflow, progress or position documents
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), LadderError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        format:? = args.format;
        "Processing workflow"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = DiagramBuilder::new(app_config);

    let source = fs::read_to_string(&args.input)?;
    let workflow = builder.parse(&source)?;
    let mut diagram = builder.build(&workflow);

    if let Some(path) = &args.progress {
        let progress = builder.parse_progress(&fs::read_to_string(path)?)?;
        debug!(path, entries_len = progress.len(); "Applying progress overlay");
        diagram = diagram.with_progress(&progress);
    }

    if let Some(path) = &args.positions {
        let saved = builder.parse_positions(&fs::read_to_string(path)?)?;
        debug!(path, entries_len = saved.len(); "Applying saved positions");
        diagram = diagram.with_saved_positions(&saved);
    }

    let output = match args.format {
        Format::Svg => builder.render_svg(&diagram)?,
        Format::Json => builder.render_json(&diagram)?,
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Diagram exported successfully");

    Ok(())
}
