//! Command-line argument definitions for the Ladder CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! optional progress and saved-position overlays, configuration file
//! selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Output format of the rendered diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Standalone SVG picture
    #[default]
    Svg,
    /// Positioned nodes and edges for a rendering client
    Json,
}

/// Command-line arguments for the Ladder workflow diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the workflow definition (JSON)
    #[arg(help = "Path to the workflow definition file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    pub format: Format,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to a progress file (JSON map of stage/step id to status)
    #[arg(short, long)]
    pub progress: Option<String>,

    /// Path to saved manual positions (JSON map of node id to {x, y})
    #[arg(long)]
    pub positions: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
