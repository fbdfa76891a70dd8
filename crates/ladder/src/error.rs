//! Error types for Ladder operations.
//!
//! Layout itself never fails; errors come from reading and decoding input
//! documents and from rendering.

use std::io;

use thiserror::Error;

/// The main error type for Ladder operations.
#[derive(Debug, Error)]
pub enum LadderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid {what}: {err}")]
    Parse {
        what: &'static str,
        err: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl LadderError {
    /// Create a new `Parse` error naming the kind of document that was rejected.
    pub fn new_parse_error(what: &'static str, err: serde_json::Error) -> Self {
        Self::Parse { what, err }
    }
}
