//! Error types for the export pipeline
//!
//! Only run-fatal conditions live here. Per-file problems are recorded as
//! diagnostics (see `model::Diagnostic`) and never abort a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised by the export pipeline
#[derive(Error, Debug)]
pub enum ExportError {
    /// Invalid or contradictory configuration, detected before enumeration
    #[error("configuration error: {0}")]
    Config(String),

    /// A glob pattern that failed to compile
    #[error("invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    /// The export root cannot be resolved or read
    #[error("cannot read root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source lister could not produce a candidate list
    #[error("{lister} listing failed: {message}")]
    Listing {
        lister: &'static str,
        message: String,
    },

    /// The output destination cannot be written
    #[error("cannot write output {destination}: {source}")]
    Output {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// Serializing a chunk record failed
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExportError {
    pub fn config(message: impl Into<String>) -> Self {
        ExportError::Config(message.into())
    }

    /// Whether the error was raised before any output could be produced
    pub fn is_config(&self) -> bool {
        matches!(self, ExportError::Config(_) | ExportError::Glob { .. })
    }
}

/// Specialized Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ExportError>;
