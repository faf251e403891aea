//! Workflow errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::ParseError;
use crate::project::ResolveError;

/// Errors raised while loading, parsing, resolving or writing a project.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {}: {message}", path.display())]
    Serialize { path: PathBuf, message: String },

    #[error("Invalid destination '{value}': {reason}")]
    InvalidDestination { value: String, reason: String },

    /// The blocking parse task panicked or was cancelled.
    #[error("Parse task for {source_id} failed: {message}")]
    Join { source_id: String, message: String },

    #[error("Parsing {source_id} timed out after {seconds}s")]
    Timeout { source_id: String, seconds: u64 },
}

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
