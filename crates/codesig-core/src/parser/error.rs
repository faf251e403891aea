//! Per-file parse errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::tokenizer::TokenizeError;
use crate::types::TypeSigError;

/// Errors that abort the parse of one file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The tokenizer rejected the file.
    #[error("Failed to tokenize {source_id}: {error}")]
    Tokenize {
        source_id: String,
        #[source]
        error: TokenizeError,
    },

    /// A member type could not be parsed and the policy is to fail the file.
    #[error("Malformed type '{text}' in {source_id}: {error}")]
    MalformedType {
        source_id: String,
        text: String,
        #[source]
        error: TypeSigError,
    },

    /// No registered parser handles the file.
    #[error("No parser registered for {0}")]
    Unsupported(String),

    /// The file is larger than the configured limit.
    #[error("{source_id} is {size} bytes, over the {limit} byte limit")]
    TooLarge { source_id: String, size: u64, limit: u64 },

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
