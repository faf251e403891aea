//! Type signature parse errors.

use thiserror::Error;

/// Errors from parsing a flattened type string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeSigError {
    /// The input already contains the marker prefix character.
    #[error("Type '{0}' contains the reserved character '#'")]
    ContainsMarker(String),

    /// A `<` with no matching `>`.
    #[error("Unmatched '<' in type '{0}'")]
    UnmatchedOpen(String),

    /// A `>` with no preceding `<`.
    #[error("Unmatched '>' in type '{0}'")]
    UnmatchedClose(String),

    /// A type or generic parameter without a name.
    #[error("Missing type name in '{0}'")]
    EmptyName(String),

    /// A marker that was never recorded or is used twice.
    #[error("Invalid generic parameter marker in '{0}'")]
    InvalidMarker(String),
}
