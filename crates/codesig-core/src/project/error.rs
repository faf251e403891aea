//! Project resolution errors.

use thiserror::Error;

/// Errors that stop project resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two declarations claim the same fully-qualified name.
    #[error("Duplicate declaration of '{name}' in {first} and {second}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
}
