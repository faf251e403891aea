use serde::{Deserialize, Serialize};

/// Effective visibility of a declaration, independent of language keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessModifier {
    Public,
    Private,
    /// Visible to subclasses only (C# `protected`).
    InheritanceLocal,
    /// Visible inside the namespace/package/assembly (C# `internal`, Java package-private).
    NamespaceLocal,
    /// Visible to the namespace and to subclasses (C# `protected internal`, Java `protected`).
    NamespaceOrInheritanceLocal,
}

impl std::fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::InheritanceLocal => write!(f, "inheritance-local"),
            Self::NamespaceLocal => write!(f, "namespace-local"),
            Self::NamespaceOrInheritanceLocal => write!(f, "namespace-or-inheritance-local"),
        }
    }
}
