//! Type signatures: parsed shapes of type references such as
//! `IDictionary<string, List<int>>[]`.
//!
//! ## Components
//!
//! - `TypeSig` - Unresolved signature as written in source
//! - `ResolvedTypeSig` - Signature with a fully-qualified name, produced by project resolution
//! - `parse` - Marker-substitution parser for flattened type strings

mod error;
mod parser;

use serde::{Deserialize, Serialize};

pub use error::TypeSigError;
pub use parser::parse;

/// Name of an unbounded Java wildcard argument (`?`).
pub const WILDCARD: &str = "?";
/// Name of `? extends T`; the bound is the only parameter.
pub const WILDCARD_EXTENDS: &str = "? extends";
/// Name of `? super T`; the bound is the only parameter.
pub const WILDCARD_SUPER: &str = "? super";

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// A type reference as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSig {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub array_dimensions: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeSig>,
}

impl TypeSig {
    /// A plain, non-generic, non-array type.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            array_dimensions: 0,
            params: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, TypeSigError> {
        parse(text)
    }

    /// Dotted name split into its parts.
    pub fn name_parts(&self) -> Vec<String> {
        self.name.split('.').map(str::to_string).collect()
    }

    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    /// Java wildcard argument, bounded or not.
    pub fn is_wildcard(&self) -> bool {
        is_wildcard_name(&self.name)
    }
}

fn is_wildcard_name(name: &str) -> bool {
    matches!(name, WILDCARD | WILDCARD_EXTENDS | WILDCARD_SUPER)
}

impl std::str::FromStr for TypeSig {
    type Err = TypeSigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn write_shape<P: std::fmt::Display>(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    params: &[P],
    array_dimensions: u32,
    nullable: bool,
) -> std::fmt::Result {
    if is_wildcard_name(name) && params.len() == 1 {
        return write!(f, "{} {}", name, params[0]);
    }
    f.write_str(name)?;
    if !params.is_empty() {
        f.write_str("<")?;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(">")?;
    }
    for _ in 0..array_dimensions {
        f.write_str("[]")?;
    }
    if nullable {
        f.write_str("?")?;
    }
    Ok(())
}

/// Canonical flattened form, accepted back by `parse`.
impl std::fmt::Display for TypeSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_shape(f, &self.name, &self.params, self.array_dimensions, self.nullable)
    }
}

/// How a type reference was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Matched a block declared somewhere in the project.
    Project,
    /// A language type keyword such as `int` or `string`.
    Builtin,
    /// A generic parameter of an enclosing block or method.
    TypeParameter,
    /// Nothing matched; the name is kept as written.
    Unresolved,
}

/// A type reference after project resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedTypeSig {
    pub name: String,
    pub full_name: Vec<String>,
    pub resolution: Resolution,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub array_dimensions: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ResolvedTypeSig>,
}

impl ResolvedTypeSig {
    /// Fully-qualified name joined with `.`.
    pub fn full_name_string(&self) -> String {
        self.full_name.join(".")
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution != Resolution::Unresolved
    }
}

impl std::fmt::Display for ResolvedTypeSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_shape(f, &self.full_name_string(), &self.params, self.array_dimensions, self.nullable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_form() {
        let sig = TypeSig::parse("Map<String,List<int?>>[]?").unwrap();
        assert_eq!(sig.to_string(), "Map<String, List<int?>>[]?");
    }

    #[test]
    fn test_round_trip_through_display() {
        for text in ["a", "a<b>", "a<b, c<d[]>>[][]", "x.y.Z<T?>?"] {
            let sig: TypeSig = text.parse().unwrap();
            assert_eq!(TypeSig::parse(&sig.to_string()).unwrap(), sig);
        }
    }

    #[test]
    fn test_serialization_skips_defaults() {
        let json = serde_json::to_string(&TypeSig::simple("int")).unwrap();
        assert_eq!(json, r#"{"name":"int"}"#);
    }

    #[test]
    fn test_resolved_display_uses_full_name() {
        let sig = ResolvedTypeSig {
            name: "List".into(),
            full_name: vec!["System".into(), "List".into()],
            resolution: Resolution::Project,
            nullable: false,
            array_dimensions: 1,
            params: Vec::new(),
        };
        assert_eq!(sig.to_string(), "System.List[]");
    }
}
