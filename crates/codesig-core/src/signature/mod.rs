//! Structural signatures extracted from source files.
//!
//! Every signature is generic over its type representation: parsing produces
//! `TypeSig` values, project resolution maps them to `ResolvedTypeSig`.

mod access;

use serde::{Deserialize, Serialize};

use crate::token::Position;
use crate::types::{ResolvedTypeSig, TypeSig};

pub use access::AccessModifier;

/// Kind of a declaration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Namespace,
    Class,
    Interface,
    Enum,
}

impl BlockKind {
    /// Block kind introduced by a declaration keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "namespace" | "module" => Some(Self::Namespace),
            "class" | "struct" | "record" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Whether blocks of this kind hold fields and methods.
    pub fn has_members(self) -> bool {
        !matches!(self, Self::Namespace)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespace => write!(f, "namespace"),
            Self::Class => write!(f, "class"),
            Self::Interface => write!(f, "interface"),
            Self::Enum => write!(f, "enum"),
        }
    }
}

/// One annotation argument. Positional arguments are named `arg1`, `arg2`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationArg {
    pub name: String,
    pub value: String,
}

/// A C# attribute or Java/TypeScript annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<AnnotationArg>,
}

impl AnnotationSig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Value of the named argument.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.value.as_str())
    }
}

/// A `using`/`import` statement.
///
/// `path` is the namespace the statement refers to. `names` lists explicitly
/// imported members; empty means the whole namespace. TypeScript imports name
/// a module file instead, kept verbatim in `source` with an empty `path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportSig {
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ImportSig {
    pub fn namespace(path: Vec<String>) -> Self {
        Self {
            path,
            names: Vec::new(),
            alias: None,
            is_static: false,
            source: None,
        }
    }

    /// Whether the statement brings `name` into scope by alias or by listing it.
    ///
    /// An alias hides the name it stands for.
    pub fn imports_name(&self, name: &str) -> bool {
        match &self.alias {
            Some(alias) => alias == name,
            None => self.names.iter().any(|n| n == name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSig<T = TypeSig> {
    pub name: String,
    pub full_name: Vec<String>,
    #[serde(rename = "type")]
    pub type_sig: T,
    pub modifiers: Vec<String>,
    pub annotations: Vec<AnnotationSig>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSig<T = TypeSig> {
    pub name: String,
    #[serde(rename = "type")]
    pub type_sig: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationSig>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig<T = TypeSig> {
    pub name: String,
    pub full_name: Vec<String>,
    pub return_type: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_params: Vec<TypeSig>,
    pub params: Vec<ParameterSig<T>>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<AnnotationSig>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberSig {
    pub name: String,
    pub full_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub annotations: Vec<AnnotationSig>,
    pub comments: Vec<String>,
}

/// A class, interface, enum or namespace declaration with its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSig<T = TypeSig> {
    pub full_name: Vec<String>,
    pub kind: BlockKind,
    /// Keyword that introduced the block, e.g. `struct` for a C# struct.
    pub declaration: String,
    pub access: AccessModifier,
    pub modifiers: Vec<String>,
    pub generic_params: Vec<TypeSig>,
    pub extends: Option<T>,
    pub implements: Vec<T>,
    pub annotations: Vec<AnnotationSig>,
    pub comments: Vec<String>,
    pub fields: Vec<FieldSig<T>>,
    pub methods: Vec<MethodSig<T>>,
    pub enum_members: Vec<EnumMemberSig>,
    pub imports: Vec<ImportSig>,
    pub position: Position,
}

/// Block signature after project resolution.
pub type ResolvedBlockSig = BlockSig<ResolvedTypeSig>;

impl<T> BlockSig<T> {
    pub fn simple_name(&self) -> &str {
        self.full_name.last().map(String::as_str).unwrap_or_default()
    }

    /// Fully-qualified name joined with `.`.
    pub fn full_name_string(&self) -> String {
        self.full_name.join(".")
    }

    /// Enclosing scope of the block (its full name without the last part).
    pub fn scope(&self) -> &[String] {
        &self.full_name[..self.full_name.len().saturating_sub(1)]
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Rebuild the signature with every type reference mapped through `f`.
    pub fn map_types<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<BlockSig<U>, E> {
        self.map_types_with(|sig, _| f(sig))
    }

    /// Like `map_types`, but `f` also receives the generic parameters of the
    /// method a reference belongs to (empty outside methods).
    pub fn map_types_with<U, E>(
        &self,
        mut f: impl FnMut(&T, &[TypeSig]) -> Result<U, E>,
    ) -> Result<BlockSig<U>, E> {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                Ok(FieldSig {
                    name: field.name.clone(),
                    full_name: field.full_name.clone(),
                    type_sig: f(&field.type_sig, &[])?,
                    modifiers: field.modifiers.clone(),
                    annotations: field.annotations.clone(),
                    comments: field.comments.clone(),
                })
            })
            .collect::<Result<Vec<_>, E>>()?;

        let mut methods = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            let params = method
                .params
                .iter()
                .map(|param| {
                    Ok(ParameterSig {
                        name: param.name.clone(),
                        type_sig: f(&param.type_sig, &method.generic_params)?,
                        modifiers: param.modifiers.clone(),
                        annotations: param.annotations.clone(),
                        optional: param.optional,
                        default_value: param.default_value.clone(),
                    })
                })
                .collect::<Result<Vec<_>, E>>()?;
            methods.push(MethodSig {
                name: method.name.clone(),
                full_name: method.full_name.clone(),
                return_type: f(&method.return_type, &method.generic_params)?,
                generic_params: method.generic_params.clone(),
                params,
                modifiers: method.modifiers.clone(),
                annotations: method.annotations.clone(),
                comments: method.comments.clone(),
            });
        }

        Ok(BlockSig {
            full_name: self.full_name.clone(),
            kind: self.kind,
            declaration: self.declaration.clone(),
            access: self.access,
            modifiers: self.modifiers.clone(),
            generic_params: self.generic_params.clone(),
            extends: self.extends.as_ref().map(|sig| f(sig, &[])).transpose()?,
            implements: self
                .implements
                .iter()
                .map(|sig| f(sig, &[]))
                .collect::<Result<Vec<_>, E>>()?,
            annotations: self.annotations.clone(),
            comments: self.comments.clone(),
            fields,
            methods,
            enum_members: self.enum_members.clone(),
            imports: self.imports.clone(),
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> BlockSig {
        BlockSig {
            full_name: vec!["N".into(), "A".into()],
            kind: BlockKind::Class,
            declaration: "class".into(),
            access: AccessModifier::Public,
            modifiers: vec!["public".into()],
            generic_params: Vec::new(),
            extends: Some(TypeSig::simple("Base")),
            implements: vec![TypeSig::simple("IFoo")],
            annotations: Vec::new(),
            comments: Vec::new(),
            fields: vec![FieldSig {
                name: "x".into(),
                full_name: vec!["N".into(), "A".into(), "x".into()],
                type_sig: TypeSig::simple("int"),
                modifiers: Vec::new(),
                annotations: Vec::new(),
                comments: Vec::new(),
            }],
            methods: Vec::new(),
            enum_members: Vec::new(),
            imports: Vec::new(),
            position: Position::default(),
        }
    }

    #[test]
    fn test_block_kind_keywords() {
        assert_eq!(BlockKind::from_keyword("struct"), Some(BlockKind::Class));
        assert_eq!(BlockKind::from_keyword("module"), Some(BlockKind::Namespace));
        assert_eq!(BlockKind::from_keyword("void"), None);
        assert!(!BlockKind::Namespace.has_members());
    }

    #[test]
    fn test_names() {
        let block = block();
        assert_eq!(block.simple_name(), "A");
        assert_eq!(block.full_name_string(), "N.A");
        assert_eq!(block.scope(), &["N".to_string()]);
    }

    #[test]
    fn test_map_types_visits_every_reference() {
        let mut seen = Vec::new();
        let mapped: BlockSig<String> = block()
            .map_types(|sig| {
                seen.push(sig.name.clone());
                Ok::<_, ()>(sig.name.to_uppercase())
            })
            .unwrap();
        assert_eq!(seen, vec!["int", "Base", "IFoo"]);
        assert_eq!(mapped.extends.as_deref(), Some("BASE"));
        assert_eq!(mapped.fields[0].type_sig, "INT");
    }

    #[test]
    fn test_annotation_argument_lookup() {
        let annotation = AnnotationSig {
            name: "WebInvoke".into(),
            arguments: vec![AnnotationArg {
                name: "Method".into(),
                value: "POST".into(),
            }],
        };
        assert_eq!(annotation.argument("Method"), Some("POST"));
        assert_eq!(annotation.argument("UriTemplate"), None);
    }
}
