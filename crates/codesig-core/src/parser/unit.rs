//! Compilation units: the parsed form of one source file.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ParseError;
use super::stats::ParseMetrics;
use crate::discovery::discover;
use crate::extract::MemberTypeError;
use crate::language::{Language, LanguageDefinition};
use crate::signature::{BlockKind, BlockSig, ImportSig};
use crate::token::TokenTree;
use crate::tokenizer::tokenize;

/// What to do with a member whose type string cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTypePolicy {
    /// Drop the member and record a warning.
    #[default]
    SkipMember,
    /// Fail the whole file.
    FailFile,
}

/// Parsed source file. Immutable once built.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub source_id: String,
    pub language: Language,
    pub tree: TokenTree,
    /// Class, interface and enum declarations, enclosing before nested.
    pub blocks: Vec<BlockSig>,
    pub imports: Vec<ImportSig>,
    /// Namespaces and packages the file declares.
    pub namespaces: Vec<Vec<String>>,
    pub warnings: Vec<String>,
    pub metrics: ParseMetrics,
}

impl CompilationUnit {
    /// Block with the given dotted full name.
    pub fn block(&self, full_name: &str) -> Option<&BlockSig> {
        self.blocks.iter().find(|block| block.full_name_string() == full_name)
    }
}

/// Warnings for skipped members, or the first malformed type as an error.
fn apply_policy(
    source_id: &str,
    type_errors: Vec<MemberTypeError>,
    policy: MalformedTypePolicy,
) -> Result<Vec<String>, ParseError> {
    let mut warnings = Vec::with_capacity(type_errors.len());
    for malformed in type_errors {
        if policy == MalformedTypePolicy::FailFile {
            return Err(ParseError::MalformedType {
                source_id: source_id.to_string(),
                text: malformed.text,
                error: malformed.error,
            });
        }
        warn!(source = source_id, text = %malformed.text, "skipped member with malformed type");
        warnings.push(format!("Skipped '{}': {}", malformed.text, malformed.error));
    }
    Ok(warnings)
}

/// Tokenize `text`, discover its blocks and extract their members.
pub fn parse_source(
    source_id: &str,
    text: &str,
    language: &LanguageDefinition,
    policy: MalformedTypePolicy,
) -> Result<CompilationUnit, ParseError> {
    let tree = tokenize(text, language).map_err(|error| ParseError::Tokenize {
        source_id: source_id.to_string(),
        error,
    })?;
    let discovery = discover(&tree, language);

    let warnings = apply_policy(source_id, discovery.type_errors, policy)?;

    let mut metrics = discovery.metrics;
    metrics.files = 1;
    metrics.tokens = tree.len() - 1;

    let blocks: Vec<BlockSig> = discovery
        .blocks
        .into_iter()
        .map(|found| found.signature)
        .filter(|block| block.kind != BlockKind::Namespace)
        .collect();
    debug!(source = source_id, blocks = blocks.len(), tokens = metrics.tokens, "parsed file");

    Ok(CompilationUnit {
        source_id: source_id.to_string(),
        language: language.language(),
        tree,
        blocks,
        imports: discovery.imports,
        namespaces: discovery.namespaces,
        warnings,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeSigError;

    #[test]
    fn test_parse_source_builds_unit() {
        let def = Language::CSharp.definition();
        let unit = parse_source(
            "A.cs",
            "using System;\nnamespace N { class A { int x; } }",
            &def,
            MalformedTypePolicy::SkipMember,
        )
        .unwrap();
        assert_eq!(unit.source_id, "A.cs");
        assert_eq!(unit.blocks.len(), 1);
        assert!(unit.block("N.A").is_some());
        assert_eq!(unit.namespaces, vec![vec!["N".to_string()]]);
        assert_eq!(unit.imports.len(), 1);
        assert_eq!(unit.metrics.files, 1);
        assert_eq!(unit.metrics.fields, 1);
        assert!(unit.metrics.tokens > 0);
    }

    #[test]
    fn test_tokenize_error_names_source() {
        let def = Language::Java.definition();
        let err = parse_source("Bad.java", "class A {", &def, MalformedTypePolicy::SkipMember).unwrap_err();
        assert!(matches!(err, ParseError::Tokenize { .. }));
        assert!(err.to_string().contains("Bad.java"));
    }

    #[test]
    fn test_malformed_type_policy() {
        let malformed = || {
            vec![MemberTypeError {
                text: "Map<K".to_string(),
                error: TypeSigError::UnmatchedOpen("Map<K".to_string()),
            }]
        };
        let warnings = apply_policy("A.cs", malformed(), MalformedTypePolicy::SkipMember).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Map<K"));

        let err = apply_policy("A.cs", malformed(), MalformedTypePolicy::FailFile).unwrap_err();
        assert!(matches!(err, ParseError::MalformedType { ref text, .. } if text == "Map<K"));
        assert!(apply_policy("A.cs", Vec::new(), MalformedTypePolicy::FailFile).unwrap().is_empty());
    }
}
