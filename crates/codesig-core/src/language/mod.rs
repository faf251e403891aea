//! Built-in language definitions.
//!
//! A `LanguageDefinition` bundles everything the tokenizer and the
//! extractors need to know about one language: the ordered recognizer
//! rules, the keyword capability table, access defaulting and the few
//! syntactic switches where the languages differ.

mod csharp;
mod java;
pub mod keywords;
mod typescript;

use serde::{Deserialize, Serialize};

use crate::signature::{AccessModifier, BlockKind};
use crate::token::{Token, TokenKind};
use crate::tokenizer::RecognizerSet;

pub use keywords::{Capability, KeywordTable};

/// Generic nesting depth the tokenizer accepts inside identifiers by default.
pub const DEFAULT_MAX_GENERIC_DEPTH: usize = 3;

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    Java,
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::CSharp, Language::Java, Language::TypeScript];

    pub fn name(self) -> &'static str {
        match self {
            Self::CSharp => "csharp",
            Self::Java => "java",
            Self::TypeScript => "typescript",
        }
    }

    /// File extensions, lowercase and without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::CSharp => &["cs"],
            Self::Java => &["java"],
            Self::TypeScript => &["ts", "tsx", "mts", "cts"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csharp" | "c#" | "cs" => Some(Self::CSharp),
            "java" => Some(Self::Java),
            "typescript" | "ts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Definition with the default generic depth.
    pub fn definition(self) -> LanguageDefinition {
        LanguageDefinition::new(self, DEFAULT_MAX_GENERIC_DEPTH)
    }

    pub fn definition_with_depth(self, max_generic_depth: usize) -> LanguageDefinition {
        LanguageDefinition::new(self, max_generic_depth)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Order of the type and the name in a member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSyntax {
    /// `int count;`, `void run(int x) {}`
    TypeFirst,
    /// `count: number;`, `run(x: number): void {}`
    NameFirst,
}

/// How annotations are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStyle {
    /// `[Name(args)]`
    Bracketed,
    /// `@Name(args)`
    AtPrefixed,
}

/// Everything language-specific the core needs.
#[derive(Debug)]
pub struct LanguageDefinition {
    language: Language,
    max_generic_depth: usize,
    recognizers: RecognizerSet,
}

impl LanguageDefinition {
    pub fn new(language: Language, max_generic_depth: usize) -> Self {
        let rules = match language {
            Language::CSharp => csharp::rules(max_generic_depth),
            Language::Java => java::rules(max_generic_depth),
            Language::TypeScript => typescript::rules(max_generic_depth),
        };
        Self {
            language,
            max_generic_depth,
            recognizers: RecognizerSet::new(rules),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn max_generic_depth(&self) -> usize {
        self.max_generic_depth
    }

    pub fn recognizers(&self) -> &RecognizerSet {
        &self.recognizers
    }

    pub fn keywords(&self) -> &'static KeywordTable {
        match self.language {
            Language::CSharp => &csharp::KEYWORDS,
            Language::Java => &java::KEYWORDS,
            Language::TypeScript => &typescript::KEYWORDS,
        }
    }

    pub fn member_syntax(&self) -> MemberSyntax {
        match self.language {
            Language::CSharp | Language::Java => MemberSyntax::TypeFirst,
            Language::TypeScript => MemberSyntax::NameFirst,
        }
    }

    pub fn annotation_style(&self) -> AnnotationStyle {
        match self.language {
            Language::CSharp => AnnotationStyle::Bracketed,
            Language::Java | Language::TypeScript => AnnotationStyle::AtPrefixed,
        }
    }

    /// C# base lists follow a `:`; the others use `extends`/`implements`.
    pub fn is_inheritance(&self, token: &Token) -> bool {
        match self.language {
            Language::CSharp => token.is_operator(":"),
            Language::Java | Language::TypeScript => {
                token.kind == TokenKind::Keyword && self.keywords().is_inheritance(&token.text)
            }
        }
    }

    /// Whether `word` modifies a parameter at `position` within its list.
    /// C# `this` only marks the first parameter of an extension method.
    pub fn is_parameter_modifier(&self, word: &str, position: usize) -> bool {
        if self.language == Language::CSharp && word == "this" {
            return position == 0;
        }
        self.keywords().is_parameter_modifier(word)
    }

    /// Type names that are never project references: type keywords plus
    /// the types the language provides implicitly.
    pub fn is_builtin_type(&self, name: &str) -> bool {
        let implicit = match self.language {
            Language::CSharp => csharp::IMPLICIT_TYPES,
            Language::Java => java::IMPLICIT_TYPES,
            Language::TypeScript => typescript::IMPLICIT_TYPES,
        };
        self.keywords().is_type(name) || implicit.contains(&name)
    }

    /// Whether a `{` block directly after a member name is a property body.
    pub fn has_property_blocks(&self) -> bool {
        self.language == Language::CSharp
    }

    /// Access derived from explicit modifiers, if any are present.
    pub fn access_from_modifiers(&self, modifiers: &[String]) -> Option<AccessModifier> {
        match self.language {
            Language::CSharp => csharp::access_from_modifiers(modifiers),
            Language::Java => java::access_from_modifiers(modifiers),
            Language::TypeScript => typescript::access_from_modifiers(modifiers),
        }
    }

    /// Access of a block without explicit modifiers, given its enclosing block.
    pub fn default_access(&self, kind: BlockKind, parent: Option<BlockKind>) -> AccessModifier {
        match self.language {
            Language::CSharp => csharp::default_access(kind, parent),
            Language::Java => java::default_access(kind, parent),
            Language::TypeScript => typescript::default_access(kind, parent),
        }
    }

    pub fn access(&self, modifiers: &[String], kind: BlockKind, parent: Option<BlockKind>) -> AccessModifier {
        self.access_from_modifiers(modifiers)
            .unwrap_or_else(|| self.default_access(kind, parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_keyword_tables_are_sorted() {
        for lang in Language::ALL {
            let def = lang.definition();
            let words: Vec<&str> = def.keywords().keywords().collect();
            let mut sorted = words.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(words, sorted, "{} keyword table is not sorted", lang);
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("cs"), Some(Language::CSharp));
        assert_eq!(Language::from_extension(".JAVA"), Some(Language::Java));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_default_access_is_total() {
        let kinds = [BlockKind::Namespace, BlockKind::Class, BlockKind::Interface, BlockKind::Enum];
        for lang in Language::ALL {
            let def = lang.definition();
            for kind in kinds {
                def.default_access(kind, None);
                for parent in kinds {
                    def.default_access(kind, Some(parent));
                }
            }
        }
    }

    #[test]
    fn test_csharp_access() {
        let def = Language::CSharp.definition();
        assert_eq!(
            def.default_access(BlockKind::Class, Some(BlockKind::Namespace)),
            AccessModifier::NamespaceLocal
        );
        assert_eq!(
            def.default_access(BlockKind::Class, Some(BlockKind::Class)),
            AccessModifier::Private
        );
        assert_eq!(
            def.default_access(BlockKind::Class, Some(BlockKind::Interface)),
            AccessModifier::Public
        );
        assert_eq!(
            def.access_from_modifiers(&strings(&["protected", "internal"])),
            Some(AccessModifier::NamespaceOrInheritanceLocal)
        );
        assert_eq!(
            def.access_from_modifiers(&strings(&["internal"])),
            Some(AccessModifier::NamespaceLocal)
        );
        assert_eq!(def.access_from_modifiers(&strings(&["static"])), None);
    }

    #[test]
    fn test_java_access() {
        let def = Language::Java.definition();
        assert_eq!(
            def.access(&[], BlockKind::Class, Some(BlockKind::Class)),
            AccessModifier::NamespaceLocal
        );
        assert_eq!(
            def.access(&[], BlockKind::Class, Some(BlockKind::Interface)),
            AccessModifier::Public
        );
        assert_eq!(
            def.access(&strings(&["protected"]), BlockKind::Class, None),
            AccessModifier::NamespaceOrInheritanceLocal
        );
    }

    #[test]
    fn test_typescript_access() {
        let def = Language::TypeScript.definition();
        assert_eq!(def.access(&[], BlockKind::Class, None), AccessModifier::NamespaceLocal);
        assert_eq!(
            def.access(&strings(&["export"]), BlockKind::Class, None),
            AccessModifier::Public
        );
    }

    #[test]
    fn test_csharp_this_modifier_position() {
        let def = Language::CSharp.definition();
        assert!(def.is_parameter_modifier("this", 0));
        assert!(!def.is_parameter_modifier("this", 1));
        assert!(def.is_parameter_modifier("ref", 2));
    }

    #[test]
    fn test_inheritance_tokens() {
        let colon = Token::new(TokenKind::Operator, Default::default(), ":");
        let extends = Token::new(TokenKind::Keyword, Default::default(), "extends");
        assert!(Language::CSharp.definition().is_inheritance(&colon));
        assert!(!Language::CSharp.definition().is_inheritance(&extends));
        assert!(Language::Java.definition().is_inheritance(&extends));
        assert!(Language::TypeScript.definition().is_inheritance(&extends));
    }

    #[test]
    fn test_builtin_types() {
        let java = Language::Java.definition();
        assert!(java.is_builtin_type("int"));
        assert!(java.is_builtin_type("String"));
        assert!(java.is_builtin_type("void"));
        assert!(!java.is_builtin_type("List"));
        let csharp = Language::CSharp.definition();
        assert!(csharp.is_builtin_type("string"));
        assert!(!csharp.is_builtin_type("String"));
        assert!(Language::TypeScript.definition().is_builtin_type("Promise"));
    }
}
