//! Parser built from a language definition.

use super::error::ParseError;
use super::traits::SourceParser;
use super::unit::{parse_source, CompilationUnit, MalformedTypePolicy};
use crate::language::{Language, LanguageDefinition, DEFAULT_MAX_GENERIC_DEPTH};

/// Options shared by every language parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_generic_depth: usize,
    pub malformed_types: MalformedTypePolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_generic_depth: DEFAULT_MAX_GENERIC_DEPTH,
            malformed_types: MalformedTypePolicy::default(),
        }
    }
}

/// `SourceParser` for one of the built-in languages.
#[derive(Debug)]
pub struct LanguageParser {
    definition: LanguageDefinition,
    policy: MalformedTypePolicy,
}

impl LanguageParser {
    pub fn new(language: Language, options: ParseOptions) -> Self {
        Self {
            definition: language.definition_with_depth(options.max_generic_depth),
            policy: options.malformed_types,
        }
    }

    pub fn csharp() -> Self {
        Self::new(Language::CSharp, ParseOptions::default())
    }

    pub fn java() -> Self {
        Self::new(Language::Java, ParseOptions::default())
    }

    pub fn typescript() -> Self {
        Self::new(Language::TypeScript, ParseOptions::default())
    }

    pub fn language(&self) -> Language {
        self.definition.language()
    }

    pub fn definition(&self) -> &LanguageDefinition {
        &self.definition
    }
}

impl SourceParser for LanguageParser {
    fn parse_file(&self, source_id: &str, content: &str) -> Result<CompilationUnit, ParseError> {
        parse_source(source_id, content, &self.definition, self.policy)
    }

    fn language_name(&self) -> &'static str {
        self.definition.language().name()
    }

    fn supported_extensions(&self) -> &[&'static str] {
        self.definition.language().extensions()
    }
}
