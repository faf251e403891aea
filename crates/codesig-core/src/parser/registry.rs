//! Registry mapping file extensions to source parsers.

use std::collections::HashMap;
use std::sync::Arc;

use super::source::{LanguageParser, ParseOptions};
use super::traits::SourceParser;
use crate::language::Language;

/// Registry of source parsers.
///
/// Maps file extensions to their respective parsers.
/// Registers the C#, Java and TypeScript parsers on creation.
pub struct LanguageRegistry {
    /// Extension to parser mapping.
    parsers: HashMap<String, Arc<dyn SourceParser>>,
}

impl LanguageRegistry {
    /// Create a registry with all built-in parsers and default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a registry with all built-in parsers sharing `options`.
    pub fn with_options(options: ParseOptions) -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };
        for language in Language::ALL {
            registry.register(Arc::new(LanguageParser::new(language, options)));
        }
        registry
    }

    /// Register a parser for its supported extensions.
    pub fn register(&mut self, parser: Arc<dyn SourceParser>) {
        for ext in parser.supported_extensions() {
            self.parsers.insert(ext.to_lowercase(), Arc::clone(&parser));
        }
    }

    /// Get a parser for the given file extension.
    pub fn parser_for_extension(&self, extension: &str) -> Option<Arc<dyn SourceParser>> {
        self.parsers
            .get(&extension.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Get a parser for the given file path.
    pub fn parser_for_path(&self, path: impl AsRef<std::path::Path>) -> Option<Arc<dyn SourceParser>> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.parser_for_extension(ext))
    }

    /// Check if any parser can handle the given extension.
    pub fn can_parse(&self, extension: &str) -> bool {
        self.parser_for_extension(extension).is_some()
    }

    /// List all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.parsers.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// List all registered parsers with their extensions, sorted by name.
    pub fn list_parsers(&self) -> Vec<(&str, &[&'static str])> {
        // the same parser is registered once per extension
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();

        for parser in self.parsers.values() {
            let name = parser.language_name();
            if seen.insert(name) {
                result.push((name, parser.supported_extensions()));
            }
        }

        result.sort_by_key(|(name, _)| *name);
        result
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_csharp_parser() {
        let registry = LanguageRegistry::new();
        assert!(registry.can_parse("cs"));
        assert!(registry.parser_for_extension("cs").is_some());
    }

    #[test]
    fn test_registry_has_all_parsers() {
        let registry = LanguageRegistry::new();

        assert!(registry.can_parse("cs"));
        assert!(registry.can_parse("java"));
        assert!(registry.can_parse("ts"));
        assert!(registry.can_parse("tsx"));
        assert!(registry.can_parse("mts"));
        assert!(registry.can_parse("cts"));

        assert!(!registry.can_parse("js"));
        assert!(!registry.can_parse("rs"));
        assert_eq!(registry.list_parsers().len(), 3);
    }

    #[test]
    fn test_parser_for_path() {
        let registry = LanguageRegistry::new();
        assert!(registry.parser_for_path("src/app.ts").is_some());
        assert!(registry.parser_for_path("Main.java").is_some());
        assert!(registry.parser_for_path("Program.cs").is_some());
        assert!(registry.parser_for_path("unknown.xyz").is_none());
        assert!(registry.parser_for_path("Makefile").is_none());
    }

    #[test]
    fn test_case_insensitive() {
        let registry = LanguageRegistry::new();
        assert!(registry.can_parse("CS"));
        assert!(registry.can_parse("Java"));
        assert!(registry.can_parse(".TS"));
    }
}
