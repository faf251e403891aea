//! Common interface of the per-language parsers.

use super::error::ParseError;
use super::unit::CompilationUnit;

/// Language-specific source parser.
///
/// Each implementation turns the text of one file into a
/// `CompilationUnit`. Parsers are stateless and shared between tasks.
pub trait SourceParser: Send + Sync {
    /// Parse one source file.
    ///
    /// # Arguments
    /// * `source_id` - Identifier of the file, usually its relative path
    /// * `content` - Source text
    fn parse_file(&self, source_id: &str, content: &str) -> Result<CompilationUnit, ParseError>;

    /// Human-readable language name.
    fn language_name(&self) -> &'static str;

    /// File extensions this parser handles.
    fn supported_extensions(&self) -> &[&'static str];

    /// Check if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
