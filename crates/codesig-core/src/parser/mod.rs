//! Per-file parsing: tokenize, discover blocks, extract members.
//!
//! ## Components
//!
//! - `SourceParser` trait - Common interface of the language parsers
//! - `LanguageParser` - Parser driven by a built-in language definition
//! - `LanguageRegistry` - Maps file extensions to parsers
//! - `CompilationUnit` - Parsed form of one file
//! - `ParseMetrics` - Counters returned with every parse

mod error;
mod registry;
mod source;
mod stats;
mod traits;
mod unit;

pub use error::ParseError;
pub use registry::LanguageRegistry;
pub use source::{LanguageParser, ParseOptions};
pub use stats::ParseMetrics;
pub use traits::SourceParser;
pub use unit::{parse_source, CompilationUnit, MalformedTypePolicy};
