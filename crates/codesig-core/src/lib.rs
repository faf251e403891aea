//! Structural signatures for C#, Java and TypeScript sources.
//!
//! Source text is tokenized into a nested token tree, class, interface and
//! enum declarations are discovered in it, and their fields, methods and
//! annotations are extracted by small state machines. `project::resolve`
//! then ties the files of a project together by rewriting every type
//! reference to its fully-qualified name.

pub mod config;
pub mod discovery;
pub mod extract;
pub mod language;
pub mod parser;
pub mod project;
pub mod signature;
pub mod token;
pub mod tokenizer;
pub mod types;
pub mod workflow;

pub use config::Config;
pub use language::{Language, LanguageDefinition};
pub use parser::{parse_source, CompilationUnit, LanguageRegistry, ParseError, SourceParser};
pub use project::{resolve, ResolveError, ResolvedProject};
pub use signature::{BlockKind, BlockSig, ResolvedBlockSig};
pub use token::{Token, TokenKind, TokenTree};
pub use tokenizer::{tokenize, TokenizeError};
pub use types::{Resolution, ResolvedTypeSig, TypeSig};
pub use workflow::{Destination, ResolveRequest, Workflow, WorkflowError};
