//! Tokens and the token tree produced by the tokenizer.
//!
//! ## Components
//!
//! - `Token` - A classified piece of source text with its span
//! - `TokenKind` - Leaf and compound token kinds
//! - `Tree` / `TokenTree` - Arena-owned ordered tree with sibling and ancestor queries

mod tree;

use serde::{Deserialize, Serialize};

pub use tree::{NodeId, TokenTree, Tree};

/// Kind of a token.
///
/// `Document` and `Block` are compound and may own children; every other
/// kind is a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Document,
    Comment,
    String,
    Number,
    Identifier,
    Keyword,
    Operator,
    Separator,
    Block,
}

impl TokenKind {
    /// Whether tokens of this kind can own child tokens.
    pub fn is_compound(self) -> bool {
        matches!(self, Self::Document | Self::Block)
    }

    /// Comments and string literals, skipped by most sibling queries.
    pub fn is_trivial(self) -> bool {
        matches!(self, Self::Comment | Self::String)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Document => "DOCUMENT",
            Self::Comment => "COMMENT",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Identifier => "IDENTIFIER",
            Self::Keyword => "KEYWORD",
            Self::Operator => "OPERATOR",
            Self::Separator => "SEPARATOR",
            Self::Block => "BLOCK",
        };
        f.write_str(name)
    }
}

/// Zero-based line and column of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

/// Location of a token in its source, in character units.
///
/// `end` is the position of the last character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub offset: usize,
    pub len: usize,
    pub start: Position,
    pub end: Position,
}

impl TextSpan {
    /// Offset one past the last character.
    pub fn end_offset(&self) -> usize {
        self.offset + self.len
    }

    /// Whether `other` lies fully inside this span.
    pub fn contains(&self, other: &TextSpan) -> bool {
        other.offset >= self.offset && other.end_offset() <= self.end_offset()
    }

    /// Whether the two spans share at least one character.
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.offset < other.end_offset() && other.offset < self.end_offset()
    }
}

/// A classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextSpan,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: TextSpan, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this is a block token opened by `open`.
    pub fn is_block(&self, open: char) -> bool {
        self.kind == TokenKind::Block && self.text.starts_with(open)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    pub fn is_separator(&self, sep: &str) -> bool {
        self.kind == TokenKind::Separator && self.text == sep
    }
}
