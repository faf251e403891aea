//! Character-level tokenizer producing a `TokenTree`.
//!
//! The engine walks the input once. At each character it tries only the
//! recognizers whose first-char set contains that character, in the order the
//! language declares them; the first one that matches wins and consumes its
//! longest match.
//!
//! ## Components
//!
//! - `Recognizer` / `Rule` - Character-class matchers and their classifiers
//! - `RecognizerSet` - Ordered rules with a sorted first-char index
//! - `SourceText` - Character buffer with line positions
//! - `tokenize` - The engine itself

mod identifier;
mod recognizer;
mod source;

use thiserror::Error;
use tracing::trace;

use crate::language::LanguageDefinition;
use crate::token::{Position, Token, TokenKind, TokenTree};

pub use identifier::IdentifierStyle;
pub use recognizer::{Classifier, Recognizer, RecognizerSet, Rule, StringStyle};
pub use source::SourceText;

/// Errors that abort tokenization of a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// No recognizer claims the character.
    #[error("Unrecognized character {ch:?} at {position}")]
    UnrecognizedChar { ch: char, position: Position },

    /// A block was opened but the input ended first.
    #[error("Block opened with {open:?} at {position} is never closed")]
    UnclosedBlock { open: char, position: Position },

    /// A closing character that does not close the innermost open block.
    #[error("Unexpected {ch:?} at {position}")]
    UnexpectedClose { ch: char, position: Position },
}

struct OpenBlock {
    open: char,
    close: char,
    start: usize,
}

/// Tokenize `text` with the recognizers of `language`.
pub fn tokenize(text: &str, language: &LanguageDefinition) -> Result<TokenTree, TokenizeError> {
    let source = SourceText::new(text);
    let chars = source.chars();
    let recognizers = language.recognizers();

    let mut tree = TokenTree::document();
    let root = tree.root();
    tree.get_mut(root).span = source.span(0, source.len());

    let mut open: Vec<OpenBlock> = Vec::new();
    let mut pos = 0;

    'chars: while pos < chars.len() {
        let ch = chars[pos];

        if let Some(top) = open.last() {
            if ch == top.close {
                let len = pos + 1 - top.start;
                let span = source.span(top.start, len);
                let token = Token::new(TokenKind::Block, span, source.slice(top.start, len));
                let id = tree.push_child(root, token);
                tree.adopt_trailing(root, id, |t| span.contains(&t.span));
                open.pop();
                pos += 1;
                continue;
            }
        }
        if recognizers.is_closer(ch) {
            return Err(TokenizeError::UnexpectedClose {
                ch,
                position: source.position(pos),
            });
        }

        for &index in recognizers.candidates(ch) {
            let rule = recognizers.rule(index);
            if let Recognizer::Block { open: o, close } = rule.recognizer {
                if o == ch {
                    open.push(OpenBlock { open: o, close, start: pos });
                    pos += 1;
                    continue 'chars;
                }
                continue;
            }

            let Some(len) = rule.recognizer.scan(chars, pos) else {
                continue;
            };
            let kind = match rule.classifier {
                Classifier::Discard => None,
                Classifier::Kind(kind) => Some(kind),
                Classifier::KeywordLookup => {
                    let text = source.slice(pos, len);
                    Some(if language.keywords().is_keyword(&text) {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Identifier
                    })
                }
            };
            if let Some(kind) = kind {
                let token = Token::new(kind, source.span(pos, len), source.slice(pos, len));
                trace!(kind = %token.kind, text = %token.text, "token");
                tree.push_child(root, token);
            }
            pos += len;
            continue 'chars;
        }

        return Err(TokenizeError::UnrecognizedChar {
            ch,
            position: source.position(pos),
        });
    }

    if let Some(unclosed) = open.last() {
        return Err(TokenizeError::UnclosedBlock {
            open: unclosed.open,
            position: source.position(unclosed.start),
        });
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::token::NodeId;

    fn kinds_and_text(tree: &TokenTree, parent: NodeId) -> Vec<(TokenKind, String)> {
        tree.children(parent)
            .iter()
            .map(|&id| (tree.kind(id), tree.text(id).to_string()))
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let def = Language::CSharp.definition();
        let tree = tokenize("public int count;", &def).unwrap();
        assert_eq!(
            kinds_and_text(&tree, tree.root()),
            vec![
                (TokenKind::Keyword, "public".to_string()),
                (TokenKind::Keyword, "int".to_string()),
                (TokenKind::Identifier, "count".to_string()),
                (TokenKind::Separator, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocks_reparent_inner_tokens() {
        let def = Language::Java.definition();
        let tree = tokenize("void f(int a) { x; }", &def).unwrap();
        let top = tree.children(tree.root()).to_vec();
        assert_eq!(top.len(), 4);
        assert_eq!(tree.text(top[2]), "(int a)");
        assert_eq!(
            kinds_and_text(&tree, top[2]),
            vec![
                (TokenKind::Keyword, "int".to_string()),
                (TokenKind::Identifier, "a".to_string()),
            ]
        );
        assert!(tree.token(top[3]).is_block('{'));
        assert_eq!(tree.children(top[3]).len(), 2);
    }

    #[test]
    fn test_identifiers_inside_block() {
        let def = Language::CSharp.definition();
        let tree = tokenize("{ int value; Dictionary<string, int> counts; }", &def).unwrap();
        let body = tree.children(tree.root())[0];
        assert_eq!(
            kinds_and_text(&tree, body),
            vec![
                (TokenKind::Keyword, "int".to_string()),
                (TokenKind::Identifier, "value".to_string()),
                (TokenKind::Separator, ";".to_string()),
                (TokenKind::Identifier, "Dictionary<string, int>".to_string()),
                (TokenKind::Identifier, "counts".to_string()),
                (TokenKind::Separator, ";".to_string()),
            ]
        );
        let value = tree.token(tree.children(body)[1]);
        assert_eq!((value.span.offset, value.span.len), (6, 5));
    }

    #[test]
    fn test_nested_blocks() {
        let def = Language::CSharp.definition();
        let tree = tokenize("{ a ( b [ c ] ) }", &def).unwrap();
        let outer = tree.children(tree.root())[0];
        let paren = tree.children(outer)[1];
        let bracket = tree.children(paren)[1];
        assert!(tree.token(paren).is_block('('));
        assert_eq!(tree.text(tree.children(bracket)[0]), "c");
        assert_eq!(tree.parent(bracket), Some(paren));
    }

    #[test]
    fn test_comments_and_strings() {
        let def = Language::Java.definition();
        let tree = tokenize("/** doc */ String s = \"a{b\"; // done", &def).unwrap();
        let kinds: Vec<TokenKind> = tree.children(tree.root()).iter().map(|&id| tree.kind(id)).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::String,
                TokenKind::Separator,
                TokenKind::Comment,
            ]
        );
    }

    #[test]
    fn test_spans_and_positions() {
        let def = Language::Java.definition();
        let tree = tokenize("class A\n{\n  int x;\n}", &def).unwrap();
        let block = tree.children(tree.root())[2];
        let span = tree.token(block).span;
        assert_eq!(span.start, Position { line: 1, column: 0 });
        assert_eq!(span.end, Position { line: 3, column: 0 });
        let x = tree.children(block)[1];
        assert_eq!(tree.token(x).span.start, Position { line: 2, column: 6 });
    }

    #[test]
    fn test_unrecognized_char() {
        let def = Language::Java.definition();
        let err = tokenize("int \u{7} x;", &def).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::UnrecognizedChar {
                ch: '\u{7}',
                position: Position { line: 0, column: 4 },
            }
        );
    }

    #[test]
    fn test_unclosed_and_mismatched_blocks() {
        let def = Language::Java.definition();
        assert!(matches!(
            tokenize("class A { void f( }", &def),
            Err(TokenizeError::UnexpectedClose { ch: '}', .. })
        ));
        assert!(matches!(
            tokenize("class A {", &def),
            Err(TokenizeError::UnclosedBlock { open: '{', .. })
        ));
        assert!(matches!(
            tokenize("x ) y", &def),
            Err(TokenizeError::UnexpectedClose { ch: ')', .. })
        ));
    }

    #[test]
    fn test_csharp_attribute_block() {
        let def = Language::CSharp.definition();
        let tree = tokenize("[A] [B(1)]", &def).unwrap();
        let top = tree.children(tree.root()).to_vec();
        assert_eq!(top.len(), 2);
        assert!(tree.token(top[0]).is_block('['));
        assert_eq!(tree.text(top[1]), "[B(1)]");
    }

    #[test]
    fn test_preprocessor_lines_are_dropped() {
        let def = Language::CSharp.definition();
        let tree = tokenize("#region Fields\nint x;\n#endregion", &def).unwrap();
        assert_eq!(tree.children(tree.root()).len(), 3);
    }

    #[test]
    fn test_deterministic_and_non_overlapping() {
        let def = Language::TypeScript.definition();
        let text = "export class A<T> extends B { private m: Map<string, T[]>; f(a?: number): void { return; } }";
        let first = tokenize(text, &def).unwrap();
        let second = tokenize(text, &def).unwrap();
        assert_eq!(first.render(), second.render());

        first.visit(first.root(), |id, token, _, _| {
            let children = first.children(id);
            for pair in children.windows(2) {
                let a = first.token(pair[0]).span;
                let b = first.token(pair[1]).span;
                assert!(!a.overlaps(&b));
                assert!(a.offset < b.offset);
            }
            for &child in children {
                assert!(token.span.contains(&first.token(child).span));
            }
        });
    }
}
