//! Sub-machine recognizing one type reference.

use super::{ExtractCx, MemberTypeError};
use crate::language::MemberSyntax;
use crate::token::{Token, TokenKind};
use crate::types::TypeSig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    FoundName,
    /// After `|` in a TypeScript union.
    UnionNext,
    /// After a TypeScript `(...)` that should be a function type.
    FnParams,
    FnArrow,
    Complete,
    Failed,
}

/// Recognizes a type: a type keyword or identifier, optionally followed by
/// `?` (nullable) or `...` (varargs). TypeScript unions with `null` or
/// `undefined` mark the type nullable; other union members are dropped.
///
/// Completion usually needs one token of look-ahead, so the token that
/// completes the machine is often not consumed.
#[derive(Debug, Clone)]
pub struct DataTypeExtractor {
    state: State,
    allow_void: bool,
    sig: Option<TypeSig>,
}

impl DataTypeExtractor {
    pub fn new(allow_void: bool) -> Self {
        Self {
            state: State::Init,
            allow_void,
            sig: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Init
    }

    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    pub fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    pub fn reset(&mut self) {
        self.state = State::Init;
        self.sig = None;
    }

    /// Take the recognized type and return to the initial state.
    pub fn take(&mut self) -> Option<TypeSig> {
        let sig = if self.is_complete() { self.sig.take() } else { None };
        self.reset();
        sig
    }

    /// Whether `token` can start a type.
    pub fn starts_type(&self, token: &Token, cx: &ExtractCx<'_>) -> bool {
        match token.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword => {
                cx.language.keywords().is_type(&token.text) || (self.allow_void && token.text == "void")
            }
            TokenKind::Block | TokenKind::String | TokenKind::Number => {
                cx.language.member_syntax() == MemberSyntax::NameFirst
                    && (token.is_block('{') || token.is_block('(') || !token.kind.is_compound())
            }
            _ => false,
        }
    }

    /// The input ended; a recognized name is enough.
    pub fn end(&mut self) {
        self.state = match self.state {
            State::FoundName => State::Complete,
            State::Complete => State::Complete,
            _ => State::Failed,
        };
    }

    pub fn accept_next(&mut self, token: &Token, cx: &mut ExtractCx<'_>) -> bool {
        match self.state {
            State::Init => {
                if !self.starts_type(token, cx) {
                    self.state = State::Failed;
                    return false;
                }
                if token.is_block('(') {
                    self.state = State::FnParams;
                    return true;
                }
                let name = match token.kind {
                    TokenKind::Block => "object",
                    TokenKind::String => "string",
                    TokenKind::Number => "number",
                    _ => token.text.as_str(),
                };
                self.found(name, cx)
            }
            State::FoundName => {
                let type_first = cx.language.member_syntax() == MemberSyntax::TypeFirst;
                if type_first && token.is_operator("?") {
                    self.set_nullable();
                    self.state = State::Complete;
                    true
                } else if token.is_operator("...") {
                    if let Some(sig) = self.sig.as_mut() {
                        sig.array_dimensions += 1;
                    }
                    self.state = State::Complete;
                    true
                } else if !type_first && token.is_operator("|") {
                    self.state = State::UnionNext;
                    true
                } else {
                    self.state = State::Complete;
                    false
                }
            }
            State::UnionNext => {
                if token.is_keyword("null") || token.is_keyword("undefined") {
                    self.set_nullable();
                } else if !self.starts_type(token, cx) || token.is_block('(') {
                    self.state = State::Failed;
                    return false;
                }
                self.state = State::FoundName;
                true
            }
            State::FnParams => {
                if token.is_operator("=>") {
                    self.state = State::FnArrow;
                    true
                } else {
                    self.state = State::Failed;
                    false
                }
            }
            State::FnArrow => {
                if self.starts_type(token, cx) || token.is_keyword("void") {
                    self.found("Function", cx)
                } else {
                    self.state = State::Failed;
                    false
                }
            }
            State::Complete | State::Failed => false,
        }
    }

    fn found(&mut self, text: &str, cx: &mut ExtractCx<'_>) -> bool {
        match TypeSig::parse(text) {
            Ok(sig) => {
                self.sig = Some(sig);
                self.state = State::FoundName;
            }
            Err(error) => {
                cx.type_errors.push(MemberTypeError {
                    text: text.to_string(),
                    error,
                });
                self.state = State::Failed;
            }
        }
        true
    }

    fn set_nullable(&mut self) {
        if let Some(sig) = self.sig.as_mut() {
            sig.nullable = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::token::TokenTree;
    use crate::tokenizer::tokenize;

    fn run(language: Language, text: &str, allow_void: bool) -> (Option<TypeSig>, usize) {
        let def = language.definition();
        let tree: TokenTree = tokenize(text, &def).unwrap();
        let mut cx = ExtractCx::new(&tree, &def, &[]);
        let mut dt = DataTypeExtractor::new(allow_void);
        let mut consumed = 0;
        for &node in tree.children(tree.root()) {
            if dt.accept_next(tree.token(node), &mut cx) {
                consumed += 1;
            }
            if dt.is_complete() || dt.is_failed() {
                break;
            }
        }
        dt.end();
        (dt.take(), consumed)
    }

    #[test]
    fn test_simple_and_generic_types() {
        let (sig, _) = run(Language::CSharp, "IList<int> x", false);
        let sig = sig.unwrap();
        assert_eq!(sig.name, "IList");
        assert_eq!(sig.params, vec![TypeSig::simple("int")]);
    }

    #[test]
    fn test_nullable_lookahead() {
        let (sig, consumed) = run(Language::CSharp, "int? x", false);
        assert!(sig.unwrap().nullable);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_void_only_when_allowed() {
        assert!(run(Language::Java, "void f", false).0.is_none());
        assert_eq!(run(Language::Java, "void f", true).0.unwrap().name, "void");
    }

    #[test]
    fn test_varargs_add_dimension() {
        let (sig, _) = run(Language::Java, "String... args", false);
        assert_eq!(sig.unwrap().array_dimensions, 1);
    }

    #[test]
    fn test_typescript_union_with_null() {
        let (sig, _) = run(Language::TypeScript, "string | null;", false);
        let sig = sig.unwrap();
        assert_eq!(sig.name, "string");
        assert!(sig.nullable);
    }

    #[test]
    fn test_typescript_function_and_object_types() {
        assert_eq!(run(Language::TypeScript, "(a: number) => void;", false).0.unwrap().name, "Function");
        assert_eq!(run(Language::TypeScript, "{ a: string };", false).0.unwrap().name, "object");
    }

    #[test]
    fn test_rejects_non_types() {
        assert!(run(Language::Java, "= 5", false).0.is_none());
        assert!(run(Language::CSharp, "class A", false).0.is_none());
    }
}
