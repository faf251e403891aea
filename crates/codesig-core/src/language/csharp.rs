//! C# keyword table, tokenizer recipe and access defaults.

use super::keywords::{Capability::*, KeywordTable};
use crate::signature::{AccessModifier, BlockKind};
use crate::tokenizer::{Classifier, IdentifierStyle, Recognizer, Rule, StringStyle};
use crate::token::TokenKind;

pub(super) static KEYWORDS: KeywordTable = KeywordTable::new(
    &[
        ("abstract", &[ClassModifier, MethodModifier]),
        ("as", &[Operator]),
        ("async", &[MethodModifier]),
        ("base", &[]),
        ("bool", &[Type]),
        ("break", &[]),
        ("byte", &[Type]),
        ("case", &[]),
        ("catch", &[]),
        ("char", &[Type]),
        ("checked", &[]),
        ("class", &[Block]),
        ("const", &[FieldModifier]),
        ("continue", &[]),
        ("decimal", &[Type]),
        ("default", &[]),
        ("delegate", &[]),
        ("do", &[]),
        ("double", &[Type]),
        ("else", &[]),
        ("enum", &[Block]),
        ("event", &[FieldModifier]),
        ("explicit", &[]),
        ("extern", &[MethodModifier]),
        ("false", &[Literal]),
        ("finally", &[]),
        ("fixed", &[]),
        ("float", &[Type]),
        ("for", &[]),
        ("foreach", &[]),
        ("goto", &[]),
        ("if", &[]),
        ("implicit", &[]),
        ("in", &[ParameterModifier]),
        ("int", &[Type]),
        ("interface", &[Block]),
        ("internal", &[ClassModifier, FieldModifier, MethodModifier]),
        ("is", &[Operator]),
        ("lock", &[]),
        ("long", &[Type]),
        ("namespace", &[Block]),
        ("new", &[ClassModifier, FieldModifier, MethodModifier]),
        ("null", &[Literal]),
        ("object", &[Type]),
        ("operator", &[]),
        ("out", &[ParameterModifier]),
        ("override", &[MethodModifier]),
        ("params", &[ParameterModifier]),
        ("partial", &[ClassModifier, MethodModifier]),
        ("private", &[ClassModifier, FieldModifier, MethodModifier]),
        ("protected", &[ClassModifier, FieldModifier, MethodModifier]),
        ("public", &[ClassModifier, FieldModifier, MethodModifier]),
        ("readonly", &[FieldModifier]),
        ("record", &[Block]),
        ("ref", &[ParameterModifier]),
        ("return", &[]),
        ("sbyte", &[Type]),
        ("sealed", &[ClassModifier, MethodModifier]),
        ("short", &[Type]),
        ("sizeof", &[]),
        ("stackalloc", &[]),
        ("static", &[ClassModifier, FieldModifier, MethodModifier]),
        ("string", &[Type]),
        ("struct", &[Block]),
        ("switch", &[]),
        ("this", &[ParameterModifier]),
        ("throw", &[]),
        ("true", &[Literal]),
        ("try", &[]),
        ("typeof", &[]),
        ("uint", &[Type]),
        ("ulong", &[Type]),
        ("unchecked", &[]),
        ("unsafe", &[ClassModifier, MethodModifier]),
        ("ushort", &[Type]),
        ("using", &[]),
        ("virtual", &[MethodModifier]),
        ("void", &[]),
        ("volatile", &[FieldModifier]),
        ("while", &[]),
    ],
);

/// Type names that need no declaration or import.
pub(super) const IMPLICIT_TYPES: &[&str] = &["dynamic", "nint", "nuint", "var", "void"];

const OPERATORS: &[&str] = &[
    "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "<<", ">>", "->", "::", "+", "-", "*", "/", "%", "=", "!", "<", ">",
    "&", "|", "^", "~", "?", ":", ".",
];

const SEPARATORS: &[&str] = &[";", ","];

pub(super) fn rules(max_generic_depth: usize) -> Vec<Rule> {
    vec![
        Rule::new(Recognizer::Whitespace, Classifier::Discard),
        Rule::new(Recognizer::LineComment("//"), Classifier::Kind(TokenKind::Comment)),
        Rule::new(
            Recognizer::BlockComment { open: "/*", close: "*/" },
            Classifier::Kind(TokenKind::Comment),
        ),
        Rule::new(Recognizer::Directive('#'), Classifier::Discard),
        Rule::new(
            Recognizer::String(StringStyle {
                quotes: &['"', '\''],
                verbatim: true,
                interpolated: true,
                text_blocks: false,
                templates: false,
            }),
            Classifier::Kind(TokenKind::String),
        ),
        Rule::new(Recognizer::Block { open: '{', close: '}' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '(', close: ')' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '[', close: ']' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(
            Recognizer::Identifier(IdentifierStyle {
                extra_start: &['@'],
                extra_part: &[],
                generics: true,
                wildcards: false,
                max_generic_depth,
            }),
            Classifier::KeywordLookup,
        ),
        Rule::new(Recognizer::Operators(OPERATORS), Classifier::Kind(TokenKind::Operator)),
        Rule::new(Recognizer::Separators(SEPARATORS), Classifier::Kind(TokenKind::Separator)),
        Rule::new(Recognizer::Number, Classifier::Kind(TokenKind::Number)),
    ]
}

pub(super) fn access_from_modifiers(modifiers: &[String]) -> Option<AccessModifier> {
    let has = |word: &str| modifiers.iter().any(|m| m == word);
    match (has("public"), has("protected"), has("internal"), has("private")) {
        (true, _, _, _) => Some(AccessModifier::Public),
        (false, true, true, _) => Some(AccessModifier::NamespaceOrInheritanceLocal),
        (false, true, false, _) => Some(AccessModifier::InheritanceLocal),
        (false, false, true, _) => Some(AccessModifier::NamespaceLocal),
        (false, false, false, true) => Some(AccessModifier::Private),
        (false, false, false, false) => None,
    }
}

/// Types default to `internal` at namespace level, members of classes and
/// enums default to `private`, members of interfaces to `public`.
pub(super) fn default_access(kind: BlockKind, parent: Option<BlockKind>) -> AccessModifier {
    match (kind, parent) {
        (BlockKind::Namespace, _) => AccessModifier::Public,
        (_, None) | (_, Some(BlockKind::Namespace)) => AccessModifier::NamespaceLocal,
        (_, Some(BlockKind::Class)) | (_, Some(BlockKind::Enum)) => AccessModifier::Private,
        (_, Some(BlockKind::Interface)) => AccessModifier::Public,
    }
}
