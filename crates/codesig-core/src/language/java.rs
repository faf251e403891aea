//! Java keyword table, tokenizer recipe and access defaults.

use super::keywords::{Capability::*, KeywordTable};
use crate::signature::{AccessModifier, BlockKind};
use crate::tokenizer::{Classifier, IdentifierStyle, Recognizer, Rule, StringStyle};
use crate::token::TokenKind;

pub(super) static KEYWORDS: KeywordTable = KeywordTable::new(
    &[
        ("abstract", &[ClassModifier, MethodModifier]),
        ("assert", &[]),
        ("boolean", &[Type]),
        ("break", &[]),
        ("byte", &[Type]),
        ("case", &[]),
        ("catch", &[]),
        ("char", &[Type]),
        ("class", &[Block]),
        ("const", &[]),
        ("continue", &[]),
        ("default", &[MethodModifier]),
        ("do", &[]),
        ("double", &[Type]),
        ("else", &[]),
        ("enum", &[Block]),
        ("extends", &[Inheritance]),
        ("false", &[Literal]),
        ("final", &[ClassModifier, FieldModifier, MethodModifier, ParameterModifier]),
        ("finally", &[]),
        ("float", &[Type]),
        ("for", &[]),
        ("goto", &[]),
        ("if", &[]),
        ("implements", &[Inheritance]),
        ("import", &[]),
        ("instanceof", &[Operator]),
        ("int", &[Type]),
        ("interface", &[Block]),
        ("long", &[Type]),
        ("native", &[MethodModifier]),
        ("new", &[]),
        ("null", &[Literal]),
        ("package", &[]),
        ("private", &[ClassModifier, FieldModifier, MethodModifier]),
        ("protected", &[ClassModifier, FieldModifier, MethodModifier]),
        ("public", &[ClassModifier, FieldModifier, MethodModifier]),
        ("return", &[]),
        ("short", &[Type]),
        ("static", &[ClassModifier, FieldModifier, MethodModifier]),
        ("strictfp", &[ClassModifier, MethodModifier]),
        ("super", &[]),
        ("switch", &[]),
        ("synchronized", &[MethodModifier]),
        ("this", &[]),
        ("throw", &[]),
        ("throws", &[]),
        ("transient", &[FieldModifier]),
        ("true", &[Literal]),
        ("try", &[]),
        ("void", &[]),
        ("volatile", &[FieldModifier]),
        ("while", &[]),
    ],
);

/// `void`, `var` and the `java.lang` types every file sees without an import.
pub(super) const IMPLICIT_TYPES: &[&str] = &[
    "Boolean", "Byte", "Character", "Class", "Comparable", "Deprecated", "Double", "Enum", "Error",
    "Exception", "Float", "FunctionalInterface", "Integer", "Iterable", "Long", "Math", "Number",
    "Object", "Override", "Record", "Runnable", "RuntimeException", "Short", "String",
    "StringBuilder", "SuppressWarnings", "System", "Thread", "Throwable", "Void", "var", "void",
];

const OPERATORS: &[&str] = &[
    ">>>", "...", "->", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "<<", ">>", "+", "-", "*", "/", "%", "=", "!", "<", ">", "&", "|", "^",
    "~", "?", ":", ".",
];

const SEPARATORS: &[&str] = &[";", ",", "@", "::"];

pub(super) fn rules(max_generic_depth: usize) -> Vec<Rule> {
    vec![
        Rule::new(Recognizer::Whitespace, Classifier::Discard),
        Rule::new(Recognizer::LineComment("//"), Classifier::Kind(TokenKind::Comment)),
        Rule::new(
            Recognizer::BlockComment { open: "/*", close: "*/" },
            Classifier::Kind(TokenKind::Comment),
        ),
        Rule::new(
            Recognizer::String(StringStyle {
                quotes: &['"', '\''],
                verbatim: false,
                interpolated: false,
                text_blocks: true,
                templates: false,
            }),
            Classifier::Kind(TokenKind::String),
        ),
        Rule::new(Recognizer::Block { open: '{', close: '}' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '(', close: ')' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '[', close: ']' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(
            Recognizer::Identifier(IdentifierStyle {
                extra_start: &['$'],
                extra_part: &['$'],
                generics: true,
                wildcards: true,
                max_generic_depth,
            }),
            Classifier::KeywordLookup,
        ),
        Rule::new(Recognizer::Separators(SEPARATORS), Classifier::Kind(TokenKind::Separator)),
        Rule::new(Recognizer::Operators(OPERATORS), Classifier::Kind(TokenKind::Operator)),
        Rule::new(Recognizer::Number, Classifier::Kind(TokenKind::Number)),
    ]
}

pub(super) fn access_from_modifiers(modifiers: &[String]) -> Option<AccessModifier> {
    modifiers.iter().find_map(|m| match m.as_str() {
        "public" => Some(AccessModifier::Public),
        "protected" => Some(AccessModifier::NamespaceOrInheritanceLocal),
        "private" => Some(AccessModifier::Private),
        _ => None,
    })
}

/// Package-private everywhere except inside interfaces, whose members are public.
pub(super) fn default_access(kind: BlockKind, parent: Option<BlockKind>) -> AccessModifier {
    match (kind, parent) {
        (BlockKind::Namespace, _) => AccessModifier::Public,
        (_, None) | (_, Some(BlockKind::Namespace)) => AccessModifier::NamespaceLocal,
        (_, Some(BlockKind::Class)) | (_, Some(BlockKind::Enum)) => AccessModifier::NamespaceLocal,
        (_, Some(BlockKind::Interface)) => AccessModifier::Public,
    }
}
