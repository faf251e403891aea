//! TypeScript keyword table, tokenizer recipe and access defaults.

use super::keywords::{Capability::*, KeywordTable};
use crate::signature::{AccessModifier, BlockKind};
use crate::tokenizer::{Classifier, IdentifierStyle, Recognizer, Rule, StringStyle};
use crate::token::TokenKind;

pub(super) static KEYWORDS: KeywordTable = KeywordTable::new(
    &[
        ("abstract", &[ClassModifier, FieldModifier, MethodModifier]),
        ("any", &[Type]),
        ("as", &[Operator]),
        ("async", &[MethodModifier]),
        ("bigint", &[Type]),
        ("boolean", &[Type]),
        ("break", &[]),
        ("case", &[]),
        ("catch", &[]),
        ("class", &[Block]),
        ("const", &[ClassModifier]),
        ("continue", &[]),
        ("declare", &[ClassModifier, FieldModifier]),
        ("default", &[ClassModifier]),
        ("delete", &[Operator]),
        ("do", &[]),
        ("else", &[]),
        ("enum", &[Block]),
        ("export", &[ClassModifier]),
        ("extends", &[Inheritance]),
        ("false", &[Literal]),
        ("finally", &[]),
        ("for", &[]),
        ("function", &[]),
        ("if", &[]),
        ("implements", &[Inheritance]),
        ("import", &[]),
        ("in", &[Operator]),
        ("instanceof", &[Operator]),
        ("interface", &[Block]),
        ("let", &[]),
        ("module", &[Block]),
        ("namespace", &[Block]),
        ("never", &[Type]),
        ("new", &[]),
        ("null", &[Literal]),
        ("number", &[Type]),
        ("object", &[Type]),
        ("override", &[FieldModifier, MethodModifier]),
        ("private", &[FieldModifier, MethodModifier, ParameterModifier]),
        ("protected", &[FieldModifier, MethodModifier, ParameterModifier]),
        ("public", &[FieldModifier, MethodModifier, ParameterModifier]),
        ("readonly", &[FieldModifier, ParameterModifier]),
        ("return", &[]),
        ("static", &[FieldModifier, MethodModifier]),
        ("string", &[Type]),
        ("super", &[]),
        ("switch", &[]),
        ("symbol", &[Type]),
        ("this", &[]),
        ("throw", &[]),
        ("true", &[Literal]),
        ("try", &[]),
        ("typeof", &[Operator]),
        ("undefined", &[Type, Literal]),
        ("unknown", &[Type]),
        ("var", &[]),
        ("void", &[]),
        ("while", &[]),
    ],
);

/// `void`, `null` and the global types of the standard library.
pub(super) const IMPLICIT_TYPES: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "Function", "Iterable", "Map", "Number", "Object",
    "Omit", "Partial", "Pick", "Promise", "Readonly", "ReadonlyArray", "Record", "RegExp", "Set",
    "String", "Symbol", "null", "void",
];

const OPERATORS: &[&str] = &[
    "===", "!==", "...", "**=", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "**", "++",
    "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "+", "-", "*", "/", "%",
    "=", "!", "<", ">", "&", "|", "^", "~", "?", ":", ".",
];

const SEPARATORS: &[&str] = &[";", ",", "@"];

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
                text_blocks: false,
                templates: true,
            }),
            Classifier::Kind(TokenKind::String),
        ),
        Rule::new(Recognizer::Block { open: '{', close: '}' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '(', close: ')' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(Recognizer::Block { open: '[', close: ']' }, Classifier::Kind(TokenKind::Block)),
        Rule::new(
            Recognizer::Identifier(IdentifierStyle {
                extra_start: &['$', '#'],
                extra_part: &['$'],
                generics: true,
                wildcards: false,
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
        "public" | "export" => Some(AccessModifier::Public),
        "protected" => Some(AccessModifier::InheritanceLocal),
        "private" => Some(AccessModifier::Private),
        _ => None,
    })
}

/// Declarations are module-local unless exported; class members are public.
pub(super) fn default_access(kind: BlockKind, parent: Option<BlockKind>) -> AccessModifier {
    match (kind, parent) {
        (BlockKind::Namespace, _) => AccessModifier::NamespaceLocal,
        (_, None) | (_, Some(BlockKind::Namespace)) => AccessModifier::NamespaceLocal,
        (_, Some(BlockKind::Class)) | (_, Some(BlockKind::Interface)) | (_, Some(BlockKind::Enum)) => {
            AccessModifier::Public
        }
    }
}
