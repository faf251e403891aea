//! Incremental member extraction.
//!
//! Each extractor is a small state machine that is fed the direct children
//! of a block one token at a time. All extractors of a block observe the
//! same forward pass, in a fixed priority order, so no token sequence is
//! scanned twice.
//!
//! ## Components
//!
//! - `TokenExtractor` - Common protocol of every state machine
//! - `ExtractCx` - Shared context: token tree, language, scope, outputs
//! - `run_extractors` - The single forward pass
//! - `extract_members` - Runs the member extractors over one block body
//! - `extract_imports` - Runs the import extractor over file-level tokens

mod annotation;
mod comment;
mod data_type;
mod enum_member;
mod field;
mod import;
mod method;

use tracing::trace;

use crate::language::{AnnotationStyle, LanguageDefinition};
use crate::parser::ParseMetrics;
use crate::signature::{AnnotationSig, BlockKind, EnumMemberSig, FieldSig, ImportSig, MethodSig};
use crate::token::{NodeId, Token, TokenKind, TokenTree};
use crate::types::TypeSigError;

pub use annotation::AnnotationExtractor;
pub(crate) use annotation::{parse_arguments, parse_bracketed};
pub use comment::{strip_comment, CommentExtractor};
pub use data_type::DataTypeExtractor;
pub use enum_member::EnumMemberExtractor;
pub use field::FieldExtractor;
pub use import::ImportExtractor;
pub use method::MethodExtractor;

/// Protocol shared by every extraction state machine.
///
/// `accept_next` returns whether the token was consumed. A machine that
/// completes on a token it did not consume (one token of look-ahead) gets
/// the same token offered again after `finish`. A machine that fails part
/// way is reset and offered the failing token again from its initial state.
pub trait TokenExtractor {
    /// Short name used in trace output.
    fn name(&self) -> &'static str;

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool;

    /// The block has no more children.
    fn block_complete(&mut self, cx: &mut ExtractCx<'_>);

    /// Still in the initial state, nothing collected.
    fn is_idle(&self) -> bool;

    fn is_complete(&self) -> bool;

    fn is_failed(&self) -> bool;

    /// Move the completed result into `cx` and return to the initial state.
    fn finish(&mut self, cx: &mut ExtractCx<'_>);

    /// Drop partial state and return to the initial state.
    fn reset(&mut self);
}

/// A type string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTypeError {
    pub text: String,
    pub error: TypeSigError,
}

/// Members collected from one block body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    pub fields: Vec<FieldSig>,
    pub methods: Vec<MethodSig>,
    pub enum_members: Vec<EnumMemberSig>,
    pub imports: Vec<ImportSig>,
}

/// Context shared by the extractors of one pass.
pub struct ExtractCx<'a> {
    pub tree: &'a TokenTree,
    pub language: &'a LanguageDefinition,
    /// Full name of the block being extracted.
    pub scope: &'a [String],
    /// Annotations waiting for the next member.
    pub pending_annotations: Vec<AnnotationSig>,
    /// Comments waiting for the next member.
    pub pending_comments: Vec<String>,
    pub members: Members,
    pub type_errors: Vec<MemberTypeError>,
    pub metrics: ParseMetrics,
}

impl<'a> ExtractCx<'a> {
    pub fn new(tree: &'a TokenTree, language: &'a LanguageDefinition, scope: &'a [String]) -> Self {
        Self {
            tree,
            language,
            scope,
            pending_annotations: Vec::new(),
            pending_comments: Vec::new(),
            members: Members::default(),
            type_errors: Vec::new(),
            metrics: ParseMetrics::default(),
        }
    }

    pub fn token(&self, node: NodeId) -> &'a Token {
        self.tree.token(node)
    }

    /// `scope` followed by `name`.
    pub fn member_name(&self, name: &str) -> Vec<String> {
        let mut full = self.scope.to_vec();
        full.push(name.to_string());
        full
    }

    /// Simple name of the enclosing block.
    pub fn block_name(&self) -> Option<&str> {
        self.scope.last().map(String::as_str)
    }

    pub fn take_annotations(&mut self) -> Vec<AnnotationSig> {
        std::mem::take(&mut self.pending_annotations)
    }

    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_comments)
    }
}

/// Offer every child to every extractor, in order.
pub fn run_extractors(extractors: &mut [&mut dyn TokenExtractor], children: &[NodeId], cx: &mut ExtractCx<'_>) {
    for &node in children {
        let mut claimed = false;
        for extractor in extractors.iter_mut() {
            claimed |= offer(&mut **extractor, node, cx);
        }
        // an unclaimed body belongs to a nested declaration, not to a member
        if !claimed && cx.token(node).is_block('{') {
            cx.pending_annotations.clear();
            cx.pending_comments.clear();
        }
    }

    for extractor in extractors.iter_mut() {
        extractor.block_complete(cx);
        if extractor.is_complete() {
            extractor.finish(cx);
        }
        extractor.reset();
    }
}

fn offer(extractor: &mut dyn TokenExtractor, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
    let mut retried = false;
    loop {
        let idle = extractor.is_idle();
        let consumed = extractor.accept_next(node, cx);
        cx.metrics.extractor_offers += 1;

        if extractor.is_failed() {
            extractor.reset();
            if !idle {
                cx.metrics.failed_extractions += 1;
                trace!(extractor = extractor.name(), token = %cx.token(node).text, "extraction abandoned");
            }
            if !idle && !consumed && !retried {
                retried = true;
                continue;
            }
            return consumed;
        }
        if extractor.is_complete() {
            extractor.finish(cx);
            if !consumed && !retried {
                retried = true;
                continue;
            }
        }
        return consumed;
    }
}

/// Extract the fields, methods and enum members of one block body.
///
/// `kind` is the kind of the block that owns `body`. Annotations and
/// comments left pending at the end of the body are dropped.
pub fn extract_members(
    tree: &TokenTree,
    body: NodeId,
    kind: BlockKind,
    language: &LanguageDefinition,
    scope: &[String],
) -> (Members, Vec<MemberTypeError>, ParseMetrics) {
    let mut cx = ExtractCx::new(tree, language, scope);
    let mut field = FieldExtractor::new();
    let mut method = MethodExtractor::new();
    let mut enum_member = EnumMemberExtractor::new();
    let mut annotation = AnnotationExtractor::new();
    let mut comment = CommentExtractor::new();

    // only Java enums carry fields and methods next to their constants
    let members_allowed = match kind {
        BlockKind::Class | BlockKind::Interface => true,
        BlockKind::Enum => language.language() == crate::language::Language::Java,
        BlockKind::Namespace => false,
    };

    let mut extractors: Vec<&mut dyn TokenExtractor> = Vec::with_capacity(5);
    if members_allowed {
        extractors.push(&mut field);
        extractors.push(&mut method);
    }
    if kind == BlockKind::Enum {
        extractors.push(&mut enum_member);
    }
    extractors.push(&mut annotation);
    extractors.push(&mut comment);

    run_extractors(&mut extractors, tree.children(body), &mut cx);

    cx.metrics.fields += cx.members.fields.len();
    cx.metrics.methods += cx.members.methods.len();
    cx.metrics.enum_members += cx.members.enum_members.len();
    (cx.members, cx.type_errors, cx.metrics)
}

/// Extract the import statements among `children`.
pub fn extract_imports(tree: &TokenTree, children: &[NodeId], language: &LanguageDefinition) -> Vec<ImportSig> {
    let mut cx = ExtractCx::new(tree, language, &[]);
    let mut import = ImportExtractor::new();
    let mut extractors: [&mut dyn TokenExtractor; 1] = [&mut import];
    run_extractors(&mut extractors, children, &mut cx);
    cx.members.imports
}

/// Where a member extractor is inside a leading annotation it skips over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnnotationSkip {
    /// Saw `@`, the name comes next.
    Name,
    /// Saw the name, an argument block may follow.
    Args,
}

/// Step a member extractor over a leading annotation.
///
/// Returns `Some(consumed)` when the token belongs to an annotation,
/// `None` when the extractor should handle it.
pub(crate) fn skip_annotation(
    skip: &mut Option<AnnotationSkip>,
    token: &Token,
    language: &LanguageDefinition,
) -> Option<bool> {
    match (language.annotation_style(), *skip) {
        (AnnotationStyle::Bracketed, _) => token.is_block('[').then_some(true),
        (AnnotationStyle::AtPrefixed, None) => {
            if token.is_separator("@") {
                *skip = Some(AnnotationSkip::Name);
                Some(true)
            } else {
                None
            }
        }
        (AnnotationStyle::AtPrefixed, Some(AnnotationSkip::Name)) => {
            if token.kind == TokenKind::Identifier {
                *skip = Some(AnnotationSkip::Args);
                Some(true)
            } else {
                *skip = None;
                None
            }
        }
        (AnnotationStyle::AtPrefixed, Some(AnnotationSkip::Args)) => {
            *skip = None;
            token.is_block('(').then_some(true)
        }
    }
}

/// Source-like text of a token run: tokens that touch are joined directly,
/// others with one space.
pub(crate) fn join_tokens(tree: &TokenTree, nodes: &[NodeId]) -> String {
    let mut out = String::new();
    let mut last_end: Option<usize> = None;
    for &node in nodes {
        let token = tree.token(node);
        if let Some(end) = last_end {
            if token.span.offset > end {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        last_end = Some(token.span.end_offset());
    }
    out
}

/// Split `nodes` on top-level `,` separators, dropping comments.
pub(crate) fn split_on_commas(tree: &TokenTree, nodes: &[NodeId]) -> Vec<Vec<NodeId>> {
    let mut groups = vec![Vec::new()];
    for &node in nodes {
        let token = tree.token(node);
        if token.is_separator(",") {
            groups.push(Vec::new());
        } else if token.kind != TokenKind::Comment {
            if let Some(last) = groups.last_mut() {
                last.push(node);
            }
        }
    }
    groups.retain(|group| !group.is_empty());
    groups
}

/// Remove the quotes around a string literal, keeping other text as is.
pub(crate) fn unquote(text: &str) -> String {
    let trimmed = text
        .trim_start_matches('@')
        .trim_start_matches('$');
    for quote in ["\"\"\"", "\"", "'", "`"] {
        if trimmed.len() >= 2 * quote.len() && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[quote.len()..trimmed.len() - quote.len()].to_string();
        }
    }
    text.to_string()
}
