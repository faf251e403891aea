//! C# attributes and Java/TypeScript annotations.

use super::{join_tokens, split_on_commas, unquote, ExtractCx, TokenExtractor};
use crate::language::AnnotationStyle;
use crate::signature::{AnnotationArg, AnnotationSig};
use crate::token::{NodeId, TokenKind, TokenTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    /// Saw `@`.
    Name,
    /// Saw `@Name`, arguments may follow.
    Args,
    Complete,
    Failed,
}

/// Collects `[Name(args), Other]` blocks or `@Name(args)` sequences into
/// the pending annotations of the context.
#[derive(Debug)]
pub struct AnnotationExtractor {
    state: State,
    found: Vec<AnnotationSig>,
}

impl AnnotationExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            found: Vec::new(),
        }
    }
}

impl Default for AnnotationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for AnnotationExtractor {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if token.kind == TokenKind::Comment {
            return false;
        }
        match (cx.language.annotation_style(), self.state) {
            (AnnotationStyle::Bracketed, State::Init) => {
                if !token.is_block('[') {
                    return false;
                }
                let found = parse_bracketed(cx.tree, node);
                if found.is_empty() {
                    return false;
                }
                self.found = found;
                self.state = State::Complete;
                true
            }
            (AnnotationStyle::AtPrefixed, State::Init) => {
                if token.is_separator("@") {
                    self.state = State::Name;
                    true
                } else {
                    false
                }
            }
            (AnnotationStyle::AtPrefixed, State::Name) => {
                if token.kind == TokenKind::Identifier {
                    self.found.push(AnnotationSig::new(token.text.clone()));
                    self.state = State::Args;
                    true
                } else {
                    self.state = State::Failed;
                    false
                }
            }
            (AnnotationStyle::AtPrefixed, State::Args) => {
                self.state = State::Complete;
                if token.is_block('(') {
                    if let Some(annotation) = self.found.last_mut() {
                        annotation.arguments = parse_arguments(cx.tree, node);
                    }
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn block_complete(&mut self, _cx: &mut ExtractCx<'_>) {
        if self.state == State::Args {
            self.state = State::Complete;
        }
    }

    fn is_idle(&self) -> bool {
        self.state == State::Init
    }

    fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    fn finish(&mut self, cx: &mut ExtractCx<'_>) {
        cx.pending_annotations.append(&mut self.found);
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Init;
        self.found.clear();
    }
}

/// Annotations inside a C# `[...]` block. Empty when the block is not an
/// attribute list (an indexer parameter list, for instance).
pub(crate) fn parse_bracketed(tree: &TokenTree, block: NodeId) -> Vec<AnnotationSig> {
    let mut annotations = Vec::new();
    for group in split_on_commas(tree, tree.children(block)) {
        // `return:` and `assembly:` target prefixes
        let start = match group.get(1) {
            Some(&second) if tree.token(second).is_operator(":") => 2,
            _ => 0,
        };
        let Some(&name) = group.get(start) else {
            return Vec::new();
        };
        if tree.kind(name) != TokenKind::Identifier {
            return Vec::new();
        }
        let mut annotation = AnnotationSig::new(tree.text(name));
        if let Some(&args) = group.get(start + 1) {
            if tree.token(args).is_block('(') {
                annotation.arguments = parse_arguments(tree, args);
            }
        }
        annotations.push(annotation);
    }
    annotations
}

/// Arguments inside a `(...)` block. `name = value` pairs keep their name,
/// positional values are named `arg1`, `arg2`, ... in order.
pub(crate) fn parse_arguments(tree: &TokenTree, paren: NodeId) -> Vec<AnnotationArg> {
    let mut positional = 0;
    split_on_commas(tree, tree.children(paren))
        .into_iter()
        .map(|group| {
            let named = group.len() >= 3
                && tree.kind(group[0]) == TokenKind::Identifier
                && (tree.token(group[1]).is_operator("=") || tree.token(group[1]).is_operator(":"));
            let (name, value_nodes) = if named {
                (tree.text(group[0]).to_string(), &group[2..])
            } else {
                positional += 1;
                (format!("arg{}", positional), &group[..])
            };
            let value = match value_nodes {
                [single] if tree.kind(*single) == TokenKind::String => unquote(tree.text(*single)),
                _ => join_tokens(tree, value_nodes),
            };
            AnnotationArg { name, value }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::members_of;
    use crate::language::Language;
    use crate::signature::BlockKind;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_bracketed_attributes() {
        let def = Language::CSharp.definition();
        let tree = tokenize("[WebInvoke(Method = \"POST\", UriTemplate = \"/add\"), Obsolete(\"old\", true)]", &def).unwrap();
        let block = tree.children(tree.root())[0];
        let found = parse_bracketed(&tree, block);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "WebInvoke");
        assert_eq!(found[0].argument("Method"), Some("POST"));
        assert_eq!(found[0].argument("UriTemplate"), Some("/add"));
        assert_eq!(found[1].argument("arg1"), Some("old"));
        assert_eq!(found[1].argument("arg2"), Some("true"));
    }

    #[test]
    fn test_return_target_and_non_attribute_blocks() {
        let def = Language::CSharp.definition();
        let tree = tokenize("[return: NotNull] [int i]", &def).unwrap();
        let blocks = tree.children(tree.root()).to_vec();
        assert_eq!(parse_bracketed(&tree, blocks[0])[0].name, "NotNull");
        assert!(parse_bracketed(&tree, blocks[1]).is_empty());
    }

    #[test]
    fn test_annotations_attach_to_next_member() {
        let members = members_of(
            Language::Java,
            BlockKind::Class,
            &["A"],
            "@Deprecated @SuppressWarnings(\"all\") public void run() { } int plain;",
        );
        let run = &members.methods[0];
        let names: Vec<&str> = run.annotations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Deprecated", "SuppressWarnings"]);
        assert_eq!(run.annotations[1].argument("arg1"), Some("all"));
        assert!(members.fields[0].annotations.is_empty());
    }

    #[test]
    fn test_csharp_attributes_on_properties() {
        let members = members_of(
            Language::CSharp,
            BlockKind::Class,
            &["A"],
            "[Required] [MaxLength(20)] public string Name { get; set; }",
        );
        let field = &members.fields[0];
        assert_eq!(field.annotations.len(), 2);
        assert_eq!(field.annotations[1].argument("arg1"), Some("20"));
    }
}
