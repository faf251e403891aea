//! Enum constants.

use super::{join_tokens, skip_annotation, AnnotationSkip, ExtractCx, TokenExtractor};
use crate::signature::EnumMemberSig;
use crate::token::{NodeId, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    AfterName,
    /// After `=`.
    Value,
    Complete,
    Failed,
}

/// Recognizes `Name`, `Name = value` and Java `NAME(args) { body }`
/// constants. A Java `;` ends the constant list; later tokens are ignored.
#[derive(Debug)]
pub struct EnumMemberExtractor {
    state: State,
    annotation: Option<AnnotationSkip>,
    name: String,
    value: Vec<NodeId>,
    args: Option<NodeId>,
    done: bool,
}

impl EnumMemberExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            annotation: None,
            name: String::new(),
            value: Vec::new(),
            args: None,
            done: false,
        }
    }
}

impl Default for EnumMemberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for EnumMemberExtractor {
    fn name(&self) -> &'static str {
        "enum member"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if self.done || token.kind == TokenKind::Comment {
            return false;
        }
        match self.state {
            State::Init => {
                if let Some(consumed) = skip_annotation(&mut self.annotation, token, cx.language) {
                    return consumed;
                }
                if token.kind == TokenKind::Identifier && !token.text.contains(['.', '<']) {
                    self.name = token.text.clone();
                    self.state = State::AfterName;
                    true
                } else if token.is_separator(";") {
                    self.done = true;
                    true
                } else {
                    false
                }
            }
            State::AfterName => {
                if token.is_separator(",") {
                    self.state = State::Complete;
                } else if token.is_separator(";") {
                    self.state = State::Complete;
                    self.done = true;
                } else if token.is_operator("=") {
                    self.state = State::Value;
                } else if token.is_block('(') && self.args.is_none() {
                    self.args = Some(node);
                } else if token.is_block('{') {
                    // constant-specific class body
                } else {
                    self.state = State::Failed;
                    return false;
                }
                true
            }
            State::Value => {
                if token.is_separator(",") {
                    self.state = State::Complete;
                } else if token.is_separator(";") {
                    self.state = State::Complete;
                    self.done = true;
                } else {
                    self.value.push(node);
                }
                true
            }
            State::Complete | State::Failed => false,
        }
    }

    fn block_complete(&mut self, _cx: &mut ExtractCx<'_>) {
        if matches!(self.state, State::AfterName | State::Value) {
            self.state = State::Complete;
        }
    }

    fn is_idle(&self) -> bool {
        self.state == State::Init && self.annotation.is_none()
    }

    fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    fn finish(&mut self, cx: &mut ExtractCx<'_>) {
        let value = if !self.value.is_empty() {
            Some(join_tokens(cx.tree, &self.value))
        } else {
            self.args
                .map(|args| join_tokens(cx.tree, cx.tree.children(args)))
        };
        let name = std::mem::take(&mut self.name);
        let full_name = cx.member_name(&name);
        let annotations = cx.take_annotations();
        let comments = cx.take_comments();
        cx.members.enum_members.push(EnumMemberSig {
            full_name,
            name,
            value,
            annotations,
            comments,
        });
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Init;
        self.annotation = None;
        self.name.clear();
        self.value.clear();
        self.args = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::test_support::members_of;
    use crate::language::Language;
    use crate::signature::BlockKind;

    #[test]
    fn test_csharp_enum_values() {
        let members = members_of(
            Language::CSharp,
            BlockKind::Enum,
            &["N", "Color"],
            "/// first\n Red = 1, [Obsolete] Green, Blue = 1 << 2",
        );
        let names: Vec<&str> = members.enum_members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
        assert_eq!(members.enum_members[0].value.as_deref(), Some("1"));
        assert_eq!(members.enum_members[0].comments, vec!["first"]);
        assert_eq!(members.enum_members[1].annotations[0].name, "Obsolete");
        assert_eq!(members.enum_members[2].value.as_deref(), Some("1 << 2"));
        assert_eq!(members.enum_members[2].full_name, vec!["N", "Color", "Blue"]);
        assert!(members.fields.is_empty());
    }

    #[test]
    fn test_java_enum_with_constructor_args_and_members() {
        let members = members_of(
            Language::Java,
            BlockKind::Enum,
            &["Planet"],
            "MERCURY(3.3e23, 2.4e6), EARTH(5.9e24, 6.3e6) { }; private final double mass; double mass() { return mass; }",
        );
        assert_eq!(members.enum_members.len(), 2);
        assert_eq!(members.enum_members[0].value.as_deref(), Some("3.3e23, 2.4e6"));
        assert_eq!(members.enum_members[1].name, "EARTH");
        assert_eq!(members.fields.len(), 1);
        assert_eq!(members.methods.len(), 1);
    }

    #[test]
    fn test_typescript_enum() {
        let members = members_of(Language::TypeScript, BlockKind::Enum, &["Kind"], "A = \"a\",\n B = \"b\"");
        assert_eq!(members.enum_members.len(), 2);
        assert_eq!(members.enum_members[1].value.as_deref(), Some("\"b\""));
    }
}
