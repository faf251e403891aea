//! Field (and C# property) declarations.

use super::data_type::DataTypeExtractor;
use super::{skip_annotation, AnnotationSkip, ExtractCx, TokenExtractor};
use crate::language::MemberSyntax;
use crate::signature::FieldSig;
use crate::token::{NodeId, Token, TokenKind};
use crate::types::TypeSig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Modifiers,
    DataType,
    Name,
    AfterName,
    /// TypeScript `name?` or `name!`, waiting for `:`.
    Optional,
    /// TypeScript `name:`, the type comes next.
    TypeAnnotation,
    AfterType,
    Initializer,
    Complete,
    Failed,
}

/// Recognizes `modifiers Type name ;` (or `= initializer ;`, or a C#
/// property body) and the TypeScript form `modifiers name?: Type;`.
#[derive(Debug)]
pub struct FieldExtractor {
    state: State,
    annotation: Option<AnnotationSkip>,
    modifiers: Vec<String>,
    data_type: DataTypeExtractor,
    type_sig: Option<TypeSig>,
    name: String,
    optional: bool,
    last_line: u32,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            annotation: None,
            modifiers: Vec::new(),
            data_type: DataTypeExtractor::new(false),
            type_sig: None,
            name: String::new(),
            optional: false,
            last_line: 0,
        }
    }

    fn fail(&mut self) -> bool {
        self.state = State::Failed;
        false
    }

    fn is_modifier(token: &Token, cx: &ExtractCx<'_>) -> bool {
        token.kind == TokenKind::Keyword && cx.language.keywords().is_field_modifier(&token.text)
    }

    /// A TypeScript statement ended at a line break without `;`.
    fn ends_statement(&self, token: &Token, cx: &ExtractCx<'_>) -> bool {
        cx.language.member_syntax() == MemberSyntax::NameFirst
            && token.span.start.line > self.last_line
            && token.kind != TokenKind::Operator
    }

    fn accept_type_first(&mut self, token: &Token, cx: &mut ExtractCx<'_>) -> bool {
        match self.state {
            State::Init | State::Modifiers => {
                if let Some(consumed) = skip_annotation(&mut self.annotation, token, cx.language) {
                    return consumed;
                }
                if Self::is_modifier(token, cx) {
                    self.modifiers.push(token.text.clone());
                    self.state = State::Modifiers;
                    return true;
                }
                if !self.data_type.starts_type(token, cx) {
                    if self.state == State::Init && self.modifiers.is_empty() {
                        return false;
                    }
                    return self.fail();
                }
                self.state = State::DataType;
                self.accept_type_first(token, cx)
            }
            State::DataType => {
                let consumed = self.data_type.accept_next(token, cx);
                if self.data_type.is_failed() {
                    self.data_type.reset();
                    self.state = State::Failed;
                    return consumed;
                }
                if self.data_type.is_complete() {
                    self.type_sig = self.data_type.take();
                    self.state = State::Name;
                    if !consumed {
                        return self.accept_type_first(token, cx);
                    }
                }
                consumed
            }
            State::Name => {
                if token.kind == TokenKind::Identifier && !token.text.contains(['.', '<', '[']) {
                    self.name = token.text.clone();
                    self.state = State::AfterName;
                    true
                } else {
                    self.fail()
                }
            }
            State::AfterName => {
                if token.is_separator(";") || token.is_separator(",") {
                    self.state = State::Complete;
                    true
                } else if token.is_operator("=") || token.is_operator("=>") {
                    self.state = State::Initializer;
                    true
                } else if token.is_block('{') && cx.language.has_property_blocks() {
                    self.state = State::Complete;
                    true
                } else {
                    self.fail()
                }
            }
            State::Initializer => {
                if token.is_separator(";") {
                    self.state = State::Complete;
                }
                true
            }
            _ => false,
        }
    }

    fn accept_name_first(&mut self, token: &Token, cx: &mut ExtractCx<'_>) -> bool {
        match self.state {
            State::Init | State::Modifiers => {
                if let Some(consumed) = skip_annotation(&mut self.annotation, token, cx.language) {
                    return consumed;
                }
                if Self::is_modifier(token, cx) {
                    self.modifiers.push(token.text.clone());
                    self.state = State::Modifiers;
                    return true;
                }
                let named = matches!(token.kind, TokenKind::Identifier | TokenKind::String)
                    && !token.text.contains(['.', '<']);
                if !named {
                    if self.state == State::Init && self.modifiers.is_empty() {
                        return false;
                    }
                    return self.fail();
                }
                self.name = super::unquote(&token.text);
                self.state = State::AfterName;
                true
            }
            State::AfterName | State::Optional => {
                if token.is_operator(":") {
                    self.state = State::TypeAnnotation;
                    true
                } else if self.state == State::AfterName && (token.is_operator("?") || token.is_operator("!")) {
                    self.optional = token.is_operator("?");
                    self.state = State::Optional;
                    true
                } else if token.is_operator("=") {
                    self.state = State::Initializer;
                    true
                } else if token.is_separator(";") || token.is_separator(",") {
                    self.state = State::Complete;
                    true
                } else if self.ends_statement(token, cx) {
                    self.state = State::Complete;
                    false
                } else {
                    self.fail()
                }
            }
            State::TypeAnnotation => {
                self.state = State::DataType;
                self.accept_name_first(token, cx)
            }
            State::DataType => {
                let consumed = self.data_type.accept_next(token, cx);
                if self.data_type.is_failed() {
                    self.data_type.reset();
                    self.state = State::Failed;
                    return consumed;
                }
                if self.data_type.is_complete() {
                    self.type_sig = self.data_type.take();
                    self.state = State::AfterType;
                    if !consumed {
                        return self.accept_name_first(token, cx);
                    }
                }
                consumed
            }
            State::AfterType => {
                if token.is_separator(";") || token.is_separator(",") {
                    self.state = State::Complete;
                    true
                } else if token.is_operator("=") {
                    self.state = State::Initializer;
                    true
                } else if self.ends_statement(token, cx) {
                    self.state = State::Complete;
                    false
                } else {
                    self.fail()
                }
            }
            State::Initializer => {
                if token.is_separator(";") {
                    self.state = State::Complete;
                    true
                } else if self.ends_statement(token, cx) {
                    self.state = State::Complete;
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for FieldExtractor {
    fn name(&self) -> &'static str {
        "field"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if token.kind == TokenKind::Comment {
            return false;
        }
        let consumed = match cx.language.member_syntax() {
            MemberSyntax::TypeFirst => self.accept_type_first(token, cx),
            MemberSyntax::NameFirst => self.accept_name_first(token, cx),
        };
        if consumed {
            self.last_line = token.span.end.line;
        }
        consumed
    }

    fn block_complete(&mut self, cx: &mut ExtractCx<'_>) {
        // TypeScript lets the last member of a body end without `;`
        if cx.language.member_syntax() == MemberSyntax::NameFirst
            && matches!(self.state, State::AfterName | State::Optional | State::AfterType | State::Initializer)
        {
            self.state = State::Complete;
        } else if self.state == State::DataType && cx.language.member_syntax() == MemberSyntax::NameFirst {
            self.data_type.end();
            if self.data_type.is_complete() {
                self.type_sig = self.data_type.take();
                self.state = State::Complete;
            }
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
        let mut type_sig = self.type_sig.take().unwrap_or_else(|| TypeSig::simple("any"));
        if self.optional {
            type_sig.nullable = true;
        }
        let name = std::mem::take(&mut self.name);
        let field = FieldSig {
            full_name: cx.member_name(&name),
            name,
            type_sig,
            modifiers: std::mem::take(&mut self.modifiers),
            annotations: cx.take_annotations(),
            comments: cx.take_comments(),
        };
        cx.members.fields.push(field);
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Init;
        self.annotation = None;
        self.modifiers.clear();
        self.data_type.reset();
        self.type_sig = None;
        self.name.clear();
        self.optional = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::test_support::members_of;
    use crate::language::Language;
    use crate::signature::BlockKind;
    use crate::types::TypeSig;

    #[test]
    fn test_csharp_fields_and_properties() {
        let members = members_of(
            Language::CSharp,
            BlockKind::Class,
            &["N", "A"],
            "private int count; public string Name { get; set; } public IList<int>? Ids { get; } = new List<int>(); static readonly int Max = 10;",
        );
        let names: Vec<&str> = members.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["count", "Name", "Ids", "Max"]);
        assert_eq!(members.fields[0].full_name, vec!["N", "A", "count"]);
        assert_eq!(members.fields[0].modifiers, vec!["private"]);
        assert_eq!(members.fields[2].type_sig.name, "IList");
        assert!(members.fields[2].type_sig.nullable);
        assert_eq!(members.fields[3].modifiers, vec!["static", "readonly"]);
    }

    #[test]
    fn test_java_fields_with_annotations() {
        let members = members_of(
            Language::Java,
            BlockKind::Class,
            &["A"],
            "@Id private Long id; @Column(name = \"title\") String title = \"x\"; int[] values;",
        );
        assert_eq!(members.fields.len(), 3);
        assert_eq!(members.fields[0].name, "id");
        assert_eq!(members.fields[0].type_sig, TypeSig::simple("Long"));
        assert_eq!(members.fields[2].type_sig.array_dimensions, 1);
    }

    #[test]
    fn test_java_wildcard_fields() {
        let members = members_of(
            Language::Java,
            BlockKind::Class,
            &["A"],
            "private List<?> items; private List<? extends Foo> more; int x;",
        );
        let names: Vec<&str> = members.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["items", "more", "x"]);
        assert_eq!(members.fields[0].type_sig.params, vec![TypeSig::simple("?")]);
        let bound = &members.fields[1].type_sig.params[0];
        assert!(bound.is_wildcard());
        assert_eq!(bound.name, "? extends");
        assert_eq!(bound.params, vec![TypeSig::simple("Foo")]);
        assert_eq!(members.fields[1].type_sig.to_string(), "List<? extends Foo>");
    }

    #[test]
    fn test_methods_are_not_fields() {
        let members = members_of(Language::Java, BlockKind::Class, &["A"], "int f() { return 1; } int x;");
        assert_eq!(members.fields.len(), 1);
        assert_eq!(members.fields[0].name, "x");
    }

    #[test]
    fn test_typescript_fields() {
        let members = members_of(
            Language::TypeScript,
            BlockKind::Class,
            &["A"],
            "private name: string;\n count?: number\n readonly tags: string[] = [];\n untyped = 5;\n last: Map<string, number>",
        );
        let names: Vec<&str> = members.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "count", "tags", "untyped", "last"]);
        assert!(members.fields[1].type_sig.nullable);
        assert_eq!(members.fields[2].modifiers, vec!["readonly"]);
        assert_eq!(members.fields[3].type_sig.name, "any");
        assert_eq!(members.fields[4].type_sig.params.len(), 2);
    }
}
