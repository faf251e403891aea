//! Method and constructor declarations, with their parameter lists.

use super::annotation::{parse_arguments, parse_bracketed};
use super::data_type::DataTypeExtractor;
use super::{join_tokens, skip_annotation, split_on_commas, AnnotationSkip, ExtractCx, TokenExtractor};
use crate::language::MemberSyntax;
use crate::signature::{AnnotationSig, MethodSig, ParameterSig};
use crate::token::{NodeId, Token, TokenKind};
use crate::types::TypeSig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Modifiers,
    /// Java `<T, U extends X>` before the return type.
    GenericParams,
    DataType,
    Name,
    /// TypeScript name seen, `?` or `(` next.
    AfterName,
    AfterParams,
    /// TypeScript return type after `:`.
    ReturnType,
    AfterReturn,
    /// `throws ...`, `where ...` or `: base(...)` up to the body.
    Clause,
    /// `=> expression ;`
    ExpressionBody,
    Complete,
    Failed,
}

/// Recognizes `modifiers Type name(params)` followed by a body, `;`, an
/// expression body or a `throws`/`where` clause, and the TypeScript form
/// `modifiers name(params): Type`. Constructors are methods named after
/// their class whose return type is the class itself.
#[derive(Debug)]
pub struct MethodExtractor {
    state: State,
    annotation: Option<AnnotationSkip>,
    modifiers: Vec<String>,
    generic_params: Vec<TypeSig>,
    expect_generic: bool,
    /// Open `<` inside the leading generic parameter list.
    generic_depth: i32,
    data_type: DataTypeExtractor,
    return_type: Option<TypeSig>,
    name: String,
    params: Vec<ParameterSig>,
    last_line: u32,
}

impl MethodExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            annotation: None,
            modifiers: Vec::new(),
            generic_params: Vec::new(),
            expect_generic: false,
            generic_depth: 0,
            data_type: DataTypeExtractor::new(true),
            return_type: None,
            name: String::new(),
            params: Vec::new(),
            last_line: 0,
        }
    }

    fn fail(&mut self) -> bool {
        self.state = State::Failed;
        false
    }

    fn is_modifier(token: &Token, cx: &ExtractCx<'_>) -> bool {
        token.kind == TokenKind::Keyword && cx.language.keywords().is_method_modifier(&token.text)
    }

    fn ends_statement(&self, token: &Token) -> bool {
        token.span.start.line > self.last_line && token.kind != TokenKind::Operator
    }

    /// Split a possibly generic method name such as `Get<T>`.
    fn set_name(&mut self, text: &str, cx: &mut ExtractCx<'_>) -> bool {
        match TypeSig::parse(text) {
            Ok(sig) => {
                let short = sig.name.rsplit('.').next().unwrap_or_default().to_string();
                self.name = short;
                self.generic_params.extend(sig.params);
                true
            }
            Err(error) => {
                cx.type_errors.push(super::MemberTypeError {
                    text: text.to_string(),
                    error,
                });
                false
            }
        }
    }

    fn take_params(&mut self, paren: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        match parse_params(paren, cx) {
            Some(params) => {
                self.params = params;
                true
            }
            None => false,
        }
    }

    fn feed_data_type(&mut self, token: &Token, cx: &mut ExtractCx<'_>, next: State) -> Option<bool> {
        let consumed = self.data_type.accept_next(token, cx);
        if self.data_type.is_failed() {
            self.data_type.reset();
            self.state = State::Failed;
            return Some(consumed);
        }
        if self.data_type.is_complete() {
            self.return_type = self.data_type.take();
            self.state = next;
            if !consumed {
                return None;
            }
        }
        Some(consumed)
    }

    fn accept_type_first(&mut self, token: &Token, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
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
                if token.is_operator("<") && self.generic_params.is_empty() {
                    self.state = State::GenericParams;
                    self.expect_generic = true;
                    self.generic_depth = 1;
                    return true;
                }
                if !self.data_type.starts_type(token, cx) {
                    if self.state == State::Init && self.modifiers.is_empty() {
                        return false;
                    }
                    return self.fail();
                }
                self.state = State::DataType;
                self.accept_type_first(token, node, cx)
            }
            State::GenericParams => {
                // bounds such as `Comparable<? super T>` close with `>>`
                if token.kind == TokenKind::Operator && token.text.chars().all(|c| c == '<' || c == '>') {
                    self.generic_depth += token.text.chars().map(|c| if c == '<' { 1 } else { -1 }).sum::<i32>();
                    if self.generic_depth <= 0 {
                        self.state = State::Modifiers;
                    }
                } else if self.generic_depth == 1 && token.is_separator(",") {
                    self.expect_generic = true;
                } else if self.generic_depth == 1 && token.kind == TokenKind::Identifier && self.expect_generic {
                    self.generic_params.push(TypeSig::simple(token.text.clone()));
                    self.expect_generic = false;
                }
                true
            }
            State::DataType => match self.feed_data_type(token, cx, State::Name) {
                Some(consumed) => consumed,
                None => self.accept_type_first(token, node, cx),
            },
            State::Name => {
                if token.kind == TokenKind::Identifier {
                    if !self.set_name(&token.text, cx) {
                        self.state = State::Failed;
                        return true;
                    }
                    self.state = State::AfterName;
                    return true;
                }
                let is_constructor = token.is_block('(')
                    && self
                        .return_type
                        .as_ref()
                        .is_some_and(|t| !t.is_generic() && Some(t.name.as_str()) == cx.block_name());
                if is_constructor {
                    self.name = cx.block_name().unwrap_or_default().to_string();
                    if !self.take_params(node, cx) {
                        self.state = State::Failed;
                        return true;
                    }
                    self.state = State::AfterParams;
                    return true;
                }
                self.fail()
            }
            State::AfterName => {
                if token.is_block('(') {
                    if !self.take_params(node, cx) {
                        self.state = State::Failed;
                        return true;
                    }
                    self.state = State::AfterParams;
                    true
                } else {
                    self.fail()
                }
            }
            State::AfterParams => {
                if token.is_separator(";") || token.is_block('{') {
                    self.state = State::Complete;
                } else if token.is_operator("=>") {
                    self.state = State::ExpressionBody;
                } else if token.is_keyword("throws")
                    || token.is_keyword("default")
                    || token.is_operator(":")
                    || (token.kind == TokenKind::Identifier && token.text == "where")
                {
                    self.state = State::Clause;
                } else {
                    return self.fail();
                }
                true
            }
            State::Clause => {
                if token.is_separator(";") || token.is_block('{') {
                    self.state = State::Complete;
                }
                true
            }
            State::ExpressionBody => {
                if token.is_separator(";") {
                    self.state = State::Complete;
                }
                true
            }
            _ => false,
        }
    }

    fn accept_name_first(&mut self, token: &Token, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
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
                if token.kind == TokenKind::Identifier {
                    if !self.set_name(&token.text, cx) {
                        self.state = State::Failed;
                        return true;
                    }
                } else if token.kind == TokenKind::String {
                    self.name = super::unquote(&token.text);
                } else {
                    if self.state == State::Init && self.modifiers.is_empty() {
                        return false;
                    }
                    return self.fail();
                }
                self.state = State::AfterName;
                true
            }
            State::AfterName => {
                if token.is_operator("?") {
                    true
                } else if token.is_block('(') {
                    if !self.take_params(node, cx) {
                        self.state = State::Failed;
                        return true;
                    }
                    self.state = State::AfterParams;
                    true
                } else {
                    self.fail()
                }
            }
            State::AfterParams | State::AfterReturn => {
                if self.state == State::AfterParams && token.is_operator(":") {
                    self.state = State::ReturnType;
                    true
                } else if token.is_separator(";") || token.is_block('{') {
                    self.state = State::Complete;
                    true
                } else if self.ends_statement(token) {
                    self.state = State::Complete;
                    false
                } else {
                    self.fail()
                }
            }
            State::ReturnType => match self.feed_data_type(token, cx, State::AfterReturn) {
                Some(consumed) => consumed,
                None => self.accept_name_first(token, node, cx),
            },
            _ => false,
        }
    }
}

impl Default for MethodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for MethodExtractor {
    fn name(&self) -> &'static str {
        "method"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if token.kind == TokenKind::Comment {
            return false;
        }
        let consumed = match cx.language.member_syntax() {
            MemberSyntax::TypeFirst => self.accept_type_first(token, node, cx),
            MemberSyntax::NameFirst => self.accept_name_first(token, node, cx),
        };
        if consumed {
            self.last_line = token.span.end.line;
        }
        consumed
    }

    fn block_complete(&mut self, cx: &mut ExtractCx<'_>) {
        if cx.language.member_syntax() != MemberSyntax::NameFirst {
            return;
        }
        match self.state {
            State::AfterParams | State::AfterReturn => self.state = State::Complete,
            State::ReturnType => {
                self.data_type.end();
                if self.data_type.is_complete() {
                    self.return_type = self.data_type.take();
                    self.state = State::Complete;
                }
            }
            _ => {}
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
        let name = std::mem::take(&mut self.name);
        let return_type = self.return_type.take().unwrap_or_else(|| {
            match cx.block_name() {
                Some(block) if name == "constructor" => TypeSig::simple(block),
                _ => TypeSig::simple("any"),
            }
        });
        let method = MethodSig {
            full_name: cx.member_name(&name),
            name,
            return_type,
            generic_params: std::mem::take(&mut self.generic_params),
            params: std::mem::take(&mut self.params),
            modifiers: std::mem::take(&mut self.modifiers),
            annotations: cx.take_annotations(),
            comments: cx.take_comments(),
        };
        cx.members.methods.push(method);
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Init;
        self.annotation = None;
        self.modifiers.clear();
        self.generic_params.clear();
        self.expect_generic = false;
        self.generic_depth = 0;
        self.data_type.reset();
        self.return_type = None;
        self.name.clear();
        self.params.clear();
    }
}

/// Parse the parameter list inside a `(` block.
///
/// Returns `None` when a parameter does not have the expected shape.
pub(crate) fn parse_params(paren: NodeId, cx: &mut ExtractCx<'_>) -> Option<Vec<ParameterSig>> {
    let groups = split_on_commas(cx.tree, cx.tree.children(paren));
    groups
        .iter()
        .enumerate()
        .map(|(position, group)| match cx.language.member_syntax() {
            MemberSyntax::TypeFirst => parse_type_first_param(group, position, cx),
            MemberSyntax::NameFirst => parse_name_first_param(group, position, cx),
        })
        .collect()
}

/// Leading annotations and modifiers of one parameter. Returns the index
/// of the first token after them.
fn param_prefix(
    group: &[NodeId],
    position: usize,
    cx: &ExtractCx<'_>,
    annotations: &mut Vec<AnnotationSig>,
    modifiers: &mut Vec<String>,
) -> usize {
    let tree = cx.tree;
    let mut i = 0;
    while let Some(&node) = group.get(i) {
        let token = tree.token(node);
        if token.is_block('[') && cx.language.member_syntax() == MemberSyntax::TypeFirst && i + 2 < group.len() {
            annotations.extend(parse_bracketed(tree, node));
            i += 1;
        } else if token.is_separator("@") {
            let Some(&name) = group.get(i + 1) else { break };
            let mut annotation = AnnotationSig::new(tree.text(name));
            i += 2;
            if let Some(&args) = group.get(i) {
                if tree.token(args).is_block('(') {
                    annotation.arguments = parse_arguments(tree, args);
                    i += 1;
                }
            }
            annotations.push(annotation);
        } else if token.kind == TokenKind::Keyword && cx.language.is_parameter_modifier(&token.text, position) {
            modifiers.push(token.text.clone());
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Feed tokens from `group[start..]` to a data type machine. Returns the
/// type and the index of the first unconsumed token.
fn param_type(group: &[NodeId], start: usize, cx: &mut ExtractCx<'_>) -> Option<(TypeSig, usize)> {
    let mut data_type = DataTypeExtractor::new(false);
    let mut i = start;
    while let Some(&node) = group.get(i) {
        let token = cx.tree.token(node);
        if data_type.accept_next(token, cx) {
            i += 1;
        }
        if data_type.is_complete() || data_type.is_failed() {
            break;
        }
    }
    data_type.end();
    data_type.take().map(|sig| (sig, i))
}

fn default_value(group: &[NodeId], index: usize, cx: &ExtractCx<'_>) -> Option<String> {
    let node = *group.get(index)?;
    if !cx.tree.token(node).is_operator("=") {
        return None;
    }
    Some(join_tokens(cx.tree, &group[index + 1..]))
}

fn parse_type_first_param(group: &[NodeId], position: usize, cx: &mut ExtractCx<'_>) -> Option<ParameterSig> {
    let mut annotations = Vec::new();
    let mut modifiers = Vec::new();
    let start = param_prefix(group, position, cx, &mut annotations, &mut modifiers);
    let (type_sig, after_type) = param_type(group, start, cx)?;

    let name_token = cx.tree.token(*group.get(after_type)?);
    if name_token.kind != TokenKind::Identifier {
        return None;
    }
    let default_value = default_value(group, after_type + 1, cx);
    Some(ParameterSig {
        name: name_token.text.clone(),
        type_sig,
        modifiers,
        annotations,
        optional: default_value.is_some(),
        default_value,
    })
}

fn parse_name_first_param(group: &[NodeId], position: usize, cx: &mut ExtractCx<'_>) -> Option<ParameterSig> {
    let mut annotations = Vec::new();
    let mut modifiers = Vec::new();
    let mut i = param_prefix(group, position, cx, &mut annotations, &mut modifiers);
    let tree = cx.tree;

    let mut rest = false;
    if tree.token(*group.get(i)?).is_operator("...") {
        rest = true;
        i += 1;
    }
    let name_token = tree.token(*group.get(i)?);
    let name = match name_token.kind {
        TokenKind::Identifier | TokenKind::Keyword => name_token.text.clone(),
        TokenKind::Block => name_token.text.clone(),
        _ => return None,
    };
    i += 1;

    let mut optional = false;
    if group.get(i).is_some_and(|&n| tree.token(n).is_operator("?")) {
        optional = true;
        i += 1;
    }

    let mut type_sig = TypeSig::simple("any");
    if group.get(i).is_some_and(|&n| tree.token(n).is_operator(":")) {
        let (sig, after) = param_type(group, i + 1, cx)?;
        type_sig = sig;
        i = after;
    }
    if rest && type_sig.array_dimensions == 0 && type_sig.name == "any" {
        type_sig.array_dimensions = 1;
    }
    let default_value = default_value(group, i, cx);
    Some(ParameterSig {
        name,
        type_sig,
        modifiers,
        annotations,
        optional: optional || default_value.is_some(),
        default_value,
    })
}

#[cfg(test)]
mod tests {
    use crate::extract::test_support::members_of;
    use crate::language::Language;
    use crate::signature::BlockKind;
    use crate::types::TypeSig;

    #[test]
    fn test_csharp_methods() {
        let members = members_of(
            Language::CSharp,
            BlockKind::Class,
            &["N", "Svc"],
            "public Svc(int a) : base(a) { } \
             public async Task<IList<int>> Load(this string s, [FromBody] Req r, int take = 10) { return null; } \
             T Get<T>(ref int x) where T : class => default; \
             protected abstract void Run();",
        );
        let names: Vec<&str> = members.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Svc", "Load", "Get", "Run"]);

        let ctor = &members.methods[0];
        assert_eq!(ctor.return_type, TypeSig::simple("Svc"));
        assert_eq!(ctor.params[0].name, "a");

        let load = &members.methods[1];
        assert_eq!(load.full_name, vec!["N", "Svc", "Load"]);
        assert_eq!(load.modifiers, vec!["public", "async"]);
        assert_eq!(load.return_type.to_string(), "Task<IList<int>>");
        assert_eq!(load.params.len(), 3);
        assert_eq!(load.params[0].modifiers, vec!["this"]);
        assert_eq!(load.params[1].annotations[0].name, "FromBody");
        assert_eq!(load.params[2].default_value.as_deref(), Some("10"));
        assert!(load.params[2].optional);

        let get = &members.methods[2];
        assert_eq!(get.generic_params, vec![TypeSig::simple("T")]);
        assert_eq!(get.params[0].modifiers, vec!["ref"]);
        assert_eq!(members.methods[3].return_type.name, "void");
    }

    #[test]
    fn test_java_methods() {
        let members = members_of(
            Language::Java,
            BlockKind::Class,
            &["Repo"],
            "@Override public <T extends Comparable<T>> List<T> sort(final List<T> in, String... keys) throws IOException { return in; } \
             abstract void clear();",
        );
        assert_eq!(members.methods.len(), 2);
        let sort = &members.methods[0];
        assert_eq!(sort.name, "sort");
        assert_eq!(sort.generic_params, vec![TypeSig::simple("T")]);
        assert_eq!(sort.params[0].modifiers, vec!["final"]);
        assert_eq!(sort.params[1].type_sig.array_dimensions, 1);
        assert_eq!(sort.annotations.len(), 1);
        assert_eq!(sort.annotations[0].name, "Override");
        assert!(members.fields.is_empty());
    }

    #[test]
    fn test_java_bounded_generic_methods() {
        let members = members_of(
            Language::Java,
            BlockKind::Class,
            &["Sorter"],
            "public <T extends Comparable<? super T>> void sort(List<T> in) { } \
             <T extends A<B<C<D<E>>>>> void deep() { } \
             int x;",
        );
        let names: Vec<&str> = members.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["sort", "deep"]);
        assert_eq!(members.methods[0].generic_params, vec![TypeSig::simple("T")]);
        assert_eq!(members.methods[0].params[0].type_sig.to_string(), "List<T>");
        assert_eq!(members.methods[1].generic_params, vec![TypeSig::simple("T")]);
        assert_eq!(members.fields.len(), 1);
        assert_eq!(members.fields[0].name, "x");
    }

    #[test]
    fn test_typescript_methods() {
        let members = members_of(
            Language::TypeScript,
            BlockKind::Class,
            &["Store"],
            "constructor(private readonly http: Client, name?: string) { }\n\
             async load<T>(id: number, ...rest): Promise<T> { return null; }\n\
             reset() { }\n\
             abstract size(): number;",
        );
        let names: Vec<&str> = members.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["constructor", "load", "reset", "size"]);
        assert_eq!(members.methods[0].return_type, TypeSig::simple("Store"));
        assert_eq!(members.methods[0].params[0].modifiers, vec!["private", "readonly"]);
        assert!(members.methods[0].params[1].optional);
        let load = &members.methods[1];
        assert_eq!(load.generic_params, vec![TypeSig::simple("T")]);
        assert_eq!(load.return_type.name, "Promise");
        assert_eq!(load.return_type.params, vec![TypeSig::simple("T")]);
        assert_eq!(load.params[1].type_sig.array_dimensions, 1);
        assert_eq!(members.methods[2].return_type.name, "any");
        assert_eq!(members.methods[3].return_type.name, "number");
    }
}
