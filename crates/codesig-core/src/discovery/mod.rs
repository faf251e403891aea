//! Block discovery.
//!
//! Walks a token tree and recognizes class, interface, enum and namespace
//! declarations by reading backward from every `{` block. The body of each
//! declaration is handed to the member extractors, then walked for nested
//! declarations with the declared name pushed onto the scope.

mod cursor;

use tracing::{debug, trace};

use crate::extract::{
    extract_imports, extract_members, parse_arguments, parse_bracketed, strip_comment, unquote,
    MemberTypeError,
};
use crate::language::{AnnotationStyle, Language, LanguageDefinition};
use crate::parser::ParseMetrics;
use crate::signature::{AnnotationSig, BlockKind, BlockSig, ImportSig};
use crate::token::{NodeId, Position, Token, TokenKind, TokenTree};
use crate::types::TypeSig;

use cursor::Cursor;

/// A declaration together with the block holding its body.
#[derive(Debug, Clone)]
pub struct DiscoveredBlock {
    pub signature: BlockSig,
    pub body: NodeId,
}

/// Everything block discovery found in one token tree.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Declarations in source order, enclosing blocks before nested ones.
    pub blocks: Vec<DiscoveredBlock>,
    /// Imports at file level and inside namespace bodies.
    pub imports: Vec<ImportSig>,
    /// Every namespace or package the file declares.
    pub namespaces: Vec<Vec<String>>,
    pub type_errors: Vec<MemberTypeError>,
    pub metrics: ParseMetrics,
}

/// Discover every declaration in `tree`.
pub fn discover(tree: &TokenTree, language: &LanguageDefinition) -> Discovery {
    let root = tree.root();
    let imports = extract_imports(tree, tree.children(root), language);
    let mut walker = Walker {
        tree,
        language,
        scope: Vec::new(),
        imports: imports.clone(),
        out: Discovery {
            imports,
            ..Default::default()
        },
    };
    walker.walk(root, None);
    walker.out
}

/// Header of a declaration, read from the tokens before its body.
struct Header {
    kind: BlockKind,
    declaration: String,
    name: Vec<String>,
    generic_params: Vec<TypeSig>,
    extends: Option<TypeSig>,
    implements: Vec<TypeSig>,
    modifiers: Vec<String>,
    annotations: Vec<AnnotationSig>,
    comments: Vec<String>,
    position: Position,
}

struct Walker<'t> {
    tree: &'t TokenTree,
    language: &'t LanguageDefinition,
    scope: Vec<String>,
    /// Imports visible at the current position.
    imports: Vec<ImportSig>,
    out: Discovery,
}

impl<'t> Walker<'t> {
    fn walk(&mut self, parent: NodeId, parent_kind: Option<BlockKind>) {
        let tree = self.tree;
        let siblings = tree.children(parent);
        for (index, &node) in siblings.iter().enumerate() {
            let token = tree.token(node);
            if token.kind != TokenKind::Block {
                if parent == tree.root() {
                    self.file_scope(siblings, index);
                }
                continue;
            }
            if token.is_block('{') {
                if let Some(header) = self.read_header(siblings, index) {
                    self.enter(header, node, parent_kind);
                    continue;
                }
            }
            self.walk(node, parent_kind);
        }
    }

    /// Java `package a.b;` and C# `namespace A.B;` scope the rest of the file.
    fn file_scope(&mut self, siblings: &[NodeId], index: usize) {
        let tree = self.tree;
        let token = tree.token(siblings[index]);
        let declares = match self.language.language() {
            Language::Java => token.is_keyword("package"),
            Language::CSharp => token.is_keyword("namespace"),
            Language::TypeScript => false,
        };
        if !declares {
            return;
        }
        let Some((next, name)) = tree.sibling(siblings, index, true) else {
            return;
        };
        let terminated = tree
            .sibling(siblings, next, true)
            .is_some_and(|(_, end)| tree.token(end).is_separator(";"));
        if tree.kind(name) != TokenKind::Identifier || !terminated {
            return;
        }
        self.scope.extend(split_name(tree.text(name)));
        debug!(namespace = %self.scope.join("."), "file-level namespace");
        self.out.namespaces.push(self.scope.clone());
    }

    fn enter(&mut self, header: Header, body: NodeId, parent_kind: Option<BlockKind>) {
        let depth = self.scope.len();
        let visible_imports = self.imports.len();
        self.scope.extend(header.name);

        let mut signature = BlockSig {
            full_name: self.scope.clone(),
            kind: header.kind,
            declaration: header.declaration,
            access: self.language.access(&header.modifiers, header.kind, parent_kind),
            modifiers: header.modifiers,
            generic_params: header.generic_params,
            extends: header.extends,
            implements: header.implements,
            annotations: header.annotations,
            comments: header.comments,
            fields: Vec::new(),
            methods: Vec::new(),
            enum_members: Vec::new(),
            imports: Vec::new(),
            position: header.position,
        };

        if !header.kind.has_members() {
            let nested = extract_imports(self.tree, self.tree.children(body), self.language);
            self.out.imports.extend(nested.iter().cloned());
            self.imports.extend(nested);
            self.out.namespaces.push(signature.full_name.clone());
        } else {
            let (members, errors, metrics) =
                extract_members(self.tree, body, header.kind, self.language, &signature.full_name);
            signature.fields = members.fields;
            signature.methods = members.methods;
            signature.enum_members = members.enum_members;
            self.out.type_errors.extend(errors);
            self.out.metrics.merge(&metrics);
            self.out.metrics.blocks += 1;
        }
        signature.imports = self.imports.clone();

        trace!(
            block = %signature.full_name_string(),
            kind = %signature.kind,
            fields = signature.fields.len(),
            methods = signature.methods.len(),
            "discovered block"
        );
        self.out.blocks.push(DiscoveredBlock { signature, body });

        self.walk(body, Some(header.kind));
        self.imports.truncate(visible_imports);
        self.scope.truncate(depth);
    }

    /// Search backward from the `{` at `open` for a block keyword that starts
    /// a declaration header.
    fn read_header(&mut self, siblings: &[NodeId], open: usize) -> Option<Header> {
        let mut index = open;
        while index > 0 {
            index -= 1;
            let token = self.tree.token(siblings[index]);
            if token.is_separator(";") || token.is_block('{') {
                return None;
            }
            if token.kind != TokenKind::Keyword || !self.language.keywords().is_block_keyword(&token.text) {
                continue;
            }
            if let Some(kind) = BlockKind::from_keyword(&token.text) {
                if let Some(header) = self.header_at(siblings, index, open, kind) {
                    return Some(header);
                }
            }
        }
        None
    }

    fn header_at(&mut self, siblings: &[NodeId], keyword: usize, open: usize, kind: BlockKind) -> Option<Header> {
        let tree = self.tree;
        let keyword_token = tree.token(siblings[keyword]);
        let mut rest = siblings[keyword + 1..open]
            .iter()
            .copied()
            .filter(|&node| tree.kind(node) != TokenKind::Comment)
            .peekable();

        let name_token = tree.token(rest.next()?);
        let (name, mut generic_params) = match name_token.kind {
            TokenKind::Identifier => self.declared_name(name_token, kind)?,
            TokenKind::String if kind == BlockKind::Namespace => (vec![unquote(&name_token.text)], Vec::new()),
            _ => return None,
        };

        // `<T extends Base>` does not fit in one identifier token
        if rest.peek().is_some_and(|&node| tree.token(node).is_operator("<")) {
            rest.next();
            let mut depth = 1i32;
            let mut expect_param = true;
            while depth > 0 {
                let token = tree.token(rest.next()?);
                if token.kind == TokenKind::Operator && token.text.chars().all(|c| c == '<' || c == '>') {
                    depth += token.text.chars().map(|c| if c == '<' { 1 } else { -1 }).sum::<i32>();
                } else if depth == 1 && token.is_separator(",") {
                    expect_param = true;
                } else if depth == 1 && expect_param && token.kind == TokenKind::Identifier {
                    generic_params.push(TypeSig::simple(token.text.clone()));
                    expect_param = false;
                }
            }
        }

        // C# record and primary constructor parameters
        if kind == BlockKind::Class && rest.peek().is_some_and(|&node| tree.token(node).is_block('(')) {
            rest.next();
        }

        let mut groups: Vec<(String, Vec<TypeSig>)> = Vec::new();
        for node in rest {
            let token = tree.token(node);
            if self.language.is_inheritance(token) {
                groups.push((token.text.clone(), Vec::new()));
            } else if token.is_separator(",") && !groups.is_empty() {
                continue;
            } else if token.kind == TokenKind::Identifier && self.ends_base_list(token) {
                break;
            } else if token.kind == TokenKind::Identifier || self.language.keywords().is_type(&token.text) {
                let (_, group) = groups.last_mut()?;
                match TypeSig::parse(&token.text) {
                    Ok(sig) => group.push(sig),
                    Err(error) => self.out.type_errors.push(MemberTypeError {
                        text: token.text.clone(),
                        error,
                    }),
                }
            } else {
                return None;
            }
        }
        let (extends, implements) = self.assign_bases(kind, &keyword_token.text, groups);

        let mut header = Header {
            kind,
            declaration: keyword_token.text.clone(),
            name,
            generic_params,
            extends,
            implements,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            comments: Vec::new(),
            position: keyword_token.span.start,
        };
        self.read_prefix(siblings, keyword, &mut header);
        Some(header)
    }

    /// Name parts and generic parameters of a declared identifier.
    fn declared_name(&mut self, token: &Token, kind: BlockKind) -> Option<(Vec<String>, Vec<TypeSig>)> {
        if kind == BlockKind::Namespace {
            return Some((split_name(&token.text), Vec::new()));
        }
        match TypeSig::parse(&token.text) {
            Ok(sig) if !sig.nullable && sig.array_dimensions == 0 => Some((split_name(&sig.name), sig.params)),
            Ok(_) => None,
            Err(error) => {
                self.out.type_errors.push(MemberTypeError {
                    text: token.text.clone(),
                    error,
                });
                None
            }
        }
    }

    /// C# `where` constraints and Java `permits` lists follow the bases.
    fn ends_base_list(&self, token: &Token) -> bool {
        match self.language.language() {
            Language::CSharp => token.text == "where",
            Language::Java => token.text == "permits",
            Language::TypeScript => false,
        }
    }

    fn assign_bases(
        &self,
        kind: BlockKind,
        declaration: &str,
        groups: Vec<(String, Vec<TypeSig>)>,
    ) -> (Option<TypeSig>, Vec<TypeSig>) {
        let mut extends = None;
        let mut implements = Vec::new();
        if self.language.language() == Language::CSharp {
            let mut bases = groups.into_iter().flat_map(|(_, types)| types).peekable();
            match kind {
                // an enum base is its underlying integral type
                BlockKind::Enum | BlockKind::Namespace => return (None, Vec::new()),
                BlockKind::Class if declaration != "struct" => {
                    if bases.peek().is_some_and(|base| !is_interface_name(&base.name)) {
                        extends = bases.next();
                    }
                }
                _ => {}
            }
            implements.extend(bases);
            return (extends, implements);
        }

        for (keyword, types) in groups {
            if keyword == "extends" && kind != BlockKind::Interface {
                let mut types = types.into_iter();
                extends = extends.or(types.next());
                implements.extend(types);
            } else {
                implements.extend(types);
            }
        }
        (extends, implements)
    }

    /// Modifiers, annotations and comments before the block keyword.
    fn read_prefix(&mut self, siblings: &[NodeId], keyword: usize, header: &mut Header) {
        let tree = self.tree;
        let mut cursor = Cursor::new(tree, siblings, keyword);
        loop {
            cursor.mark();
            let Some((node, token)) = cursor.prev() else {
                break;
            };
            if token.kind == TokenKind::Keyword && self.language.keywords().is_class_modifier(&token.text) {
                header.modifiers.insert(0, token.text.clone());
            } else if token.kind == TokenKind::Comment {
                header.comments.insert(0, strip_comment(&token.text));
            } else if let Some(found) = self.annotation_before(node, token, &mut cursor) {
                header.annotations.splice(0..0, found);
            } else {
                cursor.reset();
                break;
            }
        }
    }

    /// Annotation ending at `node`, read backward.
    fn annotation_before(&self, node: NodeId, token: &Token, cursor: &mut Cursor<'_>) -> Option<Vec<AnnotationSig>> {
        match self.language.annotation_style() {
            AnnotationStyle::Bracketed => {
                if !token.is_block('[') {
                    return None;
                }
                let found = parse_bracketed(self.tree, node);
                (!found.is_empty()).then_some(found)
            }
            AnnotationStyle::AtPrefixed => {
                let (args, name) = if token.is_block('(') {
                    (Some(node), cursor.prev()?.1)
                } else {
                    (None, token)
                };
                if name.kind != TokenKind::Identifier || !cursor.prev()?.1.is_separator("@") {
                    return None;
                }
                let mut annotation = AnnotationSig::new(name.text.clone());
                if let Some(args) = args {
                    annotation.arguments = parse_arguments(self.tree, args);
                }
                Some(vec![annotation])
            }
        }
    }
}

fn split_name(name: &str) -> Vec<String> {
    name.split('.').map(str::to_string).collect()
}

/// `IName` with an uppercase second letter.
fn is_interface_name(name: &str) -> bool {
    let simple = name.rsplit('.').next().unwrap_or(name);
    let mut chars = simple.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}
