//! `using` and `import` statements.

use super::{unquote, ExtractCx, TokenExtractor};
use crate::language::Language;
use crate::signature::ImportSig;
use crate::token::{NodeId, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    /// Saw `using` or `import`.
    Keyword,
    AfterPath,
    /// C# `using Alias =`.
    AliasTarget,
    /// Java `import a.b.`, waiting for `*`.
    Wildcard,
    /// TypeScript `import`, inside the import clause.
    Clause,
    /// TypeScript `* as`.
    Namespace,
    AfterClause,
    /// TypeScript `from`, the module string comes next.
    From,
    /// TypeScript statement read, `;` may follow.
    End,
    Complete,
    Failed,
}

/// Recognizes C# `using [static] A.B;` and `using X = A.B;`, Java
/// `import [static] a.b.C;` and `import a.b.*;`, and TypeScript
/// `import ... from "module";`.
#[derive(Debug)]
pub struct ImportExtractor {
    state: State,
    is_static: bool,
    target: Option<String>,
    alias: Option<String>,
    wildcard: bool,
    names: Vec<String>,
    source: Option<String>,
}

impl ImportExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            is_static: false,
            target: None,
            alias: None,
            wildcard: false,
            names: Vec::new(),
            source: None,
        }
    }

    fn fail(&mut self) -> bool {
        self.state = State::Failed;
        false
    }

    fn complete(&mut self) -> bool {
        self.state = State::Complete;
        true
    }

    fn accept_qualified(&mut self, token: &Token, language: Language) -> bool {
        match self.state {
            State::Init => {
                let keyword = if language == Language::CSharp { "using" } else { "import" };
                if token.is_keyword(keyword) {
                    self.state = State::Keyword;
                    true
                } else {
                    false
                }
            }
            State::Keyword => {
                if token.is_keyword("static") && !self.is_static {
                    self.is_static = true;
                    true
                } else if token.kind == TokenKind::Identifier {
                    self.target = Some(token.text.clone());
                    self.state = State::AfterPath;
                    true
                } else {
                    // `using (...)` statements and `using var` declarations
                    self.fail()
                }
            }
            State::AfterPath => {
                if token.is_separator(";") {
                    self.complete()
                } else if language == Language::CSharp && token.is_operator("=") && self.alias.is_none() {
                    self.alias = self.target.take();
                    self.state = State::AliasTarget;
                    true
                } else if language == Language::Java && token.is_operator(".") && !self.wildcard {
                    self.state = State::Wildcard;
                    true
                } else {
                    self.fail()
                }
            }
            State::AliasTarget => {
                if token.kind == TokenKind::Identifier {
                    self.target = Some(token.text.clone());
                    self.state = State::AfterPath;
                    true
                } else {
                    self.fail()
                }
            }
            State::Wildcard => {
                if token.is_operator("*") {
                    self.wildcard = true;
                    self.state = State::AfterPath;
                    true
                } else {
                    self.fail()
                }
            }
            _ => false,
        }
    }

    fn accept_module(&mut self, token: &Token, node: NodeId, cx: &ExtractCx<'_>) -> bool {
        match self.state {
            State::Init => {
                if token.is_keyword("import") {
                    self.state = State::Clause;
                    true
                } else {
                    false
                }
            }
            State::Clause => {
                if token.is_block('{') {
                    self.names.extend(named_imports(node, cx));
                    self.state = State::AfterClause;
                    true
                } else if token.is_operator("*") {
                    self.state = State::Namespace;
                    true
                } else if token.kind == TokenKind::String {
                    // side-effect import
                    self.source = Some(unquote(&token.text));
                    self.state = State::End;
                    true
                } else if token.kind == TokenKind::Identifier && token.text == "type" {
                    true
                } else if token.kind == TokenKind::Identifier {
                    self.names.push(token.text.clone());
                    self.state = State::AfterClause;
                    true
                } else {
                    // dynamic `import(...)`
                    self.fail()
                }
            }
            State::Namespace => {
                if token.is_keyword("as") {
                    true
                } else if token.kind == TokenKind::Identifier {
                    self.alias = Some(token.text.clone());
                    self.state = State::AfterClause;
                    true
                } else {
                    self.fail()
                }
            }
            State::AfterClause => {
                if token.is_separator(",") {
                    self.state = State::Clause;
                    true
                } else if token.kind == TokenKind::Identifier && token.text == "from" {
                    self.state = State::From;
                    true
                } else {
                    self.fail()
                }
            }
            State::From => {
                if token.kind == TokenKind::String {
                    self.source = Some(unquote(&token.text));
                    self.state = State::End;
                    true
                } else {
                    self.fail()
                }
            }
            State::End => {
                self.state = State::Complete;
                token.is_separator(";")
            }
            _ => false,
        }
    }

    fn build(&mut self, language: Language) -> Option<ImportSig> {
        if let Some(source) = self.source.take() {
            return Some(ImportSig {
                path: Vec::new(),
                names: std::mem::take(&mut self.names),
                alias: self.alias.take(),
                is_static: false,
                source: Some(source),
            });
        }

        let mut parts: Vec<String> = self.target.take()?.split('.').map(str::to_string).collect();
        // Java single-type imports and C# aliases name one member of the path
        let names_member = self.alias.is_some() || (language == Language::Java && !self.wildcard);
        let names = if names_member && parts.len() > 1 {
            parts.pop().into_iter().collect()
        } else {
            Vec::new()
        };
        Some(ImportSig {
            path: parts,
            names,
            alias: self.alias.take(),
            is_static: self.is_static,
            source: None,
        })
    }
}

impl Default for ImportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for ImportExtractor {
    fn name(&self) -> &'static str {
        "import"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if token.kind == TokenKind::Comment {
            return false;
        }
        match cx.language.language() {
            Language::TypeScript => self.accept_module(token, node, cx),
            language => self.accept_qualified(token, language),
        }
    }

    fn block_complete(&mut self, _cx: &mut ExtractCx<'_>) {
        if self.state == State::End {
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
        if let Some(import) = self.build(cx.language.language()) {
            cx.members.imports.push(import);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Init;
        self.is_static = false;
        self.target = None;
        self.alias = None;
        self.wildcard = false;
        self.names.clear();
        self.source = None;
    }
}

/// Imported names inside `{ A, B as C, type D }`. Renamed imports keep the
/// exported name.
fn named_imports(block: NodeId, cx: &ExtractCx<'_>) -> Vec<String> {
    super::split_on_commas(cx.tree, cx.tree.children(block))
        .into_iter()
        .filter_map(|group| {
            group
                .iter()
                .map(|&node| cx.token(node))
                .find(|token| token.kind == TokenKind::Identifier && token.text != "type")
                .map(|token| token.text.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_imports;
    use crate::tokenizer::tokenize;

    fn imports(language: Language, text: &str) -> Vec<ImportSig> {
        let def = language.definition();
        let tree = tokenize(text, &def).unwrap();
        extract_imports(&tree, tree.children(tree.root()), &def)
    }

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_csharp_usings() {
        let found = imports(
            Language::CSharp,
            "using System;\nusing System.Collections.Generic;\nusing static System.Math;\nusing Json = Newtonsoft.Json.JsonConvert;\nnamespace N { }",
        );
        assert_eq!(found.len(), 4);
        assert_eq!(found[0], ImportSig::namespace(strings(&["System"])));
        assert_eq!(found[1].path, strings(&["System", "Collections", "Generic"]));
        assert!(found[2].is_static);
        assert_eq!(found[2].path, strings(&["System", "Math"]));
        assert_eq!(found[3].path, strings(&["Newtonsoft", "Json"]));
        assert_eq!(found[3].names, strings(&["JsonConvert"]));
        assert_eq!(found[3].alias.as_deref(), Some("Json"));
    }

    #[test]
    fn test_java_imports() {
        let found = imports(
            Language::Java,
            "package a.b;\nimport java.util.List;\nimport java.io.*;\nimport static org.junit.Assert.assertEquals;\nclass A { }",
        );
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].path, strings(&["java", "util"]));
        assert_eq!(found[0].names, strings(&["List"]));
        assert!(found[0].imports_name("List"));
        assert_eq!(found[1].path, strings(&["java", "io"]));
        assert!(found[1].names.is_empty());
        assert!(found[2].is_static);
        assert_eq!(found[2].path, strings(&["org", "junit", "Assert"]));
    }

    #[test]
    fn test_typescript_imports() {
        let found = imports(
            Language::TypeScript,
            "import { A, B as C } from './models';\nimport Default, { type D } from \"lib\"\nimport * as ns from 'ns';\nimport './side-effect';\nexport class X { }",
        );
        assert_eq!(found.len(), 4);
        assert_eq!(found[0].names, strings(&["A", "B"]));
        assert_eq!(found[0].source.as_deref(), Some("./models"));
        assert!(found[0].path.is_empty());
        assert_eq!(found[1].names, strings(&["Default", "D"]));
        assert_eq!(found[2].alias.as_deref(), Some("ns"));
        assert_eq!(found[3].source.as_deref(), Some("./side-effect"));
        assert!(found[3].names.is_empty());
    }

    #[test]
    fn test_using_statement_is_not_an_import() {
        let found = imports(Language::CSharp, "using (var s = Open()) { }");
        assert!(found.is_empty());
    }
}
