//! Project-wide table of declared blocks.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::error::ResolveError;
use crate::language::Language;
use crate::parser::CompilationUnit;
use crate::signature::BlockSig;

/// A declaration and where it came from.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub block: BlockSig,
    pub language: Language,
    /// `source_id` and position of the first declaration.
    pub origin: String,
}

/// Every block of the project keyed by dotted full name.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    entries: BTreeMap<String, Entry>,
    /// Every leading part sequence of a declared namespace or block name.
    prefixes: BTreeSet<Vec<String>>,
}

impl SymbolTable {
    pub fn build(units: &[CompilationUnit]) -> Result<Self, ResolveError> {
        let mut table = Self::default();

        for unit in units {
            for namespace in &unit.namespaces {
                table.add_prefixes(namespace, namespace.len());
            }

            for block in &unit.blocks {
                let name = block.full_name_string();
                let origin = format!("{} ({})", unit.source_id, block.position);
                table.add_prefixes(&block.full_name, block.full_name.len());

                match table.entries.get_mut(&name) {
                    Some(existing) if is_partial_pair(existing, unit.language, block) => {
                        trace!(name = %name, origin = %origin, "merging partial declaration");
                        merge_partial(&mut existing.block, block);
                    }
                    Some(existing) => {
                        return Err(ResolveError::DuplicateName {
                            name,
                            first: existing.origin.clone(),
                            second: origin,
                        });
                    }
                    None => {
                        table.entries.insert(
                            name,
                            Entry {
                                block: block.clone(),
                                language: unit.language,
                                origin,
                            },
                        );
                    }
                }
            }
        }

        Ok(table)
    }

    fn add_prefixes(&mut self, parts: &[String], len: usize) {
        for end in 1..=len {
            self.prefixes.insert(parts[..end].to_vec());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, parts: &[String]) -> bool {
        self.entries.contains_key(&parts.join("."))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    /// Whether some namespace or block in the project lives under `path`.
    pub fn is_declared(&self, path: &[String]) -> bool {
        self.prefixes.contains(path)
    }

    /// First block, in name order, whose name ends with `parts` and whose
    /// leading namespace satisfies `accept`.
    pub fn find_by_suffix(&self, parts: &[String], accept: impl Fn(&[String]) -> bool) -> Option<Vec<String>> {
        self.entries.values().find_map(|entry| {
            let full = &entry.block.full_name;
            if full.len() <= parts.len() || !full.ends_with(parts) {
                return None;
            }
            let prefix = &full[..full.len() - parts.len()];
            accept(prefix).then(|| full.clone())
        })
    }
}

fn is_partial_pair(existing: &Entry, language: Language, block: &BlockSig) -> bool {
    existing.language == Language::CSharp
        && language == Language::CSharp
        && existing.block.kind == block.kind
        && existing.block.has_modifier("partial")
        && block.has_modifier("partial")
}

fn push_unique<T: PartialEq + Clone>(into: &mut Vec<T>, items: &[T]) {
    for item in items {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}

/// Fold a second `partial` declaration into the first.
fn merge_partial(into: &mut BlockSig, other: &BlockSig) {
    if into.extends.is_none() {
        into.extends = other.extends.clone();
    }
    if into.generic_params.is_empty() {
        into.generic_params = other.generic_params.clone();
    }
    push_unique(&mut into.implements, &other.implements);
    push_unique(&mut into.modifiers, &other.modifiers);
    push_unique(&mut into.imports, &other.imports);
    into.annotations.extend(other.annotations.iter().cloned());
    into.comments.extend(other.comments.iter().cloned());
    into.fields.extend(other.fields.iter().cloned());
    into.methods.extend(other.methods.iter().cloned());
    into.enum_members.extend(other.enum_members.iter().cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, MalformedTypePolicy};

    fn unit(id: &str, language: Language, text: &str) -> CompilationUnit {
        parse_source(id, text, &language.definition(), MalformedTypePolicy::SkipMember).unwrap()
    }

    #[test]
    fn test_duplicate_names_both_sources() {
        let units = vec![
            unit("A.cs", Language::CSharp, "namespace N { class A {} }"),
            unit("B.cs", Language::CSharp, "namespace N { class A {} }"),
        ];
        let err = SymbolTable::build(&units).unwrap_err();
        let ResolveError::DuplicateName { name, first, second } = err;
        assert_eq!(name, "N.A");
        assert!(first.starts_with("A.cs"));
        assert!(second.starts_with("B.cs"));
    }

    #[test]
    fn test_partial_classes_merge() {
        let units = vec![
            unit("A1.cs", Language::CSharp, "namespace N { public partial class A : IOne { int x; } }"),
            unit("A2.cs", Language::CSharp, "namespace N { partial class A : ITwo { string y; } }"),
        ];
        let table = SymbolTable::build(&units).unwrap();
        let entry = table.get("N.A").unwrap();
        assert!(entry.origin.starts_with("A1.cs"));
        let fields: Vec<&str> = entry.block.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["x", "y"]);
        let bases: Vec<&str> = entry.block.implements.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(bases, vec!["IOne", "ITwo"]);
    }

    #[test]
    fn test_declared_prefixes() {
        let units = vec![unit("A.java", Language::Java, "package com.acme; class A { class Inner {} }")];
        let table = SymbolTable::build(&units).unwrap();
        assert!(table.is_declared(&["com".to_string()]));
        assert!(table.is_declared(&["com".to_string(), "acme".to_string()]));
        assert!(table.contains(&["com".to_string(), "acme".to_string(), "A".to_string(), "Inner".to_string()]));
        assert!(!table.is_declared(&["java".to_string()]));

        let found = table.find_by_suffix(&["Inner".to_string()], |prefix| prefix.first().map(String::as_str) == Some("com"));
        assert_eq!(found.map(|parts| parts.join(".")), Some("com.acme.A.Inner".to_string()));
        assert!(table.find_by_suffix(&["Inner".to_string()], |_| false).is_none());
    }
}
