//! Type reference lookup against the symbol table.

use std::collections::BTreeSet;
use std::convert::Infallible;

use super::symbols::{Entry, SymbolTable};
use crate::language::{Language, LanguageDefinition};
use crate::signature::{ImportSig, ResolvedBlockSig};
use crate::types::{Resolution, ResolvedTypeSig, TypeSig};

/// Resolves the references of one block at a time.
pub(crate) struct Resolver<'a> {
    table: &'a SymbolTable,
    definitions: Vec<LanguageDefinition>,
}

/// What is in scope for the block being resolved.
struct Scope<'b> {
    entry: &'b Entry,
    definition: &'b LanguageDefinition,
    type_params: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            definitions: Language::ALL.iter().map(|language| language.definition()).collect(),
        }
    }

    fn definition(&self, language: Language) -> &LanguageDefinition {
        let index = Language::ALL.iter().position(|l| *l == language).unwrap_or(0);
        &self.definitions[index]
    }

    /// Resolved copy of `entry`'s block. Unresolved names go to `missing`.
    pub fn resolve_block(&self, entry: &Entry, missing: &mut BTreeSet<String>) -> ResolvedBlockSig {
        let scope = Scope {
            entry,
            definition: self.definition(entry.language),
            type_params: self.type_params_in_scope(entry),
        };

        entry
            .block
            .map_types_with(|sig, method_params| Ok::<_, Infallible>(self.resolve_type(sig, &scope, method_params, missing)))
            .unwrap_or_else(|never| match never {})
    }

    /// Generic parameter names of the block and every block enclosing it.
    fn type_params_in_scope(&self, entry: &Entry) -> Vec<String> {
        let full = &entry.block.full_name;
        let mut names: Vec<String> = entry.block.generic_params.iter().map(|p| p.name.clone()).collect();
        for end in 1..full.len() {
            if let Some(outer) = self.table.get(&full[..end].join(".")) {
                names.extend(outer.block.generic_params.iter().map(|p| p.name.clone()));
            }
        }
        names
    }

    fn resolve_type(
        &self,
        sig: &TypeSig,
        scope: &Scope<'_>,
        method_params: &[TypeSig],
        missing: &mut BTreeSet<String>,
    ) -> ResolvedTypeSig {
        let params = sig
            .params
            .iter()
            .map(|param| self.resolve_type(param, scope, method_params, missing))
            .collect();
        let (full_name, resolution) = self.lookup(sig, scope, method_params, missing);
        ResolvedTypeSig {
            name: sig.name.clone(),
            full_name,
            resolution,
            nullable: sig.nullable,
            array_dimensions: sig.array_dimensions,
            params,
        }
    }

    fn lookup(
        &self,
        sig: &TypeSig,
        scope: &Scope<'_>,
        method_params: &[TypeSig],
        missing: &mut BTreeSet<String>,
    ) -> (Vec<String>, Resolution) {
        // `? extends T` stands for an anonymous type parameter; its bound is a param
        if sig.is_wildcard() {
            return (vec![sig.name.clone()], Resolution::TypeParameter);
        }

        let parts = sig.name_parts();

        if parts.len() == 1 {
            let is_type_param = method_params.iter().any(|p| p.name == sig.name)
                || scope.type_params.iter().any(|p| *p == sig.name);
            if is_type_param {
                return (parts, Resolution::TypeParameter);
            }
            if scope.definition.is_builtin_type(&sig.name) {
                return (parts, Resolution::Builtin);
            }
        }

        // Enclosing scopes, innermost first, ending at the global scope.
        let block_name = &scope.entry.block.full_name;
        for depth in (0..=block_name.len()).rev() {
            let candidate = concat(&block_name[..depth], &parts);
            if self.table.contains(&candidate) {
                return (candidate, Resolution::Project);
            }
        }

        let imports = &scope.entry.block.imports;
        for import in imports {
            if let Some(candidate) = import_candidate(import, &parts) {
                if self.table.contains(&candidate) {
                    return (candidate, Resolution::Project);
                }
            }
        }

        let found = self.table.find_by_suffix(&parts, |prefix| {
            imports
                .iter()
                .any(|import| !import.path.is_empty() && prefix.starts_with(&import.path))
        });
        if let Some(candidate) = found {
            return (candidate, Resolution::Project);
        }

        if let Some(name) = self.missing_name(&parts, imports) {
            missing.insert(name);
        }
        (parts, Resolution::Unresolved)
    }

    /// The name to report for an unresolved reference, if any.
    fn missing_name(&self, parts: &[String], imports: &[ImportSig]) -> Option<String> {
        let first = parts.first()?;
        if let Some(import) = imports.iter().find(|import| import.imports_name(first)) {
            // Module imports point outside the project; the module is the gap.
            if import.source.is_some() {
                return None;
            }
            return import_candidate(import, parts).map(|candidate| candidate.join("."));
        }

        // Already reported through the import of an unknown namespace.
        let external_namespace = imports
            .iter()
            .any(|import| is_namespace_import(import) && !self.table.is_declared(&import.path));
        if external_namespace {
            return None;
        }
        Some(parts.join("."))
    }
}

fn concat(prefix: &[String], parts: &[String]) -> Vec<String> {
    prefix.iter().chain(parts).cloned().collect()
}

fn is_namespace_import(import: &ImportSig) -> bool {
    import.source.is_none() && import.alias.is_none() && import.names.is_empty() && !import.path.is_empty()
}

/// Full name `parts` would have if it came from `import`.
fn import_candidate(import: &ImportSig, parts: &[String]) -> Option<Vec<String>> {
    let (first, rest) = parts.split_first()?;
    match &import.alias {
        Some(alias) if alias == first => {
            let target = concat(&import.path, &import.names);
            Some(concat(&target, rest))
        }
        Some(_) => None,
        None if import.names.is_empty() => Some(concat(&import.path, parts)),
        None if import.names.iter().any(|n| n == first) => Some(concat(&import.path, parts)),
        None => None,
    }
}
