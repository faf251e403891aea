//! Project-wide resolution.
//!
//! Merges the blocks of every compilation unit into one table and rewrites
//! each type reference to the fully-qualified name it denotes. A reference
//! that matches nothing is kept as written and recorded as missing; only
//! conflicting declarations stop the run.

mod error;
mod resolver;
mod symbols;

pub use error::ResolveError;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::parser::CompilationUnit;
use crate::signature::ResolvedBlockSig;
use resolver::Resolver;
use symbols::SymbolTable;

/// Resolved symbol table plus the names resolution could not account for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProject {
    pub blocks: BTreeMap<String, ResolvedBlockSig>,
    /// Referenced names and imported namespaces no block declares.
    pub missing: BTreeSet<String>,
}

impl ResolvedProject {
    pub fn get(&self, full_name: &str) -> Option<&ResolvedBlockSig> {
        self.blocks.get(full_name)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks whose full name lies under `prefix`, in name order.
    pub fn under<'a, 'b>(
        &'a self,
        prefix: &'b [String],
    ) -> impl Iterator<Item = (&'a String, &'a ResolvedBlockSig)> + 'b
    where
        'a: 'b,
    {
        self.blocks
            .iter()
            .filter(move |(_, block)| block.full_name.starts_with(prefix))
    }
}

/// Resolve every type reference across `units`.
///
/// Pure: the same units always give the same project.
pub fn resolve(units: &[CompilationUnit]) -> Result<ResolvedProject, ResolveError> {
    let table = SymbolTable::build(units)?;
    let mut project = ResolvedProject::default();

    for unit in units {
        for import in &unit.imports {
            if import.source.is_none() && !import.path.is_empty() && !table.is_declared(&import.path) {
                project.missing.insert(import.path.join("."));
            }
        }
    }

    let resolver = Resolver::new(&table);
    for (name, entry) in table.entries() {
        let block = resolver.resolve_block(entry, &mut project.missing);
        debug!(block = %name, "resolved block");
        project.blocks.insert(name.clone(), block);
    }

    info!(
        units = units.len(),
        blocks = project.blocks.len(),
        missing = project.missing.len(),
        "resolved project"
    );
    Ok(project)
}
