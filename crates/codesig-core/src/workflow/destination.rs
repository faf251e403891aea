//! Output destinations: which blocks go to which file.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::WorkflowError;
use crate::project::ResolvedProject;
use crate::signature::ResolvedBlockSig;

/// An output file and the namespaces whose blocks it receives.
///
/// Written as `path=[App.Models,App.Services]`. A bare `path` receives
/// every block of the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub namespaces: Vec<Vec<String>>,
}

impl Destination {
    /// Blocks under any of the destination's namespaces, keyed by full name.
    pub fn select<'p>(&self, project: &'p ResolvedProject) -> BTreeMap<&'p str, &'p ResolvedBlockSig> {
        if self.namespaces.is_empty() {
            return project.blocks.iter().map(|(name, block)| (name.as_str(), block)).collect();
        }
        self.namespaces
            .iter()
            .flat_map(|namespace| project.under(namespace))
            .map(|(name, block)| (name.as_str(), block))
            .collect()
    }
}

impl FromStr for Destination {
    type Err = WorkflowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| WorkflowError::InvalidDestination {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let (path, list) = match value.split_once('=') {
            Some((path, list)) => (path.trim(), Some(list.trim())),
            None => (value.trim(), None),
        };
        if path.is_empty() {
            return Err(invalid("missing output path"));
        }

        let mut namespaces = Vec::new();
        if let Some(list) = list {
            let inner = list
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| invalid("namespaces must be written as [Namespace,...]"))?;
            for namespace in inner.split(',').map(str::trim).filter(|ns| !ns.is_empty()) {
                let parts: Vec<String> = namespace.split('.').map(|part| part.trim().to_string()).collect();
                if parts.iter().any(String::is_empty) {
                    return Err(invalid("namespace has an empty segment"));
                }
                namespaces.push(parts);
            }
        }

        Ok(Self {
            path: PathBuf::from(path),
            namespaces,
        })
    }
}
