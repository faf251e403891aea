//! Writing resolved blocks to destination files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::destination::Destination;
use super::error::WorkflowError;
use crate::config::{OutputConfig, OutputFormat};
use crate::project::ResolvedProject;
use crate::signature::ResolvedBlockSig;

/// Document layout of every output file.
#[derive(Serialize)]
struct OutputDocument<'a> {
    files: &'a BTreeMap<&'a str, &'a ResolvedBlockSig>,
}

/// A file produced by `write_destinations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub blocks: usize,
}

/// Serialize `blocks` as `{"files": {full name: block}}`.
pub fn render(
    path: &Path,
    blocks: &BTreeMap<&str, &ResolvedBlockSig>,
    output: &OutputConfig,
) -> Result<String, WorkflowError> {
    let document = OutputDocument { files: blocks };
    let serialize_error = |message: String| WorkflowError::Serialize {
        path: path.to_path_buf(),
        message,
    };

    match output.format {
        OutputFormat::Json if output.pretty => {
            serde_json::to_string_pretty(&document).map_err(|e| serialize_error(e.to_string()))
        }
        OutputFormat::Json => serde_json::to_string(&document).map_err(|e| serialize_error(e.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(&document).map_err(|e| serialize_error(e.to_string())),
    }
}

/// Write one file per distinct destination path.
///
/// Destinations sharing a path are merged into a single file. A path
/// without an extension gets the one of the output format.
pub fn write_destinations(
    destinations: &[Destination],
    project: &ResolvedProject,
    output: &OutputConfig,
) -> Result<Vec<WrittenFile>, WorkflowError> {
    let mut grouped: BTreeMap<&Path, BTreeMap<&str, &ResolvedBlockSig>> = BTreeMap::new();
    for destination in destinations {
        grouped
            .entry(destination.path.as_path())
            .or_default()
            .extend(destination.select(project));
    }

    let mut written = Vec::with_capacity(grouped.len());
    for (path, blocks) in grouped {
        let target = match path.extension() {
            Some(_) => path.to_path_buf(),
            None => path.with_extension(output.format.extension()),
        };
        let path = target.as_path();
        let text = render(path, &blocks, output)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::io(parent, e))?;
        }
        std::fs::write(path, text).map_err(|e| WorkflowError::io(path, e))?;

        info!(path = %path.display(), blocks = blocks.len(), "wrote output");
        written.push(WrittenFile {
            path: path.to_path_buf(),
            blocks: blocks.len(),
        });
    }
    Ok(written)
}
