//! Finding the source files of a project.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use super::error::WorkflowError;
use crate::config::WorkflowConfig;

/// A file to parse and the id it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePath {
    /// Path relative to the searched root, with `/` separators.
    pub source_id: String,
    pub path: PathBuf,
}

impl SourcePath {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let source_id = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let source_id = if source_id.is_empty() {
            path.to_string_lossy().to_string()
        } else {
            source_id
        };
        Self { source_id, path }
    }
}

/// Source files under `root` with one of the configured extensions,
/// sorted by source id. `root` may also name a single file.
pub fn collect_sources(root: &Path, config: &WorkflowConfig) -> Result<Vec<SourcePath>, WorkflowError> {
    let metadata = std::fs::metadata(root).map_err(|e| WorkflowError::io(root, e))?;
    if metadata.is_file() {
        let parent = root.parent().unwrap_or(root);
        return Ok(vec![SourcePath::new(parent, root.to_path_buf())]);
    }

    let excluded: HashSet<String> = config.exclude_dirs.iter().cloned().collect();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && entry.depth() > 0 && excluded.contains(entry.file_name().to_string_lossy().as_ref()))
        })
        .build();

    let mut sources = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !config.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)) {
            continue;
        }

        sources.push(SourcePath::new(root, path.to_path_buf()));
    }

    sources.sort();
    debug!(root = %root.display(), files = sources.len(), "collected sources");
    Ok(sources)
}
