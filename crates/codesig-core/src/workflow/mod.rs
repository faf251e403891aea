//! Whole-project runs: find sources, parse them in parallel, resolve the
//! project and write the destination files.

mod destination;
mod error;
mod pool;
mod sources;
mod stats;
mod writer;

pub use destination::Destination;
pub use error::WorkflowError;
pub use pool::{parse_file, FileFailure, ParsePool, ParseReport, ProgressFn};
pub use sources::{collect_sources, SourcePath};
pub use stats::{collect_stats, CategoryStats, CodeStats, FileStats, UncategorizedStats};
pub use writer::{render, write_destinations, WrittenFile};

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::project::{resolve, ResolvedProject};

/// Inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Directories or files to parse.
    pub sources: Vec<PathBuf>,
    pub destinations: Vec<Destination>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct WorkflowOutcome {
    pub report: ParseReport,
    pub project: ResolvedProject,
    pub written: Vec<WrittenFile>,
}

/// Runs requests against one configuration.
pub struct Workflow {
    config: Config,
    pool: ParsePool,
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        let pool = ParsePool::new(&config);
        Self { config, pool }
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.pool = self.pool.with_progress(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Source files of every root, sorted by source id across roots.
    /// A root listed twice contributes its files once.
    pub fn collect(&self, roots: &[PathBuf]) -> Result<Vec<SourcePath>, WorkflowError> {
        let mut files = Vec::new();
        for root in roots {
            files.extend(collect_sources(root, &self.config.workflow)?);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Line statistics of every file under `roots`, including files of
    /// `extra_extensions` that no language parses.
    pub fn stats(&self, roots: &[PathBuf], extra_extensions: &[String]) -> Result<CodeStats, WorkflowError> {
        collect_stats(roots, &self.config.workflow, extra_extensions)
    }

    /// Parse every source, then resolve and write once all parses are done.
    pub async fn run(&self, request: &ResolveRequest) -> Result<WorkflowOutcome, WorkflowError> {
        let files = self.collect(&request.sources)?;
        info!(files = files.len(), "parsing sources");

        let report = self.pool.parse(files).await?;
        let project = resolve(&report.units)?;
        let written = write_destinations(&request.destinations, &project, &self.config.output)?;

        Ok(WorkflowOutcome {
            report,
            project,
            written,
        })
    }
}
