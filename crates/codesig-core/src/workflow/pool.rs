//! Parsing many files at once.
//!
//! Each file is parsed on the blocking thread pool; a semaphore bounds how
//! many run at a time. Every task is awaited before the report is built, so
//! resolution always sees the complete set of units.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::error::WorkflowError;
use super::sources::SourcePath;
use crate::config::Config;
use crate::parser::{CompilationUnit, LanguageRegistry, ParseError, ParseMetrics};

/// Called with the source id of every file once its task ends.
pub type ProgressFn = Arc<dyn Fn(&str) + Send + Sync>;

/// A file that could not be parsed.
#[derive(Debug)]
pub struct FileFailure {
    pub source_id: String,
    pub error: WorkflowError,
}

/// Outcome of parsing a set of files.
#[derive(Debug)]
pub struct ParseReport {
    /// Parsed units in source id order.
    pub units: Vec<CompilationUnit>,
    pub failures: Vec<FileFailure>,
    pub metrics: ParseMetrics,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ParseReport {
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.units
            .iter()
            .flat_map(|unit| unit.warnings.iter().map(move |w| (unit.source_id.as_str(), w.as_str())))
    }
}

/// Bounded pool of parse tasks.
#[derive(Clone)]
pub struct ParsePool {
    registry: Arc<LanguageRegistry>,
    threads: usize,
    timeout: Option<Duration>,
    max_file_size: u64,
    fail_fast: bool,
    progress: Option<ProgressFn>,
}

impl ParsePool {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(LanguageRegistry::with_options(config.parse.options())),
            threads: config.workflow.threads.max(1),
            timeout: config.workflow.timeout(),
            max_file_size: config.parse.max_file_size,
            fail_fast: config.workflow.fail_fast,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Parse every file, waiting for all tasks to finish.
    ///
    /// Failed and timed-out files are listed in the report. With `fail_fast`
    /// the first failure, in source id order, is returned instead.
    pub async fn parse(&self, files: Vec<SourcePath>) -> Result<ParseReport, WorkflowError> {
        let started_at = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.threads));

        let tasks = files.into_iter().map(|file| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let outcome = self.parse_one(&semaphore, &file).await;
                if let Some(progress) = &self.progress {
                    progress(&file.source_id);
                }
                (file.source_id, outcome)
            }
        });
        let outcomes = join_all(tasks).await;

        let mut units = Vec::new();
        let mut failures = Vec::new();
        for (source_id, outcome) in outcomes {
            match outcome {
                Ok(unit) => units.push(unit),
                Err(error) => {
                    warn!(source = %source_id, error = %error, "file excluded");
                    failures.push(FileFailure { source_id, error });
                }
            }
        }

        if self.fail_fast && !failures.is_empty() {
            return Err(failures.swap_remove(0).error);
        }

        let metrics = units.iter().map(|unit| unit.metrics).sum();
        debug!(parsed = units.len(), failed = failures.len(), "parse finished");
        Ok(ParseReport {
            units,
            failures,
            metrics,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn parse_one(&self, semaphore: &Arc<Semaphore>, file: &SourcePath) -> Result<CompilationUnit, WorkflowError> {
        let join_error = |message: String| WorkflowError::Join {
            source_id: file.source_id.clone(),
            message,
        };

        let permit = Arc::clone(semaphore)
            .acquire_owned()
            .await
            .map_err(|e| join_error(e.to_string()))?;

        let registry = Arc::clone(&self.registry);
        let job = file.clone();
        let max_file_size = self.max_file_size;
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            parse_file(&registry, &job, max_file_size)
        });

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| WorkflowError::Timeout {
                source_id: file.source_id.clone(),
                seconds: limit.as_secs(),
            })?,
            None => task.await,
        };
        joined.map_err(|e| join_error(e.to_string()))?
    }
}

/// Read and parse one file on the current thread.
pub fn parse_file(
    registry: &LanguageRegistry,
    file: &SourcePath,
    max_file_size: u64,
) -> Result<CompilationUnit, WorkflowError> {
    let parser = registry
        .parser_for_path(&file.path)
        .ok_or_else(|| ParseError::Unsupported(file.source_id.clone()))?;

    let metadata = std::fs::metadata(&file.path).map_err(|e| WorkflowError::io(&file.path, e))?;
    if metadata.len() > max_file_size {
        return Err(ParseError::TooLarge {
            source_id: file.source_id.clone(),
            size: metadata.len(),
            limit: max_file_size,
        }
        .into());
    }

    let content = std::fs::read_to_string(&file.path).map_err(|e| WorkflowError::io(&file.path, e))?;
    Ok(parser.parse_file(&file.source_id, &content)?)
}
