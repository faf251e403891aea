//! Line statistics for the files of a project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::WorkflowError;
use super::sources::{collect_sources, SourcePath};
use crate::config::WorkflowConfig;
use crate::language::{Language, LanguageDefinition};
use crate::token::TokenKind;
use crate::tokenizer::tokenize;

/// Line counts of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub source_id: String,
    pub chars: usize,
    pub total_lines: usize,
    /// Lines holding nothing but whitespace.
    pub blank_lines: usize,
    /// Lines whose only non-whitespace text is comment text.
    pub comment_lines: usize,
}

impl FileStats {
    /// Count the lines of `text`. Comment lines are only recognized when a
    /// language is given and its tokenizer accepts the text.
    pub fn measure(source_id: impl Into<String>, text: &str, language: Option<&LanguageDefinition>) -> Self {
        let source_id = source_id.into();
        let chars: Vec<char> = text.chars().collect();
        let mut in_comment = vec![false; chars.len()];

        if let Some(definition) = language {
            match tokenize(text, definition) {
                Ok(tree) => tree.visit(tree.root(), |_, token, _, _| {
                    if token.kind == TokenKind::Comment {
                        let end = token.span.end_offset().min(in_comment.len());
                        in_comment[token.span.offset.min(end)..end].fill(true);
                    }
                }),
                Err(e) => warn!(source_id = %source_id, error = %e, "counting without comments"),
            }
        }

        let mut stats = Self {
            source_id,
            chars: chars.len(),
            ..Self::default()
        };
        let mut line = LineState::default();
        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' {
                stats.close_line(&mut line);
                continue;
            }
            line.open = true;
            if c.is_whitespace() {
                continue;
            }
            if in_comment[i] {
                line.comment = true;
            } else {
                line.code = true;
            }
        }
        if line.open {
            stats.close_line(&mut line);
        }
        stats
    }

    fn close_line(&mut self, line: &mut LineState) {
        self.total_lines += 1;
        if !line.code {
            if line.comment {
                self.comment_lines += 1;
            } else {
                self.blank_lines += 1;
            }
        }
        *line = LineState::default();
    }

    /// Language named by the extension of the source id.
    pub fn language(&self) -> Option<Language> {
        let (_, extension) = self.source_id.rsplit_once('.')?;
        Language::from_extension(extension)
    }
}

#[derive(Default)]
struct LineState {
    open: bool,
    code: bool,
    comment: bool,
}

/// Totals over a group of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub files: usize,
    pub chars: usize,
    pub total_lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
}

impl CategoryStats {
    pub fn add(&mut self, file: &FileStats) {
        self.files += 1;
        self.chars += file.chars;
        self.total_lines += file.total_lines;
        self.blank_lines += file.blank_lines;
        self.comment_lines += file.comment_lines;
    }

    /// Lines that are neither blank nor comment-only.
    pub fn code_lines(&self) -> usize {
        self.total_lines - self.blank_lines - self.comment_lines
    }
}

/// Files of no supported language and their totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncategorizedStats {
    pub totals: CategoryStats,
    pub files: Vec<String>,
}

/// Line statistics of a set of files, per file and per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStats {
    pub files: Vec<FileStats>,
    pub per_language: BTreeMap<Language, CategoryStats>,
    pub uncategorized: UncategorizedStats,
}

impl CodeStats {
    pub fn from_files(files: Vec<FileStats>) -> Self {
        let mut per_language: BTreeMap<Language, CategoryStats> = BTreeMap::new();
        let mut uncategorized = UncategorizedStats::default();
        for file in &files {
            match file.language() {
                Some(language) => per_language.entry(language).or_default().add(file),
                None => {
                    uncategorized.totals.add(file);
                    uncategorized.files.push(file.source_id.clone());
                }
            }
        }
        Self {
            files,
            per_language,
            uncategorized,
        }
    }

    /// Totals over every file, categorized or not.
    pub fn total(&self) -> CategoryStats {
        let mut total = CategoryStats::default();
        for file in &self.files {
            total.add(file);
        }
        total
    }
}

impl std::fmt::Display for CodeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<14} {:>6} {:>9} {:>9} {:>9} {:>9}",
            "Language", "Files", "Lines", "Code", "Comment", "Blank"
        )?;
        let mut row = |name: &str, stats: &CategoryStats| {
            writeln!(
                f,
                "{:<14} {:>6} {:>9} {:>9} {:>9} {:>9}",
                name,
                stats.files,
                stats.total_lines,
                stats.code_lines(),
                stats.comment_lines,
                stats.blank_lines
            )
        };
        for (language, stats) in &self.per_language {
            row(language.name(), stats)?;
        }
        if self.uncategorized.totals.files > 0 {
            row("uncategorized", &self.uncategorized.totals)?;
        }
        row("total", &self.total())
    }
}

/// Measure every file under `roots` whose extension is configured or listed
/// in `extra_extensions`. Files that are not valid UTF-8 are skipped.
pub fn collect_stats(
    roots: &[PathBuf],
    config: &WorkflowConfig,
    extra_extensions: &[String],
) -> Result<CodeStats, WorkflowError> {
    let mut config = config.clone();
    for extension in extra_extensions {
        let extension = extension.trim_start_matches('.');
        if !config.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)) {
            config.extensions.push(extension.to_string());
        }
    }

    let mut sources: Vec<SourcePath> = Vec::new();
    for root in roots {
        sources.extend(collect_sources(root, &config)?);
    }
    sources.sort();
    sources.dedup();

    let definitions: BTreeMap<Language, LanguageDefinition> =
        Language::ALL.into_iter().map(|l| (l, l.definition())).collect();

    let mut files = Vec::with_capacity(sources.len());
    for source in &sources {
        let bytes = std::fs::read(&source.path).map_err(|e| WorkflowError::io(&source.path, e))?;
        let Ok(text) = String::from_utf8(bytes) else {
            warn!(source_id = %source.source_id, "skipping file that is not UTF-8");
            continue;
        };
        let definition = extension_of(&source.path)
            .and_then(Language::from_extension)
            .and_then(|l| definitions.get(&l));
        files.push(FileStats::measure(source.source_id.clone(), &text, definition));
    }

    debug!(files = files.len(), "measured files");
    Ok(CodeStats::from_files(files))
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
