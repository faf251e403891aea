//! Default values for codesig configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

use crate::language::DEFAULT_MAX_GENERIC_DEPTH;

// ============================================================================
// Parse Defaults
// ============================================================================

/// Generic nesting depth accepted inside a single identifier token.
pub const DEFAULT_GENERIC_DEPTH: usize = DEFAULT_MAX_GENERIC_DEPTH;

/// Largest source file that will be parsed (2 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

// ============================================================================
// Workflow Defaults
// ============================================================================

/// Parse tasks allowed to run at once.
pub const DEFAULT_THREADS: usize = 8;

/// Per-file parse timeout in seconds. Zero disables the timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source file extensions picked up when walking a directory.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cs", "java", "ts", "tsx", "mts", "cts"];

/// Directories never descended into.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "vendor",
    "packages",
    // Build outputs
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    // IDE/Editor
    ".idea",
    ".vscode",
    ".vs",
];

// ============================================================================
// Output Defaults
// ============================================================================

/// Name of the project-local config file.
pub const PROJECT_CONFIG_FILE: &str = "codesig.toml";

/// Directory under the user config dir holding `config.toml`.
pub const USER_CONFIG_DIR: &str = "codesig";
