//! Configuration management for codesig.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `codesig.toml` file
//! 3. User config `~/.config/codesig/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::parser::{MalformedTypePolicy, ParseOptions};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-file parsing.
    pub parse: ParseConfig,

    /// Directory walking and the parse worker pool.
    pub workflow: WorkflowConfig,

    /// Resolved output files.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./codesig.toml` (project local)
    /// 2. `~/.config/codesig/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `CODESIG_*` overrides read through `lookup`.
    ///
    /// Values that do not parse are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Parse overrides
        if let Some(n) = parsed(&lookup, "CODESIG_MAX_GENERIC_DEPTH") {
            self.parse.max_generic_depth = n;
        }
        if let Some(n) = parsed(&lookup, "CODESIG_MAX_FILE_SIZE") {
            self.parse.max_file_size = n;
        }
        match lookup("CODESIG_MALFORMED_TYPES").as_deref().map(str::trim) {
            Some("skip_member") => self.parse.malformed_types = MalformedTypePolicy::SkipMember,
            Some("fail_file") => self.parse.malformed_types = MalformedTypePolicy::FailFile,
            _ => {}
        }

        // Workflow overrides
        if let Some(n) = parsed(&lookup, "CODESIG_THREADS") {
            self.workflow.threads = n;
        }
        if let Some(n) = parsed(&lookup, "CODESIG_TIMEOUT_SECS") {
            self.workflow.timeout_secs = n;
        }
        if let Some(flag) = parsed(&lookup, "CODESIG_FAIL_FAST") {
            self.workflow.fail_fast = flag;
        }

        // Output overrides
        if let Some(format) = lookup("CODESIG_FORMAT").and_then(|v| OutputFormat::from_name(v.trim())) {
            self.output.format = format;
        }
    }

    /// Reject settings the workflow cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parse.max_generic_depth == 0 {
            return Err(ConfigError::Invalid("parse.max_generic_depth must be at least 1".into()));
        }
        if self.workflow.threads == 0 {
            return Err(ConfigError::Invalid("workflow.threads must be at least 1".into()));
        }
        if self.workflow.extensions.is_empty() {
            return Err(ConfigError::Invalid("workflow.extensions must not be empty".into()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

/// Per-file parsing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Generic nesting depth accepted inside one identifier.
    pub max_generic_depth: usize,

    /// What to do with a member whose type cannot be parsed.
    pub malformed_types: MalformedTypePolicy,

    /// Files larger than this (in bytes) are rejected.
    pub max_file_size: u64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_generic_depth: DEFAULT_GENERIC_DEPTH,
            malformed_types: MalformedTypePolicy::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ParseConfig {
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            max_generic_depth: self.max_generic_depth,
            malformed_types: self.malformed_types,
        }
    }
}

/// Directory walking and worker pool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Parse tasks allowed to run at once.
    pub threads: usize,

    /// Per-file timeout in seconds; 0 disables it.
    pub timeout_secs: u64,

    /// Stop at the first file that fails instead of skipping it.
    pub fail_fast: bool,

    /// File extensions to parse (without leading dot).
    pub extensions: Vec<String>,

    /// Directories to exclude from scanning.
    pub exclude_dirs: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fail_fast: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkflowConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Serialization format of written output files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// File extension used for written files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parse.max_generic_depth, DEFAULT_GENERIC_DEPTH);
        assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.workflow.threads, DEFAULT_THREADS);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[parse]"));
        assert!(toml_str.contains("[workflow]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("malformed_types = \"skip_member\""));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[parse]
max_generic_depth = 5
malformed_types = "fail_file"

[workflow]
threads = 2
extensions = ["cs"]

[output]
format = "yaml"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.parse.max_generic_depth, 5);
        assert_eq!(config.parse.malformed_types, MalformedTypePolicy::FailFile);
        assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.workflow.threads, 2);
        assert_eq!(config.workflow.extensions, vec!["cs".to_string()]);
        assert_eq!(config.workflow.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CODESIG_THREADS", "3"),
            ("CODESIG_TIMEOUT_SECS", "0"),
            ("CODESIG_MALFORMED_TYPES", "fail_file"),
            ("CODESIG_FORMAT", "YML"),
            ("CODESIG_MAX_FILE_SIZE", "not a number"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.workflow.threads, 3);
        assert_eq!(config.workflow.timeout(), None);
        assert_eq!(config.parse.malformed_types, MalformedTypePolicy::FailFile);
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let mut config = Config::default();
        config.workflow.threads = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_options() {
        let mut config = Config::default();
        config.parse.max_generic_depth = 7;
        let options = config.parse.options();
        assert_eq!(options.max_generic_depth, 7);
        assert_eq!(options.malformed_types, MalformedTypePolicy::SkipMember);
    }
}
