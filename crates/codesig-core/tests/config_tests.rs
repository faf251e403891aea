use codesig_core::config::{
    ConfigError, OutputFormat, DEFAULT_EXTENSIONS, DEFAULT_GENERIC_DEPTH, DEFAULT_MAX_FILE_SIZE, DEFAULT_THREADS,
};
use codesig_core::parser::MalformedTypePolicy;
use codesig_core::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.parse.max_generic_depth, DEFAULT_GENERIC_DEPTH);
    assert_eq!(config.parse.max_file_size, DEFAULT_MAX_FILE_SIZE);
    assert_eq!(config.workflow.threads, DEFAULT_THREADS);
    assert_eq!(config.workflow.extensions.len(), DEFAULT_EXTENSIONS.len());
    assert!(config.workflow.exclude_dirs.iter().any(|d| d == "node_modules"));
}

#[test]
fn test_config_to_toml_round_trip() {
    let text = Config::default_config_string();
    let config: Config = toml::from_str(&text).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("codesig.toml");
    fs::write(
        &path,
        r#"
[parse]
malformed_types = "fail_file"

[workflow]
threads = 4
timeout_secs = 5
exclude_dirs = ["generated"]

[output]
format = "yaml"
pretty = false
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.parse.malformed_types, MalformedTypePolicy::FailFile);
    assert_eq!(config.parse.max_generic_depth, DEFAULT_GENERIC_DEPTH);
    assert_eq!(config.workflow.exclude_dirs, vec!["generated".to_string()]);
    assert_eq!(config.output.format, OutputFormat::Yaml);
    assert!(!config.output.pretty);
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("codesig.toml");

    fs::write(&path, "[workflow\nthreads = 4").unwrap();
    assert!(matches!(Config::from_file(&path), Err(ConfigError::ParseError(_))));

    fs::write(&path, "[workflow]\nextensions = []").unwrap();
    assert!(matches!(Config::from_file(&path), Err(ConfigError::Invalid(_))));

    assert!(matches!(
        Config::from_file(temp.path().join("absent.toml")),
        Err(ConfigError::ReadError(_))
    ));
}
