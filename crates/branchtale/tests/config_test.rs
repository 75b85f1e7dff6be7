//! Tests for layered configuration loading.

use branchtale::{BranchtaleConfig, TreeLimits};
use std::io::Write;
use tempfile::Builder;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_overrides_bundled_defaults() {
    let file = write_config(
        r#"
[provider]
base_url = "http://localhost:11434"
model = "llama3"

[tree]
max_depth = 4
"#,
    );

    let config = BranchtaleConfig::from_file(file.path()).unwrap();
    assert_eq!(config.provider.base_url, "http://localhost:11434");
    assert_eq!(config.provider.model, "llama3");
    assert_eq!(
        config.tree_limits(),
        TreeLimits {
            max_depth: 4,
            max_branching: 3
        }
    );
    // Untouched sections keep their defaults
    assert_eq!(config.provider.temperature, Some(0.7));
    assert_eq!(config.database.pool_size, 8);
}

#[test]
fn test_explicit_file_is_layered_over_all_sources() {
    let file = write_config(
        r#"
[logging]
json = true
level = "warn"
"#,
    );

    let config = BranchtaleConfig::load_with(Some(file.path())).unwrap();
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = BranchtaleConfig::load_with(Some("/nonexistent/branchtale-config.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("[tree]\nmax_depth = \"deep\"\n");
    let err = BranchtaleConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}
