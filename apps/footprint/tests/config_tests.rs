//! # Config Tests

use footprint::FootprintConfig;
use footprint::config::DEFAULT_MAX_INPUT_BYTES;
use footprint_core::FootprintError;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn full_file_is_loaded() {
    let file = write_config(
        r#"
[loader]
intern_strings = true

[prune]
skip_types = ["char[]", "any[]"]

[limits]
max_input_bytes = 2048
"#,
    );

    let config = FootprintConfig::from_file(file.path()).expect("load");
    assert!(config.loader.intern_strings);
    assert_eq!(config.prune.skip_types, vec!["char[]", "any[]"]);
    assert_eq!(config.limits.max_input_bytes, 2048);
}

#[test]
fn missing_sections_take_defaults() {
    let file = write_config("[prune]\nskip_types = [\"object\"]\n");

    let config = FootprintConfig::from_file(file.path()).expect("load");
    assert!(!config.loader.intern_strings);
    assert_eq!(config.limits.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
}

#[test]
fn unknown_keys_are_rejected() {
    let file = write_config("[loader]\nintern = true\n");
    let result = FootprintConfig::from_file(file.path());
    assert!(matches!(result, Err(FootprintError::ConfigError(_))));

    let section = FootprintConfig::from_toml_str("[output]\ncolor = true\n");
    assert!(matches!(section, Err(FootprintError::ConfigError(_))));
}

#[test]
fn blank_skip_type_is_rejected() {
    let result = FootprintConfig::from_toml_str("[prune]\nskip_types = [\" \"]\n");
    assert!(matches!(result, Err(FootprintError::ConfigError(_))));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = FootprintConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(FootprintError::ConfigError(_))));
}
