//! Integration tests for Settings loading from explicit config files.
//!
//! These tests only use temp directories; environment overrides are not
//! touched so they can run in parallel.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::{expand_env_vars, ChildOrder, Settings};

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("records.toml");
    let config_path = dir.path().join("orgtree.toml");
    fs::write(
        &config_path,
        format!(
            "store_path = {:?}\nchild_order = \"title\"\ndefault_root_title = \"Acme\"\n",
            store.to_string_lossy()
        ),
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&config_path)).expect("load settings");

    // Assert
    assert_eq!(settings.store_path, store);
    assert_eq!(settings.child_order, ChildOrder::Title);
    assert_eq!(settings.default_root_title, "Acme");
}

#[test]
fn given_partial_config_when_load_then_unspecified_fields_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("orgtree.toml");
    fs::write(&config_path, "default_root_title = \"Acme\"\n").unwrap();

    let settings = Settings::load(Some(&config_path)).expect("load settings");

    assert_eq!(settings.default_root_title, "Acme");
    assert_eq!(settings.child_order, ChildOrder::Insertion);
}

#[test]
fn given_tilde_store_path_when_load_then_path_is_expanded() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("orgtree.toml");
    fs::write(&config_path, "store_path = \"~/org/records.toml\"\n").unwrap();

    let settings = Settings::load(Some(&config_path)).expect("load settings");

    assert!(!settings.store_path.to_string_lossy().contains('~'));
    assert!(settings.store_path.ends_with("org/records.toml"));
}

#[test]
fn given_missing_config_file_when_load_then_errors_config() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = Settings::load(Some(&missing));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_unknown_child_order_when_load_then_errors_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("orgtree.toml");
    fs::write(&config_path, "child_order = \"random\"\n").unwrap();

    let result = Settings::load(Some(&config_path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_rendering_toml_then_template_and_effective_config_parse() {
    let settings = Settings {
        store_path: PathBuf::from("/tmp/records.toml"),
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();
    let template: toml::Table = toml::from_str(&Settings::template()).unwrap();

    assert_eq!(parsed, settings);
    assert!(template.is_empty(), "template only contains comments");
}

#[test]
fn given_plain_path_when_expanding_then_is_unchanged() {
    assert_eq!(expand_env_vars("/var/lib/orgtree.toml"), "/var/lib/orgtree.toml");
}
