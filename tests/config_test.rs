//! Integration tests for Settings loading from a document directory.
//!
//! These tests use temp directories only and assume no global config
//! and no `NAVTREE_*` variables in the environment.

use std::fs;

use tempfile::TempDir;

use navtree::application::ApplicationError;
use navtree::config::{local_config_path, Settings};
use navtree::domain::TreeSortType;

#[test]
fn given_no_local_config_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
sort = "date"
top_range_index = 1
collection_index = 2
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.sort, TreeSortType::Date);
    assert_eq!(settings.top_range_index, 1);
    assert_eq!(settings.collection_index, Some(2));
    assert_eq!(settings.manifest_index, 0, "unspecified keeps default");
    assert_eq!(settings.date_format, "%a %b %d %Y");
}

#[test]
fn given_unknown_sort_mode_when_loading_then_falls_back_to_none() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "sort = \"alphabetical\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.sort, TreeSortType::None);
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "sort = [unclosed").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains(".navtree.toml"));
}

#[test]
fn given_template_when_written_as_local_config_then_loads_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}
