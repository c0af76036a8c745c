//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
//! 3. Local config: `<document_dir>/.navtree.toml`
//! 4. Environment variables: `NAVTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::dates::DEFAULT_DATE_FORMAT;
use crate::domain::TreeSortType;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Unified configuration for navtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree ordering when none is requested on the command line
    pub sort: TreeSortType,
    /// Top range used as the root of a manifest's tree
    pub top_range_index: usize,
    /// Sub-collection to open when the document is a collection
    pub collection_index: Option<usize>,
    /// Manifest to open within the selected collection
    pub manifest_index: usize,
    /// chrono format for date leaf labels
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort: TreeSortType::None,
            top_range_index: 0,
            collection_index: None,
            manifest_index: 0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub sort: Option<TreeSortType>,
    pub top_range_index: Option<usize>,
    pub collection_index: Option<usize>,
    pub manifest_index: Option<usize>,
    pub date_format: Option<String>,
}

/// Get the XDG config directory for navtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navtree.toml"))
}

/// Get the path to the local config file in a document directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".navtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(fs: &dyn FileSystem, path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = fs.read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            sort: overlay.sort.unwrap_or(self.sort),
            top_range_index: overlay.top_range_index.unwrap_or(self.top_range_index),
            collection_index: overlay.collection_index.or(self.collection_index),
            manifest_index: overlay.manifest_index.unwrap_or(self.manifest_index),
            date_format: overlay
                .date_format
                .clone()
                .unwrap_or_else(|| self.date_format.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.navtree.toml`
    ///   (usually the directory of the document being opened)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(&RealFileSystem, local_dir)
    }

    /// Same as [`Settings::load`], reading config files through `fs`.
    pub fn load_from(
        fs: &dyn FileSystem,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if fs.exists(&global_path) {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(fs, &global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if fs.exists(&local_path) {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(fs, &local_path)?);
            }
        }

        let env = Config::builder()
            .add_source(Environment::with_prefix("NAVTREE").separator("__"))
            .build()
            .map_err(config_err)?;
        Ok(current.apply_overrides(&env))
    }

    /// Apply explicit overrides (environment variables) onto the settings.
    fn apply_overrides(mut self, overrides: &Config) -> Self {
        if let Ok(val) = overrides.get_string("sort") {
            // Unknown modes fall back to native order
            self.sort = val.parse().unwrap_or_default();
        }
        if let Ok(val) = overrides.get::<usize>("top_range_index") {
            self.top_range_index = val;
        }
        if let Ok(val) = overrides.get::<usize>("collection_index") {
            self.collection_index = Some(val);
        }
        if let Ok(val) = overrides.get::<usize>("manifest_index") {
            self.manifest_index = val;
        }
        if let Ok(val) = overrides.get_string("date_format") {
            self.date_format = val;
        }
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# navtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/navtree/navtree.toml
#   Local:  <document_dir>/.navtree.toml
#   Env:    NAVTREE_* environment variables (e.g. NAVTREE_SORT=date)

# Tree ordering: "none" (structural) or "date" (decade/year/month)
# sort = "none"

# Top range to use as the tree root for manifests
# top_range_index = 0

# Sub-collection and manifest to open for collection documents
# collection_index = 0
# manifest_index = 0

# chrono format for date leaf labels
# date_format = "%a %b %d %Y"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    /// Config files served from memory.
    struct MemoryFileSystem(HashMap<PathBuf, String>);

    impl FileSystem for MemoryFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn exists(&self, path: &Path) -> bool {
            self.0.contains_key(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.exists(path)
        }
    }

    #[test]
    fn given_local_config_behind_filesystem_when_loading_then_read_through_it() {
        let dir = Path::new("/docs/periodical");
        let fs = MemoryFileSystem(HashMap::from([(
            local_config_path(dir),
            "sort = \"date\"\nmanifest_index = 2\n".to_string(),
        )]));

        let settings = Settings::load_from(&fs, Some(dir)).unwrap();

        assert_eq!(settings.sort, TreeSortType::Date);
        assert_eq!(settings.manifest_index, 2);
    }

    #[test]
    fn given_no_files_behind_filesystem_when_loading_then_defaults() {
        let fs = MemoryFileSystem(HashMap::new());
        let settings = Settings::load_from(&fs, Some(Path::new("/docs"))).unwrap();
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sort, TreeSortType::None);
        assert_eq!(settings.top_range_index, 0);
        assert_eq!(settings.collection_index, None);
        assert_eq!(settings.date_format, "%a %b %d %Y");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            sort: Some(TreeSortType::Date),
            manifest_index: Some(3),
            ..RawSettings::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.sort, TreeSortType::Date);
        assert_eq!(merged.manifest_index, 3);
        assert_eq!(merged.top_range_index, 0);
        assert_eq!(merged.date_format, base.date_format);
    }

    #[test]
    fn given_overrides_when_applied_then_replace_values() {
        let overrides = Config::builder()
            .set_override("sort", "date")
            .unwrap()
            .set_override("top_range_index", 2)
            .unwrap()
            .set_override("collection_index", 1)
            .unwrap()
            .set_override("date_format", "%Y-%m-%d")
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings::default().apply_overrides(&overrides);
        assert_eq!(settings.sort, TreeSortType::Date);
        assert_eq!(settings.top_range_index, 2);
        assert_eq!(settings.collection_index, Some(1));
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }

    #[test]
    fn given_unknown_sort_override_when_applied_then_falls_back_to_none() {
        let overrides = Config::builder()
            .set_override("sort", "alphabetical")
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings {
            sort: TreeSortType::Date,
            ..Settings::default()
        }
        .apply_overrides(&overrides);
        assert_eq!(settings.sort, TreeSortType::None);
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings {
            sort: TreeSortType::Date,
            collection_index: Some(1),
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("sort = \"date\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_template_parses() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.sort.is_none());
    }
}
