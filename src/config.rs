//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `RSTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::TraversalKind;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {message}")]
    Invalid { message: String },
}

/// Unified configuration for rstree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Strategy used by lookups when none is given explicitly
    pub traversal: TraversalKind,
    /// Default for `--keep-children` on move and remove
    pub keep_children: bool,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub traversal: Option<TraversalKind>,
    pub keep_children: Option<bool>,
}

/// Get the XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Invalid {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Invalid {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            traversal: overlay.traversal.unwrap_or(self.traversal),
            keep_children: overlay.keep_children.unwrap_or(self.keep_children),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(SettingsError::NotFound(path.to_path_buf()));
            }
            debug!("config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply RSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_string("traversal"))? {
            settings.traversal = val
                .parse()
                .map_err(|message| SettingsError::Invalid { message })?;
        }
        if let Some(val) = optional(config.get_bool("keep_children"))? {
            settings.keep_children = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rstree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rstree/rstree.toml
#   File:   --config <FILE>
#   Env:    RSTREE_TRAVERSAL, RSTREE_KEEP_CHILDREN

# Traversal used for lookups: "breadth-first" or "depth-first"
# traversal = "breadth-first"

# Keep children attached when moving or removing a node
# keep_children = false
"#
        .to_string()
    }
}

/// Unset keys are `None`; any other lookup failure is an error.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, SettingsError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Invalid {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_breadth_first_without_keep() {
        let settings = Settings::default();
        assert_eq!(settings.traversal, TraversalKind::BreadthFirst);
        assert!(!settings.keep_children);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = Settings {
            traversal: TraversalKind::DepthFirst,
            keep_children: false,
        };
        let overlay = RawSettings {
            traversal: None,
            keep_children: Some(true),
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.traversal, TraversalKind::DepthFirst);
        assert!(result.keep_children);
    }

    #[test]
    fn given_template_when_parsing_then_specifies_nothing() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("parse template");
        assert!(raw.traversal.is_none());
        assert!(raw.keep_children.is_none());
    }

    #[test]
    fn given_settings_when_rendering_toml_then_uses_kebab_case_names() {
        let settings = Settings {
            traversal: TraversalKind::DepthFirst,
            keep_children: true,
        };
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("traversal = \"depth-first\""));
        assert!(rendered.contains("keep_children = true"));
    }
}
