//! Integration tests for Settings layered loading.
//!
//! Every test that loads settings holds an [`IsolatedEnv`]: the global config
//! directory points into a temp dir and RSTREE_* variables start unset.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use rstree::config::{Settings, SettingsError};
use rstree::domain::TraversalKind;

const ENV_VARS: [&str; 3] = ["XDG_CONFIG_HOME", "RSTREE_TRAVERSAL", "RSTREE_KEEP_CHILDREN"];

// Tests in this binary share the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

struct IsolatedEnv {
    config_home: TempDir,
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl IsolatedEnv {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let saved = ENV_VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
        let config_home = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", config_home.path());
        env::remove_var("RSTREE_TRAVERSAL");
        env::remove_var("RSTREE_KEEP_CHILDREN");
        Self {
            config_home,
            saved,
            _lock: lock,
        }
    }

    fn write_global(&self, content: &str) {
        let dir = self.config_home.path().join("rstree");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("rstree.toml"), content).unwrap();
    }
}

impl Drop for IsolatedEnv {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("rstree.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_file_when_load_then_defaults() {
    let _env = IsolatedEnv::new();
    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
traversal = "depth-first"
keep_children = true
"#,
    );

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::DepthFirst);
    assert!(settings.keep_children);
}

#[test]
fn given_partial_config_file_when_load_then_other_fields_keep_defaults() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "keep_children = true\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::BreadthFirst);
    assert!(settings.keep_children);
}

#[test]
fn given_short_traversal_alias_when_load_then_accepted() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \"dfs\"\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::DepthFirst);
}

#[test]
fn given_missing_config_file_when_load_then_not_found() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, SettingsError::NotFound(p) if p == path));
}

#[test]
fn given_malformed_toml_when_load_then_invalid() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, SettingsError::Invalid { .. }));
}

#[test]
fn given_unknown_traversal_when_load_then_invalid() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \"sideways\"\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, SettingsError::Invalid { .. }));
}

#[test]
fn given_effective_settings_when_rendered_then_reloads_identically() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        traversal: TraversalKind::DepthFirst,
        keep_children: true,
    };
    let path = write_config(&dir, &settings.to_toml().unwrap());

    let loaded = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(loaded, settings);
}

// ============================================================
// Global config layer
// ============================================================

#[test]
fn given_global_config_when_load_then_applied() {
    let isolated = IsolatedEnv::new();
    isolated.write_global("traversal = \"depth-first\"\n");

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::DepthFirst);
    assert!(!settings.keep_children);
}

#[test]
fn given_global_and_explicit_config_when_load_then_explicit_wins() {
    let isolated = IsolatedEnv::new();
    isolated.write_global("traversal = \"depth-first\"\nkeep_children = true\n");
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \"breadth-first\"\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::BreadthFirst);
    assert!(settings.keep_children);
}

// ============================================================
// Environment overrides
// ============================================================

#[test]
fn given_env_vars_when_load_then_override_config_file() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \"breadth-first\"\nkeep_children = false\n");
    env::set_var("RSTREE_TRAVERSAL", "dfs");
    env::set_var("RSTREE_KEEP_CHILDREN", "true");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::DepthFirst);
    assert!(settings.keep_children);
}

#[test]
fn given_single_env_var_when_load_then_other_fields_come_from_file() {
    let _env = IsolatedEnv::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "traversal = \"depth-first\"\n");
    env::set_var("RSTREE_KEEP_CHILDREN", "true");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, TraversalKind::DepthFirst);
    assert!(settings.keep_children);
}

#[test]
fn given_invalid_keep_children_env_when_load_then_invalid() {
    let _env = IsolatedEnv::new();
    env::set_var("RSTREE_TRAVERSAL", "dfs");
    env::set_var("RSTREE_KEEP_CHILDREN", "maybe");

    let err = Settings::load(None).unwrap_err();

    assert!(matches!(err, SettingsError::Invalid { .. }));
}

#[test]
fn given_invalid_traversal_env_when_load_then_invalid() {
    let _env = IsolatedEnv::new();
    env::set_var("RSTREE_TRAVERSAL", "sideways");

    let err = Settings::load(None).unwrap_err();

    assert!(matches!(err, SettingsError::Invalid { message } if message.contains("sideways")));
}
