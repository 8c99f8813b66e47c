//! Configuration management for Prism
//!
//! Display thresholds for the browser, loaded from JSON with per-field
//! defaults so a config file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PrismError, Result};
use crate::tree::TreeOptions;

const LOCAL_CONFIG: &str = ".prism.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
  /// Characters of a metadata string shown before it is shortened
  #[serde(default = "default_truncate_after")]
  pub truncate_after: usize,
  /// Metadata containers at this depth and deeper start collapsed
  #[serde(default = "default_collapse_depth")]
  pub collapse_depth: usize,
  /// Height in lines of the detail view's scroll region
  #[serde(default = "default_panel_height")]
  pub panel_height: u16,
  /// Highlight search matches in table rows
  #[serde(default = "default_highlight_matches")]
  pub highlight_matches: bool,
}

fn default_truncate_after() -> usize {
  60
}
fn default_collapse_depth() -> usize {
  1
}
fn default_panel_height() -> u16 {
  12
}
fn default_highlight_matches() -> bool {
  true
}

impl Default for BrowserConfig {
  fn default() -> Self {
    Self {
      truncate_after: default_truncate_after(),
      collapse_depth: default_collapse_depth(),
      panel_height: default_panel_height(),
      highlight_matches: default_highlight_matches(),
    }
  }
}

impl BrowserConfig {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| PrismError::io(path, e))?;
    let config: BrowserConfig =
      serde_json::from_str(&content).map_err(|e| PrismError::parse(path, e))?;
    config.validate()?;
    Ok(config)
  }

  /// Resolve configuration: an explicit path must load, otherwise the first
  /// of `./.prism.json` and the user config file that exists, otherwise defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::load_from_file(path);
    }

    for candidate in Self::search_paths() {
      if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "Using config file");
        return Self::load_from_file(&candidate);
      }
    }

    Ok(Self::default())
  }

  fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(config_dir) = dirs::config_dir() {
      paths.push(config_dir.join("prism").join("config.json"));
    }
    paths
  }

  fn validate(&self) -> Result<()> {
    if self.panel_height == 0 {
      return Err(PrismError::config("panel_height must be at least 1"));
    }
    Ok(())
  }

  pub fn tree_options(&self) -> TreeOptions {
    TreeOptions { collapse_depth: self.collapse_depth, truncate_after: self.truncate_after }
  }

  /// The query to emphasise in rendered rows; empty when highlighting is off.
  pub fn highlight_query<'a>(&self, query: &'a str) -> &'a str {
    if self.highlight_matches {
      query
    } else {
      ""
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_config_default() {
    let config = BrowserConfig::default();
    assert_eq!(config.truncate_after, 60);
    assert_eq!(config.collapse_depth, 1);
    assert_eq!(config.panel_height, 12);
    assert!(config.highlight_matches);
  }

  #[test]
  fn test_config_load_nonexistent_file() {
    let result = BrowserConfig::load_from_file(Path::new("nonexistent.json"));
    assert!(result.is_err());
  }

  #[test]
  fn test_explicit_missing_config_is_an_error() {
    let result = BrowserConfig::load(Some(Path::new("/definitely/not/here.json")));
    assert!(matches!(result, Err(PrismError::Io { .. })));
  }

  #[test]
  fn test_config_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("prism.json");
    fs::write(&config_path, r#"{"truncate_after": 20}"#).unwrap();

    let config = BrowserConfig::load_from_file(&config_path).unwrap();
    assert_eq!(config.truncate_after, 20);
    assert_eq!(config.collapse_depth, 1);
    assert_eq!(config.panel_height, 12);
  }

  #[test]
  fn test_config_rejects_zero_panel_height() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("prism.json");
    fs::write(&config_path, r#"{"panel_height": 0}"#).unwrap();

    let result = BrowserConfig::load_from_file(&config_path);
    assert!(matches!(result, Err(PrismError::Config { .. })));
  }

  #[test]
  fn test_config_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("prism.json");
    fs::write(&config_path, "{ invalid").unwrap();

    assert!(matches!(
      BrowserConfig::load_from_file(&config_path),
      Err(PrismError::Parse { .. })
    ));
  }

  #[test]
  fn test_tree_options() {
    let config = BrowserConfig { truncate_after: 10, collapse_depth: 2, ..Default::default() };
    let options = config.tree_options();
    assert_eq!(options.truncate_after, 10);
    assert_eq!(options.collapse_depth, 2);
  }

  #[test]
  fn test_highlight_query_follows_setting() {
    let config = BrowserConfig::default();
    assert_eq!(config.highlight_query("fox "), "fox ");

    let config = BrowserConfig { highlight_matches: false, ..Default::default() };
    assert_eq!(config.highlight_query("fox "), "");
  }
}
