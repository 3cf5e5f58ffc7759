//! Analyzer configuration.
//!
//! Every field has a default, so an empty JSON object (or no config file at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Errors raised while loading an [`AnalyzerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the coordinator turns analyzer output into the final used set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityMode {
    /// Any file that something resolves an import to counts as used.
    #[default]
    Referenced,
    /// Only files reachable from an entry point (or a framework-used file)
    /// through the import graph count as used.
    Transitive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Files larger than this are not scanned.
    pub max_file_bytes: usize,

    /// Files with more lines than this are not scanned.
    pub max_file_lines: usize,

    /// Path fragments under which `index.*` files are treated as barrels.
    pub barrel_directories: Vec<String>,

    /// Import prefix -> project-relative target directories.
    pub path_aliases: BTreeMap<String, Vec<String>>,

    pub reachability: ReachabilityMode,

    /// Substrings; matching paths are never reported as orphaned.
    pub exclude: Vec<String>,

    pub report_barrel_groups: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let mut path_aliases = BTreeMap::new();
        path_aliases.insert("@/".to_string(), vec!["src/".to_string(), String::new()]);
        path_aliases.insert("~/".to_string(), vec!["src/".to_string(), String::new()]);
        path_aliases.insert("~~/".to_string(), vec![String::new()]);
        path_aliases.insert("@@/".to_string(), vec![String::new()]);
        path_aliases.insert("$lib/".to_string(), vec!["src/lib/".to_string()]);

        Self {
            max_file_bytes: 1024 * 1024,
            max_file_lines: 15_000,
            barrel_directories: vec!["components/ui/".to_string(), "components/".to_string()],
            path_aliases,
            reachability: ReachabilityMode::default(),
            exclude: Vec::new(),
            report_barrel_groups: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Returns true when `path` matches one of the `exclude` fragments.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|pattern| path.contains(pattern.as_str()))
    }
}
