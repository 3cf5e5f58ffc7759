//! Shared types for manifest parsing.
//!
//! This module defines the data structures used to represent package
//! manifests, their declared dependencies and the fields that name files.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Represents the structure of a package.json file.
///
/// Only the fields needed for dead-code analysis are captured: declared
/// dependencies, scripts, and the fields that point at entry files.
///
/// # Example
///
/// ```
/// use reachscope::parser::types::PackageJson;
///
/// let json = r#"{"name": "my-app", "main": "./lib/index.js"}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// assert_eq!(pkg.main.as_deref(), Some("./lib/index.js"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// CommonJS entry file.
    pub main: Option<String>,

    /// ES module entry file (bundler convention).
    pub module: Option<String>,

    /// Browser entry; either a path or a replacement map.
    pub browser: Option<Value>,

    /// Executables; either a single path or a `name -> path` map.
    pub bin: Option<Value>,

    /// Conditional exports; strings or arbitrarily nested condition objects.
    pub exports: Option<Value>,

    /// npm scripts (`name -> shell command`).
    pub scripts: Option<HashMap<String, String>>,

    /// Production dependencies required at runtime.
    pub dependencies: Option<HashMap<String, String>>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<HashMap<String, String>>,

    /// Peer dependencies that the host package must provide.
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<HashMap<String, String>>,

    /// Optional dependencies that enhance functionality if available.
    #[serde(rename = "optionalDependencies")]
    pub optional_dependencies: Option<HashMap<String, String>>,
}

impl PackageJson {
    /// Collects every path-like string from the entry fields
    /// (`main`, `module`, `browser`, `bin`, `exports`).
    pub fn entry_fields(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.extend(self.main.iter().cloned());
        out.extend(self.module.iter().cloned());
        if let Some(Value::String(browser)) = &self.browser {
            out.push(browser.clone());
        }
        if let Some(bin) = &self.bin {
            collect_string_leaves(bin, &mut out);
        }
        if let Some(exports) = &self.exports {
            collect_string_leaves(exports, &mut out);
        }
        out
    }
}

/// Pushes every string found anywhere inside `value`.
fn collect_string_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_string_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_string_leaves(v, out)),
        _ => {}
    }
}

/// Categorizes the type of dependency relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Production dependencies - required at runtime.
    Production,

    /// Development dependencies - only needed during development.
    Development,

    /// Peer dependencies - expected to be provided by the consumer.
    Peer,

    /// Optional dependencies - enhance functionality if available.
    Optional,
}

impl DependencyType {
    /// Returns true if an unused declaration of this type is worth reporting.
    ///
    /// Peer dependencies are satisfied by the consumer, so the declaring
    /// package is not expected to reference them.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, DependencyType::Peer)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyType::Production => "production",
            DependencyType::Development => "development",
            DependencyType::Peer => "peer",
            DependencyType::Optional => "optional",
        };
        write!(f, "{}", s)
    }
}

/// Represents a single dependency with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The package name (e.g., "react", "lodash").
    pub name: String,

    /// The version specifier (e.g., "^18.0.0", "~1.2.3").
    pub version: String,

    /// The category of this dependency.
    pub dep_type: DependencyType,
}

impl Dependency {
    /// Creates a new Dependency instance.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        dep_type: DependencyType,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dep_type,
        }
    }

    /// For `@types/foo` returns `Some("foo")`; `@types/scope__pkg` maps
    /// back to `@scope/pkg`.
    pub fn typed_package(&self) -> Option<String> {
        let rest = self.name.strip_prefix("@types/")?;
        Some(match rest.split_once("__") {
            Some((scope, pkg)) => format!("@{}/{}", scope, pkg),
            None => rest.to_string(),
        })
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.dep_type)
    }
}
