//! Parser module for project manifests.
//!
//! This module parses the manifest formats the dead-code engine reads
//! directly from file content.
//!
//! # Supported Formats
//!
//! - **package.json** (npm/Node.js) - dependencies, scripts and entry fields
//! - **tsconfig.json / jsconfig.json** - `baseUrl` and `paths` aliases
//!
//! # Example
//!
//! ```
//! use reachscope::parser::{package_json, types::DependencyType};
//!
//! let pkg = package_json::parse_str(r#"{"dependencies": {"react": "^18"}}"#).unwrap();
//! let deps = package_json::extract_dependencies(&pkg);
//!
//! assert_eq!(deps.len(), 1);
//! assert_eq!(deps[0].dep_type, DependencyType::Production);
//! ```

pub mod package_json;
pub mod tsconfig;
pub mod types;

// Re-export commonly used types for convenience
pub use package_json::{
    extract_dependencies, parse_str, script_commands, script_file_tokens, ParseError, ParseResult,
};
pub use tsconfig::{PathMapping, TsConfig};
pub use types::{Dependency, DependencyType, PackageJson};
