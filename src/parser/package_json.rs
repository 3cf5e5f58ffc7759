//! Parser for npm package.json files.
//!
//! This module parses package.json content already resident in memory and
//! extracts dependency information and file-like script arguments.

use super::types::{Dependency, DependencyType, PackageJson};

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document parsed but is not a JSON object.
    #[error("Invalid package.json: {0}")]
    InvalidPackage(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Extensions that make a script argument look like a source file.
const SCRIPT_FILE_EXTENSIONS: &[&str] = &[
    ".js", ".mjs", ".cjs", ".jsx", ".ts", ".mts", ".cts", ".tsx", ".py",
];

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use reachscope::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(ParseError::InvalidPackage(
            "top-level value is not an object".to_string(),
        ));
    }
    let pkg: PackageJson = serde_json::from_value(value)?;
    Ok(pkg)
}

/// Extracts all dependencies from a PackageJson into a normalized list.
///
/// The result is sorted by type and then by name so repeated runs produce
/// identical output.
///
/// # Example
///
/// ```
/// use reachscope::parser::package_json::{parse_str, extract_dependencies};
/// use reachscope::parser::types::DependencyType;
///
/// let json = r#"{
///     "name": "my-app",
///     "dependencies": {"react": "^18.0.0"},
///     "devDependencies": {"typescript": "^5.0.0"}
/// }"#;
///
/// let pkg = parse_str(json).unwrap();
/// let deps = extract_dependencies(&pkg);
///
/// assert_eq!(deps.len(), 2);
/// assert!(deps.iter().any(|d| d.name == "react" && d.dep_type == DependencyType::Production));
/// assert!(deps.iter().any(|d| d.name == "typescript" && d.dep_type == DependencyType::Development));
/// ```
pub fn extract_dependencies(pkg: &PackageJson) -> Vec<Dependency> {
    let mut deps = Vec::new();

    let tables = [
        (&pkg.dependencies, DependencyType::Production),
        (&pkg.dev_dependencies, DependencyType::Development),
        (&pkg.peer_dependencies, DependencyType::Peer),
        (&pkg.optional_dependencies, DependencyType::Optional),
    ];

    for (table, dep_type) in tables {
        if let Some(entries) = table {
            for (name, version) in entries {
                deps.push(Dependency::new(name, version, dep_type));
            }
        }
    }

    deps.sort_by(|a, b| (a.dep_type, &a.name).cmp(&(b.dep_type, &b.name)));
    deps
}

/// Returns the raw script command strings, sorted by script name.
pub fn script_commands(pkg: &PackageJson) -> Vec<String> {
    let Some(scripts) = &pkg.scripts else {
        return Vec::new();
    };
    let mut named: Vec<_> = scripts.iter().collect();
    named.sort_by(|a, b| a.0.cmp(b.0));
    named.into_iter().map(|(_, cmd)| cmd.clone()).collect()
}

/// Extracts file-like arguments from script commands.
///
/// A token counts when it ends in a known source extension, or contains a
/// `/` and is neither a flag, a URL nor a glob.
///
/// ```
/// use reachscope::parser::package_json::script_file_tokens;
///
/// let tokens = script_file_tokens("node --inspect ./scripts/seed.js && tsx src/cli.ts");
/// assert_eq!(tokens, vec!["./scripts/seed.js", "src/cli.ts"]);
/// ```
pub fn script_file_tokens(command: &str) -> Vec<String> {
    command
        .split(|c: char| c.is_whitespace() || c == ';' || c == '&' || c == '|')
        .map(|t| t.trim_matches(|c| c == '"' || c == '\''))
        .filter(|t| !t.is_empty() && !t.starts_with('-'))
        .filter(|t| !t.contains("://") && !t.contains('*') && !t.contains('='))
        .filter(|t| {
            SCRIPT_FILE_EXTENSIONS.iter().any(|ext| t.ends_with(ext))
                || (t.contains('/') && !t.starts_with('@'))
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PACKAGE_JSON: &str = r#"{
        "name": "test-app",
        "version": "1.0.0",
        "main": "dist/index.js",
        "scripts": {
            "build": "tsc -p .",
            "seed": "node scripts/seed.js"
        },
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "lodash": "^4.17.21"
        },
        "devDependencies": {
            "typescript": "^5.0.0",
            "jest": "^29.0.0"
        },
        "peerDependencies": {
            "react": ">=16.8.0"
        },
        "optionalDependencies": {
            "fsevents": "^2.3.0"
        }
    }"#;

    #[test]
    fn test_parse_str_valid() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();

        assert_eq!(pkg.name, Some("test-app".to_string()));
        assert_eq!(pkg.version, Some("1.0.0".to_string()));
        assert_eq!(pkg.main, Some("dist/index.js".to_string()));
    }

    #[test]
    fn test_parse_str_empty_object() {
        let pkg = parse_str("{}").unwrap();

        assert!(pkg.name.is_none());
        assert!(pkg.dependencies.is_none());
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let result = parse_str("{ invalid json }");

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParseError::JsonError(_)));
    }

    #[test]
    fn test_parse_str_not_an_object() {
        let result = parse_str("[1, 2, 3]");
        assert!(matches!(result.unwrap_err(), ParseError::InvalidPackage(_)));
    }

    #[test]
    fn test_parse_str_wrong_field_type() {
        // "dependencies" must be a map of strings
        let result = parse_str(r#"{"dependencies": ["react"]}"#);
        assert!(matches!(result.unwrap_err(), ParseError::JsonError(_)));
    }

    #[test]
    fn test_extract_dependencies_all_types() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        let deps = extract_dependencies(&pkg);

        // 3 prod + 2 dev + 1 peer + 1 optional = 7
        assert_eq!(deps.len(), 7);

        let count = |t: DependencyType| deps.iter().filter(|d| d.dep_type == t).count();
        assert_eq!(count(DependencyType::Production), 3);
        assert_eq!(count(DependencyType::Development), 2);
        assert_eq!(count(DependencyType::Peer), 1);
        assert_eq!(count(DependencyType::Optional), 1);
    }

    #[test]
    fn test_extract_dependencies_is_sorted() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        let names: Vec<_> = extract_dependencies(&pkg)
            .into_iter()
            .filter(|d| d.dep_type == DependencyType::Production)
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["lodash", "react", "react-dom"]);
    }

    #[test]
    fn test_extract_dependencies_empty() {
        let pkg = parse_str(r#"{"name": "empty-deps"}"#).unwrap();
        assert!(extract_dependencies(&pkg).is_empty());
    }

    #[test]
    fn test_script_commands_sorted_by_name() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        assert_eq!(
            script_commands(&pkg),
            vec!["tsc -p .".to_string(), "node scripts/seed.js".to_string()]
        );
    }

    #[test]
    fn test_script_file_tokens_ignores_flags_urls_and_globs() {
        let tokens = script_file_tokens(
            "eslint 'src/**/*.ts' --config ./.eslintrc.js && curl https://x.dev/a.js && python tools/gen.py",
        );
        assert_eq!(tokens, vec!["./.eslintrc.js", "tools/gen.py"]);
    }

    #[test]
    fn test_script_file_tokens_scoped_package_is_not_a_path() {
        assert!(script_file_tokens("npx @scope/tool run").is_empty());
    }

    #[test]
    fn test_parse_error_display() {
        let invalid_err = ParseError::InvalidPackage("missing name".to_string());
        assert!(invalid_err.to_string().contains("Invalid package.json"));
    }
}
