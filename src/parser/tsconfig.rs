//! Reader for the alias-relevant subset of tsconfig.json / jsconfig.json.
//!
//! These files are JSONC in practice, so full-line `//` comments, block
//! comments and trailing commas are stripped before handing the text to
//! serde.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::package_json::ParseResult;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TsConfig {
    /// Base config(s) this one inherits from.
    pub extends: Option<Extends>,

    #[serde(rename = "compilerOptions")]
    pub compiler_options: Option<CompilerOptions>,
}

/// `"extends"` is a single path or, since TypeScript 5.0, a list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Extends {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompilerOptions {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,

    /// `"@/*": ["./src/*"]` style mappings.
    pub paths: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub prefix: String,
    pub targets: Vec<String>,
    pub wildcard: bool,
}

impl TsConfig {
    pub fn base_url(&self) -> Option<&str> {
        self.compiler_options.as_ref()?.base_url.as_deref()
    }

    /// Inherited configs, in declaration order (later entries win).
    pub fn extends(&self) -> Vec<&str> {
        match &self.extends {
            Some(Extends::Single(base)) => vec![base.as_str()],
            Some(Extends::Many(bases)) => bases.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// True if this file declares its own `paths` (which replace inherited ones).
    pub fn has_paths(&self) -> bool {
        self.compiler_options.as_ref().is_some_and(|o| o.paths.is_some())
    }

    /// Returns the `paths` mappings with the trailing `*` removed.
    ///
    /// Exact (non-wildcard) mappings keep their full key; targets stay
    /// relative to `baseUrl`.
    pub fn path_prefixes(&self) -> Vec<PathMapping> {
        let Some(paths) = self.compiler_options.as_ref().and_then(|o| o.paths.as_ref()) else {
            return Vec::new();
        };
        paths
            .iter()
            .map(|(key, targets)| {
                let wildcard = key.ends_with('*');
                let prefix = key.trim_end_matches('*').to_string();
                let targets = targets
                    .iter()
                    .map(|t| t.trim_end_matches('*').to_string())
                    .collect();
                PathMapping {
                    prefix,
                    targets,
                    wildcard,
                }
            })
            .collect()
    }
}

/// Parses tsconfig-style JSONC text.
pub fn parse_str(content: &str) -> ParseResult<TsConfig> {
    let cleaned = strip_jsonc(content);
    Ok(serde_json::from_str(&cleaned)?)
}

/// Removes comments and trailing commas outside string literals.
fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ',' => {
                let rest: String = chars.clone().take_while(|n| n.is_whitespace()).collect();
                let after = chars.clone().nth(rest.chars().count());
                if !matches!(after, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths_with_comments_and_trailing_commas() {
        let content = r#"{
            // editor settings
            "compilerOptions": {
                /* resolution */
                "baseUrl": ".",
                "paths": {
                    "@/*": ["./src/*"],
                    "@lib": ["./lib/index.ts"],
                },
            },
        }"#;
        let cfg = parse_str(content).unwrap();

        assert_eq!(cfg.base_url(), Some("."));
        let prefixes = cfg.path_prefixes();
        assert!(prefixes.contains(&PathMapping {
            prefix: "@/".to_string(),
            targets: vec!["./src/".to_string()],
            wildcard: true,
        }));
        assert!(prefixes.contains(&PathMapping {
            prefix: "@lib".to_string(),
            targets: vec!["./lib/index.ts".to_string()],
            wildcard: false,
        }));
    }

    #[test]
    fn test_slashes_inside_strings_survive() {
        let content = r#"{"compilerOptions": {"baseUrl": "http://x//y"}}"#;
        let cfg = parse_str(content).unwrap();
        assert_eq!(cfg.base_url(), Some("http://x//y"));
    }

    #[test]
    fn test_missing_compiler_options() {
        let cfg = parse_str("{}").unwrap();
        assert!(cfg.base_url().is_none());
        assert!(cfg.path_prefixes().is_empty());
    }

    #[test]
    fn test_extends_single_and_list() {
        let single = parse_str(r#"{ "extends": "./tsconfig.base.json" }"#).unwrap();
        assert_eq!(single.extends(), vec!["./tsconfig.base.json"]);
        assert!(!single.has_paths());

        let many = parse_str(r#"{ "extends": ["@tsconfig/node18", "../base"], "compilerOptions": { "paths": {} } }"#)
            .unwrap();
        assert_eq!(many.extends(), vec!["@tsconfig/node18", "../base"]);
        assert!(many.has_paths());
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_str("not json").is_err());
    }
}
