//! JavaScript / TypeScript (and single-file component) analysis.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{collect_usage, LanguageAnalyzer};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{file_name, file_stem, is_component_file, is_script_file};
use crate::model::UsageAnalysisResult;

/// File stems that start a program when placed in a package root or one
/// of [`ENTRY_DIRS`].
const ENTRY_STEMS: &[&str] = &["index", "main", "app", "server", "cli"];

const ENTRY_DIRS: &[&str] = &["src", "bin", "lib", "scripts", "server", "cli"];

fn re_entry_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?x)
            process\.argv
            | require\.main\s*===?\s*module
            | import\.meta\.main
            | \bprogram\s*\.\s*parse(?:Async)?\s*\(
            | \byargs\s*(?:\(|\.)
            | \bcac\s*\(
            | from\s+['"](?:commander|yargs|cac)(?:/[^'"]*)?['"]
            | require\(\s*['"](?:commander|yargs|cac)(?:/[^'"]*)?['"]\s*\)
            "#,
        )
        .expect("valid entry marker regex")
    })
}

/// Test and story files are loaded by their runners, not imported.
pub fn is_test_or_story(path: &str) -> bool {
    let name = file_name(path);
    path.split('/').any(|segment| segment == "__tests__")
        || [".test.", ".spec.", ".stories.", ".story."]
            .iter()
            .any(|marker| name.contains(marker))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JavaScriptAnalyzer;

impl JavaScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Filename convention: an entry stem directly in the package root or
    /// directly inside one of the conventional entry directories.
    fn is_entry_by_name(&self, ctx: &ProjectIndex, path: &str) -> bool {
        if !is_script_file(path) {
            return false;
        }
        if !ENTRY_STEMS.contains(&file_stem(path)) {
            return false;
        }
        let segments: Vec<&str> = ctx.package_relative(path).split('/').collect();
        match segments.as_slice() {
            [_] => true,
            [dir, _] => ENTRY_DIRS.contains(dir),
            _ => false,
        }
    }

    fn has_entry_marker(&self, content: &str) -> bool {
        content.starts_with("#!") || re_entry_marker().is_match(content)
    }
}

impl LanguageAnalyzer for JavaScriptAnalyzer {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn is_language_file(&self, path: &str) -> bool {
        is_script_file(path) || is_component_file(path)
    }

    fn detect_entry_points(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        ctx.paths()
            .filter(|p| self.is_language_file(p))
            .filter(|p| {
                is_test_or_story(p)
                    || self.is_entry_by_name(ctx, p)
                    || (is_script_file(p) && ctx.content(p).is_some_and(|c| self.has_entry_marker(c)))
            })
            .map(str::to_string)
            .collect()
    }

    fn analyze_usage(&self, ctx: &ProjectIndex) -> UsageAnalysisResult {
        let resolver = ctx.resolver();
        collect_usage(self, ctx, |from, import| {
            resolver.resolve_js(from, &import.source).into_iter().collect()
        })
    }
}
