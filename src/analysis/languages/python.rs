//! Python analysis.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{collect_usage, LanguageAnalyzer};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{file_name, file_stem, is_python_file};
use crate::analysis::syntax::python::imported_names;
use crate::model::UsageAnalysisResult;

const ENTRY_STEMS: &[&str] = &[
    "__main__", "main", "app", "manage", "wsgi", "asgi", "cli", "server", "run", "setup", "conftest",
];

fn re_entry_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?x)
            if\s+__name__\s*==\s*['"]__main__['"]
            | argparse\.ArgumentParser\s*\(
            | \bsys\.argv\b
            | @click\.(?:command|group)
            | \btyper\.Typer\s*\(
            "#,
        )
        .expect("valid python entry marker regex")
    })
}

/// pytest collects these by name.
pub fn is_test_module(path: &str) -> bool {
    let name = file_name(path);
    (name.starts_with("test_") && name.ends_with(".py")) || name.ends_with("_test.py")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn is_entry(&self, ctx: &ProjectIndex, path: &str) -> bool {
        file_name(path) == "__init__.py"
            || ENTRY_STEMS.contains(&file_stem(path))
            || is_test_module(path)
            || ctx.content(path).is_some_and(|c| re_entry_marker().is_match(c))
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn name(&self) -> &'static str {
        "python"
    }

    fn is_language_file(&self, path: &str) -> bool {
        is_python_file(path)
    }

    fn detect_entry_points(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        ctx.paths()
            .filter(|p| self.is_language_file(p) && self.is_entry(ctx, p))
            .map(str::to_string)
            .collect()
    }

    fn analyze_usage(&self, ctx: &ProjectIndex) -> UsageAnalysisResult {
        let resolver = ctx.resolver();
        collect_usage(self, ctx, |from, import| {
            resolver.resolve_python(from, &import.source, &imported_names(import))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::model::SourceNode;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entry_points() {
        let files = vec![
            SourceNode::file("pkg/__init__.py", ""),
            SourceNode::file("manage.py", ""),
            SourceNode::file("tools/job.py", "if __name__ == '__main__':\n    run()\n"),
            SourceNode::file("tools/flags.py", "import sys\nprint(sys.argv)\n"),
            SourceNode::file("tests/test_models.py", ""),
            SourceNode::file("pkg/models_test.py", ""),
            SourceNode::file("pkg/models.py", "class User: pass\n"),
        ];
        let config = AnalyzerConfig::default();
        let ctx = ProjectIndex::build(&files, &config);

        assert_eq!(
            PythonAnalyzer::new().detect_entry_points(&ctx),
            set(&[
                "manage.py",
                "pkg/__init__.py",
                "pkg/models_test.py",
                "tests/test_models.py",
                "tools/flags.py",
                "tools/job.py"
            ])
        );
    }

    #[test]
    fn test_usage_resolves_relative_and_absolute_imports() {
        let files = vec![
            SourceNode::file("app/main.py", "from .services import billing\nimport app.models\n"),
            SourceNode::file("app/services/__init__.py", ""),
            SourceNode::file("app/services/billing.py", "def charge(): pass\n"),
            SourceNode::file("app/models.py", "class User: pass\n"),
            SourceNode::file("app/unused.py", "def nothing(): pass\n"),
        ];
        let config = AnalyzerConfig::default();
        let ctx = ProjectIndex::build(&files, &config);
        let usage = PythonAnalyzer::new().analyze_usage(&ctx);

        assert!(usage.used_files.contains("app/services/billing.py"));
        assert!(usage.used_files.contains("app/services/__init__.py"));
        assert!(usage.used_files.contains("app/models.py"));
        assert!(!usage.used_files.contains("app/unused.py"));
        assert_eq!(usage.exports.get("app/services/billing.py"), Some(&vec!["charge".to_string()]));
    }
}
