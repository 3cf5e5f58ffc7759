//! Per-language entry-point detection and import-graph construction.

pub mod javascript;
pub mod python;

use std::collections::BTreeSet;

use super::context::ProjectIndex;
use super::syntax::Import;
use crate::model::{ImportEdge, UsageAnalysisResult};

pub use javascript::JavaScriptAnalyzer;
pub use python::PythonAnalyzer;

/// One source language's view of the project.
pub trait LanguageAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_language_file(&self, path: &str) -> bool;

    /// Files that are roots of execution for this language.
    fn detect_entry_points(&self, ctx: &ProjectIndex) -> BTreeSet<String>;

    /// Entry points, resolved edges and exports for every file of this language.
    fn analyze_usage(&self, ctx: &ProjectIndex) -> UsageAnalysisResult;
}

/// Every built-in language analyzer.
pub fn all() -> Vec<Box<dyn LanguageAnalyzer>> {
    vec![Box::new(JavaScriptAnalyzer::new()), Box::new(PythonAnalyzer::new())]
}

/// True if any built-in analyzer claims `path`.
pub fn is_source_file(analyzers: &[Box<dyn LanguageAnalyzer>], path: &str) -> bool {
    analyzers.iter().any(|a| a.is_language_file(path))
}

pub(crate) fn edge_for(import: &Import, from: &str, target: String) -> ImportEdge {
    ImportEdge {
        from_file: from.to_string(),
        resolved_target: target,
        imported_names: import.imported_names(),
        kind: import.edge_kind(),
    }
}

/// Shared driver: seeds entry points, then resolves every import of every
/// language file through `resolve` and records exports.
pub(crate) fn collect_usage<A, F>(analyzer: &A, ctx: &ProjectIndex, resolve: F) -> UsageAnalysisResult
where
    A: LanguageAnalyzer + ?Sized,
    F: Fn(&str, &Import) -> Vec<String>,
{
    let mut result = UsageAnalysisResult::new();
    for entry in analyzer.detect_entry_points(ctx) {
        result.add_entry_point(entry);
    }

    for path in ctx.paths().filter(|p| analyzer.is_language_file(p)) {
        let Some(syntax) = ctx.syntax(path) else {
            continue;
        };
        for import in &syntax.imports {
            for target in resolve(path, import) {
                if target != path {
                    result.add_edge(edge_for(import, path, target));
                }
            }
        }
        result.set_exports(path, syntax.export_names());
    }

    result
}
