//! Usage graph pieces shared by every analyzer.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How one file reaches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// `import { a } from './x'`, `from x import a`
    Named,
    /// `import a from './x'`
    Default,
    /// `import * as a from './x'`, `import x`
    Namespace,
    /// `import('./x')`
    Dynamic,
    /// `require('./x')`
    Require,
    /// `import './x'`
    SideEffect,
    /// `export ... from './x'`
    ReExport,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::Named => "named",
            EdgeKind::Default => "default",
            EdgeKind::Namespace => "namespace",
            EdgeKind::Dynamic => "dynamic",
            EdgeKind::Require => "require",
            EdgeKind::SideEffect => "side_effect",
            EdgeKind::ReExport => "re_export",
        };
        write!(f, "{}", s)
    }
}

/// A resolved import from one project file to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    pub from_file: String,
    pub resolved_target: String,
    pub imported_names: Vec<String>,
    pub kind: EdgeKind,
}

/// What one analyzer (or the merged run) knows about file usage.
///
/// `entry_points` is always a subset of `used_files`; the mutators keep
/// that true. `import_map` values are only ever resolved project paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageAnalysisResult {
    pub used_files: BTreeSet<String>,
    pub entry_points: BTreeSet<String>,
    pub import_map: BTreeMap<String, Vec<String>>,
    pub exports: BTreeMap<String, Vec<String>>,
    pub edges: Vec<ImportEdge>,
}

impl UsageAnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry_point(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.used_files.insert(path.clone());
        self.entry_points.insert(path);
    }

    pub fn mark_used(&mut self, path: impl Into<String>) {
        self.used_files.insert(path.into());
    }

    /// Records a resolved edge. The target becomes used.
    pub fn add_edge(&mut self, edge: ImportEdge) {
        let targets = self.import_map.entry(edge.from_file.clone()).or_default();
        if !targets.contains(&edge.resolved_target) {
            targets.push(edge.resolved_target.clone());
        }
        self.used_files.insert(edge.resolved_target.clone());
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn set_exports(&mut self, path: impl Into<String>, symbols: Vec<String>) {
        if !symbols.is_empty() {
            self.exports.insert(path.into(), symbols);
        }
    }

    /// Unions `other` into `self`. Exports are last-writer-wins per file.
    pub fn merge(&mut self, other: UsageAnalysisResult) {
        self.used_files.extend(other.used_files);
        for entry in other.entry_points {
            self.add_entry_point(entry);
        }
        for (from, targets) in other.import_map {
            let existing = self.import_map.entry(from).or_default();
            for target in targets {
                if !existing.contains(&target) {
                    existing.push(target);
                }
            }
        }
        self.exports.extend(other.exports);
        for edge in other.edges {
            if !self.edges.contains(&edge) {
                self.edges.push(edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str) -> ImportEdge {
        ImportEdge {
            from_file: from.to_string(),
            resolved_target: to.to_string(),
            imported_names: vec![],
            kind: EdgeKind::Named,
        }
    }

    #[test]
    fn test_entry_point_is_used() {
        let mut result = UsageAnalysisResult::new();
        result.add_entry_point("main.ts");
        assert!(result.used_files.contains("main.ts"));
        assert!(result.entry_points.contains("main.ts"));
    }

    #[test]
    fn test_add_edge_dedupes_targets() {
        let mut result = UsageAnalysisResult::new();
        result.add_edge(edge("a.ts", "b.ts"));
        result.add_edge(edge("a.ts", "b.ts"));
        assert_eq!(result.import_map["a.ts"], vec!["b.ts".to_string()]);
        assert_eq!(result.edges.len(), 1);
        assert!(result.used_files.contains("b.ts"));
    }

    #[test]
    fn test_merge_keeps_entry_subset_invariant() {
        let mut left = UsageAnalysisResult::new();
        left.add_edge(edge("a.ts", "b.ts"));

        let mut right = UsageAnalysisResult::new();
        right.entry_points.insert("cli.ts".to_string());
        right.set_exports("b.ts", vec!["foo".to_string()]);

        left.merge(right);
        assert!(left.entry_points.is_subset(&left.used_files));
        assert_eq!(left.exports["b.ts"], vec!["foo".to_string()]);
    }

    #[test]
    fn test_merge_exports_last_writer_wins() {
        let mut left = UsageAnalysisResult::new();
        left.set_exports("a.ts", vec!["old".to_string()]);
        let mut right = UsageAnalysisResult::new();
        right.set_exports("a.ts", vec!["new".to_string()]);
        left.merge(right);
        assert_eq!(left.exports["a.ts"], vec!["new".to_string()]);
    }

    #[test]
    fn test_edge_kind_display() {
        assert_eq!(EdgeKind::ReExport.to_string(), "re_export");
        assert_eq!(EdgeKind::Dynamic.to_string(), "dynamic");
    }
}
