//! Barrel (`index.*` re-export hub) groups under component directories.
//!
//! A barrel and the components it re-exports are judged as one unit: if
//! nothing outside the barrel's directory uses either, the whole group is
//! dead even though the members import each other.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use super::resolve::{file_name, is_within, parent_dir};
use crate::model::UsageAnalysisResult;

const BARREL_NAMES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx", "index.mjs"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrelGroup {
    pub barrel_file: String,
    pub exported_components: Vec<String>,
    pub directory: String,
    pub pattern_tag: String,
    pub has_external_usage: bool,
}

impl BarrelGroup {
    /// True if `path` is the barrel or one of its components.
    pub fn contains(&self, path: &str) -> bool {
        self.barrel_file == path || self.exported_components.iter().any(|c| c == path)
    }
}

#[derive(Debug, Clone)]
pub struct BarrelAnalyzer<'c> {
    patterns: &'c [String],
}

impl<'c> BarrelAnalyzer<'c> {
    pub fn new(patterns: &'c [String]) -> Self {
        Self { patterns }
    }

    /// The configured pattern `path` falls under, if it is a barrel file.
    pub fn barrel_pattern(&self, path: &str) -> Option<&'c str> {
        if !BARREL_NAMES.contains(&file_name(path)) {
            return None;
        }
        let dir = format!("{}/", parent_dir(path));
        let dir = if dir.starts_with('/') { dir } else { format!("/{}", dir) };
        self.patterns
            .iter()
            .find(|pattern| {
                let pattern = pattern.trim_start_matches('/');
                dir.contains(&format!("/{}", pattern))
            })
            .map(String::as_str)
    }

    /// Builds one group per barrel among `paths`.
    ///
    /// `used` is the effective used set; an importer only counts as external
    /// usage if it is itself used.
    pub fn analyze<'p>(
        &self,
        paths: impl IntoIterator<Item = &'p str>,
        usage: &UsageAnalysisResult,
        used: &BTreeSet<String>,
    ) -> Vec<BarrelGroup> {
        paths
            .into_iter()
            .filter_map(|path| {
                let pattern = self.barrel_pattern(path)?;
                Some(self.group_for(path, pattern, usage, used))
            })
            .collect()
    }

    fn group_for(
        &self,
        barrel: &str,
        pattern: &str,
        usage: &UsageAnalysisResult,
        used: &BTreeSet<String>,
    ) -> BarrelGroup {
        let directory = parent_dir(barrel).to_string();

        let components: BTreeSet<String> = usage
            .edges
            .iter()
            .filter(|e| e.from_file == barrel)
            .map(|e| e.resolved_target.clone())
            .filter(|target| target != barrel && is_within(target, &directory))
            .collect();

        let has_external_usage = usage.edges.iter().any(|e| {
            !is_within(&e.from_file, &directory)
                && used.contains(&e.from_file)
                && (e.resolved_target == barrel || components.contains(&e.resolved_target))
        });

        BarrelGroup {
            barrel_file: barrel.to_string(),
            exported_components: components.into_iter().collect(),
            directory,
            pattern_tag: pattern.to_string(),
            has_external_usage,
        }
    }

    /// Files of `group` that nothing outside its directory keeps alive.
    ///
    /// A file inside the directory survives when a used outside file imports
    /// it, or when a surviving file imports it.
    pub fn internal_only_members(
        &self,
        group: &BarrelGroup,
        usage: &UsageAnalysisResult,
        used: &BTreeSet<String>,
    ) -> Vec<String> {
        if group.has_external_usage {
            return Vec::new();
        }

        let dir = group.directory.as_str();
        let mut alive: BTreeSet<&str> = usage
            .edges
            .iter()
            .filter(|e| !is_within(&e.from_file, dir) && used.contains(&e.from_file))
            .map(|e| e.resolved_target.as_str())
            .filter(|t| is_within(t, dir) && *t != group.barrel_file)
            .collect();

        let mut queue: VecDeque<&str> = alive.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            for edge in usage.edges.iter().filter(|e| e.from_file == current) {
                let target = edge.resolved_target.as_str();
                if is_within(target, dir) && alive.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        std::iter::once(&group.barrel_file)
            .chain(group.exported_components.iter())
            .filter(|p| !alive.contains(p.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeKind, ImportEdge};

    fn patterns() -> Vec<String> {
        vec!["components/ui/".to_string(), "components/".to_string()]
    }

    fn usage(edges: &[(&str, &str, EdgeKind)]) -> UsageAnalysisResult {
        let mut usage = UsageAnalysisResult::new();
        for (from, to, kind) in edges {
            usage.add_edge(ImportEdge {
                from_file: from.to_string(),
                resolved_target: to.to_string(),
                imported_names: vec![],
                kind: *kind,
            });
        }
        usage
    }

    fn used(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_barrel_pattern_prefers_first_match() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);

        assert_eq!(analyzer.barrel_pattern("src/components/ui/index.ts"), Some("components/ui/"));
        assert_eq!(analyzer.barrel_pattern("src/components/forms/index.tsx"), Some("components/"));
        assert_eq!(analyzer.barrel_pattern("components/index.js"), Some("components/"));
        assert_eq!(analyzer.barrel_pattern("src/components/ui/Button.tsx"), None);
        assert_eq!(analyzer.barrel_pattern("src/lib/index.ts"), None);
        assert_eq!(analyzer.barrel_pattern("src/mycomponents/index.ts"), None);
    }

    #[test]
    fn test_external_usage_through_barrel() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);
        let usage = usage(&[
            ("src/components/ui/index.ts", "src/components/ui/Button.tsx", EdgeKind::ReExport),
            ("src/components/ui/index.ts", "src/components/ui/Card.tsx", EdgeKind::ReExport),
            ("src/pages/home.tsx", "src/components/ui/index.ts", EdgeKind::Named),
        ]);
        let used = used(&["src/pages/home.tsx"]);

        let groups = analyzer.analyze(["src/components/ui/index.ts", "src/pages/home.tsx"], &usage, &used);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].exported_components,
            vec!["src/components/ui/Button.tsx", "src/components/ui/Card.tsx"]
        );
        assert!(groups[0].has_external_usage);
        assert!(analyzer.internal_only_members(&groups[0], &usage, &used).is_empty());
    }

    #[test]
    fn test_sibling_only_importer_is_not_external() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);
        let usage = usage(&[
            ("src/components/ui/index.ts", "src/components/ui/Button.tsx", EdgeKind::ReExport),
            ("src/components/ui/Dialog.tsx", "src/components/ui/index.ts", EdgeKind::Named),
        ]);
        let used = used(&["src/components/ui/Dialog.tsx"]);

        let groups = analyzer.analyze(["src/components/ui/index.ts"], &usage, &used);
        assert!(!groups[0].has_external_usage);
        assert_eq!(
            analyzer.internal_only_members(&groups[0], &usage, &used),
            vec!["src/components/ui/index.ts", "src/components/ui/Button.tsx"]
        );
    }

    #[test]
    fn test_unused_outside_importer_does_not_count() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);
        let usage = usage(&[
            ("src/components/index.ts", "src/components/Nav.tsx", EdgeKind::ReExport),
            ("src/legacy/old.tsx", "src/components/index.ts", EdgeKind::Named),
        ]);

        let groups = analyzer.analyze(["src/components/index.ts"], &usage, &BTreeSet::new());
        assert!(!groups[0].has_external_usage);
    }

    #[test]
    fn test_live_sibling_keeps_barrel_alive() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);
        let usage = usage(&[
            ("src/components/ui/index.ts", "src/components/ui/Button.tsx", EdgeKind::ReExport),
            ("src/components/ui/Dialog.tsx", "src/components/ui/index.ts", EdgeKind::Named),
            ("src/app.tsx", "src/components/ui/Dialog.tsx", EdgeKind::Default),
        ]);
        let used = used(&["src/app.tsx", "src/components/ui/Dialog.tsx"]);

        let groups = analyzer.analyze(["src/components/ui/index.ts"], &usage, &used);
        assert!(!groups[0].has_external_usage);
        assert!(analyzer.internal_only_members(&groups[0], &usage, &used).is_empty());
    }

    #[test]
    fn test_member_kept_alive_by_non_member_sibling() {
        let p = patterns();
        let analyzer = BarrelAnalyzer::new(&p);
        let usage = usage(&[
            ("src/components/ui/index.ts", "src/components/ui/Button.tsx", EdgeKind::ReExport),
            ("src/components/ui/Toolbar.tsx", "src/components/ui/Button.tsx", EdgeKind::Default),
            ("src/app.tsx", "src/components/ui/Toolbar.tsx", EdgeKind::Default),
        ]);
        let used = used(&["src/app.tsx", "src/components/ui/Toolbar.tsx"]);

        let groups = analyzer.analyze(["src/components/ui/index.ts"], &usage, &used);
        assert!(!groups[0].has_external_usage);
        assert_eq!(
            analyzer.internal_only_members(&groups[0], &usage, &used),
            vec!["src/components/ui/index.ts"]
        );
    }
}
