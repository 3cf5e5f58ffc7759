//! Plain React (Vite, CRA and similar setups).

use std::collections::BTreeSet;

use super::{jsx, EntryPoint, FrameworkKind};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{extension, file_stem, is_script_file};

const SRC_ENTRY_STEMS: &[&str] = &["main", "index", "App"];

#[derive(Debug, Default, Clone, Copy)]
pub struct ReactAnalyzer;

impl ReactAnalyzer {
    pub fn is_detected(&self, ctx: &ProjectIndex) -> bool {
        ctx.paths().any(|p| matches!(extension(p), Some("jsx" | "tsx")))
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        ctx.paths()
            .filter(|p| is_script_file(p))
            .filter(|p| {
                let segments: Vec<&str> = ctx.package_relative(p).split('/').collect();
                match segments.as_slice() {
                    [name] => file_stem(name) == "index",
                    ["src", name] => SRC_ENTRY_STEMS.contains(&file_stem(name)),
                    _ => false,
                }
            })
            .map(|p| EntryPoint::new(p, FrameworkKind::React, "application root"))
            .collect()
    }

    /// JSX tags, `createElement` calls, `component={X}` props and lazy imports.
    pub fn usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        for path in ctx.paths().filter(|p| is_script_file(p)) {
            if let Some(content) = ctx.content(path) {
                used.extend(jsx::resolve_bindings(ctx, path, &jsx::component_names(content)));
            }
            used.extend(jsx::dynamic_import_targets(ctx, path));
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::model::SourceNode;

    #[test]
    fn test_entry_points() {
        let files = vec![
            SourceNode::file("src/main.tsx", ""),
            SourceNode::file("src/App.tsx", ""),
            SourceNode::file("src/components/App.tsx", ""),
            SourceNode::file("index.js", ""),
        ];
        let config = AnalyzerConfig::default();
        let ctx = ProjectIndex::build(&files, &config);

        let paths: Vec<String> = ReactAnalyzer.entry_points(&ctx).into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["index.js", "src/App.tsx", "src/main.tsx"]);
    }

    #[test]
    fn test_router_component_prop_marks_usage() {
        let files = vec![
            SourceNode::file(
                "src/routes.jsx",
                "import Dashboard from './Dashboard';\nexport const r = <Route path=\"/\" component={Dashboard} />;",
            ),
            SourceNode::file("src/Dashboard.jsx", ""),
        ];
        let config = AnalyzerConfig::default();
        let ctx = ProjectIndex::build(&files, &config);

        assert!(ReactAnalyzer.is_detected(&ctx));
        assert!(ReactAnalyzer.usage(&ctx).contains("src/Dashboard.jsx"));
    }
}
