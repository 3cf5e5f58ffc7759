//! Next.js: app router, pages router, API routes and root hooks.

use std::collections::BTreeSet;

use super::{jsx, EntryPoint, FrameworkKind};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{file_name, file_stem, is_script_file};

/// Special files of an `app/` route segment.
const APP_ROUTER_FILES: &[&str] = &[
    "page",
    "layout",
    "loading",
    "error",
    "not-found",
    "template",
    "default",
    "route",
    "global-error",
    "sitemap",
    "robots",
    "manifest",
    "icon",
    "apple-icon",
    "opengraph-image",
    "twitter-image",
];

const ROOT_FILES: &[&str] = &["middleware", "instrumentation"];

#[derive(Debug, Default, Clone, Copy)]
pub struct NextJsAnalyzer;

impl NextJsAnalyzer {
    pub fn is_detected(&self, ctx: &ProjectIndex) -> bool {
        ctx.any_relative(|rel| file_name(rel).starts_with("next.config."))
    }

    fn classify(&self, rel: &str) -> Option<&'static str> {
        let mut dirs: Vec<&str> = rel.split('/').collect();
        dirs.pop();
        let stem = file_stem(rel);

        if dirs.contains(&"app") && APP_ROUTER_FILES.contains(&stem) {
            return Some("app router file");
        }
        if dirs.contains(&"pages") {
            return Some("pages router file");
        }
        if dirs.contains(&"api") {
            return Some("API route");
        }
        if matches!(dirs.as_slice(), [] | ["src"]) && ROOT_FILES.contains(&stem) {
            return Some("root hook");
        }
        None
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        ctx.paths()
            .filter(|p| is_script_file(p))
            .filter_map(|p| {
                self.classify(ctx.package_relative(p))
                    .map(|reason| EntryPoint::new(p, FrameworkKind::NextJs, reason))
            })
            .collect()
    }

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
