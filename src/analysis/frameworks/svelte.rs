//! Svelte and SvelteKit.

use std::collections::BTreeSet;

use super::{jsx, EntryPoint, FrameworkKind};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{extension, file_name, file_stem, is_script_file};

/// SvelteKit route files: `+page.svelte`, `+layout.server.ts`, ...
const ROUTE_PREFIXES: &[&str] = &["+page", "+layout", "+server", "+error"];

fn is_svelte_file(path: &str) -> bool {
    extension(path) == Some("svelte")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvelteAnalyzer;

impl SvelteAnalyzer {
    pub fn is_detected(&self, ctx: &ProjectIndex) -> bool {
        ctx.any_relative(|rel| is_svelte_file(rel) || file_name(rel).starts_with("svelte.config."))
    }

    fn classify(&self, rel: &str) -> Option<&'static str> {
        let name = file_name(rel);
        let segments: Vec<&str> = rel.split('/').collect();

        if ROUTE_PREFIXES.iter().any(|p| name.starts_with(p)) {
            return Some("SvelteKit route file");
        }
        if is_svelte_file(rel) && segments[..segments.len() - 1].contains(&"routes") {
            return Some("route component");
        }
        match segments.as_slice() {
            ["src", "app.html"] => Some("app template"),
            ["src", file] if file_stem(file) == "main" && is_script_file(file) => Some("application root"),
            ["src", file] if file_stem(file) == "service-worker" => Some("service worker"),
            ["src", file] if name.starts_with("hooks.") && is_script_file(file) => Some("server/client hooks"),
            _ => None,
        }
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        ctx.paths()
            .filter_map(|p| {
                self.classify(ctx.package_relative(p))
                    .map(|reason| EntryPoint::new(p, FrameworkKind::Svelte, reason))
            })
            .collect()
    }

    pub fn usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        for path in ctx.paths().filter(|p| is_script_file(p) || is_svelte_file(p)) {
            if is_svelte_file(path) {
                if let Some(content) = ctx.content(path) {
                    used.extend(jsx::resolve_bindings(ctx, path, &jsx::component_names(content)));
                }
            }
            used.extend(jsx::dynamic_import_targets(ctx, path));
        }
        used
    }
}
