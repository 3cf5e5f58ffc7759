//! Vue single-file components, plus Nuxt's directory conventions and
//! auto-imported components.

use std::collections::{BTreeMap, BTreeSet};

use super::{jsx, EntryPoint, FrameworkKind};
use crate::analysis::context::ProjectIndex;
use crate::analysis::resolve::{extension, file_name, file_stem, is_component_file, is_script_file};

fn is_vue_file(path: &str) -> bool {
    extension(path) == Some("vue")
}

/// Template tags resolved through script imports, plus dynamic imports.
fn vue_usage(ctx: &ProjectIndex) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    for path in ctx.paths().filter(|p| is_script_file(p) || is_vue_file(p)) {
        if is_vue_file(path) {
            if let Some(content) = ctx.content(path) {
                used.extend(jsx::resolve_bindings(ctx, path, &jsx::template_component_names(content)));
            }
        }
        used.extend(jsx::dynamic_import_targets(ctx, path));
    }
    used
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VueAnalyzer;

impl VueAnalyzer {
    pub fn is_detected(&self, ctx: &ProjectIndex) -> bool {
        ctx.paths().any(is_vue_file)
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        ctx.paths()
            .filter(|p| is_script_file(p) || is_vue_file(p))
            .filter_map(|p| {
                let segments: Vec<&str> = ctx.package_relative(p).split('/').collect();
                let reason = match segments.as_slice() {
                    ["src", name] if file_stem(name) == "main" && is_script_file(name) => "application root",
                    ["src", "App.vue"] => "root component",
                    ["src", "router", ..] => "router definition",
                    [.., _] if is_vue_file(p) && segments.contains(&"pages") => "file-based route",
                    _ => return None,
                };
                Some(EntryPoint::new(p, FrameworkKind::Vue, reason))
            })
            .collect()
    }

    pub fn usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        vue_usage(ctx)
    }
}

/// Directories whose files Nuxt loads by convention.
const NUXT_DIRS: &[&str] = &[
    "pages",
    "layouts",
    "components",
    "composables",
    "middleware",
    "plugins",
    "utils",
    "stores",
    "server",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct NuxtAnalyzer;

impl NuxtAnalyzer {
    pub fn is_detected(&self, ctx: &ProjectIndex) -> bool {
        ctx.any_relative(|rel| file_name(rel).starts_with("nuxt.config."))
    }

    /// Strips the optional Nuxt 4 `app/` source directory.
    fn source_relative<'p>(&self, rel: &'p str) -> &'p str {
        rel.strip_prefix("app/").unwrap_or(rel)
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        ctx.paths()
            .filter(|p| is_script_file(p) || is_vue_file(p))
            .filter_map(|p| {
                let rel = self.source_relative(ctx.package_relative(p));
                let segments: Vec<&str> = rel.split('/').collect();
                let reason = match segments.as_slice() {
                    ["app.vue"] | ["error.vue"] => "root component",
                    [name] if name.starts_with("app.config.") => "app config",
                    [dir, _, ..] if NUXT_DIRS.contains(dir) => "auto-loaded directory",
                    _ => return None,
                };
                Some(EntryPoint::new(p, FrameworkKind::Nuxt, reason))
            })
            .collect()
    }

    /// Component name -> file, following Nuxt's path-prefixed naming:
    /// `components/base/Button.vue` is `<BaseButton>`, and a file already
    /// carrying the prefix (`components/base/BaseInput.vue`) is not doubled.
    fn auto_import_names(&self, ctx: &ProjectIndex) -> BTreeMap<String, String> {
        let mut names = BTreeMap::new();
        for path in ctx.paths().filter(|p| is_component_file(p) || is_script_file(p)) {
            let rel = self.source_relative(ctx.package_relative(path));
            let Some(rest) = rel.strip_prefix("components/") else {
                continue;
            };
            let mut segments: Vec<&str> = rest.split('/').collect();
            let Some(file) = segments.pop() else {
                continue;
            };

            let prefix: String = segments.iter().map(|s| jsx::pascal_case(s)).collect();
            let stem = jsx::pascal_case(file_stem(file));
            let full = if stem == "Index" {
                prefix.clone()
            } else if stem.starts_with(&prefix) {
                stem.clone()
            } else {
                format!("{}{}", prefix, stem)
            };

            if !full.is_empty() {
                names.entry(full).or_insert_with(|| path.to_string());
            }
            names.entry(stem).or_insert_with(|| path.to_string());
        }
        names
    }

    pub fn usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        let mut used = vue_usage(ctx);
        let auto = self.auto_import_names(ctx);
        if auto.is_empty() {
            return used;
        }

        for path in ctx.paths().filter(|p| is_vue_file(p)) {
            let Some(content) = ctx.content(path) else {
                continue;
            };
            for name in jsx::template_component_names(content) {
                let name = name.strip_prefix("Lazy").unwrap_or(&name);
                if let Some(target) = auto.get(name) {
                    if target != path {
                        used.insert(target.clone());
                    }
                }
            }
        }
        used
    }
}
