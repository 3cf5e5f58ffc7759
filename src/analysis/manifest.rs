//! package.json reading: framework hints, manifest entry points and the
//! declared dependency list.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::classifier::{is_build_output_or_generated, is_lockfile};
use super::context::ProjectIndex;
use super::resolve::{file_name, parent_dir};
use crate::parser::{extract_dependencies, package_json, script_commands, script_file_tokens, Dependency};

/// Dependency name -> framework hint key.
const FRAMEWORK_PACKAGES: &[(&str, &str)] = &[
    ("react", "react"),
    ("react-dom", "react"),
    ("preact", "react"),
    ("next", "next"),
    ("vue", "vue"),
    ("nuxt", "nuxt"),
    ("nuxt3", "nuxt"),
    ("svelte", "svelte"),
    ("@sveltejs/kit", "svelte"),
];

pub fn framework_for_dependency(name: &str) -> Option<&'static str> {
    FRAMEWORK_PACKAGES
        .iter()
        .find(|(pkg, _)| *pkg == name)
        .map(|(_, framework)| *framework)
}

pub fn is_manifest(path: &str) -> bool {
    file_name(path) == "package.json" && !is_build_output_or_generated(path)
}

/// A dependency together with the manifest that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub dependency: Dependency,
    pub manifest: String,
}

#[derive(Debug, Clone, Default)]
pub struct ManifestReport {
    pub framework_hints: BTreeMap<String, bool>,
    pub entry_points: BTreeSet<String>,
    pub dependencies: Vec<DeclaredDependency>,
    pub script_commands: Vec<String>,
    pub manifests: Vec<String>,
}

impl ManifestReport {
    pub fn has_framework(&self, name: &str) -> bool {
        self.framework_hints.get(name).copied().unwrap_or(false)
    }

    /// Declared dependencies nothing in the project references.
    ///
    /// A name counts as referenced when it appears quoted (`'x'`, `"x"`,
    /// `` `x` ``, or `'x/` for a subpath) in a file that is neither a
    /// manifest nor a lockfile, or as a whitespace token of a script
    /// command. `@types/x` is referenced through `x`, or by any TypeScript
    /// file at all. Peer dependencies are never reported.
    pub fn unused_dependencies(&self, ctx: &ProjectIndex) -> Vec<&DeclaredDependency> {
        let texts: Vec<&str> = ctx
            .texts()
            .filter(|(path, _)| !is_manifest(path) && !is_lockfile(path))
            .map(|(_, text)| text)
            .collect();
        let script_tokens: BTreeSet<&str> = self
            .script_commands
            .iter()
            .flat_map(|command| command.split_whitespace())
            .collect();
        let has_typescript = ctx.has_typescript();

        let referenced = |name: &str| -> bool {
            let bare = name.rsplit('/').next().unwrap_or(name);
            if script_tokens.contains(name) || script_tokens.contains(bare) {
                return true;
            }
            let patterns: Vec<String> = ['\'', '"', '`']
                .iter()
                .flat_map(|q| [format!("{q}{name}{q}"), format!("{q}{name}/")])
                .collect();
            texts.iter().any(|text| patterns.iter().any(|p| text.contains(p.as_str())))
        };

        self.dependencies
            .par_iter()
            .filter(|declared| declared.dependency.dep_type.is_reportable())
            .filter(|declared| {
                let dependency = &declared.dependency;
                let used = match dependency.typed_package() {
                    Some(package) => has_typescript || referenced(&package) || referenced(&dependency.name),
                    None => referenced(&dependency.name),
                };
                !used
            })
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestAnalyzer;

impl ManifestAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Reads every package.json in the index. Unparseable manifests are
    /// logged and contribute nothing.
    pub fn analyze(&self, ctx: &ProjectIndex) -> ManifestReport {
        let mut report = ManifestReport::default();

        for path in ctx.paths().filter(|p| is_manifest(p)) {
            report.manifests.push(path.to_string());
            let Some(text) = ctx.content(path) else {
                continue;
            };
            let pkg = match package_json::parse_str(text) {
                Ok(pkg) => pkg,
                Err(e) => {
                    warn!(path = %path, error = %e, "ignoring unparseable manifest");
                    continue;
                }
            };

            let dir = parent_dir(path);
            let resolver = ctx.resolver();
            for entry in pkg.entry_fields() {
                match resolver.resolve_entry(dir, &entry) {
                    Some(resolved) => {
                        report.entry_points.insert(resolved);
                    }
                    None => debug!(manifest = %path, entry = %entry, "manifest entry does not resolve"),
                }
            }

            let commands = script_commands(&pkg);
            for command in &commands {
                for token in script_file_tokens(command) {
                    if let Some(resolved) = resolver.resolve_entry(dir, &token) {
                        report.entry_points.insert(resolved);
                    }
                }
            }
            report.script_commands.extend(commands);

            for dependency in extract_dependencies(&pkg) {
                if let Some(framework) = framework_for_dependency(&dependency.name) {
                    report.framework_hints.insert(framework.to_string(), true);
                }
                report.dependencies.push(DeclaredDependency {
                    dependency,
                    manifest: path.to_string(),
                });
            }
        }

        report
    }
}
