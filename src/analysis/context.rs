//! Normalized, pre-scanned view of one analysis run's input.
//!
//! Built once per run and shared read-only by every analyzer. Nothing here
//! outlives the run.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::classifier::is_build_output_or_generated;
use super::resolve::{
    extension, file_name, is_component_file, is_python_file, is_script_file, is_within, join, parent_dir,
    Alias, ModuleResolver,
};
use super::syntax::{python, ModuleScanner, ModuleSyntax, SourceLanguage};
use crate::config::AnalyzerConfig;
use crate::model::SourceNode;
use crate::parser::tsconfig::{self, TsConfig};

const TSCONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

pub struct ProjectIndex<'a> {
    config: &'a AnalyzerConfig,
    nodes: BTreeMap<String, &'a SourceNode>,
    root: String,
    /// Directories holding a `package.json`, deepest first.
    package_roots: Vec<String>,
    resolver: ModuleResolver,
    syntax: HashMap<String, ModuleSyntax>,
    skipped: BTreeSet<String>,
}

impl<'a> ProjectIndex<'a> {
    /// Normalizes paths, sets up resolution and scans every source file.
    ///
    /// Nodes that are not files are ignored. When two nodes normalize to the
    /// same path the first one wins.
    pub fn build(files: &'a [SourceNode], config: &'a AnalyzerConfig) -> Self {
        let mut nodes = BTreeMap::new();
        for node in files.iter().filter(|n| n.is_file()) {
            let path = crate::model::normalize_separators(&node.path);
            if path.is_empty() {
                continue;
            }
            nodes.entry(path).or_insert(node);
        }

        let manifests: Vec<&String> = nodes
            .keys()
            .filter(|p| file_name(p) == "package.json" && !is_build_output_or_generated(p))
            .collect();
        // Relative inputs without manifests are already root-relative.
        let root = if !manifests.is_empty() {
            common_root(manifests.iter().copied())
        } else if nodes.keys().all(|p| p.starts_with('/')) {
            common_root(nodes.keys())
        } else {
            String::new()
        };

        let mut package_roots: Vec<String> = manifests.iter().map(|p| parent_dir(p).to_string()).collect();
        package_roots.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        package_roots.dedup();

        let files: HashSet<String> = nodes.keys().cloned().collect();
        let mut resolver = ModuleResolver::new(files, root.clone());
        configure_aliases(&mut resolver, config, &root, &package_roots);
        configure_tsconfig(&mut resolver, &nodes);

        let (syntax, skipped) = scan_all(&nodes, config);

        Self {
            config,
            nodes,
            root,
            package_roots,
            resolver,
            syntax,
            skipped,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.config
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// All normalized file paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// File content; `None` for files without (or with empty) content.
    pub fn content(&self, path: &str) -> Option<&'a str> {
        self.nodes.get(path).and_then(|n| n.text())
    }

    /// `(path, content)` for every file that has content.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &'a str)> + '_ {
        self.nodes
            .iter()
            .filter_map(|(path, node)| node.text().map(|text| (path.as_str(), text)))
    }

    pub fn syntax(&self, path: &str) -> Option<&ModuleSyntax> {
        self.syntax.get(path)
    }

    /// Files not scanned because they exceed the size limits.
    pub fn skipped(&self) -> &BTreeSet<String> {
        &self.skipped
    }

    /// Path relative to the project root.
    pub fn relative<'p>(&self, path: &'p str) -> &'p str {
        if self.root.is_empty() {
            return path;
        }
        path.strip_prefix(self.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }

    pub fn package_roots(&self) -> &[String] {
        &self.package_roots
    }

    /// Deepest package directory containing `path`, or the project root.
    pub fn package_root_of(&self, path: &str) -> &str {
        self.package_roots
            .iter()
            .find(|dir| is_within(path, dir))
            .map_or(self.root.as_str(), String::as_str)
    }

    /// Path relative to its nearest package directory.
    pub fn package_relative<'p>(&self, path: &'p str) -> &'p str {
        let dir = self.package_root_of(path);
        if dir.is_empty() {
            return path;
        }
        path.strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }

    /// True if any file's relative path satisfies `pred`.
    pub fn any_relative(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.paths().any(|p| pred(self.relative(p)))
    }

    pub fn has_typescript(&self) -> bool {
        self.paths()
            .any(|p| matches!(extension(p), Some("ts" | "tsx" | "mts" | "cts")))
    }
}

/// Longest directory prefix shared by every path.
fn common_root<'p>(paths: impl Iterator<Item = &'p String>) -> String {
    let mut common: Option<Vec<&str>> = None;
    for path in paths {
        let dirs: Vec<&str> = parent_dir(path).split('/').collect();
        common = Some(match common {
            None => dirs,
            Some(prev) => prev
                .iter()
                .zip(dirs.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
        });
    }
    common.map(|segments| segments.join("/")).unwrap_or_default()
}

/// Joins an alias target onto `base`, keeping the trailing slash that
/// prefix-style targets need.
fn alias_target(base: &str, target: &str) -> Option<String> {
    let joined = join(base, target)?;
    if (target.is_empty() || target.ends_with('/')) && !joined.is_empty() {
        Some(format!("{}/", joined))
    } else {
        Some(joined)
    }
}

fn configure_aliases(resolver: &mut ModuleResolver, config: &AnalyzerConfig, root: &str, package_roots: &[String]) {
    let mut bases: Vec<&str> = package_roots.iter().map(String::as_str).collect();
    if !bases.contains(&root) {
        bases.push(root);
    }

    for (prefix, targets) in &config.path_aliases {
        let targets = bases
            .iter()
            .flat_map(|base| targets.iter().filter_map(move |t| alias_target(base, t)))
            .collect();
        resolver.add_alias(Alias {
            prefix: prefix.clone(),
            targets,
            exact: false,
        });
    }
}

/// Path of a relative `extends` target inside the node set. Package bases
/// (`@tsconfig/node18`) live outside the project and are skipped.
fn extends_target(config_path: &str, spec: &str, nodes: &BTreeMap<String, &SourceNode>) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return None;
    }
    let candidate = join(parent_dir(config_path), spec)?;
    if nodes.contains_key(&candidate) {
        return Some(candidate);
    }
    let with_ext = format!("{}.json", candidate);
    nodes.contains_key(&with_ext).then_some(with_ext)
}

/// The config at `path` followed by everything it extends, nearest first.
fn tsconfig_chain(path: &str, nodes: &BTreeMap<String, &SourceNode>) -> Vec<(String, TsConfig)> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut pending = vec![path.to_string()];

    while let Some(current) = pending.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(text) = nodes.get(&current).and_then(|n| n.text()) else {
            continue;
        };
        let config = match tsconfig::parse_str(text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %current, error = %e, "ignoring unreadable tsconfig");
                continue;
            }
        };
        // Later `extends` entries override earlier ones, so they are visited first.
        for spec in config.extends() {
            match extends_target(&current, spec, nodes) {
                Some(target) => pending.push(target),
                None => debug!(path = %current, extends = spec, "tsconfig base not in project"),
            }
        }
        chain.push((current, config));
    }
    chain
}

fn configure_tsconfig(resolver: &mut ModuleResolver, nodes: &BTreeMap<String, &SourceNode>) {
    for path in nodes.keys() {
        if !TSCONFIG_FILES.contains(&file_name(path)) || is_build_output_or_generated(path) {
            continue;
        }
        let chain = tsconfig_chain(path, nodes);
        if chain.is_empty() {
            continue;
        }

        // `baseUrl` and `paths` are each taken from the nearest config that
        // sets them, relative to that config's directory.
        let base_url = chain
            .iter()
            .find_map(|(owner, config)| config.base_url().and_then(|url| join(parent_dir(owner), url)));
        if let Some(base) = &base_url {
            resolver.add_base_url(base.clone());
        }

        let Some((owner, config)) = chain.iter().find(|(_, config)| config.has_paths()) else {
            continue;
        };
        let Some(base) = base_url.or_else(|| join(parent_dir(owner), ".")) else {
            continue;
        };
        for mapping in config.path_prefixes() {
            let targets = mapping
                .targets
                .iter()
                .filter_map(|t| alias_target(&base, t))
                .collect();
            resolver.add_alias(Alias {
                prefix: mapping.prefix,
                targets,
                exact: !mapping.wildcard,
            });
        }
    }
}

fn is_scannable(path: &str) -> bool {
    is_script_file(path) || is_component_file(path) || is_python_file(path)
}

fn exceeds_limits(text: &str, config: &AnalyzerConfig) -> bool {
    text.len() > config.max_file_bytes || text.lines().count() > config.max_file_lines
}

/// Scans every source file in parallel, honoring hints and size limits.
fn scan_all(
    nodes: &BTreeMap<String, &SourceNode>,
    config: &AnalyzerConfig,
) -> (HashMap<String, ModuleSyntax>, BTreeSet<String>) {
    let mut syntax = HashMap::new();
    let mut skipped = BTreeSet::new();
    let mut pending: Vec<(&str, &str)> = Vec::new();

    for (path, node) in nodes {
        if node.imports_hint.is_some() || node.exports_hint.is_some() {
            syntax.insert(
                path.clone(),
                ModuleSyntax::from_hints(node.imports_hint.as_deref(), node.exports_hint.as_deref()),
            );
            continue;
        }
        if !is_scannable(path) {
            continue;
        }
        let Some(text) = node.text() else {
            continue;
        };
        if exceeds_limits(text, config) {
            debug!(path = %path, bytes = text.len(), "skipping oversized file");
            skipped.insert(path.clone());
            continue;
        }
        pending.push((path.as_str(), text));
    }

    let scanned: Vec<(String, ModuleSyntax)> = pending
        .par_iter()
        .map_init(
            || match ModuleScanner::new() {
                Ok(scanner) => Some(scanner),
                Err(e) => {
                    warn!(error = %e, "tree-sitter unavailable; JavaScript files will not be scanned");
                    None
                }
            },
            |scanner, (path, text)| scan_file(scanner.as_mut(), path, text).map(|s| (path.to_string(), s)),
        )
        .flatten()
        .collect();

    syntax.extend(scanned);
    (syntax, skipped)
}

fn scan_file(scanner: Option<&mut ModuleScanner>, path: &str, text: &str) -> Option<ModuleSyntax> {
    if is_python_file(path) {
        return Some(python::scan_python(text));
    }

    let scanner = scanner?;
    let result = if is_component_file(path) {
        scanner.scan_component(text, path)
    } else {
        let language = extension(path).and_then(SourceLanguage::from_extension)?;
        scanner.scan_source(text, language, path)
    };

    match result {
        Ok(syntax) => Some(syntax),
        Err(e) => {
            warn!(path = %path, error = %e, "failed to scan file");
            None
        }
    }
}
