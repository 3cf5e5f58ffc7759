//! Runs every analyzer over one project and turns the merged usage into
//! orphaned files, unused exports and unused dependencies.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span};

use super::barrel::{BarrelAnalyzer, BarrelGroup};
use super::classifier::is_excluded_from_orphans;
use super::context::ProjectIndex;
use super::frameworks::{EntryPoint, FrameworkKind, FrameworkManager};
use super::languages::{self, LanguageAnalyzer};
use super::manifest::ManifestAnalyzer;
use crate::config::{AnalyzerConfig, ReachabilityMode};
use crate::graph::FileGraph;
use crate::model::{
    DeadCodeMetrics, Finding, FindingCategory, Location, ResultAccumulator, SourceNode, UsageAnalysisResult,
};
use crate::parser::DependencyType;

/// A source file nothing reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedFile {
    pub path: String,
    /// Set when the file belongs to a barrel group with no outside usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barrel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedExport {
    pub file: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedDependency {
    pub name: String,
    pub version: String,
    pub dep_type: DependencyType,
    pub manifest: String,
}

/// Everything one run computes, before it is turned into findings.
#[derive(Debug, Clone, Default)]
pub struct DeadCodeOutcome {
    /// Merged output of the language analyzers plus manifest and framework
    /// entry points.
    pub usage: UsageAnalysisResult,
    /// The effective used set after applying the reachability mode.
    pub used_files: BTreeSet<String>,
    pub frameworks: Vec<FrameworkKind>,
    pub framework_entry_points: Vec<EntryPoint>,
    pub orphaned_files: Vec<OrphanedFile>,
    pub unused_exports: Vec<UnusedExport>,
    pub unused_dependencies: Vec<UnusedDependency>,
    pub barrel_groups: Vec<BarrelGroup>,
    /// Files left unscanned because they exceed the size limits.
    pub skipped_files: Vec<String>,
    pub metrics: DeadCodeMetrics,
}

impl DeadCodeOutcome {
    pub fn is_orphaned(&self, path: &str) -> bool {
        self.orphaned_files.iter().any(|o| o.path == path)
    }

    /// Findings in report order: orphans, then exports, then dependencies.
    pub fn findings(&self) -> Vec<Finding> {
        let orphans = self.orphaned_files.iter().map(|orphan| {
            let finding = Finding::new(
                FindingCategory::OrphanedFile,
                Location::file(&orphan.path),
                "File is not imported or reachable from any entry point",
            );
            match &orphan.barrel {
                Some(barrel) => finding.with_context(format!("barrel group {} has no usage outside its directory", barrel)),
                None => finding,
            }
        });

        let exports = self.unused_exports.iter().map(|export| {
            let location = Location {
                line: export.line,
                ..Location::symbol(&export.file, &export.symbol)
            };
            Finding::new(
                FindingCategory::UnusedExport,
                location,
                format!("Export '{}' is never imported", export.symbol),
            )
        });

        let dependencies = self.unused_dependencies.iter().map(|dep| {
            Finding::new(
                FindingCategory::UnusedDependency,
                Location::symbol(&dep.manifest, &dep.name),
                format!("Dependency '{}' is declared but never used", dep.name),
            )
            .with_context(format!("{} {}", dep.dep_type, dep.version))
        });

        orphans.chain(exports).chain(dependencies).collect()
    }
}

/// The dead-code engine.
///
/// Holds no state between runs; every call to [`run`](Self::run) or
/// [`analyze`](Self::analyze) starts from scratch.
///
/// # Example
///
/// ```rust
/// use reachscope::analysis::DeadCodeAnalyzer;
/// use reachscope::model::{AnalysisReport, SourceNode};
///
/// let files = vec![
///     SourceNode::file("package.json", r#"{"main": "src/index.js"}"#),
///     SourceNode::file("src/index.js", "import { greet } from './greet';\ngreet();"),
///     SourceNode::file("src/greet.js", "export function greet() {}"),
///     SourceNode::file("src/unused.js", "export const nothing = 1;"),
/// ];
///
/// let mut report = AnalysisReport::new();
/// let metrics = DeadCodeAnalyzer::default().analyze(&files, &mut report);
/// assert_eq!(metrics.orphaned_files, 1);
/// assert_eq!(report.findings[0].location.file, "src/unused.js");
/// ```
pub struct DeadCodeAnalyzer {
    config: AnalyzerConfig,
    languages: Vec<Box<dyn LanguageAnalyzer>>,
}

impl Default for DeadCodeAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl DeadCodeAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            languages: languages::all(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs the analysis and pushes one finding per result into `acc`,
    /// followed by the three metrics.
    pub fn analyze<A: ResultAccumulator + ?Sized>(&self, files: &[SourceNode], acc: &mut A) -> DeadCodeMetrics {
        let outcome = self.run(files);
        for finding in outcome.findings() {
            acc.add_finding(finding);
        }
        outcome.metrics.write_to(acc);
        outcome.metrics
    }

    /// Runs the analysis without touching any accumulator.
    pub fn run(&self, files: &[SourceNode]) -> DeadCodeOutcome {
        let span = info_span!("dead_code", files = files.len());
        let _guard = span.enter();
        let started = Instant::now();

        let ctx = ProjectIndex::build(files, &self.config);
        debug!(
            files = ctx.len(),
            skipped = ctx.skipped().len(),
            root = %ctx.root(),
            elapsed = ?started.elapsed(),
            "indexed project"
        );

        let phase = Instant::now();
        let manifest = ManifestAnalyzer::new().analyze(&ctx);
        let frameworks = FrameworkManager::select(&manifest.framework_hints, &ctx);

        let mut usage = UsageAnalysisResult::new();
        for language in &self.languages {
            usage.merge(language.analyze_usage(&ctx));
        }
        for entry in &manifest.entry_points {
            usage.add_entry_point(entry.as_str());
        }
        let framework_entry_points = frameworks.entry_points(&ctx);
        for entry in &framework_entry_points {
            usage.add_entry_point(entry.path.as_str());
        }
        let framework_used = frameworks.usage(&ctx);
        for path in &framework_used {
            usage.mark_used(path.as_str());
        }
        debug!(
            entry_points = usage.entry_points.len(),
            edges = usage.edges.len(),
            elapsed = ?phase.elapsed(),
            "collected usage"
        );

        let phase = Instant::now();
        let graph = FileGraph::from_usage(ctx.paths(), &usage);
        let used_files = self.effective_used(&usage, &graph, &framework_used);
        debug!(
            mode = ?self.config.reachability,
            used = used_files.len(),
            elapsed = ?phase.elapsed(),
            "computed reachability"
        );

        let suppressed = |path: &str| is_excluded_from_orphans(ctx.relative(path)) || self.config.is_excluded(path);

        let mut orphans: BTreeMap<String, Option<String>> = ctx
            .paths()
            .filter(|p| languages::is_source_file(&self.languages, p))
            .filter(|p| !used_files.contains(*p) && !usage.entry_points.contains(*p))
            .filter(|p| !suppressed(*p))
            .map(|p| (p.to_string(), None))
            .collect();

        let barrels = BarrelAnalyzer::new(&self.config.barrel_directories);
        let barrel_groups = barrels.analyze(ctx.paths(), &usage, &used_files);
        if self.config.report_barrel_groups {
            for group in barrel_groups.iter().filter(|g| !g.has_external_usage) {
                for member in barrels.internal_only_members(group, &usage, &used_files) {
                    if usage.entry_points.contains(&member) || suppressed(member.as_str()) {
                        continue;
                    }
                    orphans.insert(member, Some(group.barrel_file.clone()));
                }
            }
        }

        let phase = Instant::now();
        let unused_exports = self.unused_exports(&ctx, &usage, &graph, |path| {
            orphans.contains_key(path) || suppressed(path)
        });
        debug!(unused = unused_exports.len(), elapsed = ?phase.elapsed(), "checked exports");

        let phase = Instant::now();
        let unused_dependencies: Vec<UnusedDependency> = manifest
            .unused_dependencies(&ctx)
            .into_iter()
            .map(|declared| UnusedDependency {
                name: declared.dependency.name.clone(),
                version: declared.dependency.version.clone(),
                dep_type: declared.dependency.dep_type,
                manifest: declared.manifest.clone(),
            })
            .collect();
        debug!(unused = unused_dependencies.len(), elapsed = ?phase.elapsed(), "checked dependencies");

        let orphaned_files: Vec<OrphanedFile> = orphans
            .into_iter()
            .map(|(path, barrel)| OrphanedFile { path, barrel })
            .collect();

        let metrics = DeadCodeMetrics {
            orphaned_files: orphaned_files.len(),
            unused_exports: unused_exports.len(),
            unused_dependencies: unused_dependencies.len(),
        };
        info!(
            orphaned_files = metrics.orphaned_files,
            unused_exports = metrics.unused_exports,
            unused_dependencies = metrics.unused_dependencies,
            elapsed = ?started.elapsed(),
            "dead code analysis complete"
        );

        DeadCodeOutcome {
            frameworks: frameworks.kinds(),
            skipped_files: ctx.skipped().iter().cloned().collect(),
            usage,
            used_files,
            framework_entry_points,
            orphaned_files,
            unused_exports,
            unused_dependencies,
            barrel_groups,
            metrics,
        }
    }

    fn effective_used(
        &self,
        usage: &UsageAnalysisResult,
        graph: &FileGraph,
        framework_used: &BTreeSet<String>,
    ) -> BTreeSet<String> {
        let mut used = match self.config.reachability {
            ReachabilityMode::Referenced => usage.used_files.clone(),
            ReachabilityMode::Transitive => {
                let roots = usage.entry_points.iter().chain(framework_used).map(String::as_str);
                graph.reachable_from(roots)
            }
        };
        used.extend(usage.entry_points.iter().cloned());
        used
    }

    /// Exported symbols with no sign of use.
    ///
    /// Entry points and files matching `skip` are not checked. `default` is
    /// used once the file has any importer. A named symbol is used when an
    /// import edge names it, when it appears more than once in its own
    /// file, or when the text of an importer contains it, following
    /// re-export chains.
    fn unused_exports(
        &self,
        ctx: &ProjectIndex,
        usage: &UsageAnalysisResult,
        graph: &FileGraph,
        skip: impl Fn(&str) -> bool,
    ) -> Vec<UnusedExport> {
        let named: HashSet<(&str, &str)> = usage
            .edges
            .iter()
            .flat_map(|e| e.imported_names.iter().map(move |n| (e.resolved_target.as_str(), n.as_str())))
            .collect();

        let mut unused = Vec::new();
        for (path, symbols) in &usage.exports {
            if usage.entry_points.contains(path) || skip(path.as_str()) {
                continue;
            }

            let own = ctx.content(path).unwrap_or_default();
            let has_importer = !graph.importers(path).is_empty();
            let importer_texts: Vec<&str> = graph
                .importers_through_reexports(path)
                .iter()
                .filter_map(|importer| ctx.content(importer))
                .collect();

            for symbol in symbols {
                let used = if symbol == "default" {
                    has_importer
                } else {
                    named.contains(&(path.as_str(), symbol.as_str()))
                        || own.matches(symbol.as_str()).count() > 1
                        || importer_texts.iter().any(|text| text.contains(symbol.as_str()))
                };
                if !used {
                    unused.push(UnusedExport {
                        file: path.clone(),
                        symbol: symbol.clone(),
                        line: ctx.syntax(path).and_then(|s| s.export_line(symbol)),
                    });
                }
            }
        }
        unused
    }
}
