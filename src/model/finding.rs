//! Output values: findings, metrics and the accumulator they are pushed into.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Category of a dead-code finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    OrphanedFile,
    UnusedExport,
    UnusedDependency,
}

impl FindingCategory {
    /// Returns a short human label.
    pub fn label(&self) -> &'static str {
        match self {
            FindingCategory::OrphanedFile => "Orphaned files",
            FindingCategory::UnusedExport => "Unused exports",
            FindingCategory::UnusedDependency => "Unused dependencies",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            FindingCategory::OrphanedFile => Severity::Warning,
            FindingCategory::UnusedExport => Severity::Info,
            FindingCategory::UnusedDependency => Severity::Warning,
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingCategory::OrphanedFile => "orphaned_file",
            FindingCategory::UnusedExport => "unused_export",
            FindingCategory::UnusedDependency => "unused_dependency",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where a finding points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Location {
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            symbol: None,
        }
    }

    pub fn symbol(file: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            symbol: Some(symbol.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(ref symbol) = self.symbol {
            write!(f, " ({})", symbol)?;
        }
        Ok(())
    }
}

/// A single dead-code finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Always `"deadcode"` for findings emitted by this crate.
    #[serde(rename = "type")]
    pub finding_type: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub location: Location,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Finding {
    pub const TYPE: &'static str = "deadcode";

    pub fn new(category: FindingCategory, location: Location, description: impl Into<String>) -> Self {
        Self {
            finding_type: Self::TYPE.to_string(),
            category,
            severity: category.default_severity(),
            location,
            description: description.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Counts derived from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadCodeMetrics {
    pub orphaned_files: usize,
    pub unused_exports: usize,
    pub unused_dependencies: usize,
}

impl DeadCodeMetrics {
    pub const ORPHANED_FILES: &'static str = "orphanedFiles";
    pub const UNUSED_EXPORTS: &'static str = "unusedExports";
    pub const UNUSED_DEPENDENCIES: &'static str = "unusedDependencies";

    pub fn total(&self) -> usize {
        self.orphaned_files + self.unused_exports + self.unused_dependencies
    }

    /// Writes the three counts into an accumulator under their metric keys.
    pub fn write_to<A: ResultAccumulator + ?Sized>(&self, acc: &mut A) {
        acc.set_metric(Self::ORPHANED_FILES, self.orphaned_files);
        acc.set_metric(Self::UNUSED_EXPORTS, self.unused_exports);
        acc.set_metric(Self::UNUSED_DEPENDENCIES, self.unused_dependencies);
    }
}

/// Caller-owned sink for findings and scalar metrics.
///
/// Sibling analyzers (quality, structure, ...) push into the same
/// accumulator, so implementations must append rather than replace.
pub trait ResultAccumulator {
    fn add_finding(&mut self, finding: Finding);
    fn set_metric(&mut self, name: &str, value: usize);
}

/// The default accumulator: a plain list of findings plus named metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub findings: Vec<Finding>,
    pub metrics: BTreeMap<String, usize>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    pub fn metric(&self, name: &str) -> Option<usize> {
        self.metrics.get(name).copied()
    }
}

impl ResultAccumulator for AnalysisReport {
    fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    fn set_metric(&mut self, name: &str, value: usize) {
        self.metrics.insert(name.to_string(), value);
    }
}
