//! Report rendering for dead-code analysis results.
//!
//! This module provides exporters for writing a run's findings as JSON or
//! Markdown.

pub mod json;
pub mod markdown;

use crate::analysis::{DeadCodeOutcome, FrameworkKind};
use crate::model::{DeadCodeMetrics, Finding, FindingCategory};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    #[default]
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!("Unknown export format: '{}'. Valid formats: json, markdown", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Everything an exporter renders for one run.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Project name, usually the analyzed directory's name
    pub project_name: String,
    /// Framework analyzers that were active
    pub frameworks: Vec<FrameworkKind>,
    pub metrics: DeadCodeMetrics,
    pub findings: Vec<Finding>,
    /// Files left out because they exceed the size limits
    pub skipped_files: Vec<String>,
}

impl ExportData {
    pub fn new(project_name: impl Into<String>, outcome: &DeadCodeOutcome) -> Self {
        Self {
            project_name: project_name.into(),
            frameworks: outcome.frameworks.clone(),
            metrics: outcome.metrics,
            findings: outcome.findings(),
            skipped_files: outcome.skipped_files.clone(),
        }
    }

    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ExportFormat, data: &ExportData, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ExportData;
    use crate::analysis::DeadCodeAnalyzer;
    use crate::model::SourceNode;

    pub fn sample_data() -> ExportData {
        let files = vec![
            SourceNode::file(
                "package.json",
                r#"{"main": "src/index.ts", "dependencies": {"left-pad": "^1.3.0", "react": "^18.0.0"}}"#,
            ),
            SourceNode::file("src/index.ts", "import { used } from './lib';\nused();"),
            SourceNode::file("src/lib.ts", "export function used() {}\nexport function stale() {}"),
            SourceNode::file("src/orphan.ts", "import React from 'react';"),
        ];
        let outcome = DeadCodeAnalyzer::default().run(&files);
        ExportData::new("sample", &outcome)
    }
}
