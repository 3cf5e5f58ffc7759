//! JSON export implementation.
//!
//! Exports dead-code findings in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::model::{DeadCodeMetrics, Finding};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    metrics: DeadCodeMetrics,
    total_findings: usize,
    skipped_files: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: &'a str,
    frameworks: Vec<&'static str>,
    summary: JsonSummary,
    findings: &'a [Finding],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    skipped_files: &'a [String],
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            project: &data.project_name,
            frameworks: data.frameworks.iter().map(|f| f.name()).collect(),
            summary: JsonSummary {
                metrics: data.metrics,
                total_findings: data.findings.len(),
                skipped_files: data.skipped_files.len(),
            },
            findings: &data.findings,
            skipped_files: &data.skipped_files,
        };

        let json = serde_json::to_string_pretty(&export).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
