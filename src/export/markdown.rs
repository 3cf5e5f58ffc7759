//! Markdown export implementation.
//!
//! Exports dead-code findings in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use crate::model::FindingCategory;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

const CATEGORIES: [FindingCategory; 3] = [
    FindingCategory::OrphanedFile,
    FindingCategory::UnusedExport,
    FindingCategory::UnusedDependency,
];

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Dead Code Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_name)?;
        if !data.frameworks.is_empty() {
            let names: Vec<&str> = data.frameworks.iter().map(|f| f.name()).collect();
            writeln!(writer, "**Frameworks:** {}", names.join(", "))?;
        }
        writeln!(writer)?;

        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Orphaned Files | {} |", data.metrics.orphaned_files)?;
        writeln!(writer, "| Unused Exports | {} |", data.metrics.unused_exports)?;
        writeln!(writer, "| Unused Dependencies | {} |", data.metrics.unused_dependencies)?;
        if !data.skipped_files.is_empty() {
            writeln!(writer, "| Skipped (too large) | {} |", data.skipped_files.len())?;
        }
        writeln!(writer)?;

        if data.findings.is_empty() {
            writeln!(writer, "No dead code found.")?;
            writeln!(writer)?;
        }

        for category in CATEGORIES {
            let findings: Vec<_> = data.findings_in(category).collect();
            if findings.is_empty() {
                continue;
            }

            writeln!(writer, "## {} ({})", category.label(), findings.len())?;
            writeln!(writer)?;
            writeln!(writer, "| Location | Severity | Details |")?;
            writeln!(writer, "|----------|----------|---------|")?;
            for finding in findings {
                let details = match &finding.context {
                    Some(context) => format!("{} ({})", finding.description, context),
                    None => finding.description.clone(),
                };
                writeln!(
                    writer,
                    "| `{}` | {} | {} |",
                    finding.location,
                    finding.severity,
                    details.replace('|', "\\|")
                )?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by reachscope*")?;

        Ok(())
    }
}
