//! reachscope - dead-code and reachability analysis for JavaScript,
//! TypeScript and Python projects
//!
//! This crate finds source files nothing reaches, exports nothing imports,
//! and declared dependencies nothing references. It understands Next.js,
//! React, Vue, Nuxt and Svelte conventions as well as component barrels.
//!
//! # Example
//!
//! ```rust
//! use reachscope::model::{AnalysisReport, FindingCategory, SourceNode};
//!
//! let files = vec![
//!     SourceNode::file("package.json", r#"{"dependencies": {"next": "14.0.0"}}"#),
//!     SourceNode::file("app/page.tsx", "export default function Page() { return null; }"),
//!     SourceNode::file("lib/unused.ts", "export const x = 1;"),
//! ];
//!
//! let mut report = AnalysisReport::new();
//! let metrics = reachscope::analyze(&files, &mut report);
//!
//! assert_eq!(metrics.orphaned_files, 1);
//! let orphan = report.findings_in(FindingCategory::OrphanedFile).next().unwrap();
//! assert_eq!(orphan.location.file, "lib/unused.ts");
//! ```

pub mod analysis;
pub mod config;
pub mod export;
pub mod graph;
pub mod loader;
pub mod model;
pub mod parser;

pub use analysis::{DeadCodeAnalyzer, DeadCodeOutcome};
pub use config::{AnalyzerConfig, ConfigError, ReachabilityMode};
pub use model::{AnalysisReport, DeadCodeMetrics, Finding, ResultAccumulator, SourceNode};

/// Runs the dead-code analysis with the default configuration.
pub fn analyze<A: ResultAccumulator + ?Sized>(files: &[SourceNode], acc: &mut A) -> DeadCodeMetrics {
    DeadCodeAnalyzer::default().analyze(files, acc)
}
