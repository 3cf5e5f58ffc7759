//! Data model shared by the analyzers.
//!
//! Every value here is created fresh for one analysis run and dropped at the
//! end of it; nothing is cached between runs.

mod finding;
mod node;
mod usage;

pub use finding::{
    AnalysisReport, DeadCodeMetrics, Finding, FindingCategory, Location, ResultAccumulator,
    Severity,
};
pub use node::{normalize_separators, NodeKind, SourceNode};
pub use usage::{EdgeKind, ImportEdge, UsageAnalysisResult};
