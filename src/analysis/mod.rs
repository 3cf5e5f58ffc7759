//! Dead-code analysis for JavaScript/TypeScript and Python projects.
//!
//! The engine works on in-memory [`SourceNode`](crate::model::SourceNode)s
//! and performs no I/O. One run builds a [`ProjectIndex`], lets the
//! manifest, language and framework analyzers record entry points and
//! resolved imports, and hands the merged usage to the coordinator.
//!
//! # Example
//!
//! ```rust
//! use reachscope::analysis::DeadCodeAnalyzer;
//! use reachscope::model::SourceNode;
//!
//! let files = vec![
//!     SourceNode::file("main.py", "from app.util import helper\nhelper()\n"),
//!     SourceNode::file("app/__init__.py", ""),
//!     SourceNode::file("app/util.py", "def helper():\n    pass\n"),
//!     SourceNode::file("app/old.py", "def legacy():\n    pass\n"),
//! ];
//!
//! let outcome = DeadCodeAnalyzer::default().run(&files);
//! assert!(outcome.is_orphaned("app/old.py"));
//! assert!(!outcome.is_orphaned("app/util.py"));
//! ```

pub mod barrel;
pub mod classifier;
pub mod context;
pub mod coordinator;
pub mod frameworks;
pub mod languages;
pub mod manifest;
pub mod resolve;
pub mod syntax;

pub use barrel::{BarrelAnalyzer, BarrelGroup};
pub use context::ProjectIndex;
pub use coordinator::{DeadCodeAnalyzer, DeadCodeOutcome, OrphanedFile, UnusedDependency, UnusedExport};
pub use frameworks::{EntryPoint, FrameworkKind, FrameworkManager};
pub use languages::{JavaScriptAnalyzer, LanguageAnalyzer, PythonAnalyzer};
pub use manifest::{ManifestAnalyzer, ManifestReport};
