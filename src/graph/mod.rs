//! Import graph between project files.
//!
//! # Example
//!
//! ```rust
//! use reachscope::graph::FileGraph;
//! use reachscope::model::EdgeKind;
//!
//! let mut graph = FileGraph::new();
//! graph.add_file("src/index.ts");
//! graph.add_file("src/util.ts");
//! graph.add_edge("src/index.ts", "src/util.ts", EdgeKind::Named);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod file_graph;

pub use file_graph::FileGraph;
