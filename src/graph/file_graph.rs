//! File-level import graph implementation using petgraph.
//!
//! Nodes are project file paths; edges point from the importing file to the
//! file its import resolved to, weighted by the [`EdgeKind`].

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::model::{EdgeKind, UsageAnalysisResult};

/// A directed graph of resolved imports between project files.
#[derive(Debug, Clone, Default)]
pub struct FileGraph {
    graph: DiGraph<String, EdgeKind>,
    node_indices: HashMap<String, NodeIndex>,
}

impl FileGraph {
    /// Creates a new empty graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reachscope::graph::FileGraph;
    ///
    /// let graph = FileGraph::new();
    /// assert_eq!(graph.node_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of files
    /// * `edges` - Expected number of import edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds the graph from every file in `paths` plus the edges recorded
    /// in `usage`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reachscope::graph::FileGraph;
    /// use reachscope::model::{EdgeKind, ImportEdge, UsageAnalysisResult};
    ///
    /// let mut usage = UsageAnalysisResult::new();
    /// usage.add_edge(ImportEdge {
    ///     from_file: "src/main.ts".into(),
    ///     resolved_target: "src/util.ts".into(),
    ///     imported_names: vec!["util".into()],
    ///     kind: EdgeKind::Named,
    /// });
    ///
    /// let graph = FileGraph::from_usage(["src/main.ts", "src/util.ts", "src/dead.ts"], &usage);
    /// assert_eq!(graph.node_count(), 3);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn from_usage<'p>(paths: impl IntoIterator<Item = &'p str>, usage: &UsageAnalysisResult) -> Self {
        let mut graph = Self::with_capacity(0, usage.edges.len());
        for path in paths {
            graph.add_file(path);
        }
        for edge in &usage.edges {
            graph.add_file(&edge.from_file);
            graph.add_file(&edge.resolved_target);
            graph.add_edge(&edge.from_file, &edge.resolved_target, edge.kind);
        }
        graph
    }

    /// Adds a file, returning its index. Existing files are left unchanged.
    pub fn add_file(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_string());
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Adds an import edge between two known files.
    ///
    /// # Returns
    ///
    /// `true` if the edge was added, `false` if either file is unknown.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> bool {
        let (Some(&from_idx), Some(&to_idx)) = (self.node_indices.get(from), self.node_indices.get(to)) else {
            return false;
        };
        self.graph.add_edge(from_idx, to_idx, kind);
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }

    /// Files that import `path` directly, with the kind of each import.
    pub fn importers(&self, path: &str) -> Vec<(&str, EdgeKind)> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut importers: Vec<(&str, EdgeKind)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()).map(|p| (p.as_str(), *edge.weight())))
            .collect();
        importers.sort();
        importers.dedup();
        importers
    }

    /// Files `path` imports directly.
    pub fn imports(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut targets: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Every file reachable from any of `roots` (roots included).
    ///
    /// Unknown roots are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reachscope::graph::FileGraph;
    /// use reachscope::model::EdgeKind;
    ///
    /// let mut graph = FileGraph::new();
    /// for f in ["a.ts", "b.ts", "c.ts", "d.ts"] {
    ///     graph.add_file(f);
    /// }
    /// graph.add_edge("a.ts", "b.ts", EdgeKind::Named);
    /// graph.add_edge("b.ts", "c.ts", EdgeKind::Default);
    ///
    /// let reachable = graph.reachable_from(["a.ts"]);
    /// assert!(reachable.contains("c.ts"));
    /// assert!(!reachable.contains("d.ts"));
    /// ```
    pub fn reachable_from<'r>(&self, roots: impl IntoIterator<Item = &'r str>) -> BTreeSet<String> {
        let mut reachable = BTreeSet::new();
        let mut dfs = Dfs::empty(&self.graph);

        for root in roots {
            let Some(&start) = self.node_indices.get(root) else {
                continue;
            };
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&self.graph) {
                if let Some(path) = self.graph.node_weight(idx) {
                    reachable.insert(path.clone());
                }
            }
        }

        reachable
    }

    /// Files that import `path` directly, or through a chain of files that
    /// re-export it (`export ... from`).
    pub fn importers_through_reexports(&self, path: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([path.to_string()]);
        let mut visited = BTreeSet::from([path.to_string()]);

        while let Some(current) = queue.pop_front() {
            for (importer, kind) in self.importers(&current) {
                found.insert(importer.to_string());
                if kind == EdgeKind::ReExport && visited.insert(importer.to_string()) {
                    queue.push_back(importer.to_string());
                }
            }
        }

        found.remove(path);
        found
    }
}
