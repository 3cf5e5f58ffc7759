//! Input nodes produced by an upstream parser or the directory loader.

use serde::{Deserialize, Serialize};

/// Kind discriminator carried by every [`SourceNode`].
///
/// Only [`NodeKind::File`] nodes take part in dead-code analysis; the other
/// kinds are accepted so callers can pass their full node list unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    File,
    Function,
    Class,
    Method,
    Variable,
    Other,
}

/// A file (or symbol) node as produced by the indexer.
///
/// The engine only reads these. `content` must be UTF-8 text when present.
/// `imports_hint` and `exports_hint` are optional structured lists that an
/// AST-backed parser may already have computed; when present they are used
/// instead of re-scanning the text.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceNode {
    /// Path of the file, `/`-separated.
    pub path: String,

    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    #[serde(default)]
    pub content: Option<String>,

    /// Raw import specifiers (`"./util"`, `"react"`, `"pkg.mod"`).
    #[serde(rename = "importsHint", default)]
    pub imports_hint: Option<Vec<String>>,

    /// Exported symbol names.
    #[serde(rename = "exportsHint", default)]
    pub exports_hint: Option<Vec<String>>,
}

impl SourceNode {
    /// Creates a file node with the given content.
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: normalize_separators(&path.into()),
            kind: NodeKind::File,
            content: Some(content.into()),
            imports_hint: None,
            exports_hint: None,
        }
    }

    /// Attaches structured import/export hints.
    pub fn with_hints(mut self, imports: Vec<String>, exports: Vec<String>) -> Self {
        self.imports_hint = Some(imports);
        self.exports_hint = Some(exports);
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Returns the text content, treating an empty string as missing.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Converts Windows separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}
