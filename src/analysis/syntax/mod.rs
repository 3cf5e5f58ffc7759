//! Per-file import/export extraction.
//!
//! JavaScript-family files (including the `<script>` blocks of `.vue` and
//! `.svelte` components) are parsed with tree-sitter; Python files are
//! scanned with line-anchored patterns. Both produce a [`ModuleSyntax`].

pub mod javascript;
pub mod python;

use thiserror::Error;

use crate::model::EdgeKind;

pub use javascript::{ModuleScanner, SourceLanguage};

/// Errors that can occur while scanning a file.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import ... from 'module'` or a Python `import`/`from ... import`
    Static,
    /// `const x = require('module')`
    Require,
    /// `import('module')`
    Dynamic,
    /// `export ... from 'module'`
    ReExport,
}

/// An individual import specifier within an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// `import foo from 'module'`
    Default(String),
    /// `import { foo }` / `import { foo as bar }` / `from m import foo as bar`
    Named { imported: String, local: String },
    /// `import * as foo`, `export * from`, `import pkg.mod`
    Namespace(String),
    /// `import 'module'` (no bindings)
    SideEffect,
    /// `const mod = require('module')`
    Entire(String),
}

impl ImportSpecifier {
    /// The exported name being imported from the target module.
    pub fn exported_name(&self) -> Option<&str> {
        match self {
            ImportSpecifier::Default(_) => Some("default"),
            ImportSpecifier::Named { imported, .. } => Some(imported),
            ImportSpecifier::Namespace(_) | ImportSpecifier::SideEffect | ImportSpecifier::Entire(_) => {
                None
            }
        }
    }

    /// The binding introduced in the importing file.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ImportSpecifier::Default(name)
            | ImportSpecifier::Namespace(name)
            | ImportSpecifier::Entire(name) => Some(name),
            ImportSpecifier::Named { local, .. } => Some(local),
            ImportSpecifier::SideEffect => None,
        }
    }
}

/// A single import (or re-export) found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The raw specifier: `react`, `./utils`, `..models`
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
    pub kind: ImportKind,
    /// 1-indexed; 0 when the import came from a hint.
    pub line: usize,
}

impl Import {
    pub fn new(source: impl Into<String>, specifiers: Vec<ImportSpecifier>, kind: ImportKind, line: usize) -> Self {
        Self {
            source: source.into(),
            specifiers,
            kind,
            line,
        }
    }

    /// True if this import binds every export of the target.
    pub fn is_namespace_import(&self) -> bool {
        self.specifiers
            .iter()
            .any(|s| matches!(s, ImportSpecifier::Namespace(_) | ImportSpecifier::Entire(_)))
    }

    pub fn imported_names(&self) -> Vec<String> {
        self.specifiers
            .iter()
            .filter_map(|s| s.exported_name())
            .map(str::to_string)
            .collect()
    }

    /// Maps the import onto the edge kind recorded in the usage result.
    pub fn edge_kind(&self) -> EdgeKind {
        match self.kind {
            ImportKind::Require => EdgeKind::Require,
            ImportKind::Dynamic => EdgeKind::Dynamic,
            ImportKind::ReExport => EdgeKind::ReExport,
            ImportKind::Static => {
                if self.is_namespace_import() {
                    EdgeKind::Namespace
                } else if self.specifiers.iter().any(|s| matches!(s, ImportSpecifier::Named { .. })) {
                    EdgeKind::Named
                } else if self.specifiers.iter().any(|s| matches!(s, ImportSpecifier::Default(_))) {
                    EdgeKind::Default
                } else {
                    EdgeKind::SideEffect
                }
            }
        }
    }
}

/// A symbol a file makes available to importers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSymbol {
    /// `default` for default exports.
    pub name: String,
    pub line: usize,
}

impl ExportedSymbol {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSyntax {
    pub imports: Vec<Import>,
    pub exports: Vec<ExportedSymbol>,
}

impl ModuleSyntax {
    /// Builds syntax from caller-supplied hints. Each hinted import becomes
    /// a side-effect style static import of the raw specifier.
    pub fn from_hints(imports: Option<&[String]>, exports: Option<&[String]>) -> Self {
        Self {
            imports: imports
                .unwrap_or_default()
                .iter()
                .map(|source| Import::new(source.clone(), vec![ImportSpecifier::SideEffect], ImportKind::Static, 0))
                .collect(),
            exports: exports
                .unwrap_or_default()
                .iter()
                .map(|name| ExportedSymbol::new(name.clone(), 0))
                .collect(),
        }
    }

    /// Appends another block's findings, shifting line numbers by `line_offset`.
    pub fn extend(&mut self, other: ModuleSyntax, line_offset: usize) {
        self.imports.extend(other.imports.into_iter().map(|mut i| {
            i.line += line_offset;
            i
        }));
        for mut export in other.exports {
            export.line += line_offset;
            self.add_export(export);
        }
    }

    /// Adds an export unless a symbol of the same name is already recorded.
    pub fn add_export(&mut self, export: ExportedSymbol) {
        if !self.exports.iter().any(|e| e.name == export.name) {
            self.exports.push(export);
        }
    }

    /// Export names in declaration order.
    pub fn export_names(&self) -> Vec<String> {
        self.exports.iter().map(|e| e.name.clone()).collect()
    }

    pub fn export_line(&self, name: &str) -> Option<usize> {
        self.exports
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.line)
            .filter(|line| *line > 0)
    }

    /// The import that introduces local binding `name`, if any.
    pub fn binding(&self, name: &str) -> Option<&Import> {
        self.imports
            .iter()
            .filter(|i| i.kind != ImportKind::ReExport)
            .find(|i| i.specifiers.iter().any(|s| s.local_name() == Some(name)))
    }

    pub fn dynamic_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter().filter(|i| i.kind == ImportKind::Dynamic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_mapping() {
        let named = Import::new(
            "./a",
            vec![ImportSpecifier::Named {
                imported: "x".to_string(),
                local: "x".to_string(),
            }],
            ImportKind::Static,
            1,
        );
        assert_eq!(named.edge_kind(), EdgeKind::Named);

        let default = Import::new("./a", vec![ImportSpecifier::Default("A".to_string())], ImportKind::Static, 1);
        assert_eq!(default.edge_kind(), EdgeKind::Default);
        assert_eq!(default.imported_names(), vec!["default".to_string()]);

        let ns = Import::new("./a", vec![ImportSpecifier::Namespace("a".to_string())], ImportKind::Static, 1);
        assert_eq!(ns.edge_kind(), EdgeKind::Namespace);

        let bare = Import::new("./a", vec![ImportSpecifier::SideEffect], ImportKind::Static, 1);
        assert_eq!(bare.edge_kind(), EdgeKind::SideEffect);

        let req = Import::new("./a", vec![ImportSpecifier::Entire("a".to_string())], ImportKind::Require, 1);
        assert_eq!(req.edge_kind(), EdgeKind::Require);
    }

    #[test]
    fn test_from_hints() {
        let imports = vec!["./a".to_string()];
        let exports = vec!["foo".to_string()];
        let syntax = ModuleSyntax::from_hints(Some(&imports), Some(&exports));

        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.imports[0].source, "./a");
        assert_eq!(syntax.export_names(), vec!["foo".to_string()]);
        assert_eq!(syntax.export_line("foo"), None);
    }

    #[test]
    fn test_binding_lookup_ignores_reexports() {
        let syntax = ModuleSyntax {
            imports: vec![
                Import::new("./a", vec![ImportSpecifier::Default("Button".to_string())], ImportKind::Static, 1),
                Import::new(
                    "./b",
                    vec![ImportSpecifier::Named {
                        imported: "Card".to_string(),
                        local: "Card".to_string(),
                    }],
                    ImportKind::ReExport,
                    2,
                ),
            ],
            exports: Vec::new(),
        };

        assert_eq!(syntax.binding("Button").map(|i| i.source.as_str()), Some("./a"));
        assert!(syntax.binding("Card").is_none());
    }

    #[test]
    fn test_extend_offsets_lines_and_dedupes_exports() {
        let mut base = ModuleSyntax::default();
        base.add_export(ExportedSymbol::new("default", 3));

        let block = ModuleSyntax {
            imports: vec![Import::new("./x", vec![ImportSpecifier::SideEffect], ImportKind::Static, 2)],
            exports: vec![ExportedSymbol::new("default", 1), ExportedSymbol::new("helper", 4)],
        };
        base.extend(block, 10);

        assert_eq!(base.imports[0].line, 12);
        assert_eq!(base.export_names(), vec!["default".to_string(), "helper".to_string()]);
        assert_eq!(base.export_line("helper"), Some(14));
    }
}
