//! Directory loader for the command-line front end.
//!
//! Walks a project directory and turns every relevant file into a
//! [`SourceNode`] with a `/`-separated path relative to the project root.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{NodeKind, SourceNode};

/// Errors that can occur while loading a project directory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Project directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Extensions of files whose content takes part in the analysis.
const LOADED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "vue", "svelte", "py", "pyi", "json", "html", "yml",
    "yaml", "toml",
];

/// Directories never descended into.
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".hg",
    ".svn",
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".output",
    ".svelte-kit",
    "coverage",
    ".turbo",
    ".vercel",
    ".cache",
    "__pycache__",
    ".venv",
    "venv",
    "site-packages",
    "target",
];

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    IGNORED_DIRS.contains(&name.as_ref())
}

fn is_loaded_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| LOADED_EXTENSIONS.contains(&ext))
}

/// Loads every relevant file under `root`, sorted by path.
///
/// Unreadable files are logged and skipped; files that are not valid UTF-8
/// are kept without content.
pub fn load_project(root: &Path) -> LoadResult<Vec<SourceNode>> {
    if !root.exists() {
        return Err(LoadError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root.to_path_buf()));
    }

    let mut nodes = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_ignored_dir(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_loaded_file(path) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        let content = String::from_utf8(bytes).ok();
        if content.is_none() {
            debug!(path = %relative, "file is not valid UTF-8");
        }

        nodes.push(SourceNode {
            path: relative,
            kind: NodeKind::File,
            content,
            imports_hint: None,
            exports_hint: None,
        });
    }

    nodes.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), files = nodes.len(), "loaded project");
    Ok(nodes)
}
