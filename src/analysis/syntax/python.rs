//! Pattern-based import/export extraction for Python.
//!
//! Imports may be indented (inside functions or `try` blocks). Exports are
//! only taken from column zero: top-level `def`, `async def`, `class` and
//! UPPER_CASE constants, overridden entirely by `__all__` when present.

use std::sync::OnceLock;

use regex::Regex;

use super::{ExportedSymbol, Import, ImportKind, ImportSpecifier, ModuleSyntax};

fn re_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*import[ \t]+([A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?(?:[ \t]*,[ \t]*[A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?)*)")
            .expect("valid python import regex")
    })
}

fn re_from_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*from[ \t]+(\.+[\w.]*|[A-Za-z_][\w.]*)[ \t]+import[ \t]+(\([^)]*\)|[^\n#;]+)")
            .expect("valid python from-import regex")
    })
}

fn re_definition() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(?:async[ \t]+def|def|class)[ \t]+([A-Za-z_]\w*)").expect("valid python definition regex")
    })
}

fn re_constant() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^([A-Z][A-Z0-9_]*)[ \t]*(?::[^=\n]+)?=[^=]").expect("valid python constant regex")
    })
}

fn re_dunder_all() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?ms)^__all__[ \t]*(?::[^=\n]+)?=[ \t]*[\[\(](.*?)[\]\)]").expect("valid __all__ regex")
    })
}

fn re_quoted_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"]([A-Za-z_]\w*)['"]"#).expect("valid quoted name regex"))
}

/// Byte offsets of line starts, for offset -> line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`.
    fn line_at(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(next) => next,
        }
    }
}

/// Splits `a as b` into (`a`, `b`).
fn split_alias(item: &str) -> (String, Option<String>) {
    let mut parts = item.split_whitespace();
    let name = parts.next().unwrap_or("").to_string();
    let alias = match (parts.next(), parts.next()) {
        (Some("as"), Some(alias)) => Some(alias.to_string()),
        _ => None,
    };
    (name, alias)
}

/// Extracts imports and exports from Python source.
pub fn scan_python(source: &str) -> ModuleSyntax {
    let mut syntax = ModuleSyntax::default();
    let lines = LineIndex::new(source);

    for caps in re_import().captures_iter(source) {
        let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let line = lines.line_at(whole.start());
        for item in list.as_str().split(',') {
            let (module, alias) = split_alias(item);
            if module.is_empty() {
                continue;
            }
            // `import a.b` binds `a`; `import a.b as c` binds `c`.
            let binding = alias.unwrap_or_else(|| module.split('.').next().unwrap_or(&module).to_string());
            syntax.imports.push(Import::new(
                module,
                vec![ImportSpecifier::Namespace(binding)],
                ImportKind::Static,
                line,
            ));
        }
    }

    for caps in re_from_import().captures_iter(source) {
        let (Some(whole), Some(module), Some(names)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let line = lines.line_at(whole.start());
        let names: String = names
            .as_str()
            .lines()
            .map(|l| l.split('#').next().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        let names = names.trim().trim_start_matches('(').trim_end_matches(')');

        let mut specifiers = Vec::new();
        for item in names.split(',') {
            let item = item.trim().trim_end_matches('\\').trim();
            if item.is_empty() {
                continue;
            }
            if item == "*" {
                specifiers.push(ImportSpecifier::Namespace("*".to_string()));
                continue;
            }
            let (imported, alias) = split_alias(item);
            let local = alias.unwrap_or_else(|| imported.clone());
            specifiers.push(ImportSpecifier::Named { imported, local });
        }
        if specifiers.is_empty() {
            continue;
        }
        syntax
            .imports
            .push(Import::new(module.as_str(), specifiers, ImportKind::Static, line));
    }
    syntax.imports.sort_by_key(|i| i.line);

    if let Some(caps) = re_dunder_all().captures(source) {
        let line = caps.get(0).map_or(0, |m| lines.line_at(m.start()));
        if let Some(list) = caps.get(1) {
            for name in re_quoted_name().captures_iter(list.as_str()) {
                if let Some(name) = name.get(1) {
                    syntax.add_export(ExportedSymbol::new(name.as_str(), line));
                }
            }
        }
        return syntax;
    }

    let mut exports: Vec<ExportedSymbol> = re_definition()
        .captures_iter(source)
        .chain(re_constant().captures_iter(source))
        .filter_map(|caps| {
            let name = caps.get(1)?;
            Some(ExportedSymbol::new(name.as_str(), lines.line_at(name.start())))
        })
        .filter(|e| !e.name.starts_with('_'))
        .collect();
    exports.sort_by_key(|e| e.line);
    for export in exports {
        syntax.add_export(export);
    }

    syntax
}

/// Names a `from ... import` statement pulls in, used to probe submodules.
pub fn imported_names(import: &Import) -> Vec<String> {
    import
        .specifiers
        .iter()
        .filter_map(|s| match s {
            ImportSpecifier::Named { imported, .. } => Some(imported.clone()),
            _ => None,
        })
        .collect()
}
