//! Lexical path helpers and import-specifier resolution.
//!
//! Resolution never touches the file system: a candidate only resolves if
//! it names a path in the current node set. Anything that cannot be matched
//! (bare package names, unknown aliases) is treated as external.

use std::collections::HashSet;
use std::path::{Component, Path};

use path_clean::PathClean;

/// Source extensions of the JavaScript family, in probing order.
pub const JS_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Everything an extensionless JS import may resolve to.
const PROBE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "vue", "svelte", "json",
];

/// Output extension -> source extensions it may have been compiled from.
const COMPILED_SOURCES: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

/// Directory part of `path` (`""` for a bare file name).
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Final path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// File name up to the first dot: `Button.test.tsx` -> `Button`.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    name.split('.').next().unwrap_or(name)
}

/// Extension after the last dot of the file name, if any.
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

/// JavaScript/TypeScript source (not a component).
pub fn is_script_file(path: &str) -> bool {
    extension(path).is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}

/// Single-file `.vue` or `.svelte` component.
pub fn is_component_file(path: &str) -> bool {
    matches!(extension(path), Some("vue" | "svelte"))
}

pub fn is_python_file(path: &str) -> bool {
    matches!(extension(path), Some("py" | "pyi"))
}

/// True if `path` lies inside `dir` (at any depth).
pub fn is_within(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

/// Collapses `.` and `..` segments. Returns `None` when `..` climbs above
/// the start of the path.
pub fn normalize(path: &str) -> Option<String> {
    let cleaned = Path::new(path).clean();
    if matches!(cleaned.components().next(), Some(Component::ParentDir)) {
        return None;
    }
    let cleaned = cleaned.to_string_lossy().replace('\\', "/");
    Some(if cleaned == "." { String::new() } else { cleaned })
}

/// Joins `rel` onto `base` and normalizes the result.
pub fn join(base: &str, rel: &str) -> Option<String> {
    if base.is_empty() {
        normalize(rel)
    } else {
        normalize(&format!("{}/{}", base, rel))
    }
}

/// One alias mapping, targets already expressed as project paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub prefix: String,
    pub targets: Vec<String>,
    /// Exact aliases match only the whole specifier (tsconfig keys without `*`).
    pub exact: bool,
}

impl Alias {
    fn strip<'s>(&self, spec: &'s str) -> Option<&'s str> {
        if self.exact {
            (spec == self.prefix).then_some("")
        } else {
            spec.strip_prefix(self.prefix.as_str())
        }
    }
}

/// Resolves import specifiers against the known file set.
#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    files: HashSet<String>,
    root: String,
    aliases: Vec<Alias>,
    base_urls: Vec<String>,
}

impl ModuleResolver {
    pub fn new(files: HashSet<String>, root: impl Into<String>) -> Self {
        Self {
            files,
            root: root.into(),
            aliases: Vec::new(),
            base_urls: Vec::new(),
        }
    }

    /// Adds an alias; longer prefixes are tried first.
    pub fn add_alias(&mut self, alias: Alias) {
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
            self.aliases.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        }
    }

    /// Adds a directory that bare specifiers are also looked up under.
    pub fn add_base_url(&mut self, dir: String) {
        if !self.base_urls.contains(&dir) {
            self.base_urls.push(dir);
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Resolves a JavaScript/TypeScript import specifier written in `from_file`.
    pub fn resolve_js(&self, from_file: &str, spec: &str) -> Option<String> {
        let spec = spec.split('?').next().unwrap_or("");
        if spec.is_empty() {
            return None;
        }

        if spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../") {
            return self.probe(&join(parent_dir(from_file), spec)?);
        }

        if let Some(rest) = spec.strip_prefix('/') {
            if let Some(hit) = self.probe(spec) {
                return Some(hit);
            }
            return self.probe(&join(&self.root, rest)?);
        }

        for alias in &self.aliases {
            let Some(rest) = alias.strip(spec) else {
                continue;
            };
            for target in &alias.targets {
                let candidate = if rest.is_empty() {
                    target.trim_end_matches('/').to_string()
                } else {
                    format!("{}{}", target, rest)
                };
                if let Some(hit) = normalize(&candidate).and_then(|c| self.probe(&c)) {
                    return Some(hit);
                }
            }
        }

        self.base_urls
            .iter()
            .filter_map(|base| join(base, spec))
            .find_map(|candidate| self.probe(&candidate))
    }

    /// Resolves a manifest entry (`./dist/cli.js`) relative to `dir`.
    ///
    /// If the path points into a compiled-output directory that is not part
    /// of the node set, the same path under `src/` is tried.
    pub fn resolve_entry(&self, dir: &str, entry: &str) -> Option<String> {
        let entry = entry.trim_start_matches("./");
        if entry.is_empty() || entry.contains('*') {
            return None;
        }
        if let Some(hit) = join(dir, entry).and_then(|c| self.probe(&c)) {
            return Some(hit);
        }

        let (first, rest) = entry.split_once('/')?;
        if !matches!(first, "dist" | "build" | "lib" | "out" | "esm" | "cjs") {
            return None;
        }
        let candidate = join(dir, &format!("src/{}", rest))?;
        self.probe(&candidate).or_else(|| {
            // `dist/index.js` built from `src/index.ts`: drop the extension and probe.
            let (stem, _) = candidate.rsplit_once('.')?;
            self.probe(stem)
        })
    }

    /// Resolves a Python module reference written in `from_file`.
    ///
    /// `module` may carry leading dots for relative imports. Each name in
    /// `names` is also tried as a submodule (`from pkg import mod`). Absolute
    /// imports are looked up under every ancestor directory of the importing
    /// file, nearest first.
    pub fn resolve_python(&self, from_file: &str, module: &str, names: &[String]) -> Vec<String> {
        let dots = module.chars().take_while(|c| *c == '.').count();
        let rest = &module[dots..];

        let bases = if dots > 0 {
            let mut base = parent_dir(from_file);
            for _ in 1..dots {
                if base.is_empty() {
                    return Vec::new();
                }
                base = parent_dir(base);
            }
            vec![base.to_string()]
        } else {
            self.python_search_dirs(from_file)
        };

        for base in bases {
            let module_path = if rest.is_empty() {
                Some(base.clone())
            } else {
                join(&base, &rest.replace('.', "/"))
            };
            let Some(module_path) = module_path else {
                continue;
            };

            let mut hits = Vec::new();
            let module_hit = if rest.is_empty() {
                self.exact(&join(&module_path, "__init__.py").unwrap_or_default())
            } else {
                self.probe_python(&module_path)
            };
            hits.extend(module_hit);
            for name in names.iter().filter(|n| n.as_str() != "*") {
                if let Some(sub) = join(&module_path, name).and_then(|p| self.probe_python(&p)) {
                    if !hits.contains(&sub) {
                        hits.push(sub);
                    }
                }
            }
            if !hits.is_empty() {
                return hits;
            }
        }

        Vec::new()
    }

    fn python_search_dirs(&self, from_file: &str) -> Vec<String> {
        let mut dirs = Vec::new();
        let mut dir = parent_dir(from_file);
        loop {
            dirs.push(dir.to_string());
            if dir.is_empty() {
                break;
            }
            dir = parent_dir(dir);
        }
        dirs
    }

    fn exact(&self, candidate: &str) -> Option<String> {
        self.files.contains(candidate).then(|| candidate.to_string())
    }

    fn probe_python(&self, module_path: &str) -> Option<String> {
        self.exact(&format!("{}.py", module_path))
            .or_else(|| self.exact(&format!("{}/__init__.py", module_path)))
    }

    /// Exact match, compiled-extension reversal, extension probing, then
    /// directory index.
    pub fn probe(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim_end_matches('/');
        if candidate.is_empty() {
            return None;
        }
        if let Some(hit) = self.exact(candidate) {
            return Some(hit);
        }

        if let Some((stem, ext)) = candidate.rsplit_once('.') {
            if !stem.ends_with('/') && !stem.is_empty() {
                for (out_ext, sources) in COMPILED_SOURCES {
                    if ext == *out_ext {
                        for src in sources.iter() {
                            if let Some(hit) = self.exact(&format!("{}.{}", stem, src)) {
                                return Some(hit);
                            }
                        }
                    }
                }
            }
        }

        PROBE_EXTENSIONS
            .iter()
            .find_map(|ext| self.exact(&format!("{}.{}", candidate, ext)))
            .or_else(|| {
                PROBE_EXTENSIONS
                    .iter()
                    .find_map(|ext| self.exact(&format!("{}/index.{}", candidate, ext)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(files: &[&str]) -> ModuleResolver {
        ModuleResolver::new(files.iter().map(|f| f.to_string()).collect(), "")
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(parent_dir("src/a/b.ts"), "src/a");
        assert_eq!(parent_dir("b.ts"), "");
        assert_eq!(file_stem("src/Button.test.tsx"), "Button");
        assert_eq!(extension("src/a.d.ts"), Some("ts"));
        assert_eq!(extension("Makefile"), None);
        assert!(is_within("src/a/b.ts", "src/a"));
        assert!(!is_within("src/ab/c.ts", "src/a"));
        assert!(is_within("x.ts", ""));
        assert!(is_script_file("a/b.mjs"));
        assert!(!is_script_file("a/b.vue"));
        assert!(is_component_file("a/B.svelte"));
        assert!(is_python_file("pkg/mod.py"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("src/./a/../b.ts"), Some("src/b.ts".to_string()));
        assert_eq!(normalize("/root/p/../q"), Some("/root/q".to_string()));
        assert_eq!(normalize("../escape"), None);
        assert_eq!(normalize("src/a/../../../b"), None);
        assert_eq!(normalize("src/.."), Some(String::new()));
        assert_eq!(normalize("./"), Some(String::new()));
        assert_eq!(normalize("src//ui/./Button.tsx"), Some("src/ui/Button.tsx".to_string()));
    }

    #[test]
    fn test_relative_with_extension_probing() {
        let r = resolver(&["src/main.ts", "src/util.ts"]);
        assert_eq!(r.resolve_js("src/main.ts", "./util"), Some("src/util.ts".to_string()));
        assert_eq!(r.resolve_js("src/main.ts", "./missing"), None);
    }

    #[test]
    fn test_js_specifier_resolves_to_ts_source() {
        let r = resolver(&["src/main.ts", "src/util.ts", "src/view.tsx"]);
        assert_eq!(r.resolve_js("src/main.ts", "./util.js"), Some("src/util.ts".to_string()));
        assert_eq!(r.resolve_js("src/main.ts", "./view.jsx"), Some("src/view.tsx".to_string()));
    }

    #[test]
    fn test_directory_index() {
        let r = resolver(&["src/main.ts", "src/lib/index.ts"]);
        assert_eq!(r.resolve_js("src/main.ts", "./lib"), Some("src/lib/index.ts".to_string()));
        assert_eq!(r.resolve_js("src/main.ts", "./lib/"), Some("src/lib/index.ts".to_string()));
    }

    #[test]
    fn test_bare_package_is_external() {
        let r = resolver(&["src/main.ts", "react.ts"]);
        assert_eq!(r.resolve_js("src/main.ts", "react"), None);
    }

    #[test]
    fn test_query_suffix_stripped() {
        let r = resolver(&["src/main.ts", "src/logo.svg"]);
        assert_eq!(
            r.resolve_js("src/main.ts", "./logo.svg?url"),
            Some("src/logo.svg".to_string())
        );
    }

    #[test]
    fn test_alias_prefix_and_exact() {
        let mut r = resolver(&["src/main.ts", "src/components/Button.tsx", "lib/index.ts"]);
        r.add_alias(Alias {
            prefix: "@/".to_string(),
            targets: vec!["src/".to_string()],
            exact: false,
        });
        r.add_alias(Alias {
            prefix: "@lib".to_string(),
            targets: vec!["lib/index.ts".to_string()],
            exact: true,
        });

        assert_eq!(
            r.resolve_js("src/main.ts", "@/components/Button"),
            Some("src/components/Button.tsx".to_string())
        );
        assert_eq!(r.resolve_js("src/main.ts", "@lib"), Some("lib/index.ts".to_string()));
        assert_eq!(r.resolve_js("src/main.ts", "@lib/other"), None);
        assert_eq!(r.resolve_js("src/main.ts", "@scope/pkg"), None);
    }

    #[test]
    fn test_base_url_lookup() {
        let mut r = resolver(&["src/main.ts", "src/utils/date.ts"]);
        r.add_base_url("src".to_string());
        assert_eq!(
            r.resolve_js("src/main.ts", "utils/date"),
            Some("src/utils/date.ts".to_string())
        );
    }

    #[test]
    fn test_root_absolute_specifier() {
        let r = ModuleResolver::new(
            ["/work/app/src/a.ts", "/work/app/src/b.ts"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            "/work/app",
        );
        assert_eq!(
            r.resolve_js("/work/app/src/a.ts", "/src/b"),
            Some("/work/app/src/b.ts".to_string())
        );
    }

    #[test]
    fn test_entry_resolution_falls_back_to_src() {
        let r = resolver(&["pkg/src/index.ts", "pkg/bin/cli.js"]);
        assert_eq!(r.resolve_entry("pkg", "./bin/cli.js"), Some("pkg/bin/cli.js".to_string()));
        assert_eq!(r.resolve_entry("pkg", "dist/index.js"), Some("pkg/src/index.ts".to_string()));
        assert_eq!(r.resolve_entry("pkg", "./dist/missing.js"), None);
    }

    #[test]
    fn test_python_absolute_and_relative() {
        let r = resolver(&[
            "app/main.py",
            "app/models/__init__.py",
            "app/models/user.py",
            "app/utils.py",
        ]);

        assert_eq!(
            r.resolve_python("app/main.py", "utils", &[]),
            vec!["app/utils.py".to_string()]
        );
        assert_eq!(
            r.resolve_python("app/main.py", "app.models.user", &[]),
            vec!["app/models/user.py".to_string()]
        );
        assert_eq!(
            r.resolve_python("app/models/user.py", "..utils", &[]),
            vec!["app/utils.py".to_string()]
        );
        assert_eq!(
            r.resolve_python("app/main.py", ".models", &["user".to_string()]),
            vec![
                "app/models/__init__.py".to_string(),
                "app/models/user.py".to_string()
            ]
        );
        assert!(r.resolve_python("app/main.py", "os", &[]).is_empty());
    }

    #[test]
    fn test_python_from_dot_import_submodule() {
        let r = resolver(&["pkg/__init__.py", "pkg/a.py", "pkg/b.py"]);
        assert_eq!(
            r.resolve_python("pkg/a.py", ".", &["b".to_string()]),
            vec!["pkg/__init__.py".to_string(), "pkg/b.py".to_string()]
        );
    }
}
