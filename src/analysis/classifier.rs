//! Static path tables for generated output, vendored trees and config files.
//!
//! These only ever suppress orphan/export reporting. They never remove a
//! file from the used set.

/// Directory segments whose contents are build output, caches, vendored
/// packages or VCS metadata.
const GENERATED_DIRS: &[&str] = &[
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".output",
    ".svelte-kit",
    ".vercel",
    ".turbo",
    ".cache",
    ".parcel-cache",
    "coverage",
    "node_modules",
    "bower_components",
    "storybook-static",
    "target",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".venv",
    "venv",
    "site-packages",
    ".git",
    ".hg",
    ".svn",
];

const GENERATED_SUFFIXES: &[&str] = &[
    ".min.js",
    ".min.mjs",
    ".bundle.js",
    ".chunk.js",
    ".d.ts",
    ".d.mts",
    ".d.cts",
    ".map",
    "_pb2.py",
    "_pb2_grpc.py",
    ".pyc",
];

const GENERATED_MARKERS: &[&str] = &[".generated.", ".gen."];

const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "poetry.lock",
    "Pipfile.lock",
    "uv.lock",
    "Cargo.lock",
];

/// Exact config file names.
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "conftest.py",
    "noxfile.py",
    "fabfile.py",
    "gunicorn.conf.py",
    "karma.conf.js",
    "Gruntfile.js",
    "gulpfile.js",
    "babel.config.json",
    ".babelrc",
    ".babelrc.js",
    ".prettierrc.js",
    ".prettierrc.cjs",
    ".stylelintrc.js",
    ".lintstagedrc.js",
    "next-env.d.ts",
    "vite-env.d.ts",
];

/// Basename prefixes for dotfile configs such as `.eslintrc.cjs`.
const CONFIG_PREFIXES: &[&str] = &[".eslintrc", ".prettierrc", ".mocharc", ".commitlintrc"];

/// Returns true for paths that are build output, caches, vendored trees,
/// lockfiles or VCS metadata.
pub fn is_build_output_or_generated(path: &str) -> bool {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    let mut basename = "";
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            basename = segment;
        } else if GENERATED_DIRS.contains(&segment) {
            return true;
        }
    }

    LOCKFILES.contains(&basename)
        || GENERATED_SUFFIXES.iter().any(|s| basename.ends_with(s))
        || GENERATED_MARKERS.iter().any(|m| basename.contains(m))
}

/// Returns true for tool and framework configuration files.
pub fn is_config_file(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or(path);

    if CONFIG_FILES.contains(&basename) || CONFIG_PREFIXES.iter().any(|p| basename.starts_with(p)) {
        return true;
    }

    // `next.config.mjs`, `vite.config.ts`, `jest.config.base.js`, `karma.conf.js`
    let mut parts = basename.split('.');
    parts.next();
    parts.any(|p| p == "config" || p == "conf")
}

pub fn is_lockfile(path: &str) -> bool {
    LOCKFILES.contains(&path.rsplit('/').next().unwrap_or(path))
}

/// Either classifier matches.
pub fn is_excluded_from_orphans(path: &str) -> bool {
    is_build_output_or_generated(path) || is_config_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_directories() {
        assert!(is_build_output_or_generated("dist/index.js"));
        assert!(is_build_output_or_generated("packages/web/.next/server/page.js"));
        assert!(is_build_output_or_generated("node_modules/react/index.js"));
        assert!(is_build_output_or_generated("app/__pycache__/mod.py"));
        assert!(!is_build_output_or_generated("src/distance.ts"));
        assert!(!is_build_output_or_generated("src/builder/index.ts"));
    }

    #[test]
    fn test_basename_named_like_a_directory_is_not_generated() {
        // Only directory segments count; a file literally called `build.ts` is source.
        assert!(!is_build_output_or_generated("scripts/build.ts"));
    }

    #[test]
    fn test_generated_suffixes_and_lockfiles() {
        assert!(is_build_output_or_generated("public/vendor.min.js"));
        assert!(is_build_output_or_generated("src/types/global.d.ts"));
        assert!(is_build_output_or_generated("proto/user_pb2.py"));
        assert!(is_build_output_or_generated("src/api.generated.ts"));
        assert!(is_build_output_or_generated("yarn.lock"));
        assert!(is_build_output_or_generated("apps/web/pnpm-lock.yaml"));
        assert!(is_lockfile("apps/web/pnpm-lock.yaml"));
        assert!(!is_lockfile("src/lock.ts"));
    }

    #[test]
    fn test_config_files() {
        assert!(is_config_file("next.config.js"));
        assert!(is_config_file("apps/web/vite.config.ts"));
        assert!(is_config_file("tailwind.config.cjs"));
        assert!(is_config_file("jest.config.base.js"));
        assert!(is_config_file("karma.conf.js"));
        assert!(is_config_file(".eslintrc.cjs"));
        assert!(is_config_file("setup.py"));
        assert!(is_config_file("tests/conftest.py"));
        assert!(!is_config_file("src/config.ts"));
        assert!(!is_config_file("src/config/index.ts"));
        assert!(!is_config_file("src/app.ts"));
    }

    #[test]
    fn test_combined_exclusion() {
        assert!(is_excluded_from_orphans("dist/cli.js"));
        assert!(is_excluded_from_orphans("svelte.config.js"));
        assert!(!is_excluded_from_orphans("src/orphan.ts"));
    }
}
