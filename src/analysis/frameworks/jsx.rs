//! Component-tag matching shared by the framework analyzers.
//!
//! A tag only counts when the same file imports a binding of that name;
//! the binding's import is then resolved like any other import.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::context::ProjectIndex;

fn re_capitalized_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Z][A-Za-z0-9_$]*)").expect("valid tag regex"))
}

fn re_create_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"createElement\(\s*([A-Z][A-Za-z0-9_$]*)").expect("valid createElement regex"))
}

fn re_component_prop() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:component|Component)\s*=\s*\{\s*([A-Z][A-Za-z0-9_$]*)\s*\}").expect("valid component prop regex")
    })
}

fn re_kebab_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([a-z][a-z0-9]*(?:-[a-z0-9]+)+)").expect("valid kebab tag regex"))
}

/// `my-button` -> `MyButton`, `base_ui` -> `BaseUi`.
pub fn pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Names used as JSX components: `<Foo`, `<Ns.Member` (as `Ns`),
/// `createElement(Foo`, `component={Foo}`.
pub fn component_names(content: &str) -> BTreeSet<String> {
    [re_capitalized_tag(), re_create_element(), re_component_prop()]
        .iter()
        .flat_map(|re| re.captures_iter(content))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Template tags in `.vue`/`.svelte` files, kebab-case converted to PascalCase.
pub fn template_component_names(content: &str) -> BTreeSet<String> {
    let mut names = component_names(content);
    names.extend(
        re_kebab_tag()
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| pascal_case(m.as_str())),
    );
    names
}

/// Resolves each name through the import that binds it in `path`.
pub fn resolve_bindings(ctx: &ProjectIndex, path: &str, names: &BTreeSet<String>) -> BTreeSet<String> {
    let Some(syntax) = ctx.syntax(path) else {
        return BTreeSet::new();
    };
    names
        .iter()
        .filter_map(|name| syntax.binding(name))
        .filter_map(|import| ctx.resolver().resolve_js(path, &import.source))
        .filter(|target| target != path)
        .collect()
}

/// Targets of `import()` calls in `path`.
pub fn dynamic_import_targets(ctx: &ProjectIndex, path: &str) -> BTreeSet<String> {
    let Some(syntax) = ctx.syntax(path) else {
        return BTreeSet::new();
    };
    syntax
        .dynamic_imports()
        .filter_map(|import| ctx.resolver().resolve_js(path, &import.source))
        .filter(|target| target != path)
        .collect()
}
