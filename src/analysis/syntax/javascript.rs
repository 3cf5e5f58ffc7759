//! Import/export extraction for JavaScript and TypeScript using tree-sitter.

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::{Language, Node, Parser, Tree, TreeCursor};

use super::{ExportedSymbol, Import, ImportKind, ImportSpecifier, ModuleSyntax, SyntaxError, SyntaxResult};

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Language of a component `<script>` block given its `lang` attribute.
    fn from_script_lang(lang: Option<&str>) -> Self {
        match lang {
            Some("ts") => SourceLanguage::TypeScript,
            Some("tsx") => SourceLanguage::Tsx,
            Some("jsx") => SourceLanguage::Jsx,
            _ => SourceLanguage::JavaScript,
        }
    }

    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

fn re_script_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Attribute values may contain `>` (`generic="T extends Map<K, V>"`).
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<script\b((?:[^>"']|"[^"]*"|'[^']*')*)>(.*?)</script\s*>"#)
            .expect("valid script block regex")
    })
}

fn re_lang_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\blang\s*=\s*["']?([A-Za-z]+)"#).expect("valid lang attribute regex"))
}

/// Holds one parser per grammar so a scanner can be reused across files.
pub struct ModuleScanner {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ModuleScanner {
    pub fn new() -> SyntaxResult<Self> {
        let mut js_parser = Parser::new();
        js_parser
            .set_language(&SourceLanguage::JavaScript.tree_sitter_language())
            .map_err(|_| SyntaxError::LanguageInit)?;

        let mut ts_parser = Parser::new();
        ts_parser
            .set_language(&SourceLanguage::TypeScript.tree_sitter_language())
            .map_err(|_| SyntaxError::LanguageInit)?;

        let mut tsx_parser = Parser::new();
        tsx_parser
            .set_language(&SourceLanguage::Tsx.tree_sitter_language())
            .map_err(|_| SyntaxError::LanguageInit)?;

        Ok(Self {
            js_parser,
            ts_parser,
            tsx_parser,
        })
    }

    /// Scans JavaScript/TypeScript source.
    pub fn scan_source(&mut self, source: &str, language: SourceLanguage, path: &str) -> SyntaxResult<ModuleSyntax> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser.parse(source, None).ok_or_else(|| SyntaxError::ParseError {
            path: path.to_string(),
        })?;

        Ok(extract(&tree, source))
    }

    /// Scans every `<script>` block of a `.vue` or `.svelte` component.
    pub fn scan_component(&mut self, source: &str, path: &str) -> SyntaxResult<ModuleSyntax> {
        let mut syntax = ModuleSyntax::default();
        for caps in re_script_block().captures_iter(source) {
            let (Some(attrs), Some(body)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let lang = re_lang_attr()
                .captures(attrs.as_str())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_lowercase());
            let language = SourceLanguage::from_script_lang(lang.as_deref());
            let offset = source[..body.start()].matches('\n').count();

            let block = self.scan_source(body.as_str(), language, path)?;
            syntax.extend(block, offset);
        }
        Ok(syntax)
    }
}

fn extract(tree: &Tree, source: &str) -> ModuleSyntax {
    let mut syntax = ModuleSyntax::default();
    let mut cursor = tree.root_node().walk();
    visit_node(&mut cursor, source, &mut syntax);
    syntax
}

fn visit_node(cursor: &mut TreeCursor, source: &str, syntax: &mut ModuleSyntax) {
    let node = cursor.node();

    match node.kind() {
        "import_statement" => {
            if let Some(import) = parse_import_statement(&node, source) {
                syntax.imports.push(import);
            }
        }
        "export_statement" => parse_export_statement(&node, source, syntax),
        "call_expression" => {
            if let Some(import) = parse_require_or_dynamic_import(&node, source) {
                syntax.imports.push(import);
            }
        }
        _ => {}
    }

    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, syntax);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// String literal value without its quotes. Template literals only count
/// when they contain no substitutions.
fn string_value(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {}
        "template_string" => {
            let mut cursor = node.walk();
            if node.children(&mut cursor).any(|c| c.kind() == "template_substitution") {
                return None;
            }
        }
        _ => return None,
    }
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    Some(trimmed.to_string())
}

/// Name of an import/export specifier, unquoting string names (`export { x as "y" }`).
fn module_export_name(node: &Node, source: &str) -> Option<String> {
    if node.kind() == "string" {
        return string_value(node, source);
    }
    node_text(node, source).map(str::to_string)
}

fn parse_import_statement(node: &Node, source: &str) -> Option<Import> {
    let mut source_module = None;
    let mut specifiers = Vec::new();
    let mut kind = ImportKind::Static;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string" => source_module = string_value(&child, source),
            "import_clause" => parse_import_clause(&child, source, &mut specifiers),
            "import_require_clause" => {
                let mut inner = child.walk();
                for part in child.children(&mut inner) {
                    match part.kind() {
                        "string" => source_module = string_value(&part, source),
                        "identifier" => {
                            if let Some(name) = node_text(&part, source) {
                                specifiers.push(ImportSpecifier::Entire(name.to_string()));
                            }
                        }
                        _ => {}
                    }
                }
                kind = ImportKind::Require;
            }
            _ => {}
        }
    }

    let source_module = source_module.filter(|s| !s.is_empty())?;
    if specifiers.is_empty() {
        specifiers.push(ImportSpecifier::SideEffect);
    }

    Some(Import::new(source_module, specifiers, kind, line_of(node)))
}

fn parse_import_clause(node: &Node, source: &str, specifiers: &mut Vec<ImportSpecifier>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                if let Some(name) = node_text(&child, source) {
                    specifiers.push(ImportSpecifier::Default(name.to_string()));
                }
            }
            "namespace_import" => {
                if let Some(name) = first_identifier(&child, source) {
                    specifiers.push(ImportSpecifier::Namespace(name));
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(imported) = spec
                        .child_by_field_name("name")
                        .and_then(|n| module_export_name(&n, source))
                    else {
                        continue;
                    };
                    let local = spec
                        .child_by_field_name("alias")
                        .and_then(|n| node_text(&n, source))
                        .map(str::to_string)
                        .unwrap_or_else(|| imported.clone());
                    specifiers.push(ImportSpecifier::Named { imported, local });
                }
            }
            _ => {}
        }
    }
}

fn first_identifier(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "string"));
    found.and_then(|c| module_export_name(&c, source))
}

fn parse_export_statement(node: &Node, source: &str, syntax: &mut ModuleSyntax) {
    let line = line_of(node);
    let from = node
        .child_by_field_name("source")
        .and_then(|s| string_value(&s, source))
        .filter(|s| !s.is_empty());

    let mut is_default = false;
    let mut star = false;
    let mut namespace_alias = None;
    let mut specifiers = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "default" => is_default = true,
            "*" => star = true,
            "namespace_export" => namespace_alias = first_identifier(&child, source),
            "export_clause" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let Some(name) = spec
                        .child_by_field_name("name")
                        .and_then(|n| module_export_name(&n, source))
                    else {
                        continue;
                    };
                    let alias = spec
                        .child_by_field_name("alias")
                        .and_then(|n| module_export_name(&n, source))
                        .unwrap_or_else(|| name.clone());
                    specifiers.push(ImportSpecifier::Named {
                        imported: name,
                        local: alias,
                    });
                }
            }
            _ => {}
        }
    }

    if is_default {
        syntax.add_export(ExportedSymbol::new("default", line));
        return;
    }

    if let Some(declaration) = node.child_by_field_name("declaration") {
        for name in declaration_names(&declaration, source) {
            syntax.add_export(ExportedSymbol::new(name, line));
        }
        return;
    }

    for spec in &specifiers {
        if let Some(local) = spec.local_name() {
            syntax.add_export(ExportedSymbol::new(local, line));
        }
    }

    let Some(from) = from else {
        return;
    };

    if let Some(alias) = namespace_alias {
        syntax.add_export(ExportedSymbol::new(alias.clone(), line));
        specifiers.push(ImportSpecifier::Namespace(alias));
    } else if star {
        specifiers.push(ImportSpecifier::Namespace("*".to_string()));
    }
    if specifiers.is_empty() {
        specifiers.push(ImportSpecifier::SideEffect);
    }
    syntax.imports.push(Import::new(from, specifiers, ImportKind::ReExport, line));
}

/// Names bound by an exported declaration.
fn declaration_names(decl: &Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    match decl.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = decl.walk();
            for declarator in decl.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    pattern_identifiers(&name, source, &mut names);
                }
            }
        }
        "ambient_declaration" => {
            let mut cursor = decl.walk();
            for inner in decl.named_children(&mut cursor) {
                names.extend(declaration_names(&inner, source));
            }
        }
        _ => {
            if let Some(name) = decl.child_by_field_name("name").and_then(|n| node_text(&n, source)) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Identifiers bound by a (possibly destructuring) binding pattern.
fn pattern_identifiers(node: &Node, source: &str, names: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            if let Some(text) = node_text(node, source) {
                names.push(text.to_string());
            }
        }
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                pattern_identifiers(&value, source, names);
            }
        }
        "assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                pattern_identifiers(&left, source, names);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                pattern_identifiers(&child, source, names);
            }
        }
    }
}

fn parse_require_or_dynamic_import(node: &Node, source: &str) -> Option<Import> {
    let func = node.child_by_field_name("function")?;
    let kind = match node_text(&func, source)? {
        "require" => ImportKind::Require,
        "import" => ImportKind::Dynamic,
        _ => return None,
    };

    let args = node.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args.named_children(&mut cursor).next()?;
    let module = string_value(&first, source).filter(|s| !s.is_empty())?;

    let specifiers = match kind {
        ImportKind::Require => require_binding(node, source)
            .map(|name| vec![ImportSpecifier::Entire(name)])
            .unwrap_or_else(|| vec![ImportSpecifier::SideEffect]),
        _ => vec![ImportSpecifier::SideEffect],
    };

    Some(Import::new(module, specifiers, kind, line_of(node)))
}

/// The variable in `const x = require('...')`; destructuring binds the whole module.
fn require_binding(call: &Node, source: &str) -> Option<String> {
    let parent = call.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    let name = parent.child_by_field_name("name")?;
    match name.kind() {
        "identifier" => node_text(&name, source).map(str::to_string),
        "object_pattern" | "array_pattern" => Some("*".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> ModuleSyntax {
        let mut scanner = ModuleScanner::new().unwrap();
        scanner.scan_source(source, SourceLanguage::JavaScript, "test.js").unwrap()
    }

    fn scan_ts(source: &str) -> ModuleSyntax {
        let mut scanner = ModuleScanner::new().unwrap();
        scanner.scan_source(source, SourceLanguage::TypeScript, "test.ts").unwrap()
    }

    fn scan_tsx(source: &str) -> ModuleSyntax {
        let mut scanner = ModuleScanner::new().unwrap();
        scanner.scan_source(source, SourceLanguage::Tsx, "test.tsx").unwrap()
    }

    // ===== Imports =====

    #[test]
    fn test_default_import() {
        let syntax = scan(r#"import React from 'react';"#);

        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.imports[0].source, "react");
        assert_eq!(syntax.imports[0].kind, ImportKind::Static);
        assert!(matches!(
            &syntax.imports[0].specifiers[0],
            ImportSpecifier::Default(name) if name == "React"
        ));
    }

    #[test]
    fn test_named_import_with_alias() {
        let syntax = scan(r#"import { useState as state, useEffect } from 'react';"#);

        let specs = &syntax.imports[0].specifiers;
        assert_eq!(specs.len(), 2);
        assert!(matches!(
            &specs[0],
            ImportSpecifier::Named { imported, local } if imported == "useState" && local == "state"
        ));
        assert_eq!(syntax.imports[0].imported_names(), vec!["useState", "useEffect"]);
    }

    #[test]
    fn test_namespace_and_default_together() {
        let syntax = scan(r#"import def, * as utils from './utils';"#);
        let specs = &syntax.imports[0].specifiers;

        assert!(specs.contains(&ImportSpecifier::Default("def".to_string())));
        assert!(specs.contains(&ImportSpecifier::Namespace("utils".to_string())));
    }

    #[test]
    fn test_side_effect_import() {
        let syntax = scan(r#"import './polyfills';"#);
        assert_eq!(syntax.imports[0].specifiers, vec![ImportSpecifier::SideEffect]);
    }

    #[test]
    fn test_require_and_dynamic_import() {
        let syntax = scan(
            r#"
const fs = require('fs');
const { join } = require('path');
require('./register');
const Page = () => import('./pages/Home');
const tpl = import(`./static`);
const skipped = import(`./${name}`);
"#,
        );

        let sources: Vec<_> = syntax.imports.iter().map(|i| (i.source.as_str(), i.kind)).collect();
        assert_eq!(
            sources,
            vec![
                ("fs", ImportKind::Require),
                ("path", ImportKind::Require),
                ("./register", ImportKind::Require),
                ("./pages/Home", ImportKind::Dynamic),
                ("./static", ImportKind::Dynamic),
            ]
        );
        assert_eq!(syntax.imports[0].specifiers, vec![ImportSpecifier::Entire("fs".to_string())]);
        assert_eq!(syntax.imports[2].specifiers, vec![ImportSpecifier::SideEffect]);
        assert_eq!(syntax.imports[3].line, 5);
    }

    #[test]
    fn test_typescript_type_imports() {
        let syntax = scan_ts(r#"import type { Props } from './types';"#);
        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.imports[0].source, "./types");
    }

    #[test]
    fn test_typescript_import_equals_require() {
        let syntax = scan_ts(
            r#"import util = require('./util');
import fs = require("fs");"#,
        );

        assert_eq!(syntax.imports.len(), 2);
        assert_eq!(syntax.imports[0].source, "./util");
        assert_eq!(syntax.imports[0].kind, ImportKind::Require);
        assert_eq!(syntax.imports[0].specifiers, vec![ImportSpecifier::Entire("util".to_string())]);
        assert_eq!(syntax.imports[1].source, "fs");
        assert_eq!(syntax.imports[1].line, 2);
    }

    // ===== Exports =====

    #[test]
    fn test_declaration_exports() {
        let syntax = scan(
            r#"
export const a = 1, b = 2;
export function helper() {}
export class Widget {}
export const { x, y: renamed } = obj;
"#,
        );
        assert_eq!(syntax.export_names(), vec!["a", "b", "helper", "Widget", "x", "renamed"]);
        assert_eq!(syntax.export_line("helper"), Some(3));
    }

    #[test]
    fn test_typescript_declaration_exports() {
        let syntax = scan_ts(
            r#"
export interface Props { a: string }
export type Id = string;
export enum Color { Red }
export abstract class Base {}
"#,
        );
        assert_eq!(syntax.export_names(), vec!["Props", "Id", "Color", "Base"]);
    }

    #[test]
    fn test_default_exports() {
        let syntax = scan(r#"export default function App() { return null; }"#);
        assert_eq!(syntax.export_names(), vec!["default"]);

        let syntax = scan("const x = 1;\nexport default x;");
        assert_eq!(syntax.export_names(), vec!["default"]);
    }

    #[test]
    fn test_local_export_clause() {
        let syntax = scan("const a = 1; const b = 2;\nexport { a, b as c };");
        assert_eq!(syntax.export_names(), vec!["a", "c"]);
        assert!(syntax.imports.is_empty());
    }

    #[test]
    fn test_re_exports() {
        let syntax = scan(
            r#"
export { Button } from './Button';
export { default as Card } from './Card';
export * from './icons';
export * as forms from './forms';
"#,
        );

        assert_eq!(syntax.export_names(), vec!["Button", "Card", "forms"]);
        let reexports: Vec<_> = syntax
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::ReExport)
            .map(|i| i.source.as_str())
            .collect();
        assert_eq!(reexports, vec!["./Button", "./Card", "./icons", "./forms"]);
        assert_eq!(syntax.imports[1].imported_names(), vec!["default"]);
        assert_eq!(
            syntax.imports[2].specifiers,
            vec![ImportSpecifier::Namespace("*".to_string())]
        );
    }

    #[test]
    fn test_tsx_is_parsed_with_jsx_grammar() {
        let syntax = scan_tsx(
            r#"
import { Button } from './Button';
export function Page(): JSX.Element {
  return <Button label="x" />;
}
"#,
        );
        assert_eq!(syntax.imports[0].source, "./Button");
        assert_eq!(syntax.export_names(), vec!["Page"]);
    }

    // ===== Components =====

    #[test]
    fn test_vue_script_blocks() {
        let source = r#"<template>
  <MyButton />
</template>

<script setup lang="ts">
import MyButton from './MyButton.vue';
const count: number = 1;
</script>
"#;
        let mut scanner = ModuleScanner::new().unwrap();
        let syntax = scanner.scan_component(source, "App.vue").unwrap();

        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.imports[0].source, "./MyButton.vue");
        assert_eq!(syntax.imports[0].line, 6);
    }

    #[test]
    fn test_svelte_module_and_instance_scripts() {
        let source = r#"<script context="module">
  export const prerender = true;
</script>
<script>
  import Nav from '$lib/Nav.svelte';
</script>
<Nav />
"#;
        let mut scanner = ModuleScanner::new().unwrap();
        let syntax = scanner.scan_component(source, "+page.svelte").unwrap();

        assert_eq!(syntax.export_names(), vec!["prerender"]);
        assert_eq!(syntax.imports[0].source, "$lib/Nav.svelte");
    }

    #[test]
    fn test_script_attribute_containing_angle_brackets() {
        let source = r#"<script setup lang="ts" generic="T extends Record<string, Item>">
import { format } from './format';
defineProps<{ items: T[] }>();
</script>
"#;
        let mut scanner = ModuleScanner::new().unwrap();
        let syntax = scanner.scan_component(source, "List.vue").unwrap();

        assert_eq!(syntax.imports.len(), 1);
        assert_eq!(syntax.imports[0].source, "./format");
        assert_eq!(syntax.imports[0].line, 2);
    }

    #[test]
    fn test_component_without_script() {
        let mut scanner = ModuleScanner::new().unwrap();
        let syntax = scanner.scan_component("<template><div/></template>", "A.vue").unwrap();
        assert_eq!(syntax, ModuleSyntax::default());
    }
}
