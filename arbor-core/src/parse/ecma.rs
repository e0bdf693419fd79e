//! TypeScript and JavaScript symbol and import extraction.
//!
//! Both languages share one walker; the adapter instance picks the grammar
//! (the TSX dialect has its own grammar, selected by extension in the
//! registry).

use super::{line_range, node_text, LanguageAdapter, ParsedSource};
use crate::model::{Import, Language, Symbol, SymbolKind};
use tree_sitter::Node;

pub(super) struct EcmaAdapter {
    language: Language,
    grammar: tree_sitter::Language,
}

impl EcmaAdapter {
    pub(super) fn typescript() -> Self {
        Self {
            language: Language::TypeScript,
            grammar: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    pub(super) fn tsx() -> Self {
        Self {
            language: Language::TypeScript,
            grammar: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    pub(super) fn javascript() -> Self {
        Self {
            language: Language::JavaScript,
            grammar: tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl LanguageAdapter for EcmaAdapter {
    fn language(&self) -> Language {
        self.language
    }

    fn parse(&self, source: &str) -> Option<ParsedSource> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&self.grammar).ok()?;
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();

        let mut parsed = ParsedSource::default();
        visit(&root, "", source, &mut parsed);

        if root.has_error() && parsed.symbols.is_empty() && parsed.imports.is_empty() {
            return None;
        }
        Some(parsed)
    }
}

fn visit(node: &Node, parent: &str, source: &str, out: &mut ParsedSource) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "anonymous".to_string());
            let params = node
                .child_by_field_name("parameters")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "()".to_string());
            let (start_line, end_line) = line_range(node);
            out.symbols.push(Symbol {
                name,
                kind: SymbolKind::Function,
                signature: params,
                start_line,
                end_line,
                docstring: String::new(),
                parent: parent.to_string(),
            });
        }
        "method_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "anonymous".to_string());
            let params = node
                .child_by_field_name("parameters")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "()".to_string());
            // Object-literal methods have no enclosing class; a method symbol
            // always carries a parent, so those degrade to functions
            let kind = if parent.is_empty() {
                SymbolKind::Function
            } else {
                SymbolKind::Method
            };
            let (start_line, end_line) = line_range(node);
            out.symbols.push(Symbol {
                name,
                kind,
                signature: params,
                start_line,
                end_line,
                docstring: String::new(),
                parent: parent.to_string(),
            });
        }
        "class_declaration" | "class" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "anonymous".to_string());
            let (start_line, end_line) = line_range(node);
            out.symbols.push(Symbol {
                name: name.clone(),
                kind: SymbolKind::Class,
                signature: String::new(),
                start_line,
                end_line,
                docstring: String::new(),
                parent: parent.to_string(),
            });

            if let Some(body) = node.child_by_field_name("body") {
                for i in 0..body.child_count() {
                    if let Some(child) = body.child(i) {
                        visit(&child, &name, source, out);
                    }
                }
            }
        }
        "import_statement" => {
            if let Some(import) = extract_import(node, source) {
                out.imports.push(import);
            }
        }
        _ => {
            for i in 0..node.child_count() {
                if let Some(child) = node.child(i) {
                    visit(&child, parent, source, out);
                }
            }
        }
    }
}

fn extract_import(node: &Node, source: &str) -> Option<Import> {
    let module = node
        .child_by_field_name("source")
        .map(|n| {
            node_text(&n, source)
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })?;

    let mut items = Vec::new();
    let mut alias = String::new();
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        if child.kind() == "import_clause" {
            collect_import_clause(&child, source, &mut items, &mut alias);
        }
    }

    let is_relative = module.starts_with('.');
    Some(Import {
        module,
        items,
        alias,
        is_relative,
    })
}

fn collect_import_clause(node: &Node, source: &str, items: &mut Vec<String>, alias: &mut String) {
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        match child.kind() {
            // Default import: `import foo from "x"`
            "identifier" => items.push(node_text(&child, source)),
            // `import * as ns from "x"`
            "namespace_import" => {
                for j in 0..child.child_count() {
                    if let Some(sub) = child.child(j) {
                        if sub.kind() == "identifier" {
                            *alias = node_text(&sub, source);
                        }
                    }
                }
            }
            // `import { a, b as c } from "x"`
            "named_imports" => {
                for j in 0..child.child_count() {
                    let Some(specifier) = child.child(j) else { continue };
                    if specifier.kind() == "import_specifier" {
                        if let Some(name) = specifier.child_by_field_name("name") {
                            items.push(node_text(&name, source));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_source;

    #[test]
    fn test_typescript_functions_and_classes() {
        let source = r#"
export function loadConfig(path: string): Config {
    return read(path);
}

export class Server {
    start(port: number) {
        listen(port);
    }

    stop() {}
}
"#;
        let parsed = parse_source("ts", source).unwrap();

        let func = parsed
            .symbols
            .iter()
            .find(|s| s.name == "loadConfig")
            .unwrap();
        assert_eq!(func.kind, SymbolKind::Function);
        assert_eq!(func.signature, "(path: string)");
        assert!(func.parent.is_empty());

        let class = parsed.symbols.iter().find(|s| s.name == "Server").unwrap();
        assert_eq!(class.kind, SymbolKind::Class);

        let methods: Vec<_> = parsed
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Method)
            .collect();
        assert_eq!(methods.len(), 2);
        assert!(methods.iter().all(|m| m.parent == "Server"));
    }

    #[test]
    fn test_javascript_imports() {
        let source = r#"
import fs from "fs";
import { join, resolve } from "path";
import * as util from "./util";
import { helper } from "../lib/helper";
"#;
        let parsed = parse_source("js", source).unwrap();
        assert_eq!(parsed.imports.len(), 4);

        assert_eq!(parsed.imports[0].module, "fs");
        assert_eq!(parsed.imports[0].items, vec!["fs"]);
        assert!(!parsed.imports[0].is_relative);

        assert_eq!(parsed.imports[1].module, "path");
        assert_eq!(parsed.imports[1].items, vec!["join", "resolve"]);

        assert_eq!(parsed.imports[2].module, "./util");
        assert_eq!(parsed.imports[2].alias, "util");
        assert!(parsed.imports[2].is_relative);

        assert_eq!(parsed.imports[3].module, "../lib/helper");
        assert_eq!(parsed.imports[3].items, vec!["helper"]);
        assert!(parsed.imports[3].is_relative);
    }

    #[test]
    fn test_tsx_component() {
        let source = r#"
import { useState } from "react";

export function Counter() {
    const [count, setCount] = useState(0);
    return <button onClick={() => setCount(count + 1)}>{count}</button>;
}
"#;
        let parsed = parse_source("tsx", source).unwrap();
        let func = parsed.symbols.iter().find(|s| s.name == "Counter").unwrap();
        assert_eq!(func.kind, SymbolKind::Function);
        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].module, "react");
    }

    #[test]
    fn test_object_literal_method_is_not_a_method() {
        let source = r#"
const handlers = {
    onClick() { return 1; },
};
"#;
        let parsed = parse_source("js", source).unwrap();
        let sym = parsed.symbols.iter().find(|s| s.name == "onClick").unwrap();
        assert_eq!(sym.kind, SymbolKind::Function);
        assert!(sym.parent.is_empty());
    }
}
