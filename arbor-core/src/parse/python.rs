//! Python symbol and import extraction

use super::{line_range, node_text, LanguageAdapter, ParsedSource};
use crate::model::{Import, Language, Symbol, SymbolKind};
use tree_sitter::Node;

pub(super) struct PythonAdapter {
    grammar: tree_sitter::Language,
}

impl PythonAdapter {
    pub(super) fn new() -> Self {
        Self {
            grammar: tree_sitter_python::LANGUAGE.into(),
        }
    }
}

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
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
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "unknown".to_string());
            let params = node
                .child_by_field_name("parameters")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "()".to_string());
            let returns = node
                .child_by_field_name("return_type")
                .map(|n| format!(" -> {}", node_text(&n, source)))
                .unwrap_or_default();

            let kind = if parent.is_empty() {
                SymbolKind::Function
            } else {
                SymbolKind::Method
            };
            let (start_line, end_line) = line_range(node);
            out.symbols.push(Symbol {
                name,
                kind,
                signature: format!("{params}{returns}"),
                start_line,
                end_line,
                docstring: extract_docstring(node, source),
                parent: parent.to_string(),
            });
            // Function bodies are not descended into; nested defs are local detail.
        }
        "class_definition" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| "unknown".to_string());

            // Base classes, e.g. "(Base, Mixin)"
            let bases = (0..node.child_count())
                .filter_map(|i| node.child(i))
                .find(|c| c.kind() == "argument_list")
                .map(|c| node_text(&c, source))
                .unwrap_or_default();

            let (start_line, end_line) = line_range(node);
            out.symbols.push(Symbol {
                name: name.clone(),
                kind: SymbolKind::Class,
                signature: bases,
                start_line,
                end_line,
                docstring: extract_docstring(node, source),
                parent: parent.to_string(),
            });

            // Thread the class name down so methods get the right parent
            if let Some(body) = node.child_by_field_name("body") {
                for i in 0..body.child_count() {
                    if let Some(child) = body.child(i) {
                        visit(&child, &name, source, out);
                    }
                }
            }
        }
        "import_statement" => {
            for i in 0..node.child_count() {
                let Some(child) = node.child(i) else { continue };
                match child.kind() {
                    "dotted_name" => out.imports.push(Import {
                        module: node_text(&child, source),
                        items: Vec::new(),
                        alias: String::new(),
                        is_relative: false,
                    }),
                    "aliased_import" => {
                        let module = child
                            .child_by_field_name("name")
                            .map(|n| node_text(&n, source))
                            .unwrap_or_default();
                        let alias = child
                            .child_by_field_name("alias")
                            .map(|n| node_text(&n, source))
                            .unwrap_or_default();
                        out.imports.push(Import {
                            module,
                            items: Vec::new(),
                            alias,
                            is_relative: false,
                        });
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            let module = node
                .child_by_field_name("module_name")
                .map(|n| node_text(&n, source))
                .unwrap_or_default();
            let is_relative = module.starts_with('.');

            let mut items = Vec::new();
            let mut cursor = node.walk();
            for name_node in node.children_by_field_name("name", &mut cursor) {
                match name_node.kind() {
                    "aliased_import" => {
                        if let Some(inner) = name_node.child_by_field_name("name") {
                            items.push(node_text(&inner, source));
                        }
                    }
                    _ => items.push(node_text(&name_node, source)),
                }
            }

            if !module.is_empty() || !items.is_empty() {
                out.imports.push(Import {
                    module,
                    items,
                    alias: String::new(),
                    is_relative,
                });
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

/// First string-literal expression statement at the start of the body.
fn extract_docstring(node: &Node, source: &str) -> String {
    let Some(body) = node.child_by_field_name("body") else {
        return String::new();
    };
    for i in 0..body.child_count() {
        let Some(child) = body.child(i) else { continue };
        if !child.is_named() || child.kind() == "comment" {
            continue;
        }
        if child.kind() == "expression_statement" {
            for j in 0..child.child_count() {
                if let Some(sub) = child.child(j) {
                    if sub.kind() == "string" {
                        return node_text(&sub, source)
                            .trim_matches(|c| c == '"' || c == '\'')
                            .trim()
                            .to_string();
                    }
                }
            }
        }
        // Only the first statement can be a docstring
        break;
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_source;

    #[test]
    fn test_function_extraction() {
        let source = r#"
def greet(name: str) -> str:
    """Say hello."""
    return f"hello {name}"
"#;
        let parsed = parse_source("py", source).unwrap();
        assert_eq!(parsed.symbols.len(), 1);
        let sym = &parsed.symbols[0];
        assert_eq!(sym.name, "greet");
        assert_eq!(sym.kind, SymbolKind::Function);
        assert_eq!(sym.signature, "(name: str) -> str");
        assert_eq!(sym.docstring, "Say hello.");
        assert_eq!(sym.start_line, 2);
        assert!(sym.end_line >= sym.start_line);
        assert!(sym.parent.is_empty());
    }

    #[test]
    fn test_class_and_methods() {
        let source = r#"
class Greeter(Base):
    """A greeter."""

    def __init__(self):
        self.count = 0

    def greet(self, name):
        return name
"#;
        let parsed = parse_source("py", source).unwrap();
        let class = parsed
            .symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Class)
            .unwrap();
        assert_eq!(class.name, "Greeter");
        assert_eq!(class.signature, "(Base)");
        assert_eq!(class.docstring, "A greeter.");

        let methods: Vec<_> = parsed
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Method)
            .collect();
        assert_eq!(methods.len(), 2);
        assert!(methods.iter().all(|m| m.parent == "Greeter"));
    }

    #[test]
    fn test_decorated_method_keeps_parent() {
        let source = r#"
class Api:
    @property
    def value(self):
        return 1
"#;
        let parsed = parse_source("py", source).unwrap();
        let method = parsed.symbols.iter().find(|s| s.name == "value").unwrap();
        assert_eq!(method.kind, SymbolKind::Method);
        assert_eq!(method.parent, "Api");
    }

    #[test]
    fn test_nested_functions_are_not_extracted() {
        let source = r#"
def outer():
    def inner():
        pass
    return inner
"#;
        let parsed = parse_source("py", source).unwrap();
        let names: Vec<_> = parsed.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["outer"]);
    }

    #[test]
    fn test_imports() {
        let source = r#"
import os
import numpy as np
from pathlib import Path
from .helpers import load, save
from ..core import engine
"#;
        let parsed = parse_source("py", source).unwrap();
        assert_eq!(parsed.imports.len(), 5);

        assert_eq!(parsed.imports[0].module, "os");
        assert!(parsed.imports[0].items.is_empty());
        assert!(!parsed.imports[0].is_relative);

        assert_eq!(parsed.imports[1].module, "numpy");
        assert_eq!(parsed.imports[1].alias, "np");

        assert_eq!(parsed.imports[2].module, "pathlib");
        assert_eq!(parsed.imports[2].items, vec!["Path"]);

        assert_eq!(parsed.imports[3].module, ".helpers");
        assert_eq!(parsed.imports[3].items, vec!["load", "save"]);
        assert!(parsed.imports[3].is_relative);

        assert_eq!(parsed.imports[4].module, "..core");
        assert!(parsed.imports[4].is_relative);
    }

    #[test]
    fn test_from_dot_import() {
        let parsed = parse_source("py", "from . import helper\n").unwrap();
        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].module, ".");
        assert_eq!(parsed.imports[0].items, vec!["helper"]);
        assert!(parsed.imports[0].is_relative);
    }

    #[test]
    fn test_garbage_yields_none() {
        assert!(parse_source("py", "\u{0}\u{1}}}((").is_none());
    }
}
