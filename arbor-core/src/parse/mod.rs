//! Language parse adapters over tree-sitter grammars.
//!
//! One adapter per supported language behind a single contract: given file
//! content, produce the file's symbols and imports. New languages are added
//! as new [`LanguageAdapter`] implementations registered here, without
//! touching the index builder. The registry is process-wide immutable state,
//! initialized once and shared across concurrent readers.

mod ecma;
mod python;

use crate::model::{Import, Language, Symbol};
use std::path::Path;
use std::sync::OnceLock;
use tree_sitter::Node;

/// Extensions the index builder restricts itself to.
pub const PARSEABLE_EXTENSIONS: &[&str] = &["py", "ts", "tsx", "js", "jsx", "mjs"];

/// Result of parsing one file
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub symbols: Vec<Symbol>,
    pub imports: Vec<Import>,
}

/// Per-language extraction contract.
///
/// `parse` returns `None` when the content cannot be parsed as this
/// language; there are no partial results. Callers treat `None` as "this
/// file contributes nothing", not as an error.
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;
    fn parse(&self, source: &str) -> Option<ParsedSource>;
}

struct Registration {
    extensions: &'static [&'static str],
    adapter: Box<dyn LanguageAdapter>,
}

static REGISTRY: OnceLock<Vec<Registration>> = OnceLock::new();

fn registry() -> &'static [Registration] {
    REGISTRY.get_or_init(|| {
        vec![
            Registration {
                extensions: &["py"],
                adapter: Box::new(python::PythonAdapter::new()),
            },
            Registration {
                extensions: &["ts"],
                adapter: Box::new(ecma::EcmaAdapter::typescript()),
            },
            Registration {
                extensions: &["tsx"],
                adapter: Box::new(ecma::EcmaAdapter::tsx()),
            },
            Registration {
                extensions: &["js", "jsx", "mjs"],
                adapter: Box::new(ecma::EcmaAdapter::javascript()),
            },
        ]
    })
}

/// Look up the adapter for a file extension (no dot), if any.
pub fn adapter_for_extension(extension: &str) -> Option<&'static dyn LanguageAdapter> {
    let extension = extension.to_ascii_lowercase();
    registry()
        .iter()
        .find(|r| r.extensions.contains(&extension.as_str()))
        .map(|r| r.adapter.as_ref())
}

/// Parse source text according to its file extension.
pub fn parse_source(extension: &str, source: &str) -> Option<ParsedSource> {
    adapter_for_extension(extension)?.parse(source)
}

/// Read and parse a file from disk. Unsupported extensions, unreadable
/// content and parse failures all yield `None`.
pub fn parse_path(path: &Path) -> Option<ParsedSource> {
    let extension = path.extension()?.to_str()?;
    let adapter = adapter_for_extension(extension)?;
    let source = std::fs::read_to_string(path).ok()?;
    adapter.parse(&source)
}

pub(crate) fn node_text(node: &Node, source: &str) -> String {
    source[node.start_byte()..node.end_byte()].to_string()
}

pub(crate) fn line_range(node: &Node) -> (usize, usize) {
    (node.start_position().row + 1, node.end_position().row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_lookup() {
        assert_eq!(
            adapter_for_extension("py").map(|a| a.language()),
            Some(Language::Python)
        );
        assert_eq!(
            adapter_for_extension("TSX").map(|a| a.language()),
            Some(Language::TypeScript)
        );
        assert_eq!(
            adapter_for_extension("mjs").map(|a| a.language()),
            Some(Language::JavaScript)
        );
        assert!(adapter_for_extension("md").is_none());
    }

    #[test]
    fn test_parse_source_dispatches_by_extension() {
        let parsed = parse_source("py", "def f():\n    pass\n").unwrap();
        assert_eq!(parsed.symbols.len(), 1);
        assert_eq!(parsed.symbols[0].name, "f");
    }

    #[test]
    fn test_unsupported_extension_is_none() {
        assert!(parse_source("md", "# heading\n").is_none());
    }
}
