//! Data model: file descriptors, symbols, imports, and the aggregate index

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Language detected from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    TypeScript,
    JavaScript,
    Json,
    Yaml,
    Markdown,
    Toml,
    Html,
    Css,
    Scss,
    Sql,
    Shell,
    Ini,
    Xml,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    Text,
    Unknown,
}

impl Language {
    /// Map a file extension (without the dot) to a language.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyw" => Self::Python,
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "md" => Self::Markdown,
            "toml" => Self::Toml,
            "html" => Self::Html,
            "css" => Self::Css,
            "scss" => Self::Scss,
            "sql" => Self::Sql,
            "sh" | "bash" => Self::Shell,
            "ini" | "cfg" => Self::Ini,
            "xml" => Self::Xml,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "java" => Self::Java,
            "c" | "h" => Self::C,
            "cpp" | "hpp" => Self::Cpp,
            "txt" => Self::Text,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
            Self::Toml => "toml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sql => "sql",
            Self::Shell => "shell",
            Self::Ini => "ini",
            Self::Xml => "xml",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }

    /// Languages with a parse adapter (see [`crate::parse`]).
    pub fn is_parseable(self) -> bool {
        matches!(self, Self::Python | Self::TypeScript | Self::JavaScript)
    }

    /// Primary source extension, used for best-effort import candidates.
    pub fn primary_extension(self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::JavaScript => "js",
            _ => "py",
        }
    }
}

/// A file discovered by the repository scanner
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Repo-relative path, forward-slash normalized. This is the canonical
    /// identity used by every other component.
    pub relative_path: String,
    /// Lowercased extension without the dot (empty if none)
    pub extension: String,
    pub size_bytes: u64,
    pub language: Language,
}

/// Symbol kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Variable,
    Import,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Import => "import",
        }
    }
}

/// A declared symbol extracted from a parsed file.
///
/// Line numbers are 1-indexed and inclusive, taken from the syntax tree's
/// source span. `parent` is the enclosing class name; it is empty for
/// module-level symbols and always non-empty for methods. Symbols with the
/// same name may repeat across files and within one file; the index never
/// deduplicates by name.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Raw parameter/type text, language-specific, opaque
    pub signature: String,
    pub start_line: usize,
    pub end_line: usize,
    pub docstring: String,
    pub parent: String,
}

/// An import statement as written in a source file.
///
/// Resolution to a concrete file is a derived fact stored in the import
/// graph, not here.
#[derive(Debug, Clone, Serialize)]
pub struct Import {
    /// Raw module reference as written
    pub module: String,
    /// Named imports; empty for whole-module imports
    pub items: Vec<String>,
    pub alias: String,
    /// True if the reference is anchored to the importing file's location
    /// rather than a package root
    pub is_relative: bool,
}

/// Import and symbol information for a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileDependencies {
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
    pub symbols: Vec<Symbol>,
}

/// The aggregate symbol index for one repository.
///
/// Built fresh by [`crate::index::build_index`] for each top-level query and
/// discarded afterwards. Read-only once built; concurrent readers are safe,
/// there are no concurrent writers.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    /// relative path → symbols in declaration order
    pub symbols_by_file: HashMap<String, Vec<Symbol>>,
    /// name → (relative path, symbol) in insertion order. Consumers wanting
    /// "the" definition take the first entry; this is a deterministic
    /// heuristic, not a disambiguation guarantee.
    pub symbols_by_name: HashMap<String, Vec<(String, Symbol)>>,
    /// relative path → imports in declaration order
    pub imports_by_file: HashMap<String, Vec<Import>>,
    /// relative path → files this file resolves imports to
    pub imports_of: HashMap<String, BTreeSet<String>>,
    /// relative path → files that import this file (inverse of `imports_of`)
    pub imported_by: HashMap<String, BTreeSet<String>>,
}

impl SymbolIndex {
    /// Fold one parsed file into the aggregate maps.
    pub fn add_file(&mut self, relative_path: &str, symbols: Vec<Symbol>, imports: Vec<Import>) {
        for symbol in &symbols {
            self.symbols_by_name
                .entry(symbol.name.clone())
                .or_default()
                .push((relative_path.to_string(), symbol.clone()));
        }
        self.symbols_by_file
            .insert(relative_path.to_string(), symbols);
        self.imports_by_file
            .insert(relative_path.to_string(), imports);
    }

    /// Insert a resolved import edge, updating both directions together so
    /// `imported_by` stays the exact inverse of `imports_of`.
    pub fn add_import_edge(&mut self, from: &str, to: &str) {
        self.imports_of
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.imported_by
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    /// All occurrences of a symbol name, in insertion order.
    pub fn find_symbol(&self, name: &str) -> &[(String, Symbol)] {
        self.symbols_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Files this file imports (resolved edges only).
    pub fn imports_of(&self, relative_path: &str) -> Option<&BTreeSet<String>> {
        self.imports_of.get(relative_path)
    }

    /// Files importing this file (resolved edges only).
    pub fn imported_by(&self, relative_path: &str) -> Option<&BTreeSet<String>> {
        self.imported_by.get(relative_path)
    }

    /// Import and symbol information for one file.
    pub fn file_dependencies(&self, relative_path: &str) -> FileDependencies {
        FileDependencies {
            imports: self
                .imports_of
                .get(relative_path)
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_default(),
            imported_by: self
                .imported_by
                .get(relative_path)
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_default(),
            symbols: self
                .symbols_by_file
                .get(relative_path)
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.symbols_by_file.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols_by_file.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("TSX"), Language::TypeScript);
        assert_eq!(Language::from_extension("mjs"), Language::JavaScript);
        assert_eq!(Language::from_extension("csv"), Language::Unknown);
    }

    #[test]
    fn test_parseable_languages() {
        assert!(Language::Python.is_parseable());
        assert!(Language::TypeScript.is_parseable());
        assert!(!Language::Markdown.is_parseable());
    }

    fn symbol(name: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            signature: "()".to_string(),
            start_line: 1,
            end_line: 2,
            docstring: String::new(),
            parent: String::new(),
        }
    }

    #[test]
    fn test_add_file_preserves_order() {
        let mut index = SymbolIndex::default();
        index.add_file("a.py", vec![symbol("f"), symbol("g")], vec![]);
        index.add_file("b.py", vec![symbol("f")], vec![]);

        let occurrences = index.find_symbol("f");
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].0, "a.py");
        assert_eq!(occurrences[1].0, "b.py");
    }

    #[test]
    fn test_edge_insertion_is_symmetric() {
        let mut index = SymbolIndex::default();
        index.add_import_edge("b.py", "a.py");

        assert!(index.imports_of("b.py").unwrap().contains("a.py"));
        assert!(index.imported_by("a.py").unwrap().contains("b.py"));
        assert!(index.imports_of("a.py").is_none());
    }

    #[test]
    fn test_file_dependencies_for_unknown_file_is_empty() {
        let index = SymbolIndex::default();
        let deps = index.file_dependencies("missing.py");
        assert!(deps.imports.is_empty());
        assert!(deps.imported_by.is_empty());
        assert!(deps.symbols.is_empty());
    }
}
