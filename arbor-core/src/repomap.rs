//! Condensed repository map: the full symbol structure of a codebase,
//! grouped by directory, held under a token ceiling.

use crate::compress::{declaration_keyword, estimate_tokens};
use crate::config::Config;
use crate::index::build_index;
use crate::model::{Language, SymbolKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A rendered repository map
#[derive(Debug, Serialize)]
pub struct RepoMap {
    pub text: String,
    pub files: usize,
    pub symbols: usize,
    pub estimated_tokens: usize,
    pub truncated: bool,
}

/// Generate the repository map.
///
/// Builds a fresh index, lists every file's imports and declarations grouped
/// by directory, and truncates line-by-line if the configured token ceiling
/// is exceeded.
pub fn repo_map(root: &Path, config: &Config, include_docstrings: bool) -> crate::Result<RepoMap> {
    let index = build_index(root, config)?;

    let project_name = root
        .canonicalize()?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());

    let mut files_by_dir: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in index.symbols_by_file.keys() {
        let dir = file
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_else(|| ".".to_string());
        files_by_dir.entry(dir).or_default().push(file.clone());
    }

    let mut lines = Vec::new();
    lines.push(format!("# Repository Map: {project_name}"));
    lines.push(String::new());

    for (dir, mut files) in files_by_dir {
        files.sort();
        lines.push(format!("## {dir}/"));
        lines.push(String::new());

        for file in files {
            let symbols = index.symbols_by_file.get(&file).cloned().unwrap_or_default();
            let imports = index.imports_by_file.get(&file).cloned().unwrap_or_default();
            let file_name = file.rsplit('/').next().unwrap_or(&file);
            let extension = Path::new(&file)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            let keyword = declaration_keyword(Language::from_extension(extension));

            lines.push(format!("### {file_name}"));

            if !imports.is_empty() {
                let digests: Vec<String> = imports
                    .iter()
                    .take(config.map.imports_shown)
                    .map(|imp| {
                        if imp.items.is_empty() {
                            imp.module.clone()
                        } else {
                            let items: Vec<_> =
                                imp.items.iter().take(3).map(String::as_str).collect();
                            format!("{{{}}} from {}", items.join(", "), imp.module)
                        }
                    })
                    .collect();
                lines.push(format!("  imports: {}", digests.join(", ")));
            }

            for class in symbols.iter().filter(|s| s.kind == SymbolKind::Class) {
                lines.push(format!("  class {}{}:", class.name, class.signature));
                if include_docstrings && !class.docstring.is_empty() {
                    lines.push(format!("    \"\"\"{}\"\"\"", clip(&class.docstring, 100)));
                }
                for method in symbols
                    .iter()
                    .filter(|s| s.kind == SymbolKind::Method && s.parent == class.name)
                {
                    lines.push(format!("    {keyword} {}{}", method.name, method.signature));
                }
            }

            for function in symbols.iter().filter(|s| s.kind == SymbolKind::Function) {
                lines.push(format!("  {keyword} {}{}", function.name, function.signature));
                if include_docstrings && !function.docstring.is_empty() {
                    lines.push(format!("    \"\"\"{}\"\"\"", clip(&function.docstring, 80)));
                }
            }

            lines.push(String::new());
        }
    }

    let files = index.file_count();
    let symbols = index.symbol_count();

    let text = lines.join("\n");
    if estimate_tokens(&text) > config.map.max_tokens {
        let truncated = truncate_lines(&lines, config.map.max_tokens);
        return Ok(RepoMap {
            estimated_tokens: estimate_tokens(&truncated),
            text: truncated,
            files,
            symbols,
            truncated: true,
        });
    }

    Ok(RepoMap {
        estimated_tokens: estimate_tokens(&text),
        text,
        files,
        symbols,
        truncated: false,
    })
}

fn truncate_lines(lines: &[String], max_tokens: usize) -> String {
    let mut kept = Vec::new();
    let mut token_count = 0;
    for line in lines {
        let line_tokens = estimate_tokens(line) + 1;
        if token_count + line_tokens > max_tokens {
            kept.push("... (truncated)".to_string());
            break;
        }
        kept.push(line.clone());
        token_count += line_tokens;
    }
    kept.join("\n")
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max).collect();
        format!("{clipped}...")
    }
}
