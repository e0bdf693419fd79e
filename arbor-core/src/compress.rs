//! Token-budget-aware rendering of file sets.
//!
//! Budget accounting is approximate: character count divided by a fixed
//! constant stands in for tokens. The compressor itself does not enforce a
//! hard budget; callers wanting one must truncate the file list first.

use crate::config::Config;
use crate::model::{Language, SymbolKind};
use crate::parse;
use serde::Serialize;
use std::path::Path;

/// Fixed proxy: characters per token
pub const CHARS_PER_TOKEN: usize = 4;

/// Approximate token count for a piece of text.
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / CHARS_PER_TOKEN
}

/// Rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressMode {
    /// Complete file contents
    Full,
    /// Declaration lines only, re-derived from a fresh parse
    Signatures,
    /// Signatures for files over the line threshold, full otherwise
    Smart,
}

impl CompressMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(Self::Full),
            "signatures" => Some(Self::Signatures),
            "smart" => Some(Self::Smart),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Signatures => "signatures",
            Self::Smart => "smart",
        }
    }
}

/// Rendered output for a set of files
#[derive(Debug, Serialize)]
pub struct CompressedContext {
    pub content: String,
    pub files_included: usize,
    pub estimated_tokens: usize,
    pub mode: CompressMode,
}

/// Render files in a token-efficient format.
///
/// Missing or unreadable files are noted inline rather than failing the
/// whole render.
pub fn compress(root: &Path, files: &[String], mode: CompressMode, config: &Config) -> CompressedContext {
    let mut sections = Vec::new();

    for file in files {
        let full_path = root.join(file);
        if !full_path.exists() {
            sections.push(format!("### {file} (not found)\n"));
            continue;
        }

        let content = match std::fs::read_to_string(&full_path) {
            Ok(c) => c,
            Err(err) => {
                sections.push(format!("### {file} (error: {err})\n"));
                continue;
            }
        };

        let line_count = content.lines().count();
        let render_full = match mode {
            CompressMode::Full => true,
            CompressMode::Signatures => false,
            CompressMode::Smart => line_count <= config.compress.smart_line_threshold,
        };

        if render_full {
            sections.push(format!("### {file}\n```\n{content}\n```\n"));
        } else {
            sections.push(signatures_only(&full_path, file));
        }
    }

    let content = sections.join("\n");
    CompressedContext {
        estimated_tokens: estimate_tokens(&content),
        content,
        files_included: files.len(),
        mode,
    }
}

/// Declaration lines for one file, indented one level under their class.
fn signatures_only(path: &Path, relative_path: &str) -> String {
    let Some(parsed) = parse::parse_path(path) else {
        return format!("### {relative_path} (could not parse)\n");
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let keyword = declaration_keyword(Language::from_extension(extension));

    let mut lines = vec![format!("### {relative_path} (signatures only)")];
    for symbol in &parsed.symbols {
        match symbol.kind {
            SymbolKind::Class => lines.push(format!("class {}:", symbol.name)),
            SymbolKind::Function | SymbolKind::Method => {
                let indent = if symbol.parent.is_empty() { "" } else { "    " };
                lines.push(format!(
                    "{indent}{keyword} {}{}",
                    symbol.name, symbol.signature
                ));
            }
            _ => {}
        }
    }
    lines.join("\n") + "\n"
}

pub(crate) fn declaration_keyword(language: Language) -> &'static str {
    match language {
        Language::Python => "def",
        _ => "function",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn small_file() -> &'static str {
        "def tiny():\n    return 1\n"
    }

    fn large_file() -> String {
        let mut source = String::from("class Big:\n    def method(self):\n        pass\n\n");
        for i in 0..200 {
            source.push_str(&format!("def fn{i}():\n    return {i}\n\n"));
        }
        source
    }

    #[test]
    fn test_full_mode_includes_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), small_file()).unwrap();

        let result = compress(
            dir.path(),
            &["a.py".to_string()],
            CompressMode::Full,
            &Config::default(),
        );
        assert!(result.content.contains("### a.py"));
        assert!(result.content.contains("return 1"));
        assert_eq!(result.files_included, 1);
    }

    #[test]
    fn test_signatures_mode_drops_bodies() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.py"), large_file()).unwrap();

        let result = compress(
            dir.path(),
            &["big.py".to_string()],
            CompressMode::Signatures,
            &Config::default(),
        );
        assert!(result.content.contains("(signatures only)"));
        assert!(result.content.contains("class Big:"));
        assert!(result.content.contains("    def method(self)"));
        assert!(!result.content.contains("return 1"));
    }

    #[test]
    fn test_smart_mode_picks_by_line_count() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("small.py"), small_file()).unwrap();
        fs::write(dir.path().join("big.py"), large_file()).unwrap();

        let result = compress(
            dir.path(),
            &["small.py".to_string(), "big.py".to_string()],
            CompressMode::Smart,
            &Config::default(),
        );
        assert!(result.content.contains("### small.py\n```"));
        assert!(result.content.contains("### big.py (signatures only)"));
    }

    #[test]
    fn test_missing_file_is_noted_inline() {
        let dir = TempDir::new().unwrap();
        let result = compress(
            dir.path(),
            &["ghost.py".to_string()],
            CompressMode::Full,
            &Config::default(),
        );
        assert!(result.content.contains("### ghost.py (not found)"));
    }

    #[test]
    fn test_token_estimate_is_chars_over_four() {
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens(""), 0);
    }
}
