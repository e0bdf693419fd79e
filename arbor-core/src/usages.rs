//! Symbol usage search: every place a name is referenced, not just defined.

use crate::config::Config;
use crate::model::Language;
use crate::parse::PARSEABLE_EXTENSIONS;
use crate::scan::{scan, ScanOptions};
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// How a usage site relates to the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    Definition,
    Import,
    Call,
    Attribute,
    Assignment,
    Reference,
}

impl UsageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Import => "import",
            Self::Call => "call",
            Self::Attribute => "attribute",
            Self::Assignment => "assignment",
            Self::Reference => "reference",
        }
    }
}

/// One usage site of a symbol
#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub file: String,
    pub line: usize,
    /// The matching line, trimmed and truncated
    pub content: String,
    pub kind: UsageKind,
}

const MAX_CONTENT_CHARS: usize = 150;

/// Find all word-boundary references to a symbol across parseable files.
pub fn find_usages(root: &Path, symbol_name: &str, config: &Config) -> crate::Result<Vec<Usage>> {
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(symbol_name)))
        .expect("escaped symbol pattern");
    let options = ScanOptions::from_config(&config.scan).with_extensions(PARSEABLE_EXTENSIONS);

    let mut usages = Vec::new();
    for file in scan(root, &options)? {
        let Ok(content) = std::fs::read_to_string(&file.path) else {
            continue;
        };
        for (line_number, line) in content.lines().enumerate() {
            if pattern.is_match(line) {
                usages.push(Usage {
                    file: file.relative_path.clone(),
                    line: line_number + 1,
                    content: line.trim().chars().take(MAX_CONTENT_CHARS).collect(),
                    kind: classify_usage(line, symbol_name, file.language),
                });
            }
        }
    }
    Ok(usages)
}

/// Classify a usage site from its line text. This is a line-level heuristic,
/// same as the callee scan: it cannot see multi-line statements.
fn classify_usage(line: &str, symbol_name: &str, language: Language) -> UsageKind {
    let line = line.trim();
    let call_token = format!("{symbol_name}(");

    let is_definition = match language {
        Language::Python => {
            ((line.starts_with("def ") || line.starts_with("async def "))
                && line.contains(&call_token))
                || (line.starts_with("class ") && line.contains(symbol_name))
        }
        _ => {
            (line.starts_with("function ") || line.contains(" function "))
                && line.contains(&call_token)
                || (line.starts_with("class ") && line.contains(symbol_name))
        }
    };
    if is_definition {
        return UsageKind::Definition;
    }
    if line.contains("import") && line.contains(symbol_name) {
        return UsageKind::Import;
    }
    if line.contains(&call_token) {
        return UsageKind::Call;
    }
    if line.contains(&format!(".{symbol_name}")) {
        return UsageKind::Attribute;
    }
    if line.contains(&format!("{symbol_name} =")) || line.contains(&format!("{symbol_name}:")) {
        return UsageKind::Assignment;
    }
    UsageKind::Reference
}
