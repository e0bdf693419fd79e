//! Call graph analysis: callers, callees and flow tracing.
//!
//! Callee detection is a lexical scan of the target symbol's body for
//! `identifier(` tokens, not parse-aware call resolution: string or comment
//! text that looks like a call will over-match, and calls through aliases or
//! higher-order dispatch will under-match. Callers are found by re-parsing
//! every file whose raw text contains the call token and attributing the
//! match to the enclosing function or method.

use crate::config::Config;
use crate::error::ArborError;
use crate::model::{Language, Symbol, SymbolIndex, SymbolKind};
use crate::parse::{self, PARSEABLE_EXTENSIONS};
use crate::scan::{scan, ScanOptions};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Control-flow keywords and builtins excluded from callee detection.
const PYTHON_CALL_EXCLUDES: &[&str] = &[
    "if", "for", "while", "with", "try", "except", "return", "print", "len", "str", "int",
    "float", "list", "dict", "set", "tuple", "range", "enumerate", "zip", "map", "filter",
    "sorted", "open",
];

const ECMA_CALL_EXCLUDES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "typeof", "super",
    "require", "console", "constructor", "await", "new", "String", "Number", "Boolean",
    "Array", "Object", "Promise", "Error", "Date", "JSON", "Math", "Set", "Map",
    "parseInt", "parseFloat",
];

fn call_excludes(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => PYTHON_CALL_EXCLUDES,
        _ => ECMA_CALL_EXCLUDES,
    }
}

fn call_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("static call pattern"))
}

fn symbol_call_regex(name: &str) -> Regex {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).expect("escaped symbol pattern")
}

/// Traversal direction for a call graph query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Callers,
    Callees,
    Both,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "callers" => Some(Self::Callers),
            "callees" => Some(Self::Callees),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// A function or method that calls the target
#[derive(Debug, Clone, Serialize)]
pub struct CallSite {
    pub file: String,
    pub function: String,
    pub line: usize,
}

/// Call graph for one target symbol
#[derive(Debug, Serialize)]
pub struct CallGraph {
    pub function: String,
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callers: Option<Vec<CallSite>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callees: Option<Vec<String>>,
}

/// One step of a flow trace
#[derive(Debug, Serialize)]
pub struct FlowStep {
    pub depth: usize,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub external: bool,
}

/// Flow trace from an entry symbol
#[derive(Debug, Serialize)]
pub struct FlowTrace {
    pub entry_point: String,
    pub steps: Vec<FlowStep>,
}

/// Compute the call graph for a symbol.
///
/// The target is the first entry for the name in the index, a deterministic
/// but arbitrary choice when the name is defined more than once.
pub fn call_graph(
    index: &SymbolIndex,
    root: &Path,
    function_name: &str,
    direction: Direction,
    config: &Config,
) -> crate::Result<CallGraph> {
    let occurrences = index.find_symbol(function_name);
    let (file, symbol) = occurrences
        .first()
        .ok_or_else(|| ArborError::SymbolNotFound(function_name.to_string()))?;

    let mut graph = CallGraph {
        function: function_name.to_string(),
        file: file.clone(),
        line: symbol.start_line,
        callers: None,
        callees: None,
    };

    if matches!(direction, Direction::Callers | Direction::Both) {
        graph.callers = Some(find_callers(root, function_name, config)?);
    }
    if matches!(direction, Direction::Callees | Direction::Both) {
        graph.callees = Some(find_callees(
            root,
            file,
            symbol,
            config.callgraph.max_callees,
        ));
    }

    Ok(graph)
}

/// Every function or method whose body contains the literal call token.
fn find_callers(root: &Path, target: &str, config: &Config) -> crate::Result<Vec<CallSite>> {
    let pattern = symbol_call_regex(target);
    let options = ScanOptions::from_config(&config.scan).with_extensions(PARSEABLE_EXTENSIONS);

    let mut callers = Vec::new();
    for file in scan(root, &options)? {
        let Ok(content) = std::fs::read_to_string(&file.path) else {
            continue;
        };
        if !pattern.is_match(&content) {
            continue;
        }
        let Some(parsed) = parse::parse_source(&file.extension, &content) else {
            continue;
        };

        let lines: Vec<&str> = content.lines().collect();
        for symbol in &parsed.symbols {
            if !matches!(symbol.kind, SymbolKind::Function | SymbolKind::Method) {
                continue;
            }
            let body = slice_lines(&lines, symbol.start_line, symbol.end_line);
            if pattern.is_match(&body) && symbol.name != target {
                callers.push(CallSite {
                    file: file.relative_path.clone(),
                    function: symbol.name.clone(),
                    line: symbol.start_line,
                });
                if callers.len() >= config.callgraph.max_callers {
                    return Ok(callers);
                }
            }
        }
    }
    Ok(callers)
}

/// Lexical callee scan over the symbol's own line range. Deduplicated,
/// self-recursion excluded, capped at `max`.
pub(crate) fn find_callees(root: &Path, file: &str, symbol: &Symbol, max: usize) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(root.join(file)) else {
        return Vec::new();
    };
    let lines: Vec<&str> = content.lines().collect();
    let body = slice_lines(&lines, symbol.start_line, symbol.end_line);
    if body.is_empty() {
        return Vec::new();
    }

    let extension = Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let excludes = call_excludes(Language::from_extension(extension));

    let mut seen = HashSet::new();
    let mut callees = Vec::new();
    for capture in call_token_regex().captures_iter(&body) {
        let name = &capture[1];
        if excludes.contains(&name) || name == symbol.name || seen.contains(name) {
            continue;
        }
        seen.insert(name.to_string());
        callees.push(name.to_string());
        if callees.len() >= max {
            break;
        }
    }
    callees
}

fn slice_lines(lines: &[&str], start_line: usize, end_line: usize) -> String {
    let start = start_line.saturating_sub(1);
    let end = end_line.min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}

/// Trace execution flow from an entry symbol.
///
/// Callees are expanded recursively up to `max_depth`. A name is expanded at
/// most once even when reachable via multiple paths, so the trace terminates
/// under mutual recursion. Callees with no definition in the index are
/// recorded as external leaves.
pub fn trace_flow(
    index: &SymbolIndex,
    root: &Path,
    entry_point: &str,
    max_depth: usize,
    config: &Config,
) -> crate::Result<FlowTrace> {
    if index.find_symbol(entry_point).is_empty() {
        return Err(ArborError::SymbolNotFound(entry_point.to_string()));
    }

    let mut visited = HashSet::new();
    let mut steps = Vec::new();
    expand_flow(
        index,
        root,
        entry_point,
        0,
        max_depth,
        config,
        &mut visited,
        &mut steps,
    );

    Ok(FlowTrace {
        entry_point: entry_point.to_string(),
        steps,
    })
}

#[allow(clippy::too_many_arguments)]
fn expand_flow(
    index: &SymbolIndex,
    root: &Path,
    name: &str,
    depth: usize,
    max_depth: usize,
    config: &Config,
    visited: &mut HashSet<String>,
    steps: &mut Vec<FlowStep>,
) {
    if depth > max_depth || visited.contains(name) {
        return;
    }
    visited.insert(name.to_string());

    let occurrences = index.find_symbol(name);
    let Some((file, symbol)) = occurrences.first() else {
        steps.push(FlowStep {
            depth,
            function: name.to_string(),
            file: None,
            line: None,
            signature: None,
            external: true,
        });
        return;
    };

    steps.push(FlowStep {
        depth,
        function: name.to_string(),
        file: Some(file.clone()),
        line: Some(symbol.start_line),
        signature: Some(symbol.signature.clone()),
        external: false,
    });

    let callees = find_callees(root, file, symbol, config.callgraph.max_callees);
    for callee in callees.iter().take(config.callgraph.flow_fanout) {
        expand_flow(
            index, root, callee, depth + 1, max_depth, config, visited, steps,
        );
    }
}
