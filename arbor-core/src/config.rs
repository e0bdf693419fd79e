//! Configuration for arbor

use crate::ArborError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Arbor Configuration

[scan]
# Directories deeper than this (relative to the project root) are not descended into
max_depth = 15
# Files above this size (bytes) are skipped entirely
max_file_size_bytes = 1000000
# Additional ignore patterns (beyond the built-in deny-list and .gitignore)
ignore_patterns = []

[callgraph]
# Maximum callers reported per query
max_callers = 50
# Maximum callees reported per query
max_callees = 30
# Callees expanded per step of a flow trace
flow_fanout = 5
# Default depth for flow tracing
flow_max_depth = 10

[compress]
# Files longer than this many lines are rendered signatures-only in smart mode
smart_line_threshold = 100

[map]
# Token ceiling for the repository map
max_tokens = 8000
# Imports listed per file in the map
imports_shown = 5
"#;

/// Arbor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub callgraph: CallGraphConfig,
    #[serde(default)]
    pub compress: CompressConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallGraphConfig {
    #[serde(default = "default_max_callers")]
    pub max_callers: usize,
    #[serde(default = "default_max_callees")]
    pub max_callees: usize,
    #[serde(default = "default_flow_fanout")]
    pub flow_fanout: usize,
    #[serde(default = "default_flow_max_depth")]
    pub flow_max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressConfig {
    #[serde(default = "default_smart_line_threshold")]
    pub smart_line_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_imports_shown")]
    pub imports_shown: usize,
}

// Default value functions
fn default_max_depth() -> usize {
    15
}
fn default_max_file_size() -> u64 {
    1_000_000
}
fn default_max_callers() -> usize {
    50
}
fn default_max_callees() -> usize {
    30
}
fn default_flow_fanout() -> usize {
    5
}
fn default_flow_max_depth() -> usize {
    10
}
fn default_smart_line_threshold() -> usize {
    100
}
fn default_map_max_tokens() -> usize {
    8000
}
fn default_imports_shown() -> usize {
    5
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_file_size_bytes: default_max_file_size(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl Default for CallGraphConfig {
    fn default() -> Self {
        Self {
            max_callers: default_max_callers(),
            max_callees: default_max_callees(),
            flow_fanout: default_flow_fanout(),
            flow_max_depth: default_flow_max_depth(),
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            smart_line_threshold: default_smart_line_threshold(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_map_max_tokens(),
            imports_shown: default_imports_shown(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| ArborError::ConfigParse(e.to_string()))
    }

    /// Load `arbor.toml` from the project root if present, defaults otherwise.
    pub fn load_or_default(root: &Path) -> crate::Result<Self> {
        let path = root.join("arbor.toml");
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.scan.max_depth, 15);
        assert_eq!(config.scan.max_file_size_bytes, 1_000_000);
        assert_eq!(config.callgraph.max_callers, 50);
        assert_eq!(config.compress.smart_line_threshold, 100);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.callgraph.max_callees, 30);
        assert_eq!(config.map.max_tokens, 8000);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[scan]\nmax_depth = 3\n").unwrap();
        assert_eq!(config.scan.max_depth, 3);
        assert_eq!(config.scan.max_file_size_bytes, 1_000_000);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("[scan\nmax_depth = ").is_err());
    }
}
