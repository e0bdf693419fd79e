//! Change impact analysis over the import graph.

use crate::error::ArborError;
use crate::model::SymbolIndex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Blast-radius classification by dependent count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Thresholds are design constants: 0 affected is low, 1-5 medium,
    /// more than 5 high.
    fn from_affected(total: usize) -> Self {
        match total {
            0 => Self::Low,
            1..=5 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// What changing a file would affect
#[derive(Debug, Serialize)]
pub struct ChangeImpact {
    pub file: String,
    /// Public symbols the file provides (no leading underscore)
    pub symbols_exported: Vec<String>,
    /// Files importing this file
    pub direct_dependents: Vec<String>,
    /// Files importing the direct dependents: one hop beyond direct, not
    /// the full transitive closure
    pub indirect_dependents: Vec<String>,
    pub total_affected_files: usize,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

/// Analyze what would be affected by changing `file_path`.
pub fn change_impact(
    index: &SymbolIndex,
    root: &Path,
    file_path: &str,
) -> crate::Result<ChangeImpact> {
    if !index.symbols_by_file.contains_key(file_path) && !root.join(file_path).exists() {
        return Err(ArborError::FileNotFound(root.join(file_path)));
    }

    let direct: Vec<String> = index
        .imported_by(file_path)
        .map(|s| s.iter().cloned().collect())
        .unwrap_or_default();

    let mut indirect = BTreeSet::new();
    for dependent in &direct {
        if let Some(second_hop) = index.imported_by(dependent) {
            for file in second_hop {
                if file != file_path && !direct.contains(file) {
                    indirect.insert(file.clone());
                }
            }
        }
    }

    let symbols_exported: Vec<String> = index
        .symbols_by_file
        .get(file_path)
        .map(|symbols| {
            symbols
                .iter()
                .filter(|s| !s.name.starts_with('_'))
                .map(|s| format!("{} {}{}", s.kind.as_str(), s.name, s.signature))
                .collect()
        })
        .unwrap_or_default();

    let total_affected = direct.len() + indirect.len();
    let risk = RiskLevel::from_affected(total_affected);

    Ok(ChangeImpact {
        file: file_path.to_string(),
        symbols_exported,
        direct_dependents: direct,
        indirect_dependents: indirect.into_iter().collect(),
        total_affected_files: total_affected,
        risk_level: risk,
        recommendation: recommendation(risk, total_affected),
    })
}

fn recommendation(risk: RiskLevel, affected: usize) -> String {
    match risk {
        RiskLevel::Low => "Safe to modify. No other files depend on this.".to_string(),
        RiskLevel::Medium => format!(
            "Moderate caution. {affected} files may be affected. Review before changing public interfaces."
        ),
        RiskLevel::High => format!(
            "High impact. {affected} files depend on this. Consider backward compatibility and thorough testing."
        ),
    }
}
