//! Arbor Core - code index and dependency graph queries
//!
//! This library builds a navigable model of a source codebase: it scans a
//! repository, extracts symbols and imports per file, assembles them into a
//! cross-file import graph, and answers call-graph, change-impact and
//! token-budget queries over the result. The index is rebuilt in memory for
//! each top-level query and never persisted.

pub mod callgraph;
pub mod compress;
pub mod config;
pub mod error;
pub mod impact;
pub mod index;
pub mod model;
pub mod parse;
pub mod repomap;
pub mod scan;
pub mod usages;

pub use callgraph::{CallGraph, CallSite, Direction, FlowStep, FlowTrace};
pub use compress::{CompressMode, CompressedContext};
pub use config::Config;
pub use error::ArborError;
pub use impact::{ChangeImpact, RiskLevel};
pub use index::build_index;
pub use model::{FileDependencies, FileDescriptor, Import, Language, Symbol, SymbolIndex, SymbolKind};
pub use parse::ParsedSource;
pub use repomap::RepoMap;
pub use scan::{scan, RepoStats, ScanOptions};
pub use usages::{Usage, UsageKind};

/// Result type alias for arbor operations
pub type Result<T> = std::result::Result<T, ArborError>;
