//! Repository scanner: gitignore-aware walk with a built-in deny-list

use crate::config::ScanConfig;
use crate::error::ArborError;
use crate::model::{FileDescriptor, Language};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Built-in deny-list applied on top of the project's .gitignore.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "__pycache__",
    "*.pyc",
    "node_modules",
    ".venv",
    "venv",
    ".env",
    "dist",
    "build",
    "*.egg-info",
    ".idea",
    ".vscode",
    "*.min.js",
    "*.min.css",
    "*.map",
    ".DS_Store",
    "Thumbs.db",
    "*.log",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
];

/// Options for one repository scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directories deeper than this (relative to the root) are not descended into
    pub max_depth: usize,
    /// Files larger than this are skipped
    pub max_file_size_bytes: u64,
    /// Extra ignore patterns merged with the built-in deny-list
    pub extra_ignore_patterns: Vec<String>,
    /// When set, only files with one of these extensions (no dot) are yielded
    pub include_extensions: Option<Vec<String>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_file_size_bytes: 1_000_000,
            extra_ignore_patterns: Vec::new(),
            include_extensions: None,
        }
    }
}

impl ScanOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_file_size_bytes: config.max_file_size_bytes,
            extra_ignore_patterns: config.ignore_patterns.clone(),
            include_extensions: None,
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.include_extensions = Some(extensions.iter().map(|e| e.to_string()).collect());
        self
    }
}

/// Repository statistics
#[derive(Debug, Default, Serialize)]
pub struct RepoStats {
    pub total_files: usize,
    pub total_lines: usize,
    pub languages: BTreeMap<String, usize>,
    pub file_types: BTreeMap<String, usize>,
}

/// Build the deny-list matcher from the built-in patterns plus any extras.
///
/// Each bare pattern also matches as a path component anywhere in the tree,
/// and as a directory prefix, so `node_modules` prunes `a/node_modules/b.js`.
fn build_deny_set(extra: &[String]) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let patterns = DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .chain(extra.iter().cloned());

    for pattern in patterns {
        let pattern = pattern.trim_end_matches('/');
        for expanded in [
            pattern.to_string(),
            format!("**/{pattern}"),
            format!("**/{pattern}/**"),
        ] {
            let glob = Glob::new(&expanded)
                .map_err(|e| ArborError::GlobPattern(e.to_string()))?;
            builder.add(glob);
        }
    }

    builder
        .build()
        .map_err(|e| ArborError::GlobPattern(e.to_string()))
}

/// Walk the repository and collect file descriptors.
///
/// Respects the project's `.gitignore` (full gitignore semantics including
/// `!`-negation come from the `ignore` crate), prunes denied and hidden
/// directories before descending into them, bounds traversal depth, and
/// skips oversized files. Errors reading individual entries are swallowed;
/// only a missing root is an error. Output order is not guaranteed.
pub fn scan(root: &Path, options: &ScanOptions) -> crate::Result<Vec<FileDescriptor>> {
    let root = root
        .canonicalize()
        .map_err(|_| ArborError::ProjectRootNotFound(root.to_path_buf()))?;

    let deny = build_deny_set(&options.extra_ignore_patterns)?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        // +1: max_depth counts from the root, and files sit one level below
        // the deepest directory we are allowed to enter
        .max_depth(Some(options.max_depth + 1));

    let filter_root = root.clone();
    let filter_deny = deny.clone();
    builder.filter_entry(move |entry| {
        let relative = entry
            .path()
            .strip_prefix(&filter_root)
            .unwrap_or_else(|_| entry.path());
        if relative.as_os_str().is_empty() {
            return true;
        }
        !filter_deny.is_match(relative)
    });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().map_or(true, |t| t.is_dir()) {
            continue;
        }

        let relative = match path.strip_prefix(&root) {
            Ok(r) => r,
            Err(_) => continue,
        };
        if deny.is_match(relative) {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if let Some(include) = &options.include_extensions {
            if !include.iter().any(|e| e == &extension) {
                continue;
            }
        }

        let size_bytes = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(_) => continue,
        };
        if size_bytes > options.max_file_size_bytes {
            debug!(path = %relative.display(), size_bytes, "skipping oversized file");
            continue;
        }

        let relative_path = relative.to_string_lossy().replace('\\', "/");
        files.push(FileDescriptor {
            path: path.to_path_buf(),
            relative_path,
            language: Language::from_extension(&extension),
            extension,
            size_bytes,
        });
    }

    Ok(files)
}

/// Scan the repository and aggregate per-language and per-extension counts.
pub fn repo_stats(root: &Path, options: &ScanOptions) -> crate::Result<RepoStats> {
    let mut stats = RepoStats::default();

    for file in scan(root, options)? {
        stats.total_files += 1;
        *stats
            .languages
            .entry(file.language.as_str().to_string())
            .or_default() += 1;
        let ext = if file.extension.is_empty() {
            "no_extension".to_string()
        } else {
            file.extension.clone()
        };
        *stats.file_types.entry(ext).or_default() += 1;

        if let Ok(content) = std::fs::read_to_string(&file.path) {
            stats.total_lines += content.lines().count();
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_yields_relative_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/app.py", "x = 1\n");
        write(dir.path(), "README.md", "# readme\n");

        let files = scan(dir.path(), &ScanOptions::default()).unwrap();
        let mut paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["README.md", "src/app.py"]);
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let result = scan(Path::new("/definitely/not/here"), &ScanOptions::default());
        assert!(matches!(result, Err(ArborError::ProjectRootNotFound(_))));
    }

    #[test]
    fn test_deny_list_prunes_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/pkg/index.js", "module.exports = 1\n");
        write(dir.path(), "__pycache__/app.pyc", "\x00");
        write(dir.path(), "app.py", "x = 1\n");

        let files = scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "app.py");
    }

    #[test]
    fn test_gitignore_patterns_apply() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "generated/\n*.tmp.py\n");
        write(dir.path(), "generated/out.py", "x = 1\n");
        write(dir.path(), "scratch.tmp.py", "x = 1\n");
        write(dir.path(), "app.py", "x = 1\n");

        let files = scan(dir.path(), &ScanOptions::default()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["app.py"]);
    }

    #[test]
    fn test_hidden_directories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".secret/inner.py", "x = 1\n");
        write(dir.path(), "app.py", "x = 1\n");

        let files = scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "app.py");
    }

    #[test]
    fn test_depth_bound() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/b/c/deep.py", "x = 1\n");
        write(dir.path(), "top.py", "x = 1\n");

        let options = ScanOptions {
            max_depth: 1,
            ..ScanOptions::default()
        };
        let files = scan(dir.path(), &options).unwrap();
        let mut paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["top.py"]);
    }

    #[test]
    fn test_size_ceiling() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.py", &"# filler\n".repeat(1000));
        write(dir.path(), "small.py", "x = 1\n");

        let options = ScanOptions {
            max_file_size_bytes: 100,
            ..ScanOptions::default()
        };
        let files = scan(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "small.py");
    }

    #[test]
    fn test_extension_filter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "x = 1\n");
        write(dir.path(), "notes.md", "# notes\n");

        let options = ScanOptions::default().with_extensions(&["py"]);
        let files = scan(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].language, Language::Python);
    }

    #[test]
    fn test_repo_stats_counts_languages() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "x = 1\ny = 2\n");
        write(dir.path(), "b.py", "z = 3\n");
        write(dir.path(), "c.ts", "const n = 1;\n");

        let stats = repo_stats(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_lines, 4);
        assert_eq!(stats.languages.get("python"), Some(&2));
        assert_eq!(stats.languages.get("typescript"), Some(&1));
    }
}
