//! Heuristic relative-import resolution.
//!
//! This approximates static module resolution with filesystem probing rather
//! than any language's real resolution algorithm. Only relative imports are
//! resolved; package-root imports need knowledge (manifests, path aliases)
//! outside this engine and always yield `None`. False negatives and false
//! positives are accepted trade-offs.

use crate::model::{Import, Language};
use std::path::Path;

/// Probe order for exact file matches
const PROBE_EXTENSIONS: &[&str] = &["py", "ts", "tsx", "js", "jsx"];

/// Package-entry filenames probed when no exact file matches
const PACKAGE_ENTRIES: &[&str] = &[
    "__init__.py",
    "index.ts",
    "index.tsx",
    "index.js",
    "index.jsx",
];

/// Resolve a relative import to a repo-relative file path.
///
/// Returns the first existing candidate, or a best-effort candidate with the
/// importing language's primary extension when nothing exists on disk; such a
/// path never materializes as a valid node when later dereferenced.
/// Non-relative imports return `None`.
pub fn resolve_import(root: &Path, importing_file: &str, import: &Import) -> Option<String> {
    if import.module.is_empty() || !import.is_relative {
        return None;
    }

    // Directory of the importing file, as path components
    let mut components: Vec<String> = importing_file
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').map(String::from).collect())
        .unwrap_or_default();

    let (ascend, segments) = if import.module.contains('/') {
        path_style(&import.module)
    } else {
        dotted_style(&import.module)
    };

    for _ in 0..ascend {
        components.pop();
    }
    components.extend(segments);
    let base = components.join("/");

    for extension in PROBE_EXTENSIONS {
        let candidate = format!("{base}.{extension}");
        if root.join(&candidate).is_file() {
            return Some(candidate);
        }
    }
    for entry in PACKAGE_ENTRIES {
        let candidate = if base.is_empty() {
            entry.to_string()
        } else {
            format!("{base}/{entry}")
        };
        if root.join(&candidate).is_file() {
            return Some(candidate);
        }
    }

    let extension = Path::new(importing_file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let primary = Language::from_extension(extension).primary_extension();
    Some(format!("{base}.{primary}"))
}

/// Python-style `..pkg.mod`: each leading dot past the first ascends one
/// directory; the remaining dotted segments are nested directories.
fn dotted_style(module: &str) -> (usize, Vec<String>) {
    let rest = module.trim_start_matches('.');
    let dots = module.len() - rest.len();
    let segments = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('.').map(String::from).collect()
    };
    (dots.saturating_sub(1), segments)
}

/// ECMAScript-style `../lib/helper`: `./` anchors at the importing file's
/// directory, each `../` ascends one level.
fn path_style(module: &str) -> (usize, Vec<String>) {
    let mut ascend = 0;
    let mut segments: Vec<String> = Vec::new();
    for part in module.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    ascend += 1;
                }
            }
            other => segments.push(other.to_string()),
        }
    }
    (ascend, segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative(module: &str) -> Import {
        Import {
            module: module.to_string(),
            items: Vec::new(),
            alias: String::new(),
            is_relative: true,
        }
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_absolute_import_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let import = Import {
            module: "os".to_string(),
            items: Vec::new(),
            alias: String::new(),
            is_relative: false,
        };
        assert_eq!(resolve_import(dir.path(), "a.py", &import), None);
    }

    #[test]
    fn test_python_sibling_module() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/helpers.py");
        let resolved = resolve_import(dir.path(), "pkg/app.py", &relative(".helpers"));
        assert_eq!(resolved.as_deref(), Some("pkg/helpers.py"));
    }

    #[test]
    fn test_python_parent_package() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "core/engine.py");
        let resolved = resolve_import(dir.path(), "pkg/app.py", &relative("..core.engine"));
        assert_eq!(resolved.as_deref(), Some("core/engine.py"));
    }

    #[test]
    fn test_python_package_init() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/sub/__init__.py");
        let resolved = resolve_import(dir.path(), "pkg/app.py", &relative(".sub"));
        assert_eq!(resolved.as_deref(), Some("pkg/sub/__init__.py"));
    }

    #[test]
    fn test_bare_dot_resolves_to_package_entry() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/__init__.py");
        touch(dir.path(), "pkg/app.py");
        let resolved = resolve_import(dir.path(), "pkg/app.py", &relative("."));
        assert_eq!(resolved.as_deref(), Some("pkg/__init__.py"));
    }

    #[test]
    fn test_ecma_sibling_module() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/util.ts");
        let resolved = resolve_import(dir.path(), "src/app.ts", &relative("./util"));
        assert_eq!(resolved.as_deref(), Some("src/util.ts"));
    }

    #[test]
    fn test_ecma_parent_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/helper.js");
        let resolved = resolve_import(dir.path(), "src/app.js", &relative("../lib/helper"));
        assert_eq!(resolved.as_deref(), Some("lib/helper.js"));
    }

    #[test]
    fn test_ecma_directory_index() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/components/index.ts");
        let resolved = resolve_import(dir.path(), "src/app.ts", &relative("./components"));
        assert_eq!(resolved.as_deref(), Some("src/components/index.ts"));
    }

    #[test]
    fn test_missing_target_yields_best_effort_candidate() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/app.py");
        let resolved = resolve_import(dir.path(), "pkg/app.py", &relative(".ghost"));
        assert_eq!(resolved.as_deref(), Some("pkg/ghost.py"));

        touch(dir.path(), "src/app.ts");
        let resolved = resolve_import(dir.path(), "src/app.ts", &relative("./ghost"));
        assert_eq!(resolved.as_deref(), Some("src/ghost.ts"));
    }

    #[test]
    fn test_ascend_saturates_at_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.py");
        let resolved = resolve_import(dir.path(), "a.py", &relative("...top"));
        assert_eq!(resolved.as_deref(), Some("top.py"));
    }
}
