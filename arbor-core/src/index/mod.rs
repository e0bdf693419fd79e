//! Symbol index construction.
//!
//! `build_index` walks the repository restricted to parseable extensions,
//! parses every file, and folds the results into one [`SymbolIndex`].
//! Per-file read and parse work is fanned out over rayon workers; the fold
//! into the shared maps happens on the calling thread, in a fixed order, so
//! two builds over an unchanged tree produce identical indexes.

mod resolve;

pub use resolve::resolve_import;

use crate::config::Config;
use crate::model::SymbolIndex;
use crate::parse::{self, ParsedSource, PARSEABLE_EXTENSIONS};
use crate::scan::{scan, ScanOptions};
use rayon::prelude::*;
use std::path::Path;
use tracing::debug;

/// Build the symbol index for a project.
///
/// The index is owned by the caller and never mutated after this returns.
/// Files that cannot be read or parsed contribute nothing; only a missing
/// root is an error.
pub fn build_index(root: &Path, config: &Config) -> crate::Result<SymbolIndex> {
    let root = root
        .canonicalize()
        .map_err(|_| crate::ArborError::ProjectRootNotFound(root.to_path_buf()))?;

    let options = ScanOptions::from_config(&config.scan).with_extensions(PARSEABLE_EXTENSIONS);
    let files = scan(&root, &options)?;

    // Producer: parallel read+parse. Writer: the calling thread collects
    // until the channel disconnects. Per-file extraction has no cross-file
    // dependency, so parallelism cannot change the folded result.
    let (tx, rx) = crossbeam_channel::bounded::<(String, ParsedSource)>(64);
    let mut parsed_files: Vec<(String, ParsedSource)> = std::thread::scope(|s| {
        s.spawn(move || {
            files.par_iter().for_each_with(tx, |sender, file| {
                let Some(parsed) = parse::parse_path(&file.path) else {
                    debug!(path = %file.relative_path, "file contributed nothing to the index");
                    return;
                };
                let _ = sender.send((file.relative_path.clone(), parsed));
            });
        });
        rx.iter().collect()
    });

    // Fold in path order so "first match wins" is reproducible across runs.
    parsed_files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut index = SymbolIndex::default();
    for (relative_path, parsed) in parsed_files {
        for import in &parsed.imports {
            if let Some(target) = resolve_import(&root, &relative_path, import) {
                index.add_import_edge(&relative_path, &target);
            }
        }
        index.add_file(&relative_path, parsed.symbols, parsed.imports);
    }

    Ok(index)
}
