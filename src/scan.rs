//! Source enumerator: recursive walk filtered by an extension
//! allow-list, sorted by path for reproducible report ordering.

use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn scan_sources(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Source directory {} does not exist", root.display());
    }

    let allowed: Vec<String> = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();

    let mut files = Vec::new();
    // Hidden files and gitignored files are still legacy sources;
    // keep the walk exhaustive even when the tree is a git checkout.
    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unwalkable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| allowed.iter().any(|a| a == &e.to_ascii_lowercase()))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    // Filesystem traversal order is platform-dependent; sort for stable output
    files.sort();
    Ok(files)
}
