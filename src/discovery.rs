//! Candidate source discovery
//!
//! Stands in for a build pipeline's file-discovery stage: walks a library
//! source tree and reports every file with a compilable extension. The
//! filter never calls this; only the CLI does.

use crate::config::DiscoverySettings;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discover candidate source files under `root`
///
/// Returned paths are relative to `root` and sorted. Extension matching is
/// case-sensitive so `.S` and `.s` stay distinct.
pub fn discover_sources<P: AsRef<Path>>(
    root: P,
    settings: &DiscoverySettings,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        bail!("Source root '{}' is not a directory", root.display());
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(settings.follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !has_source_extension(entry.path(), &settings.extensions) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        sources.push(relative.to_path_buf());
    }

    sources.sort();
    tracing::info!("Discovered {} candidate sources under {}", sources.len(), root.display());
    Ok(sources)
}

fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}
