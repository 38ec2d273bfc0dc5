/// Source file discovery for batch runs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{should_ignore_path, Config};

const MAX_DIR_DEPTH: usize = 10;

fn is_python_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("py" | "pyi"))
}

/// Expand file and directory arguments into Python source files.
///
/// Files named explicitly are kept whatever their extension; directories are
/// searched recursively for `.py`/`.pyi` files. Paths matching the configured
/// ignore globs are skipped either way. Output is sorted and deduplicated.
pub fn collect_paths(inputs: &[PathBuf], cfg: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if should_ignore_path(cfg, &input.to_string_lossy()) {
            tracing::debug!(path = %input.display(), "ignored by config");
            continue;
        }
        if input.is_dir() {
            collect_files_recursive(input, cfg, &mut files, 0)?;
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_files_recursive(dir: &Path, cfg: &Config, files: &mut Vec<PathBuf>, depth: usize) -> Result<()> {
    if depth > MAX_DIR_DEPTH {
        tracing::warn!(path = %dir.display(), "directory nesting too deep, skipping");
        return Ok(());
    }

    let entries = std::fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if should_ignore_path(cfg, &path.to_string_lossy()) {
            continue;
        }
        if path.is_dir() {
            collect_files_recursive(&path, cfg, files, depth + 1)?;
        } else if is_python_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}
