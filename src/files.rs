//! Input discovery.
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Every file under `dir` (recursively) whose name ends with `suffix`,
/// compared case-insensitively, sorted by path.
pub fn collect_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let suffix = suffix.to_lowercase();
    let mut out = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.to_lowercase().ends_with(&suffix))
            {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// File name without its extension, falling back to `"input"`.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input")
        .to_string()
}
