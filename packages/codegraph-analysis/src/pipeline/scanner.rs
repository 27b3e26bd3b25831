//! Minimal scanner for the CLI
//!
//! Collects `*.py` / `*.pyi` files under a root in sorted order, skipping
//! hidden directories, virtualenvs and bytecode caches. No ignore-file rules.

use super::error::{PipelineError, PipelineResult};
use crate::shared::models::{FileDescriptor, LanguageTag};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "venv",
    "site-packages",
];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn is_python_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(LanguageTag::from_extension)
        .is_some()
}

/// Python files under `root`, in path order
pub fn scan_python_files(root: impl AsRef<Path>) -> PipelineResult<Vec<FileDescriptor>> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(PipelineError::Scan {
            path: root.display().to_string(),
            reason: "root does not exist".to_string(),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), "skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_python_file(entry.path()) {
            continue;
        }

        match FileDescriptor::from_path(entry.path()) {
            Ok(file) => files.push(file),
            // keep the file so the analyzer reports the access error
            Err(e) => {
                debug!(file = %entry.path().display(), "stat failed during scan: {}", e);
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                files.push(FileDescriptor::new(entry.path(), size));
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
