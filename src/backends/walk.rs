//! Filesystem walk fallback
//!
//! Uses walkdir with lexical directory order. `.git`, build output and
//! well-known transient directories are pruned; unreadable entries are
//! logged and skipped. The same exclusion tables also filter git listings
//! (see `is_default_excluded`).

use std::path::Path;

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::Result;
use crate::core::paths::make_relative;

use super::SourceLister;

/// Directory names never exported, matched at any depth
pub const PRUNED_DIRS: &[&str] = &[
    ".git",
    ".gitlab",
    "node_modules",
    "__pycache__",
    ".ipynb_checkpoints",
    ".venv",
    "venv",
    "env",
    ".env",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    "target",
    "dist",
    "build",
    ".idea",
    ".vscode",
];

/// File names never exported, matched at any depth
pub const EXCLUDED_FILES: &[&str] = &[".DS_Store", ".env.expanded"];

/// Root-relative directories never exported
pub const EXCLUDED_PREFIXES: &[&str] = &["data/ca-certificates"];

/// Whether a root-relative file path falls under the built-in exclusions
pub fn is_default_excluded(rel_path: &str) -> bool {
    let mut components: Vec<&str> = rel_path.split('/').collect();
    let Some(file_name) = components.pop() else {
        return false;
    };
    EXCLUDED_FILES.contains(&file_name)
        || components.iter().any(|dir| PRUNED_DIRS.contains(dir))
        || EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| rel_path.starts_with(&format!("{}/", prefix)))
}

/// Recursive walk of the root
#[derive(Debug, Clone)]
pub struct WalkLister {
    pruned: Vec<String>,
}

impl Default for WalkLister {
    fn default() -> Self {
        Self {
            pruned: PRUNED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl WalkLister {
    fn is_pruned(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_str();
        if self.pruned.iter().any(|pruned| name == Some(pruned.as_str())) {
            return true;
        }
        make_relative(entry.path(), root)
            .is_some_and(|relative| EXCLUDED_PREFIXES.contains(&relative.as_str()))
    }
}

impl SourceLister for WalkLister {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn list(&self, root: &Path) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_pruned(e, root));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // Symlinks count when they resolve to a regular file
            if !(entry.file_type().is_file() || entry.path().is_file()) {
                continue;
            }
            if let Some(relative) = make_relative(entry.path(), root) {
                if !is_default_excluded(&relative) {
                    paths.push(relative);
                }
            }
        }

        Ok(paths)
    }
}
