//! Backends module - Source enumeration
//!
//! Provides:
//! - git: tracked-file listing via `git ls-files`
//! - walk: recursive filesystem walk with walkdir
//!
//! Git is preferred; any git failure falls back to the walk. Both listers
//! drop the built-in exclusions (`walk::is_default_excluded`).

pub mod git;
pub mod walk;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{ExportError, Result};

pub use git::GitLister;
pub use walk::{is_default_excluded, WalkLister};

/// Produces the candidate paths for a root
pub trait SourceLister {
    /// Short name used in logs and the run summary
    fn name(&self) -> &'static str;

    /// Relative, '/'-separated paths of regular files under `root`
    fn list(&self, root: &Path) -> Result<Vec<String>>;
}

/// Candidate paths and the lister that produced them
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub source: &'static str,
    /// Unique paths in byte-wise lexical order
    pub paths: Vec<String>,
}

/// Canonicalize `root` and make sure it is a readable directory
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let root_err = |source: io::Error| ExportError::Root {
        path: root.to_path_buf(),
        source,
    };
    let canonical = fs::canonicalize(root).map_err(root_err)?;
    if !canonical.is_dir() {
        return Err(root_err(io::Error::other("not a directory")));
    }
    fs::read_dir(&canonical).map_err(root_err)?;
    Ok(canonical)
}

/// List candidates under an already resolved root
pub fn enumerate(root: &Path, use_git: bool) -> Result<Enumeration> {
    if use_git && !git::is_git_available() {
        info!("git not found; using filesystem walk");
    } else if use_git {
        let git = GitLister;
        match git.list(root) {
            Ok(paths) => return Ok(finish(git.name(), paths)),
            Err(e) => info!("{}; falling back to filesystem walk", e),
        }
    } else {
        debug!("git listing disabled");
    }

    let walk = WalkLister::default();
    let paths = walk.list(root)?;
    Ok(finish(walk.name(), paths))
}

fn finish(source: &'static str, paths: Vec<String>) -> Enumeration {
    let unique: BTreeSet<String> = paths
        .into_iter()
        .filter(|p| !p.is_empty() && !is_default_excluded(p))
        .collect();
    debug!("{} listed {} candidates", source, unique.len());
    Enumeration {
        source,
        paths: unique.into_iter().collect(),
    }
}
