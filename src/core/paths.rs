//! Path normalization utilities
//!
//! Every path that leaves the enumerator is relative to the export root, uses
//! '/' as separator and carries no leading "./".

use std::path::{Component, Path};

/// Normalize a path to use '/' as separator
pub fn normalize_path(path: &Path) -> String {
    let joined = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    joined.replace('\\', "/")
}

/// Normalize a relative path string as reported by an external lister
pub fn normalize_str(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Whether `path` equals `prefix` or lies underneath it
///
/// Both sides are compared component-wise, so `src` does not cover `srcs/x`.
pub fn has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = normalize_str(prefix);
    if prefix.is_empty() {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Final component of a relative path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Display name for the export root (its final component)
pub fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| normalize_path(root))
}
