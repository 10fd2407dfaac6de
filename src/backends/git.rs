//! Tracked-file listing through the git CLI

use std::path::Path;
use std::process::Command;

use crate::core::error::{ExportError, Result};
use crate::core::paths::normalize_str;
use crate::core::util::command_exists;

use super::SourceLister;

/// Lists files tracked in the working tree containing the root
#[derive(Debug, Default, Clone, Copy)]
pub struct GitLister;

impl GitLister {
    fn error(message: impl Into<String>) -> ExportError {
        ExportError::Listing {
            lister: "git",
            message: message.into(),
        }
    }
}

/// Check if git is available
pub fn is_git_available() -> bool {
    command_exists("git")
}

impl SourceLister for GitLister {
    fn name(&self) -> &'static str {
        "git"
    }

    fn list(&self, root: &Path) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["ls-files", "-z", "--cached"])
            .current_dir(root)
            .output()
            .map_err(|e| Self::error(format!("cannot run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::error(format!(
                "git exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| Self::error("git output is not valid UTF-8"))?;

        // Deleted files and submodules are tracked but not regular files
        let paths = stdout
            .split('\0')
            .map(normalize_str)
            .filter(|rel| !rel.is_empty() && root.join(rel).is_file())
            .collect();
        Ok(paths)
    }
}
