//! Directory tree for the document's structure section

use std::collections::BTreeMap;

/// Transient directory/file hierarchy built from relative paths
#[derive(Debug, Default)]
pub struct TreeNode {
    dirs: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

impl TreeNode {
    /// Build a tree from '/'-separated relative paths
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut root = TreeNode::default();
        for path in paths {
            let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            let Some(file) = parts.pop() else {
                continue;
            };
            let mut node = &mut root;
            for dir in parts {
                node = node.dirs.entry(dir.to_string()).or_default();
            }
            node.files.push(file.to_string());
        }
        root.sort();
        root
    }

    fn sort(&mut self) {
        self.files.sort();
        self.files.dedup();
        for child in self.dirs.values_mut() {
            child.sort();
        }
    }

    /// Render with box-drawing connectors, directories before files
    pub fn render(&self, root_name: &str) -> String {
        let mut lines = vec![root_name.to_string()];
        self.render_into("", &mut lines);
        lines.join("\n")
    }

    fn render_into(&self, prefix: &str, lines: &mut Vec<String>) {
        let total = self.dirs.len() + self.files.len();
        let mut idx = 0;

        for (name, child) in &self.dirs {
            idx += 1;
            let last = idx == total;
            let branch = if last { "└── " } else { "├── " };
            lines.push(format!("{}{}{}/", prefix, branch, name));
            let ext = if last { "    " } else { "│   " };
            child.render_into(&format!("{}{}", prefix, ext), lines);
        }

        for name in &self.files {
            idx += 1;
            let branch = if idx == total { "└── " } else { "├── " };
            lines.push(format!("{}{}{}", prefix, branch, name));
        }
    }
}
