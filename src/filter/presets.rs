//! Declarative pattern tables
//!
//! Drop presets and key files are data. Adding a preset means adding a row.

/// Drop preset name -> glob patterns removed when the preset is active
pub static DROP_PRESETS: &[(&str, &[&str])] = &[
    (
        "api",
        &["src/**/api/**", "src/**/routes/**", "src/**/api_server.py"],
    ),
    ("front", &["src/**/front/**", "front/**", "ui/**", "web/**"]),
    (
        "data",
        &[
            "data/**",
            "datasets/**",
            "notebooks/**",
            "*.db",
            "*.sqlite",
            "*.sqlite3",
        ],
    ),
    ("docs", &["docs/**", "**/*.pdf"]),
    ("tests", &["tests/**"]),
    ("readme", &["*README.md", "README.txt", "*README*.md"]),
    (
        "ci",
        &[
            ".github/**",
            "**/.gitlab-ci.yml",
            "ci/**",
            ".circleci/**",
            "azure-pipelines.yml",
            ".travis.yml",
        ],
    ),
    (
        "docker",
        &[
            "**/Dockerfile",
            "**/Dockerfile.*",
            "**/*.dockerfile",
            "dockerfiles/**",
            "**/docker-compose*.yml",
            "**/docker-compose*.yaml",
            "**/.dockerignore",
        ],
    ),
    (
        "documentation",
        &["docs/**", "**/*.md", "**/*.rst", "documentation/**"],
    ),
];

/// Key files ordered first, in this order, when key-files-first is on
pub static KEY_FILES_PRIORITY: &[&str] = &[
    "pyproject.toml",
    "requirements.in",
    "requirements.txt",
    "requirements-dev.in",
    "requirements-dev.txt",
    ".pre-commit-config.yaml",
    ".pre-commit-config.yml",
    "Dockerfile",
    "Makefile",
];

/// Other key files, matched at the root only
pub static KEY_FILE_NAMES: &[&str] = &[
    "README.md",
    "setup.cfg",
    "setup.py",
    "Cargo.toml",
    "Cargo.lock",
    "package.json",
    "package-lock.json",
    "poetry.lock",
    "uv.lock",
    "go.mod",
    "go.sum",
    ".gitlab-ci.yml",
];

/// Key files matched by path pattern
pub static KEY_FILE_GLOBS: &[&str] = &[".github/workflows/**"];

/// Patterns for a drop preset (case-insensitive name lookup)
pub fn preset(name: &str) -> Option<&'static [&'static str]> {
    let name = name.trim().to_lowercase();
    DROP_PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, patterns)| *patterns)
}

pub fn preset_names() -> Vec<&'static str> {
    DROP_PRESETS.iter().map(|(name, _)| *name).collect()
}

/// Rank of `name` in the priority table
pub fn priority_rank(name: &str) -> Option<usize> {
    KEY_FILES_PRIORITY.iter().position(|key| *key == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset("tests"), Some(&["tests/**"][..]));
        assert!(preset("README").is_some());
        assert!(preset(" Docker ").is_some());
        assert!(preset("nope").is_none());
    }

    #[test]
    fn test_preset_names_unique() {
        let mut names = preset_names();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 9);
    }

    #[test]
    fn test_priority_rank() {
        assert_eq!(priority_rank("pyproject.toml"), Some(0));
        assert_eq!(priority_rank("Makefile"), Some(8));
        assert_eq!(priority_rank("README.md"), None);
    }
}
