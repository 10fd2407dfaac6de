//! Filter pipeline - Turns candidate paths into the ordered export set
//!
//! Layers (each only removes paths):
//! 1. Scope: source subtree, tests subtree, key files or everything
//! 2. Test inclusion: default scope drops the tests subtree unless asked
//! 3. Drop presets: named pattern groups, see `presets`
//! 4. Explicit globs and path prefixes: include must match, exclude wins
//!
//! The survivors are then ordered: key files, optionally tests, the rest.

pub mod pipeline;
pub mod presets;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fmt;
use std::str::FromStr;

use crate::core::error::{ExportError, Result};
use crate::core::paths::{file_name, has_prefix, normalize_str};

pub use pipeline::select;

/// Coarse subtree selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Source subtree plus key files
    #[default]
    Default,
    /// Source subtree only
    SrcOnly,
    /// Tests subtree plus key files
    TestsOnly,
    /// Every candidate
    All,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Default => "default",
            Scope::SrcOnly => "src-only",
            Scope::TestsOnly => "tests-only",
            Scope::All => "all",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Scope::Default),
            "src-only" | "src" => Ok(Scope::SrcOnly),
            "tests-only" | "tests" => Ok(Scope::TestsOnly),
            "all" => Ok(Scope::All),
            _ => Err(format!("Unknown scope: {}", s)),
        }
    }
}

/// Unvalidated filter settings, as collected from the command line
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub scope: Scope,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    /// Path prefixes removed in the explicit layer
    pub exclude_paths: Vec<String>,
    /// Active drop preset names
    pub drop: Vec<String>,
    pub include_tests: bool,
    pub tests_first: bool,
    pub key_first: bool,
    /// Keep the key-file allow-list in scope selection
    pub key_files: bool,
    pub src_dir: String,
    pub tests_dir: String,
    /// Relative path of the output file when it lives under the root
    pub output_path: Option<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            scope: Scope::Default,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            exclude_paths: Vec::new(),
            drop: Vec::new(),
            include_tests: false,
            tests_first: false,
            key_first: true,
            key_files: true,
            src_dir: "src".to_string(),
            tests_dir: "tests".to_string(),
            output_path: None,
        }
    }
}

impl FilterOptions {
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    pub fn with_include_globs(mut self, globs: Vec<String>) -> Self {
        self.include_globs = globs;
        self
    }

    pub fn with_exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    pub fn with_drop(mut self, presets: Vec<String>) -> Self {
        self.drop = presets;
        self
    }
}

/// Resolved, read-only filter configuration for one run
#[derive(Debug)]
pub struct FilterContext {
    pub scope: Scope,
    pub include_tests: bool,
    pub tests_first: bool,
    pub key_first: bool,
    pub key_files: bool,
    pub src_dir: String,
    pub tests_dir: String,
    /// Canonical (lowercase) names of active drop presets
    pub drop: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub output_path: Option<String>,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    dropped: Option<GlobSet>,
    key_globs: Option<GlobSet>,
}

impl FilterContext {
    /// Validate options and compile every pattern
    ///
    /// All configuration errors surface here, before enumeration starts.
    pub fn new(options: FilterOptions) -> Result<Self> {
        let mut drop = Vec::new();
        let mut drop_patterns = Vec::new();
        for name in options.drop.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let patterns = presets::preset(name).ok_or_else(|| {
                ExportError::config(format!(
                    "unknown drop preset '{}' (available: {})",
                    name,
                    presets::preset_names().join(", ")
                ))
            })?;
            let canonical = name.to_lowercase();
            if !drop.contains(&canonical) {
                drop.push(canonical);
                drop_patterns.extend(patterns.iter().map(|p| p.to_string()));
            }
        }

        if options.scope == Scope::TestsOnly && drop.iter().any(|n| n == "tests") {
            return Err(ExportError::config(
                "--tests-only cannot be combined with the 'tests' drop preset",
            ));
        }

        let src_dir = normalize_str(&options.src_dir);
        let tests_dir = normalize_str(&options.tests_dir);
        if src_dir.is_empty() || tests_dir.is_empty() {
            return Err(ExportError::config(
                "source and test directories must not be empty",
            ));
        }

        let key_globs: Vec<String> = presets::KEY_FILE_GLOBS.iter().map(|g| g.to_string()).collect();

        Ok(Self {
            scope: options.scope,
            include_tests: options.include_tests,
            tests_first: options.tests_first,
            key_first: options.key_first,
            key_files: options.key_files,
            src_dir,
            tests_dir,
            drop,
            exclude_paths: options
                .exclude_paths
                .iter()
                .map(|p| normalize_str(p))
                .filter(|p| !p.is_empty())
                .collect(),
            output_path: options.output_path.map(|p| normalize_str(&p)),
            include: compile_globset(&options.include_globs)?,
            exclude: compile_globset(&options.exclude_globs)?,
            dropped: compile_globset(&drop_patterns)?,
            key_globs: compile_globset(&key_globs)?,
        })
    }

    pub fn in_src(&self, path: &str) -> bool {
        has_prefix(path, &self.src_dir)
    }

    pub fn in_tests(&self, path: &str) -> bool {
        has_prefix(path, &self.tests_dir)
    }

    /// Whether `path` is on the key-file allow-list
    ///
    /// Priority names match at any depth; the other names only at the root.
    pub fn is_key_file(&self, path: &str) -> bool {
        let name = file_name(path);
        presets::priority_rank(name).is_some()
            || (name == path && presets::KEY_FILE_NAMES.contains(&name))
            || self.key_globs.as_ref().is_some_and(|set| set.is_match(path))
    }

    pub fn is_dropped(&self, path: &str) -> bool {
        self.dropped.as_ref().is_some_and(|set| set.is_match(path))
    }

    /// Explicit layer: include (if any) must match, exclusions win
    pub fn passes_explicit(&self, path: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(path) {
                return false;
            }
        }
        if self.exclude.as_ref().is_some_and(|set| set.is_match(path)) {
            return false;
        }
        if self.exclude_paths.iter().any(|prefix| has_prefix(path, prefix)) {
            return false;
        }
        self.output_path.as_deref() != Some(path)
    }
}

/// Compile patterns into a glob set; `None` when no usable pattern remains
///
/// `*` may cross '/' so patterns behave like fnmatch over the whole path.
pub fn compile_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;

    for pattern in patterns {
        let pattern = pattern.trim().replace('\\', "/");
        if pattern.is_empty() {
            continue;
        }

        let glob = GlobBuilder::new(&pattern)
            .literal_separator(false)
            .build()
            .map_err(|err| ExportError::Glob {
                pattern: pattern.clone(),
                message: err.kind().to_string(),
            })?;
        builder.add(glob);
        added = true;
    }

    if added {
        builder.build().map(Some).map_err(|err| ExportError::Glob {
            pattern: patterns.join(", "),
            message: err.to_string(),
        })
    } else {
        Ok(None)
    }
}
