//! Content processors
//!
//! Some files are summarized instead of exported verbatim. A processor is
//! picked by file name; the first registered match wins. Processors run on
//! decoded text only, before truncation.
//!
//! - `.env` files keep only their key names
//! - pre-commit configs become one `hook (repo@rev)` line per hook
//! - license files keep their first line
//! - `.pem` files become a digest plus their armor lines
//! - `__init__.py` files without code become a one-line marker

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use tree_sitter::Parser;

/// Marker for a package `__init__.py` that holds no code
pub const EMPTY_INIT: &str = "(empty __init__.py)";

/// Replaces a file's content with a summary
pub trait ContentProcessor {
    /// Short name recorded on the exported file
    fn name(&self) -> &'static str;

    /// Whether this processor handles `file_name` (last path component)
    fn matches(&self, file_name: &str) -> bool;

    /// Summary for `text`; `None` keeps the content unchanged
    fn process(&self, text: &str) -> Option<String>;
}

/// Output of a processor that applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub processor: &'static str,
    pub content: String,
}

/// File name -> processor lookup
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn ContentProcessor>>,
}

impl ProcessorRegistry {
    /// Registry without any processor
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    pub fn register(&mut self, processor: Box<dyn ContentProcessor>) {
        self.processors.push(processor);
    }

    pub fn get(&self, file_name: &str) -> Option<&dyn ContentProcessor> {
        self.processors
            .iter()
            .find(|p| p.matches(file_name))
            .map(|p| p.as_ref())
    }

    /// Run the processor matching the file name of `rel_path`, if any
    pub fn apply(&self, rel_path: &str, text: &str) -> Option<Processed> {
        let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        let processor = self.get(file_name)?;
        let content = processor.process(text)?;
        Some(Processed {
            processor: processor.name(),
            content,
        })
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(EnvRedaction));
        registry.register(Box::new(PreCommitSummary));
        registry.register(Box::new(LicenseHead));
        registry.register(Box::new(PemStub));
        registry.register(Box::new(EmptyInit));
        registry
    }
}

/// Sort case-insensitively and drop exact duplicates
fn sorted_unique(mut items: Vec<String>) -> Vec<String> {
    items.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    items.dedup();
    items
}

/// `.env` and `.env.<suffix>` files: variable names only, values dropped
pub struct EnvRedaction;

impl ContentProcessor for EnvRedaction {
    fn name(&self) -> &'static str {
        "redact_env"
    }

    fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        name == ".env" || name.starts_with(".env.")
    }

    fn process(&self, text: &str) -> Option<String> {
        let keys = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, _)| key.trim())
            .map(|key| key.strip_prefix("export ").unwrap_or(key).trim())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();
        Some(sorted_unique(keys).join("\n"))
    }
}

#[derive(Debug, Deserialize)]
struct PreCommitConfig {
    #[serde(default)]
    repos: Vec<PreCommitRepo>,
}

#[derive(Debug, Deserialize)]
struct PreCommitRepo {
    repo: Option<serde_yaml::Value>,
    rev: Option<serde_yaml::Value>,
    #[serde(default)]
    hooks: Vec<PreCommitHook>,
}

#[derive(Debug, Deserialize)]
struct PreCommitHook {
    id: Option<serde_yaml::Value>,
}

fn scalar(value: Option<&serde_yaml::Value>) -> String {
    match value {
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(serde_yaml::Value::Bool(b)) => b.to_string(),
        _ => "unknown".to_string(),
    }
}

/// `.pre-commit-config.yaml`: one `hook_id (repo@rev)` line per hook
pub struct PreCommitSummary;

impl ContentProcessor for PreCommitSummary {
    fn name(&self) -> &'static str {
        "summarize_precommit"
    }

    fn matches(&self, file_name: &str) -> bool {
        matches!(
            file_name.to_lowercase().as_str(),
            ".pre-commit-config.yaml" | ".pre-commit-config.yml"
        )
    }

    fn process(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return Some(String::new());
        }
        let config: PreCommitConfig = match serde_yaml::from_str(text) {
            Ok(config) => config,
            Err(e) => {
                debug!("pre-commit config left verbatim: {}", e);
                return None;
            }
        };

        let hooks = config
            .repos
            .iter()
            .flat_map(|repo| {
                let source = scalar(repo.repo.as_ref());
                let rev = scalar(repo.rev.as_ref());
                repo.hooks
                    .iter()
                    .map(move |hook| format!("{} ({}@{})", scalar(hook.id.as_ref()), source, rev))
            })
            .collect();
        Some(sorted_unique(hooks).join("\n"))
    }
}

/// `LICENSE`, `LICENSE.md`, `LICENSE.txt`: first line only
pub struct LicenseHead;

impl ContentProcessor for LicenseHead {
    fn name(&self) -> &'static str {
        "license_head"
    }

    fn matches(&self, file_name: &str) -> bool {
        matches!(
            file_name.to_lowercase().as_str(),
            "license" | "license.md" | "license.txt"
        )
    }

    fn process(&self, text: &str) -> Option<String> {
        Some(text.lines().next().unwrap_or("").to_string())
    }
}

/// `.pem` files: sha256 of the content, then the first and last lines
pub struct PemStub;

impl ContentProcessor for PemStub {
    fn name(&self) -> &'static str {
        "pem_stub"
    }

    fn matches(&self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(".pem")
    }

    fn process(&self, text: &str) -> Option<String> {
        let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
        let lines: Vec<&str> = text.lines().collect();
        let first = lines.first().copied().unwrap_or("");
        let last = if lines.len() > 1 { lines[lines.len() - 1] } else { "" };

        let mut parts = vec![format!("sha256={}", digest)];
        if !first.is_empty() {
            parts.push(first.to_string());
        }
        if !last.is_empty() && last != first {
            parts.push(last.to_string());
        }
        Some(parts.join("\n").trim().to_string())
    }
}

/// `__init__.py` that is empty or holds a lone docstring
pub struct EmptyInit;

impl ContentProcessor for EmptyInit {
    fn name(&self) -> &'static str {
        "empty_init"
    }

    fn matches(&self, file_name: &str) -> bool {
        file_name == "__init__.py"
    }

    fn process(&self, text: &str) -> Option<String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .ok()?;
        let tree = parser.parse(text, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }

        let mut cursor = root.walk();
        let statements: Vec<_> = root
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();
        let code_free = match statements.as_slice() {
            [] => true,
            [stmt] if stmt.kind() == "expression_statement" => {
                let mut cursor = stmt.walk();
                let parts: Vec<_> = stmt.named_children(&mut cursor).collect();
                matches!(parts.as_slice(), [expr] if is_str_literal(*expr, text))
            }
            _ => false,
        };
        code_free.then(|| EMPTY_INIT.to_string())
    }
}

fn is_str_literal(node: tree_sitter::Node, source: &str) -> bool {
    if node.kind() != "string" {
        return false;
    }
    let literal = &source[node.start_byte()..node.end_byte()];
    let prefix = literal.split(['"', '\'']).next().unwrap_or("");
    !prefix.contains(['b', 'B', 'f', 'F'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(path: &str, text: &str) -> Option<Processed> {
        ProcessorRegistry::default().apply(path, text)
    }

    #[test]
    fn test_env_keeps_only_key_names() {
        let text = "# secrets\nAPI_KEY=sk-live-123\n\nexport db_url = postgres://u:p@h/db\n\
                    API_KEY=sk-live-456\nZED=1\nnot an assignment\n";
        let processed = apply("config/.env", text).unwrap();
        assert_eq!(processed.processor, "redact_env");
        assert_eq!(processed.content, "API_KEY\ndb_url\nZED");
        for secret in ["sk-live", "postgres", "u:p", "=1"] {
            assert!(!processed.content.contains(secret), "{} leaked", secret);
        }
    }

    #[test]
    fn test_env_variants_match() {
        let registry = ProcessorRegistry::default();
        assert!(registry.get(".env.local").is_some());
        assert!(registry.get(".ENV").is_some());
        assert!(registry.get("env.py").is_none());
        assert!(registry.get("my.env").is_none());
    }

    #[test]
    fn test_precommit_summary() {
        let text = r#"
repos:
  - repo: https://github.com/psf/black
    rev: 24.1.0
    hooks:
      - id: black
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v4.5.0
    hooks:
      - id: trailing-whitespace
      - id: Check-yaml
      - id: trailing-whitespace
  - repo: local
    hooks:
      - id: mypy
        entry: mypy
"#;
        let processed = apply(".pre-commit-config.yaml", text).unwrap();
        assert_eq!(processed.processor, "summarize_precommit");
        assert_eq!(
            processed.content,
            "black (https://github.com/psf/black@24.1.0)\n\
             Check-yaml (https://github.com/pre-commit/pre-commit-hooks@v4.5.0)\n\
             mypy (local@unknown)\n\
             trailing-whitespace (https://github.com/pre-commit/pre-commit-hooks@v4.5.0)"
        );
    }

    #[test]
    fn test_precommit_invalid_yaml_is_kept() {
        assert!(apply(".pre-commit-config.yml", "repos: [unclosed\n").is_none());
    }

    #[test]
    fn test_license_head() {
        let processed = apply("LICENSE", "MIT License\n\nCopyright (c) 2024\n").unwrap();
        assert_eq!(processed.processor, "license_head");
        assert_eq!(processed.content, "MIT License");
        assert!(apply("docs/License.txt", "Apache License\nVersion 2.0\n").is_some());
        assert!(apply("LICENSE-MIT", "MIT\n").is_none());
    }

    #[test]
    fn test_pem_stub() {
        let text = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\n-----END CERTIFICATE-----\n";
        let processed = apply("certs/server.PEM", text).unwrap();
        assert_eq!(processed.processor, "pem_stub");

        let lines: Vec<&str> = processed.content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("sha256="));
        assert_eq!(lines[0].len(), "sha256=".len() + 64);
        assert_eq!(lines[1], "-----BEGIN CERTIFICATE-----");
        assert_eq!(lines[2], "-----END CERTIFICATE-----");
        assert!(!processed.content.contains("MIIB"));
    }

    #[test]
    fn test_pem_single_line() {
        let processed = apply("key.pem", "opaque\n").unwrap();
        let lines: Vec<&str> = processed.content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "opaque");
    }

    #[test]
    fn test_empty_init() {
        for text in ["", "\n", "\"\"\"Package docs.\"\"\"\n", "# comment\n'''Docs.'''\n"] {
            let processed = apply("pkg/__init__.py", text).unwrap();
            assert_eq!(processed.processor, "empty_init");
            assert_eq!(processed.content, EMPTY_INIT);
        }
    }

    #[test]
    fn test_init_with_code_is_kept() {
        assert!(apply("pkg/__init__.py", "from .core import run\n").is_none());
        assert!(apply("pkg/__init__.py", "\"\"\"Docs.\"\"\"\nVERSION = 1\n").is_none());
        assert!(apply("pkg/__init__.py", "b\"bytes\"\n").is_none());
        assert!(apply("pkg/__init__.py", "def broken(:\n").is_none());
        assert!(apply("pkg/init.py", "").is_none());
    }

    #[test]
    fn test_unmatched_files_pass_through() {
        assert!(apply("src/app.py", "x = 1\n").is_none());
        assert!(ProcessorRegistry::empty().get(".env").is_none());
    }
}
