//! Docstring stripping
//!
//! A small registry maps language tags to adapters. Only Python ships an
//! adapter; every other language reports `NotApplicable` and is left alone.

use tree_sitter::{Node, Parser};

use crate::core::model::DocstringOutcome;

/// Result of running an adapter over one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripping {
    pub outcome: DocstringOutcome,
    /// Rewritten source; `None` when the input is returned unchanged
    pub content: Option<String>,
}

impl Stripping {
    fn unchanged(outcome: DocstringOutcome) -> Self {
        Self {
            outcome,
            content: None,
        }
    }
}

/// Removes documentation strings from one language's source
pub trait DocstringAdapter {
    /// Language tag this adapter handles (see `core::language`)
    fn language(&self) -> &'static str;

    fn strip(&self, source: &str) -> Stripping;
}

/// Language tag -> adapter lookup
pub struct DocstringRegistry {
    adapters: Vec<Box<dyn DocstringAdapter>>,
}

impl DocstringRegistry {
    /// Registry without any adapter
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    pub fn register(&mut self, adapter: Box<dyn DocstringAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn get(&self, language: &str) -> Option<&dyn DocstringAdapter> {
        self.adapters
            .iter()
            .find(|a| a.language() == language)
            .map(|a| a.as_ref())
    }

    pub fn strip(&self, language: &str, source: &str) -> Stripping {
        match self.get(language) {
            Some(adapter) => adapter.strip(source),
            None => Stripping::unchanged(DocstringOutcome::NotApplicable),
        }
    }
}

impl Default for DocstringRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PythonDocstrings));
        registry
    }
}

/// Python docstrings: the leading string statement of a module, class or
/// function body
pub struct PythonDocstrings;

/// One pending rewrite, expressed as a byte range of the source
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

impl DocstringAdapter for PythonDocstrings {
    fn language(&self) -> &'static str {
        "python"
    }

    fn strip(&self, source: &str) -> Stripping {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
            tracing::warn!("failed to load python grammar: {}", e);
            return Stripping::unchanged(DocstringOutcome::Unparsable);
        }
        let tree = match parser.parse(source, None) {
            Some(tree) => tree,
            None => return Stripping::unchanged(DocstringOutcome::Unparsable),
        };
        let root = tree.root_node();
        if root.has_error() {
            return Stripping::unchanged(DocstringOutcome::Unparsable);
        }

        let mut edits = Vec::new();
        collect_edits(root, source, &mut edits);
        if edits.is_empty() {
            return Stripping::unchanged(DocstringOutcome::NonePresent);
        }

        let count = edits.len();
        edits.sort_by(|a, b| b.start.cmp(&a.start));
        let mut content = source.to_string();
        for edit in edits {
            content.replace_range(edit.start..edit.end, &edit.replacement);
        }
        Stripping {
            outcome: DocstringOutcome::Stripped { count },
            content: Some(content),
        }
    }
}

fn collect_edits(node: Node, source: &str, edits: &mut Vec<Edit>) {
    match node.kind() {
        "module" => {
            if let Some(doc) = leading_docstring(node, source) {
                edits.push(removal(doc, source, false));
            }
        }
        "class_definition" | "function_definition" => {
            if let Some(body) = node.child_by_field_name("body") {
                if let Some(doc) = leading_docstring(body, source) {
                    let sole = statements(body).len() == 1;
                    edits.push(removal(doc, source, sole));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_edits(child, source, edits);
    }
}

/// Named children that are statements (comments excluded)
fn statements(body: Node) -> Vec<Node> {
    let mut cursor = body.walk();
    let nodes = body
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    nodes
}

fn leading_docstring<'a>(body: Node<'a>, source: &str) -> Option<Node<'a>> {
    let first = *statements(body).first()?;
    let mut cursor = first.walk();
    let parts: Vec<Node> = first.named_children(&mut cursor).collect();
    if first.kind() != "expression_statement" || parts.len() != 1 {
        return None;
    }
    let expr = parts[0];
    match expr.kind() {
        "string" if is_text_literal(expr, source) => Some(first),
        "concatenated_string" => {
            let mut cursor = expr.walk();
            let plain = expr
                .named_children(&mut cursor)
                .all(|part| part.kind() == "string" && is_text_literal(part, source));
            plain.then_some(first)
        }
        _ => None,
    }
}

/// A plain `str` literal: no f-string interpolation and no bytes prefix
fn is_text_literal(string: Node, source: &str) -> bool {
    let text = &source[string.start_byte()..string.end_byte()];
    let prefix = text.split(['"', '\'']).next().unwrap_or("");
    !prefix.contains(['b', 'B']) && !has_interpolation(string)
}

fn has_interpolation(string: Node) -> bool {
    let mut cursor = string.walk();
    let found = string
        .named_children(&mut cursor)
        .any(|part| part.kind() == "interpolation");
    found
}

/// Build the edit removing `stmt`; a statement that is alone in its block is
/// replaced by `pass` so the block stays valid.
fn removal(stmt: Node, source: &str, sole: bool) -> Edit {
    let start = stmt.start_byte();
    let mut end = stmt.end_byte();

    // `"""doc"""; x = 1` keeps the rest of the line parseable
    let rest = &source[end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    if !sole && trimmed.starts_with(';') {
        end += rest.len() - trimmed.len() + 1;
    }

    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source[end..]
        .find('\n')
        .map(|i| end + i + 1)
        .unwrap_or(source.len());
    let indent = &source[line_start..start];
    let own_lines =
        indent.trim().is_empty() && source[end..line_end].trim().is_empty();

    match (own_lines, sole) {
        (true, true) => {
            let newline = if source[..line_end].ends_with('\n') { "\n" } else { "" };
            Edit {
                start: line_start,
                end: line_end,
                replacement: format!("{}pass{}", indent, newline),
            }
        }
        (true, false) => Edit {
            start: line_start,
            end: line_end,
            replacement: String::new(),
        },
        (false, true) => Edit {
            start,
            end,
            replacement: "pass".to_string(),
        },
        (false, false) => {
            let after = &source[end..];
            let spaces = after.len() - after.trim_start_matches([' ', '\t']).len();
            Edit {
                start,
                end: end + spaces,
                replacement: String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_python(source: &str) -> Stripping {
        DocstringRegistry::default().strip("python", source)
    }

    fn parses(source: &str) -> bool {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        !parser.parse(source, None).unwrap().root_node().has_error()
    }

    #[test]
    fn test_strips_module_class_and_function_docstrings() {
        let source = r#""""Module docs."""

import os


class Service:
    """Service docs."""

    def run(self):
        """Run docs.

        More detail.
        """
        return os.getcwd()
"#;
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::Stripped { count: 3 });
        let content = result.content.unwrap();
        assert!(!content.contains("docs"));
        assert!(!content.contains("More detail"));
        assert!(content.contains("return os.getcwd()"));
        assert!(parses(&content));
    }

    #[test]
    fn test_sole_docstring_becomes_pass() {
        let source = "def noop():\n    \"\"\"Nothing to see.\"\"\"\n\n\nclass Empty:\n    'Docs.'\n";
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::Stripped { count: 2 });
        let content = result.content.unwrap();
        assert_eq!(content, "def noop():\n    pass\n\n\nclass Empty:\n    pass\n");
        assert!(parses(&content));
    }

    #[test]
    fn test_inline_sole_docstring() {
        let source = "def f(): \"\"\"doc\"\"\"\n";
        let result = strip_python(source);
        assert_eq!(result.content.as_deref(), Some("def f(): pass\n"));
    }

    #[test]
    fn test_none_present() {
        let source = "x = 1\n\ndef f():\n    # comment\n    return x\n";
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::NonePresent);
        assert!(result.content.is_none());
    }

    #[test]
    fn test_string_after_code_is_not_a_docstring() {
        let source = "def f():\n    x = 1\n    \"\"\"not a docstring\"\"\"\n    return x\n";
        assert_eq!(strip_python(source).outcome, DocstringOutcome::NonePresent);
    }

    #[test]
    fn test_fstring_is_kept() {
        let source = "def f(name):\n    f\"hello {name}\"\n    return name\n";
        assert_eq!(strip_python(source).outcome, DocstringOutcome::NonePresent);
    }

    #[test]
    fn test_bytes_literal_is_kept() {
        let source = "def f():\n    b\"not a doc\"\n    return 1\n";
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::NonePresent);
        assert!(result.content.is_none());

        let source = "class C:\n    Rb'raw bytes'\n    x = 1\n";
        assert_eq!(strip_python(source).outcome, DocstringOutcome::NonePresent);
    }

    #[test]
    fn test_raw_string_is_a_docstring() {
        let source = "def f():\n    r\"\"\"Raw \\d docs.\"\"\"\n    return 1\n";
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::Stripped { count: 1 });
        assert_eq!(result.content.as_deref(), Some("def f():\n    return 1\n"));
    }

    #[test]
    fn test_unparsable() {
        let source = "def broken(:\n    \"\"\"doc\"\"\"\n";
        let result = strip_python(source);
        assert_eq!(result.outcome, DocstringOutcome::Unparsable);
        assert!(result.content.is_none());
    }

    #[test]
    fn test_other_languages_not_applicable() {
        let registry = DocstringRegistry::default();
        let result = registry.strip("rust", "/// docs\nfn main() {}\n");
        assert_eq!(result.outcome, DocstringOutcome::NotApplicable);
        assert!(registry.get("python").is_some());
        assert!(DocstringRegistry::empty().get("python").is_none());
    }
}
