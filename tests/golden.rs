//! Golden tests for flatten-repo
//!
//! These tests run the binary over `tests/fixtures/sample_project` and check
//! the full export against content rebuilt from the fixture files:
//! - Byte-identical output across runs
//! - Exact document layout and ordering
//! - Chunk records that reassemble into the original files

use assert_cmd::Command;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get the path to the sample project
fn sample_project() -> PathBuf {
    fixtures_dir().join("sample_project")
}

/// Create a command exporting the sample project without git
fn export_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("flatten-repo"));
    cmd.arg("--repo").arg(sample_project()).arg("--no-git");
    cmd
}

fn fixture(path: &str) -> String {
    fs::read_to_string(sample_project().join(path)).expect("fixture file")
}

/// Parse JSONL output into a vector of JSON values
fn parse_jsonl(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run flatten-repo");
    assert!(output.status.success(), "exit status {:?}", output.status);
    String::from_utf8(output.stdout).expect("utf-8 output")
}

fn section(path: &str, language: &str, content: &str) -> String {
    format!("\n## {}\n```{}\n{}```\n", path, language, content)
}

#[test]
fn golden_default_document() {
    let output = stdout_of(&mut export_cmd());

    let mut expected = String::from(
        "# Project Export
root=sample_project
files=5

## Structure
```text
sample_project
├── .github/
│   └── workflows/
│       └── ci.yml
├── src/
│   └── app.py
├── Dockerfile
├── README.md
└── pyproject.toml
```
",
    );
    expected.push_str(&section("pyproject.toml", "toml", &fixture("pyproject.toml")));
    expected.push_str(&section("Dockerfile", "dockerfile", &fixture("Dockerfile")));
    expected.push_str(&section(
        ".github/workflows/ci.yml",
        "yaml",
        &fixture(".github/workflows/ci.yml"),
    ));
    expected.push_str(&section("README.md", "markdown", &fixture("README.md")));
    expected.push_str(&section("src/app.py", "python", &fixture("src/app.py")));

    assert_eq!(output, expected);
}

#[test]
fn golden_output_is_deterministic() {
    for args in [
        vec!["--all"],
        vec!["--all", "--format", "chunked", "--chunk-chars", "32"],
        vec!["--include-tests", "--strip-docstrings", "--meta"],
    ] {
        let first = stdout_of(export_cmd().args(&args));
        let second = stdout_of(export_cmd().args(&args));
        assert_eq!(first, second, "output differs for {:?}", args);
    }
}

#[test]
fn golden_chunks_reassemble_files() {
    let output = stdout_of(export_cmd().args(["--all", "--format", "chunked", "--chunk-chars", "16"]));
    let records = parse_jsonl(&output);

    let mut files: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for record in &records {
        let path = record["path"].as_str().unwrap().to_string();
        files.entry(path).or_default().push(record);
    }
    assert_eq!(files.len(), 7);

    for (path, chunks) in files {
        let count = chunks[0]["chunk_count"].as_u64().unwrap() as usize;
        assert_eq!(chunks.len(), count, "{}", path);
        let mut text = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk["chunk_index"].as_u64().unwrap() as usize, i);
            assert_eq!(chunk["truncated"], false);
            text.push_str(chunk["text"].as_str().unwrap());
        }
        assert_eq!(text, fixture(&path), "{}", path);
    }
}

#[test]
fn golden_key_files_lead_the_chunk_stream() {
    let output = stdout_of(export_cmd().args(["--all", "--format", "jsonl"]));
    let paths: Vec<String> = parse_jsonl(&output)
        .iter()
        .map(|r| r["path"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(
        paths,
        vec![
            "pyproject.toml",
            "Dockerfile",
            ".github/workflows/ci.yml",
            "README.md",
            "docs/guide.md",
            "src/app.py",
            "tests/test_app.py",
        ]
    );
}

#[test]
fn golden_stripped_docstrings() {
    let output = stdout_of(export_cmd().args([
        "--src-only",
        "--format",
        "chunked",
        "--strip-docstrings",
    ]));
    let records = parse_jsonl(&output);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["path"], "src/app.py");
    assert_eq!(record["language"], "python");
    assert_eq!(record["docstrings"], "stripped");
    assert_eq!(
        record["text"],
        "\n\ndef greet(name):\n    return f\"Hello, {name}!\"\n\n\nclass Counter:\n\n    \
def __init__(self):\n        self.value = 0\n\n    def bump(self):\n        self.value += 1\n        \
return self.value\n\n\nif __name__ == \"__main__\":\n    print(greet(\"world\"))\n"
    );
}

#[test]
fn golden_meta_header() {
    let output = stdout_of(export_cmd().args(["--src-only", "--meta", "--hash", "sha1"]));
    let size = fixture("src/app.py").len();
    let header = format!("## src/app.py size={} sha1=", size);
    assert!(output.contains(&header), "missing {:?}", header);
}
