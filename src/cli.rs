//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::core::file_reader::{TransformConfig, DEFAULT_MAX_BYTES};
use crate::core::logging::LogConfig;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::tokenizer::TokenModel;
use crate::core::util::HashAlgorithm;
use crate::filter::presets::DROP_PRESETS;
use crate::filter::{FilterOptions, Scope};
use crate::flows::export::{run_export, ExportConfig};
use crate::flows::stats::print_summary;

/// flatten-repo - export a project tree as one Markdown document or chunked JSONL.
#[derive(Parser, Debug)]
#[command(name = "flatten-repo")]
#[command(
    author,
    version,
    about,
    long_about = r#"flatten-repo turns a repository into a single deterministic export.

Candidate files come from `git ls-files` (or a directory walk), are narrowed by
scope, include/exclude globs and drop presets, then rendered either as one
Markdown document (with a structure tree) or as JSON Lines chunk records.

Output formats:
- document: Markdown with a tree and one fenced section per file (default)
- chunked: one JSON object per chunk, for ingestion pipelines

Examples:
    flatten-repo --output context.md
    flatten-repo --src-only --strip-docstrings --stats
    flatten-repo --all --drop docs,ci --output corpus.jsonl
    flatten-repo --exclude-glob '*.lock' --include-glob '*.py'
"#
)]
#[command(group(
    ArgGroup::new("scope")
        .args(["all", "src_only", "tests_only"])
        .multiple(false)
))]
pub struct Cli {
    /// Repository root to export.
    #[arg(
        long,
        default_value = ".",
        value_name = "DIR",
        env = "FLATTEN_REPO_ROOT",
        long_help = "Repository root to export (defaults to the current directory).\n\n\
All paths in the export are relative to this root."
    )]
    pub repo: PathBuf,

    /// Write the export to FILE instead of stdout.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "FLATTEN_REPO_OUTPUT",
        long_help = "Write the export to FILE instead of stdout.\n\n\
A `.jsonl` suffix selects the chunked format unless --format is given. The\n\
output file is never part of its own export."
    )]
    pub output: Option<PathBuf>,

    /// Output format (document/chunked).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "FLATTEN_REPO_FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- document (aliases: md, markdown)\n\
- chunked (alias: jsonl)\n\n\
Defaults to the format implied by the --output suffix, else document."
    )]
    pub format: Option<OutputFormat>,

    /// Skip `git ls-files` and walk the directory tree.
    #[arg(
        long,
        long_help = "Do not ask git for the file list; walk the directory tree instead.\n\n\
The walk prunes VCS metadata, virtual environments, caches and build output."
    )]
    pub no_git: bool,

    /// Export every candidate path (no scope narrowing).
    #[arg(long)]
    pub all: bool,

    /// Export only the source directory plus key files.
    #[arg(long)]
    pub src_only: bool,

    /// Export only the tests directory plus key files.
    #[arg(long)]
    pub tests_only: bool,

    /// Keep test files in the default scope.
    #[arg(
        long,
        long_help = "Keep files under the tests directory in the default and --src-only scopes.\n\
Without this flag the default scope removes them."
    )]
    pub include_tests: bool,

    /// Order test files before other non-key files.
    #[arg(long)]
    pub tests_first: bool,

    /// Do not move key files to the front.
    #[arg(long)]
    pub no_key_first: bool,

    /// Do not keep key files outside the selected scope.
    #[arg(
        long,
        long_help = "Disable the key-file allow-list (manifests, lockfiles, CI and pre-commit\n\
configuration). Key files then follow the same scope rules as every other path."
    )]
    pub no_key_files: bool,

    /// Source directory used by the scopes.
    #[arg(long, default_value = "src", value_name = "DIR")]
    pub src_dir: String,

    /// Tests directory used by the scopes.
    #[arg(long, default_value = "tests", value_name = "DIR")]
    pub tests_dir: String,

    /// Keep only paths matching GLOB (repeatable).
    #[arg(
        long = "include-glob",
        value_name = "GLOB",
        long_help = "Keep only paths matching at least one include glob. Repeatable.\n\n\
`*` also matches `/`, so `*.py` selects Python files at any depth."
    )]
    pub include_globs: Vec<String>,

    /// Remove paths matching GLOB (repeatable, wins over includes).
    #[arg(long = "exclude-glob", value_name = "GLOB")]
    pub exclude_globs: Vec<String>,

    /// Remove everything under PATH (repeatable).
    #[arg(long = "exclude-path", value_name = "PATH")]
    pub exclude_paths: Vec<String>,

    /// Drop presets to apply (comma separated).
    #[arg(
        long,
        value_name = "PRESETS",
        value_delimiter = ',',
        env = "FLATTEN_REPO_DROP",
        long_help = "Apply drop presets, given as a comma separated list. Each preset removes\n\
a named group of paths and wins over include globs.\n\n\
Run --list-presets to see the available names."
    )]
    pub drop: Vec<String>,

    /// List drop presets and exit.
    #[arg(long)]
    pub list_presets: bool,

    /// Excerpt files larger than N bytes.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_BYTES,
        env = "FLATTEN_REPO_MAX_BYTES",
        long_help = "Files larger than N bytes are reduced to a head and tail excerpt joined by\n\
a marker stating the exact number of omitted bytes. Minimum 64."
    )]
    pub max_bytes: usize,

    /// Chunk width in characters (chunked format).
    #[arg(
        long,
        value_name = "N",
        default_value_t = crate::core::chunk::DEFAULT_CHUNK_CHARS,
        env = "FLATTEN_REPO_CHUNK_CHARS"
    )]
    pub chunk_chars: usize,

    /// Remove docstrings from supported languages (Python).
    #[arg(
        long,
        long_help = "Remove docstrings from supported languages (currently Python).\n\n\
Files that fail to parse are exported unmodified and annotated. Truncated files\n\
are never stripped."
    )]
    pub strip_docstrings: bool,

    /// Attach size and checksum to every file.
    #[arg(long)]
    pub meta: bool,

    /// Checksum algorithm for --meta (xxh3/sha1).
    #[arg(long, value_name = "ALGO", default_value = "xxh3", env = "FLATTEN_REPO_HASH")]
    pub hash: HashAlgorithm,

    /// Drop the blank line between document sections.
    #[arg(long)]
    pub compact: bool,

    /// Print a run summary to stderr.
    #[arg(
        long,
        long_help = "Print a run summary to stderr: candidate and selected counts, skipped and\n\
binary files, truncations, docstring outcomes and an estimated token count."
    )]
    pub stats: bool,

    /// Tokenizer used for the --stats estimate.
    #[arg(
        long,
        value_name = "MODEL",
        default_value = "cl100k",
        env = "FLATTEN_REPO_TOKEN_MODEL",
        long_help = "Tokenizer used for the --stats token estimate.\n\n\
Supported values: cl100k, o200k, heuristic."
    )]
    pub token_model: TokenModel,

    /// Verbose mode (per-file diagnostics).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write JSON log lines to FILE.
    #[arg(long, value_name = "FILE", env = "FLATTEN_REPO_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            verbose: self.verbose,
            quiet: self.quiet,
            log_file: self.log_file.clone(),
        }
    }

    fn scope(&self) -> Scope {
        if self.all {
            Scope::All
        } else if self.src_only {
            Scope::SrcOnly
        } else if self.tests_only {
            Scope::TestsOnly
        } else {
            Scope::Default
        }
    }

    fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| {
                self.output
                    .as_ref()
                    .and_then(|p| OutputFormat::from_output_path(&p.to_string_lossy()))
            })
            .unwrap_or_default()
    }

    /// Resolve the parsed arguments into one export configuration
    pub fn export_config(&self) -> ExportConfig {
        let mut filter = FilterOptions::default()
            .with_scope(self.scope())
            .with_include_tests(self.include_tests)
            .with_include_globs(self.include_globs.clone())
            .with_exclude_globs(self.exclude_globs.clone())
            .with_drop(self.drop.clone());
        filter.exclude_paths = self.exclude_paths.clone();
        filter.tests_first = self.tests_first;
        filter.key_first = !self.no_key_first;
        filter.key_files = !self.no_key_files;
        filter.src_dir = self.src_dir.clone();
        filter.tests_dir = self.tests_dir.clone();

        let transform = TransformConfig {
            max_bytes: self.max_bytes,
            strip_docstrings: self.strip_docstrings,
            meta: self.meta,
            hash: self.hash,
        };

        let render = RenderConfig {
            format: self.output_format(),
            chunk_chars: self.chunk_chars,
            compact: self.compact,
            meta: self.meta,
            hash: self.hash,
            docstrings: self.strip_docstrings,
        };

        ExportConfig {
            root: self.repo.clone(),
            output: self.output.clone(),
            use_git: !self.no_git,
            filter,
            transform,
            render,
            token_model: self.stats.then_some(self.token_model),
        }
    }
}

fn list_presets() {
    for (name, patterns) in DROP_PRESETS {
        println!("{:14} {}", name, patterns.join(", "));
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.list_presets {
        list_presets();
        return Ok(());
    }

    let config = cli.export_config();
    let summary = run_export(&config)?;

    if cli.stats {
        print_summary(&summary, cli.token_model);
    }
    Ok(())
}
