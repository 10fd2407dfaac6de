//! Output assembly
//!
//! Streams records into either a markdown document (header, structure tree,
//! one fenced section per file) or JSON Lines chunk records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::Write;

use crate::core::chunk::chunk_text;
use crate::core::error::{ExportError, Result};
use crate::core::model::FileRecord;
use crate::core::tree::TreeNode;
use crate::core::util::HashAlgorithm;

static BACKTICK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("`+").expect("valid regex"));

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown document with a structure tree
    #[default]
    Document,
    /// JSON Lines, one record per chunk
    Chunked,
}

impl OutputFormat {
    /// Infer the format from an output file name
    pub fn from_output_path(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        if lower.ends_with(".jsonl") {
            Some(OutputFormat::Chunked)
        } else if lower.ends_with(".md") || lower.ends_with(".markdown") {
            Some(OutputFormat::Document)
        } else {
            None
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "md" | "markdown" => Ok(OutputFormat::Document),
            "chunked" | "jsonl" => Ok(OutputFormat::Chunked),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub format: OutputFormat,
    /// Chunk width in characters (chunked format)
    pub chunk_chars: usize,
    /// Drop the blank line between document sections
    pub compact: bool,
    /// Emit size and checksum information
    pub meta: bool,
    pub hash: HashAlgorithm,
    /// Docstring stripping was requested, so outcomes are reported
    pub docstrings: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Document,
            chunk_chars: crate::core::chunk::DEFAULT_CHUNK_CHARS,
            compact: false,
            meta: false,
            hash: HashAlgorithm::default(),
            docstrings: false,
        }
    }
}

/// One JSON Lines record
#[derive(Debug, Serialize)]
struct ChunkRecord<'a> {
    path: &'a str,
    chunk_index: usize,
    chunk_count: usize,
    start: usize,
    end: usize,
    start_line: usize,
    end_line: usize,
    language: &'a str,
    binary: bool,
    truncated: bool,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    processor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    docstrings: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mtime: Option<&'a str>,
}

/// Streaming renderer over any writer
pub struct Renderer<W: Write> {
    config: RenderConfig,
    writer: W,
    destination: String,
}

impl<W: Write> Renderer<W> {
    /// `destination` names the sink in error messages
    pub fn new(config: RenderConfig, writer: W, destination: impl Into<String>) -> Self {
        Self {
            config,
            writer,
            destination: destination.into(),
        }
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer
            .write_all(s.as_bytes())
            .map_err(|source| ExportError::Output {
                destination: self.destination.clone(),
                source,
            })
    }

    /// Write everything that precedes the first record
    ///
    /// For documents this is the header and the structure tree built from
    /// the full selected path list; chunked output has no preamble.
    pub fn begin(&mut self, root_name: &str, paths: &[String]) -> Result<()> {
        if self.config.format == OutputFormat::Chunked {
            return Ok(());
        }
        let tree = TreeNode::from_paths(paths.iter().map(String::as_str)).render(root_name);
        let header = format!(
            "# Project Export\nroot={}\nfiles={}\n\n## Structure\n```text\n{}\n```\n",
            root_name,
            paths.len(),
            tree
        );
        self.write_str(&header)
    }

    pub fn write_record(&mut self, record: &FileRecord) -> Result<()> {
        match self.config.format {
            OutputFormat::Document => {
                let section = self.document_section(record);
                self.write_str(&section)
            }
            OutputFormat::Chunked => self.write_chunks(record),
        }
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|source| ExportError::Output {
            destination: self.destination.clone(),
            source,
        })?;
        Ok(self.writer)
    }

    fn document_section(&self, record: &FileRecord) -> String {
        let mut out = String::new();
        if !self.config.compact {
            out.push('\n');
        }

        out.push_str("## ");
        out.push_str(&record.path);
        if self.config.meta {
            out.push_str(&format!(" size={}", record.size));
            if let Some(checksum) = &record.checksum {
                out.push_str(&format!(" {}={}", self.config.hash.label(), checksum));
            }
        }
        out.push('\n');

        if let Some(processor) = record.processor {
            out.push_str(&format!("> note: summarized by {}\n", processor));
        }
        if self.config.docstrings {
            if let Some(note) = record.docstrings.note() {
                out.push_str(&format!("> note: {}\n", note));
            }
        }

        let fence = fence_for(&record.content);
        let language = if record.language.is_empty() || record.is_binary() {
            "text"
        } else {
            record.language
        };
        out.push_str(&fence);
        out.push_str(language);
        out.push('\n');
        out.push_str(&record.content);
        if !record.content.is_empty() && !record.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&fence);
        out.push('\n');
        out
    }

    fn write_chunks(&mut self, record: &FileRecord) -> Result<()> {
        let docstrings = self.config.docstrings.then(|| record.docstrings.as_str());
        let size = self.config.meta.then_some(record.size);

        let mut lines = String::new();
        for chunk in chunk_text(&record.content, self.config.chunk_chars) {
            let line = ChunkRecord {
                path: &record.path,
                chunk_index: chunk.index,
                chunk_count: chunk.count,
                start: chunk.start,
                end: chunk.end,
                start_line: chunk.start_line,
                end_line: chunk.end_line,
                language: record.language,
                binary: record.is_binary(),
                truncated: record.is_truncated(),
                text: chunk.text,
                processor: record.processor,
                docstrings,
                size,
                checksum: record.checksum.as_deref(),
                mtime: record.mtime.as_deref(),
            };
            lines.push_str(&serde_json::to_string(&line)?);
            lines.push('\n');
        }
        self.write_str(&lines)
    }
}

/// Backtick fence strictly longer than any backtick run in `content`
pub fn fence_for(content: &str) -> String {
    let longest = BACKTICK_RUN
        .find_iter(content)
        .map(|m| m.as_str().len())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
