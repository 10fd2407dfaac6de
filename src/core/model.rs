//! Export data model
//!
//! Every stage of the pipeline speaks in these types: the content transformer
//! produces `FileRecord`s (or `SkippedFile`s), the assembler consumes them and
//! the export flow folds `Diagnostic`s into a `RunSummary`.

use serde::{Deserialize, Serialize};

/// Text/binary classification of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Binary,
}

/// Head/tail excerpt information for an oversized file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Bytes kept from the start of the file
    pub head_bytes: usize,
    /// Bytes kept from the end of the file
    pub tail_bytes: usize,
    /// Exact number of bytes elided between head and tail
    pub omitted_bytes: usize,
}

/// What docstring stripping did to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocstringOutcome {
    /// Stripping was not requested, or no adapter exists for the language
    #[default]
    NotApplicable,
    /// The file parsed and `count` docstrings were removed
    Stripped { count: usize },
    /// The file parsed but contains no docstrings
    NonePresent,
    /// The file failed to parse; content is left unmodified
    Unparsable,
    /// The file was truncated, so its excerpt was not parsed
    SkippedTruncated,
}

impl DocstringOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocstringOutcome::NotApplicable => "not-applicable",
            DocstringOutcome::Stripped { .. } => "stripped",
            DocstringOutcome::NonePresent => "none-present",
            DocstringOutcome::Unparsable => "unparsable",
            DocstringOutcome::SkippedTruncated => "skipped-truncated",
        }
    }

    /// Human-readable note for document output, if the outcome deserves one
    pub fn note(&self) -> Option<&'static str> {
        match self {
            DocstringOutcome::NonePresent => Some("no documentation present"),
            DocstringOutcome::Unparsable => Some("unparsable source, content left unmodified"),
            DocstringOutcome::NotApplicable
            | DocstringOutcome::Stripped { .. }
            | DocstringOutcome::SkippedTruncated => None,
        }
    }
}

/// A materialized file, ready for rendering
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to root, using '/' as separator
    pub path: String,
    /// Raw size in bytes
    pub size: u64,
    pub kind: ContentKind,
    /// Language tag (empty when unknown)
    pub language: &'static str,
    /// Transformed content (placeholder for binary files)
    pub content: String,
    pub truncation: Option<Truncation>,
    pub docstrings: DocstringOutcome,
    /// Content processor that replaced the text with a summary
    pub processor: Option<&'static str>,
    /// Checksum of the raw bytes, only computed on request
    pub checksum: Option<String>,
    /// Modification time (RFC 3339), only read on request
    pub mtime: Option<String>,
}

impl FileRecord {
    pub fn is_binary(&self) -> bool {
        self.kind == ContentKind::Binary
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// Why a path produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// The file could not be opened or read
    Unreadable,
    /// The file sniffed as text but its body is not valid UTF-8
    Undecodable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unreadable => "unreadable",
            SkipReason::Undecodable => "undecodable",
        }
    }
}

/// A path the content transformer omitted
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
    pub message: String,
}

/// Diagnostic codes recorded per path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    FileSkippedUnreadable,
    FileSkippedUndecodable,
    BinaryFile,
    FileTruncated,
    DocstringsStripped,
    DocstringsNonePresent,
    DocstringsUnparsable,
    ContentSummarized,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::FileSkippedUnreadable => "FILE_SKIPPED_UNREADABLE",
            DiagnosticCode::FileSkippedUndecodable => "FILE_SKIPPED_UNDECODABLE",
            DiagnosticCode::BinaryFile => "BINARY_FILE",
            DiagnosticCode::FileTruncated => "FILE_TRUNCATED",
            DiagnosticCode::DocstringsStripped => "DOCSTRINGS_STRIPPED",
            DiagnosticCode::DocstringsNonePresent => "DOCSTRINGS_NONE_PRESENT",
            DiagnosticCode::DocstringsUnparsable => "DOCSTRINGS_UNPARSABLE",
            DiagnosticCode::ContentSummarized => "CONTENT_SUMMARIZED",
        }
    }
}

/// A structured per-path diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Diagnostics describing a materialized record
    pub fn for_record(record: &FileRecord) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if record.is_binary() {
            out.push(Diagnostic::new(
                DiagnosticCode::BinaryFile,
                &record.path,
                format!("binary content replaced by placeholder ({} bytes)", record.size),
            ));
        }
        if let Some(processor) = record.processor {
            out.push(Diagnostic::new(
                DiagnosticCode::ContentSummarized,
                &record.path,
                format!("content replaced by {}", processor),
            ));
        }
        if let Some(t) = &record.truncation {
            out.push(Diagnostic::new(
                DiagnosticCode::FileTruncated,
                &record.path,
                format!("{} bytes omitted", t.omitted_bytes),
            ));
        }
        match record.docstrings {
            DocstringOutcome::Stripped { count } => out.push(Diagnostic::new(
                DiagnosticCode::DocstringsStripped,
                &record.path,
                format!("{} docstrings stripped", count),
            )),
            DocstringOutcome::NonePresent => out.push(Diagnostic::new(
                DiagnosticCode::DocstringsNonePresent,
                &record.path,
                "no documentation present",
            )),
            DocstringOutcome::Unparsable => out.push(Diagnostic::new(
                DiagnosticCode::DocstringsUnparsable,
                &record.path,
                "unparsable source, content left unmodified",
            )),
            DocstringOutcome::NotApplicable | DocstringOutcome::SkippedTruncated => {}
        }
        out
    }

    pub fn for_skip(skipped: &SkippedFile) -> Diagnostic {
        let code = match skipped.reason {
            SkipReason::Unreadable => DiagnosticCode::FileSkippedUnreadable,
            SkipReason::Undecodable => DiagnosticCode::FileSkippedUndecodable,
        };
        Diagnostic::new(code, &skipped.path, &skipped.message)
    }
}

/// One bounded slice of a record's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub count: usize,
    /// Character offset of the first character (inclusive)
    pub start: usize,
    /// Character offset past the last character (exclusive)
    pub end: usize,
    /// 1-based line of the first character
    pub start_line: usize,
    /// 1-based line of the last character
    pub end_line: usize,
    pub text: &'a str,
}

/// Aggregated statistics for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Which enumerator produced the candidates ("git" or "walk")
    pub source: String,
    pub candidates: usize,
    pub selected: usize,
    pub rendered: usize,
    pub skipped: usize,
    pub binary: usize,
    pub truncated: usize,
    pub docstrings_stripped: usize,
    pub docstrings_unparsable: usize,
    pub total_chars: usize,
    /// Token estimate of rendered content, when requested
    pub estimated_tokens: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    /// Fold a record into the summary
    pub fn record(&mut self, record: &FileRecord) {
        self.rendered += 1;
        self.total_chars += record.content.chars().count();
        if record.is_binary() {
            self.binary += 1;
        }
        if record.is_truncated() {
            self.truncated += 1;
        }
        match record.docstrings {
            DocstringOutcome::Stripped { count } => self.docstrings_stripped += count,
            DocstringOutcome::Unparsable => self.docstrings_unparsable += 1,
            _ => {}
        }
        self.diagnostics.extend(Diagnostic::for_record(record));
    }

    /// Fold a skipped path into the summary
    pub fn skip(&mut self, skipped: &SkippedFile) {
        self.skipped += 1;
        self.diagnostics.push(Diagnostic::for_skip(skipped));
    }
}
