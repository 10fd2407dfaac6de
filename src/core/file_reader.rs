//! Content transformation
//!
//! Turns a selected path into a `FileRecord`:
//! - binary detection on a fixed-size sniff window
//! - name-based content processors (secrets, licenses, package markers)
//! - head/tail truncation with an exact omitted-byte marker
//! - optional docstring stripping
//! - optional checksum and modification time

use std::fs;
use std::path::Path;

use crate::core::docstrings::DocstringRegistry;
use crate::core::language;
use crate::core::processors::ProcessorRegistry;
use crate::core::model::{
    ContentKind, DocstringOutcome, FileRecord, SkipReason, SkippedFile, Truncation,
};
use crate::core::util::{ceil_char_boundary, floor_char_boundary, hash_bytes, mtime_rfc3339, HashAlgorithm};

/// Bytes inspected when classifying a file as text or binary
pub const SNIFF_WINDOW: usize = 8 * 1024;

/// Default truncation threshold in bytes
pub const DEFAULT_MAX_BYTES: usize = 500_000;

/// Smallest accepted truncation threshold
pub const MIN_MAX_BYTES: usize = 64;

/// Configuration for the content transformer
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Files larger than this are excerpted (bytes)
    pub max_bytes: usize,
    pub strip_docstrings: bool,
    /// Attach checksum and modification time
    pub meta: bool,
    pub hash: HashAlgorithm,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            strip_docstrings: false,
            meta: false,
            hash: HashAlgorithm::default(),
        }
    }
}

/// Whether the leading window of `bytes` looks binary
///
/// A NUL byte or an invalid UTF-8 sequence marks the file as binary. A
/// multi-byte sequence cut off by the end of the window does not count.
pub fn is_binary(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    if window.contains(&0) {
        return true;
    }
    match std::str::from_utf8(window) {
        Ok(_) => false,
        Err(e) => {
            let cut_by_window = e.error_len().is_none() && window.len() < bytes.len();
            !cut_by_window
        }
    }
}

/// Placeholder content for binary files
pub fn binary_placeholder(size: u64) -> String {
    format!("[binary file: {} bytes, content omitted]", size)
}

fn omission_marker(omitted: usize) -> String {
    format!("\n[... {} bytes omitted ...]\n", omitted)
}

/// Excerpt `text` when it exceeds `max_bytes`
///
/// The excerpt keeps `ceil(budget / 2)` bytes of head and the rest of the
/// budget as tail, cut on char boundaries. The budget starts at `max_bytes`
/// and only shrinks when the excerpt would not be strictly shorter than the
/// input.
pub fn truncate(text: &str, max_bytes: usize) -> (String, Option<Truncation>) {
    let len = text.len();
    if len <= max_bytes {
        return (text.to_string(), None);
    }

    let mut budget = max_bytes;
    loop {
        let head_end = floor_char_boundary(text, budget.div_ceil(2));
        let tail_start = ceil_char_boundary(text, len - budget / 2).max(head_end);
        let omitted = tail_start - head_end;
        let marker = omission_marker(omitted);
        let excerpt_len = head_end + marker.len() + (len - tail_start);

        if excerpt_len < len || budget == 0 {
            let mut excerpt = String::with_capacity(excerpt_len);
            excerpt.push_str(&text[..head_end]);
            excerpt.push_str(&marker);
            excerpt.push_str(&text[tail_start..]);
            let truncation = Truncation {
                head_bytes: head_end,
                tail_bytes: len - tail_start,
                omitted_bytes: omitted,
            };
            return (excerpt, Some(truncation));
        }
        budget = budget.saturating_sub(excerpt_len - len + 1);
    }
}

/// Load and transform one selected path
pub fn materialize(
    root: &Path,
    rel_path: &str,
    config: &TransformConfig,
    registry: &DocstringRegistry,
    processors: &ProcessorRegistry,
) -> Result<FileRecord, SkippedFile> {
    let abs_path = root.join(rel_path);
    let bytes = fs::read(&abs_path).map_err(|e| SkippedFile {
        path: rel_path.to_string(),
        reason: SkipReason::Unreadable,
        message: e.to_string(),
    })?;
    let size = bytes.len() as u64;

    let (checksum, mtime) = if config.meta {
        (
            Some(hash_bytes(&bytes, config.hash)),
            mtime_rfc3339(&abs_path).ok(),
        )
    } else {
        (None, None)
    };

    if is_binary(&bytes) {
        return Ok(FileRecord {
            path: rel_path.to_string(),
            size,
            kind: ContentKind::Binary,
            language: "",
            content: binary_placeholder(size),
            truncation: None,
            docstrings: DocstringOutcome::NotApplicable,
            processor: None,
            checksum,
            mtime,
        });
    }

    let text = String::from_utf8(bytes).map_err(|e| SkippedFile {
        path: rel_path.to_string(),
        reason: SkipReason::Undecodable,
        message: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    let language = language::detect(rel_path);
    let processed = processors.apply(rel_path, &text);
    let source = processed.as_ref().map_or(text.as_str(), |p| p.content.as_str());
    let (mut content, truncation) = truncate(source, config.max_bytes);

    let docstrings = if !config.strip_docstrings
        || processed.is_some()
        || registry.get(language).is_none()
    {
        DocstringOutcome::NotApplicable
    } else if truncation.is_some() {
        DocstringOutcome::SkippedTruncated
    } else {
        let stripping = registry.strip(language, &content);
        if let Some(stripped) = stripping.content {
            content = stripped;
        }
        stripping.outcome
    };

    Ok(FileRecord {
        path: rel_path.to_string(),
        size,
        kind: ContentKind::Text,
        language,
        content,
        truncation,
        docstrings,
        processor: processed.map(|p| p.processor),
        checksum,
        mtime,
    })
}
