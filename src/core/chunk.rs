//! Fixed-width chunking of transformed content
//!
//! Windows are measured in characters, never split a character, and
//! concatenate back to the input exactly.

use crate::core::model::Chunk;

/// Default chunk width in characters
pub const DEFAULT_CHUNK_CHARS: usize = 24_000;

/// Split `text` into windows of at most `chunk_chars` characters
///
/// Empty input yields a single empty chunk so every file is represented.
pub fn chunk_text(text: &str, chunk_chars: usize) -> Vec<Chunk<'_>> {
    let size = chunk_chars.max(1);

    // Byte offsets where each window starts, plus the end of the text
    let mut bounds = vec![0usize];
    let mut char_count = 0usize;
    for (byte_idx, _) in text.char_indices() {
        if char_count > 0 && char_count % size == 0 {
            bounds.push(byte_idx);
        }
        char_count += 1;
    }
    bounds.push(text.len());

    let count = bounds.len() - 1;
    let mut chunks = Vec::with_capacity(count);
    let mut line = 1usize;
    for index in 0..count {
        let slice = &text[bounds[index]..bounds[index + 1]];
        let start = index * size;
        let end = if index + 1 == count { char_count } else { start + size };

        let inner_newlines = match slice.char_indices().last() {
            Some((last_idx, _)) => slice[..last_idx].matches('\n').count(),
            None => 0,
        };
        chunks.push(Chunk {
            index,
            count,
            start,
            end,
            start_line: line,
            end_line: line + inner_newlines,
            text: slice,
        });
        line += slice.matches('\n').count();
    }
    chunks
}
