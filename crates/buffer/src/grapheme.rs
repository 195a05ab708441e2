// Chunk: docs/chunks/grapheme_cluster_awareness - Grapheme cluster boundary helpers

//! Grapheme cluster boundary detection over raw UTF-8 bytes.
//!
//! A grapheme cluster is what users perceive as a single "character":
//!
//! - ZWJ emoji sequences: 👨‍👩‍👧‍👦 (4 codepoints + 3 ZWJ = 25 bytes)
//! - Combining character sequences: é (e + combining acute = 3 bytes)
//! - Regional indicator pairs: 🇺🇸 (8 bytes)
//! - CR LF (2 bytes)
//!
//! The gap buffer only hands these helpers one side of the gap at a time, and
//! that side can be the whole file. Segmentation therefore looks at a bounded
//! window around the offset, starting at the nearest line start when one is
//! close. Bytes that are not valid UTF-8 fall back to codepoint motion.

use unicode_segmentation::UnicodeSegmentation;

use crate::utf8;

/// How far back or forward to look for grapheme context.
const CONTEXT_WINDOW: usize = 1024;

/// Returns the byte offset of the grapheme cluster boundary immediately
/// before `offset`.
///
/// If `offset` is 0, returns 0. `offset` is clamped to `bytes.len()`.
pub fn grapheme_boundary_left(bytes: &[u8], offset: usize) -> usize {
    let offset = offset.min(bytes.len());
    if offset == 0 {
        return 0;
    }

    // CR LF is the only ASCII pair that forms one cluster.
    let before = bytes[offset - 1];
    if before == b'\n' {
        return if offset >= 2 && bytes[offset - 2] == b'\r' {
            offset - 2
        } else {
            offset - 1
        };
    }

    // Fast path: a cluster that ends in an ASCII byte is that byte alone.
    if before.is_ascii() {
        return offset - 1;
    }

    let start = window_start(bytes, offset);
    match valid_suffix(bytes, start, offset) {
        Some((from, s)) => s
            .grapheme_indices(true)
            .next_back()
            .map_or(from, |(i, _)| from + i),
        None => utf8::prev_boundary(bytes, offset),
    }
}

/// Returns the byte offset of the grapheme cluster boundary immediately
/// after `offset`.
///
/// If `offset` is at or past the end, returns `bytes.len()`.
pub fn grapheme_boundary_right(bytes: &[u8], offset: usize) -> usize {
    if offset >= bytes.len() {
        return bytes.len();
    }

    let current = bytes[offset];
    if current == b'\n' {
        return offset + 1;
    }
    if current == b'\r' {
        return if bytes.get(offset + 1) == Some(&b'\n') {
            offset + 2
        } else {
            offset + 1
        };
    }

    // Fast path: ASCII followed by ASCII (or the end) is a single-byte cluster.
    if current.is_ascii() && bytes.get(offset + 1).map_or(true, |b| b.is_ascii()) {
        return offset + 1;
    }

    let limit = (offset + CONTEXT_WINDOW).min(bytes.len());
    let end = bytes[offset..limit]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(limit, |i| offset + i);

    match valid_prefix(&bytes[offset..end]) {
        Some(s) => s
            .graphemes(true)
            .next()
            .map_or(end, |g| offset + g.len()),
        None => utf8::next_boundary(bytes, offset),
    }
}

/// Returns the number of bytes in the grapheme cluster ending at `offset`.
///
/// Used by backward deletion to know how many bytes to remove.
pub fn grapheme_len_before(bytes: &[u8], offset: usize) -> usize {
    let offset = offset.min(bytes.len());
    offset - grapheme_boundary_left(bytes, offset)
}

/// Returns the number of bytes in the grapheme cluster starting at `offset`.
///
/// Used by forward deletion to know how many bytes to remove.
pub fn grapheme_len_at(bytes: &[u8], offset: usize) -> usize {
    if offset >= bytes.len() {
        return 0;
    }
    grapheme_boundary_right(bytes, offset) - offset
}

/// Start of the segmentation window ending at `offset`: just past the last
/// newline within reach, otherwise the first codepoint boundary in reach.
fn window_start(bytes: &[u8], offset: usize) -> usize {
    let floor = offset.saturating_sub(CONTEXT_WINDOW);
    match bytes[floor..offset].iter().rposition(|&b| b == b'\n') {
        Some(pos) => floor + pos + 1,
        None => {
            let mut start = floor;
            while start < offset && utf8::is_continuation(bytes[start]) {
                start += 1;
            }
            start
        }
    }
}

/// Longest valid UTF-8 run of `bytes[start..end]` that ends at `end`,
/// returned with its start offset. `None` if the byte before `end` is not
/// part of a complete sequence.
fn valid_suffix(bytes: &[u8], start: usize, end: usize) -> Option<(usize, &str)> {
    let mut from = start;
    loop {
        match std::str::from_utf8(&bytes[from..end]) {
            Ok(s) if !s.is_empty() => return Some((from, s)),
            Ok(_) => return None,
            // Skip past the invalid bytes and retry with what follows.
            Err(e) => match e.error_len() {
                Some(len) => from += e.valid_up_to() + len,
                None => return None,
            },
        }
    }
}

/// Longest valid UTF-8 prefix of `bytes`, or `None` if it is empty.
fn valid_prefix(bytes: &[u8]) -> Option<&str> {
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.is_empty() => Some(s),
        Ok(_) => None,
        Err(e) if e.valid_up_to() > 0 => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}
