// Chunk: docs/chunks/codepoint_boundaries - UTF-8 codepoint boundary oracle

//! UTF-8 codepoint boundary helpers over raw bytes.
//!
//! The gap buffer stores bytes, not `char`s, so cursor motion and backward
//! deletion need to find where one encoded codepoint ends and the next begins
//! without ever decoding the whole buffer.
//!
//! Malformed input is tolerated rather than rejected: a byte that does not
//! start a complete sequence is treated as a one-byte unit. Forward and
//! backward motion agree on those units, so walking a buffer end to end in
//! either direction visits the same offsets.

/// Returns true if `byte` is a UTF-8 continuation byte (`10xxxxxx`).
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Sequence length announced by a lead byte. Bytes that cannot start a
/// sequence report 1.
#[inline]
fn lead_len(byte: u8) -> usize {
    match byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Returns the length in bytes of the codepoint starting at `idx`.
///
/// Returns 0 if `idx` is past the end. A truncated or malformed sequence
/// reports 1 so callers always make progress.
pub fn sequence_len(bytes: &[u8], idx: usize) -> usize {
    let Some(&lead) = bytes.get(idx) else {
        return 0;
    };
    let n = lead_len(lead);
    if n == 1 {
        return 1;
    }
    match bytes.get(idx + 1..idx + n) {
        Some(tail) if tail.iter().all(|&b| is_continuation(b)) => n,
        _ => 1,
    }
}

/// Returns the codepoint boundary immediately after `idx`.
///
/// `idx` is expected to sit on a boundary. Returns `bytes.len()` when `idx`
/// is at or past the end.
pub fn next_boundary(bytes: &[u8], idx: usize) -> usize {
    if idx >= bytes.len() {
        return bytes.len();
    }
    idx + sequence_len(bytes, idx)
}

/// Returns the codepoint boundary immediately before `idx`.
///
/// `idx` is clamped to `bytes.len()`. Returns 0 when `idx` is 0.
pub fn prev_boundary(bytes: &[u8], idx: usize) -> usize {
    let idx = idx.min(bytes.len());
    if idx == 0 {
        return 0;
    }

    // Walk back over at most three continuation bytes to a candidate lead.
    let mut start = idx - 1;
    while start > 0 && idx - start < 4 && is_continuation(bytes[start]) {
        start -= 1;
    }

    if sequence_len(bytes, start) == idx - start {
        start
    } else {
        idx - 1
    }
}

/// Returns the largest codepoint boundary that is `<= idx`.
///
/// Used to cut a byte run at a limit without splitting a codepoint.
pub fn floor_boundary(bytes: &[u8], idx: usize) -> usize {
    if idx >= bytes.len() {
        return bytes.len();
    }
    let mut cut = idx;
    while cut > 0 && idx - cut < 3 && is_continuation(bytes[cut]) {
        cut -= 1;
    }
    if is_continuation(bytes[cut]) || cut + sequence_len(bytes, cut) <= idx {
        // Stray continuation bytes: every byte is its own unit.
        idx
    } else {
        cut
    }
}

/// Decodes the codepoint at `idx`, returning it with its encoded length.
///
/// Returns `None` past the end or on a malformed sequence.
pub fn decode(bytes: &[u8], idx: usize) -> Option<(char, usize)> {
    let len = sequence_len(bytes, idx);
    if len == 0 {
        return None;
    }
    let s = std::str::from_utf8(&bytes[idx..idx + len]).ok()?;
    s.chars().next().map(|ch| (ch, len))
}

/// Encodes `codepoint` into `dst`, returning the number of bytes written.
///
/// Returns 0 (and leaves `dst` untouched) for values that are not Unicode
/// scalar values.
pub fn encode(codepoint: u32, dst: &mut [u8; 4]) -> usize {
    match char::from_u32(codepoint) {
        Some(ch) => ch.encode_utf8(dst).len(),
        None => 0,
    }
}
