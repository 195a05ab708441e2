// Chunk: docs/chunks/gap_buffer - Byte gap buffer and line iterator for snbpad

//! Forward-only line iteration over a [`GapBuffer`].
//!
//! The iterator walks the physical storage and hides the gap: a line that
//! lies entirely on one side of the gap is handed out as a direct reference
//! into the buffer, and only a line that straddles the gap is stitched into
//! the iterator's scratch buffer.
//!
//! The iterator holds a shared borrow of the buffer, so the buffer cannot be
//! mutated while a traversal is in progress. Each yielded [`Line`] borrows the
//! iterator and is gone by the next call to [`GapBufferIter::next_line`].

use std::borrow::Cow;
use std::ops::Range;
use std::str::Utf8Error;

use log::warn;

use crate::config::{IterConfig, LineOverflow};
use crate::error::{BufferError, Result};
use crate::gap_buffer::GapBuffer;
use crate::utf8;

/// One line of the buffer, without its trailing `'\n'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    bytes: &'a [u8],
    offset: usize,
    truncated: bool,
}

impl<'a> Line<'a> {
    /// The line's bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The line as UTF-8 text.
    pub fn as_str(&self) -> std::result::Result<&'a str, Utf8Error> {
        std::str::from_utf8(self.bytes)
    }

    /// The line as text, with invalid UTF-8 replaced by U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }

    /// Logical offset of the line's first byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes returned for this line.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if no bytes were returned for this line.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Logical offset just past the returned bytes.
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// True if the line was cut short by [`LineOverflow::Truncate`].
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Where the next line lives in physical storage.
enum Span {
    /// Contiguous bytes on one side of the gap.
    Direct { range: Range<usize>, offset: usize },
    /// Bytes before the gap followed by bytes after it.
    Split {
        head: Range<usize>,
        tail: Range<usize>,
        offset: usize,
    },
}

/// Iterates the lines of a [`GapBuffer`] front to back.
///
/// Yields exactly [`GapBuffer::line_count`] lines: an empty buffer is one
/// empty line, and a trailing `'\n'` is followed by an empty last line.
#[derive(Debug)]
pub struct GapBufferIter<'a> {
    buffer: &'a GapBuffer,
    /// Physical read offset into the buffer's storage.
    cursor: usize,
    crossed_gap: bool,
    done: bool,
    scratch: Vec<u8>,
    config: IterConfig,
}

impl<'a> GapBufferIter<'a> {
    /// Creates an iterator using the buffer's configured line settings.
    ///
    /// Those settings were validated when the buffer was built.
    pub fn new(buffer: &'a GapBuffer) -> Self {
        Self::from_config(buffer, buffer.config().lines.clone())
    }

    /// Creates an iterator with explicit settings, rejecting invalid ones.
    pub fn with_config(buffer: &'a GapBuffer, config: IterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(buffer, config))
    }

    fn from_config(buffer: &'a GapBuffer, config: IterConfig) -> Self {
        // Scratch is reserved on the first straddling line, where failure
        // can be reported.
        Self {
            buffer,
            cursor: 0,
            crossed_gap: false,
            done: false,
            scratch: Vec::new(),
            config,
        }
    }

    /// Returns the next line, `None` once every line has been yielded.
    ///
    /// Under [`LineOverflow::Error`] an over-long straddling line yields
    /// `Some(Err(..))`; iteration can continue past it.
    pub fn next_line(&mut self) -> Option<Result<Line<'_>>> {
        let buffer = self.buffer;
        let (data, _, _) = buffer.layout();
        match self.advance()? {
            Span::Direct { range, offset } => Some(Ok(Line {
                bytes: &data[range],
                offset,
                truncated: false,
            })),
            Span::Split { head, tail, offset } => Some(self.stitch(&data[head], &data[tail], offset)),
        }
    }

    /// Skips `idx` lines and returns the one after them.
    ///
    /// Returns `None` if the buffer has fewer than `idx + 1` lines left.
    pub fn get_line(&mut self, idx: usize) -> Option<Result<Line<'_>>> {
        for _ in 0..idx {
            if !self.skip_line() {
                return None;
            }
        }
        self.next_line()
    }

    /// Advances past one line without materialising it.
    ///
    /// Returns false if there was no line left.
    pub fn skip_line(&mut self) -> bool {
        self.advance().is_some()
    }

    /// Locates the next line and moves the physical cursor past its `'\n'`.
    fn advance(&mut self) -> Option<Span> {
        if self.done {
            return None;
        }
        let buffer = self.buffer;
        let (data, gap_start, gap_end) = buffer.layout();
        let size = data.len();
        let gap_len = gap_end - gap_start;
        let start = self.cursor;

        if self.crossed_gap {
            let offset = start - gap_len;
            return Some(match find_newline(data, start..size) {
                Some(nl) => {
                    self.cursor = nl + 1;
                    Span::Direct { range: start..nl, offset }
                }
                None => {
                    self.finish(size);
                    Span::Direct { range: start..size, offset }
                }
            });
        }

        if let Some(nl) = find_newline(data, start..gap_start) {
            self.cursor = nl + 1;
            return Some(Span::Direct { range: start..nl, offset: start });
        }

        // No newline before the gap: the line continues on the other side.
        self.crossed_gap = true;
        let tail_end = match find_newline(data, gap_end..size) {
            Some(nl) => {
                self.cursor = nl + 1;
                nl
            }
            None => {
                self.finish(size);
                size
            }
        };
        let head = start..gap_start;
        let tail = gap_end..tail_end;

        Some(if tail.is_empty() {
            Span::Direct { range: head, offset: start }
        } else if head.is_empty() {
            Span::Direct { range: tail, offset: start }
        } else {
            Span::Split { head, tail, offset: start }
        })
    }

    fn finish(&mut self, size: usize) {
        self.cursor = size;
        self.done = true;
    }

    /// Copies the two halves of a straddling line into scratch.
    fn stitch(&mut self, head: &[u8], tail: &[u8], offset: usize) -> Result<Line<'_>> {
        let total = head.len() + tail.len();
        let limit = self.config.scratch_capacity;
        self.scratch.clear();

        if total <= limit || self.config.overflow == LineOverflow::Grow {
            self.reserve_scratch(total)?;
            self.scratch.extend_from_slice(head);
            self.scratch.extend_from_slice(tail);
            return Ok(Line {
                bytes: self.scratch.as_slice(),
                offset,
                truncated: false,
            });
        }

        if self.config.overflow == LineOverflow::Error {
            return Err(BufferError::LineTooLong {
                offset,
                len: total,
                limit,
            });
        }

        // Truncate: keep whole codepoints only.
        let cut = truncation_point(head, tail, limit);
        warn!(
            "line at offset {} truncated from {} to {} bytes",
            offset, total, cut
        );
        self.reserve_scratch(cut)?;
        let from_head = cut.min(head.len());
        self.scratch.extend_from_slice(&head[..from_head]);
        self.scratch.extend_from_slice(&tail[..cut - from_head]);
        Ok(Line {
            bytes: self.scratch.as_slice(),
            offset,
            truncated: true,
        })
    }

    /// Makes room for `len` bytes in the (cleared) scratch buffer.
    fn reserve_scratch(&mut self, len: usize) -> Result<()> {
        self.scratch
            .try_reserve(len)
            .map_err(|_| BufferError::Alloc { requested: len })
    }
}

impl GapBuffer {
    /// Returns a line iterator using this buffer's line settings.
    pub fn lines(&self) -> GapBufferIter<'_> {
        GapBufferIter::new(self)
    }

    /// Returns a line iterator with explicit settings.
    ///
    /// Fails with [`BufferError::Config`] if the settings are invalid.
    pub fn lines_with(&self, config: IterConfig) -> Result<GapBufferIter<'_>> {
        GapBufferIter::with_config(self, config)
    }
}

fn find_newline(data: &[u8], range: Range<usize>) -> Option<usize> {
    let start = range.start;
    data[range].iter().position(|&b| b == b'\n').map(|i| start + i)
}

/// Largest codepoint boundary `<= limit` in the concatenation `head ++ tail`.
fn truncation_point(head: &[u8], tail: &[u8], limit: usize) -> usize {
    // A sequence may start in head and finish in tail, so look at the few
    // bytes around the limit in the joined line.
    let base = limit.saturating_sub(3);
    let window: Vec<u8> = head
        .iter()
        .chain(tail)
        .skip(base)
        .take(limit + 4 - base)
        .copied()
        .collect();
    base + utf8::floor_boundary(&window, limit - base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BufferConfig;

    fn collect(buf: &GapBuffer) -> Vec<(String, usize)> {
        let mut iter = buf.lines();
        let mut out = Vec::new();
        while let Some(line) = iter.next_line() {
            let line = line.unwrap();
            out.push((line.to_string_lossy().into_owned(), line.offset()));
        }
        out
    }

    #[test]
    fn test_three_lines_with_offsets() {
        let buf = GapBuffer::from("line1\nline2\nline3");
        assert_eq!(
            collect(&buf),
            vec![
                ("line1".to_string(), 0),
                ("line2".to_string(), 6),
                ("line3".to_string(), 12),
            ]
        );
    }

    #[test]
    fn test_empty_buffer_yields_one_empty_line() {
        let buf = GapBuffer::new();
        assert_eq!(collect(&buf), vec![(String::new(), 0)]);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let mut buf = GapBuffer::new();
        buf.insert_str("a\n").unwrap();
        assert_eq!(collect(&buf), vec![("a".to_string(), 0), (String::new(), 2)]);
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_line_straddling_gap_is_stitched() {
        let mut buf = GapBuffer::from("first\nsecond line\nthird");
        buf.set_cursor(9); // "first\nsec|ond line"
        let lines = collect(&buf);
        assert_eq!(
            lines,
            vec![
                ("first".to_string(), 0),
                ("second line".to_string(), 6),
                ("third".to_string(), 18),
            ]
        );
    }

    #[test]
    fn test_offsets_after_gap_are_logical() {
        let mut buf = GapBuffer::from("ab\ncd\nef");
        buf.set_cursor(1);
        let offsets: Vec<usize> = collect(&buf).into_iter().map(|(_, o)| o).collect();
        assert_eq!(offsets, vec![0, 3, 6]);
    }

    #[test]
    fn test_gap_at_line_start_and_end() {
        let mut buf = GapBuffer::from("ab\ncd");
        buf.set_cursor(3);
        assert_eq!(collect(&buf), vec![("ab".to_string(), 0), ("cd".to_string(), 3)]);
        buf.set_cursor(2);
        assert_eq!(collect(&buf), vec![("ab".to_string(), 0), ("cd".to_string(), 3)]);
        buf.set_cursor(5);
        assert_eq!(collect(&buf), vec![("ab".to_string(), 0), ("cd".to_string(), 3)]);
    }

    #[test]
    fn test_get_line() {
        let buf = GapBuffer::from("zero\none\ntwo");
        let mut iter = buf.lines();
        let line = iter.get_line(1).unwrap().unwrap();
        assert_eq!(line.as_str().unwrap(), "one");
        assert_eq!(line.offset(), 5);
        assert_eq!(line.end(), 8);

        let mut iter = buf.lines();
        assert!(iter.get_line(3).is_none());
    }

    #[test]
    fn test_skip_line_counts_lines() {
        let buf = GapBuffer::from("a\nb\n\nc");
        let mut iter = buf.lines();
        let mut n = 0;
        while iter.skip_line() {
            n += 1;
        }
        assert_eq!(n, buf.line_count());
    }

    #[test]
    fn test_overflow_error() {
        let mut buf = GapBuffer::from("abcdefgh\nxy");
        buf.set_cursor(4);
        let config = IterConfig {
            scratch_capacity: 4,
            overflow: LineOverflow::Error,
        };
        let mut iter = buf.lines_with(config).unwrap();
        match iter.next_line() {
            Some(Err(BufferError::LineTooLong { offset, len, limit })) => {
                assert_eq!((offset, len, limit), (0, 8, 4));
            }
            other => panic!("expected LineTooLong, got {:?}", other),
        }
        // The failed line is consumed; iteration carries on.
        let next = iter.next_line().unwrap().unwrap();
        assert_eq!(next.as_bytes(), b"xy");
        assert_eq!(next.offset(), 9);
    }

    #[test]
    fn test_overflow_truncate_keeps_whole_codepoints() {
        // "ab€cd": the euro sign spans bytes 2..5
        let mut buf = GapBuffer::from("ab€cd");
        buf.set_cursor(1);
        let config = IterConfig {
            scratch_capacity: 4,
            overflow: LineOverflow::Truncate,
        };
        let mut iter = buf.lines_with(config).unwrap();
        let line = iter.next_line().unwrap().unwrap();
        assert_eq!(line.as_bytes(), b"ab");
        assert!(line.truncated());
        assert_eq!(line.offset(), 0);
    }

    #[test]
    fn test_overflow_truncate_within_head() {
        let mut buf = GapBuffer::from("abcdef");
        buf.set_cursor(5);
        let config = IterConfig {
            scratch_capacity: 3,
            overflow: LineOverflow::Truncate,
        };
        let mut iter = buf.lines_with(config).unwrap();
        let line = iter.next_line().unwrap().unwrap();
        assert_eq!(line.as_bytes(), b"abc");
    }

    #[test]
    fn test_direct_lines_ignore_scratch_limit() {
        let buf = GapBuffer::from("a very long line that never touches the gap\nx");
        let config = IterConfig {
            scratch_capacity: 1,
            overflow: LineOverflow::Error,
        };
        let mut iter = buf.lines_with(config).unwrap();
        let line = iter.next_line().unwrap().unwrap();
        assert_eq!(line.len(), 43);
        assert!(!line.truncated());
    }

    #[test]
    fn test_grow_reuses_scratch() {
        let mut buf = GapBuffer::from(&*"x".repeat(1000));
        buf.set_cursor(500);
        let config = IterConfig {
            scratch_capacity: 8,
            overflow: LineOverflow::Grow,
        };
        let mut iter = buf.lines_with(config).unwrap();
        let line = iter.next_line().unwrap().unwrap();
        assert_eq!(line.len(), 1000);
        assert!(iter.next_line().is_none());
    }

    #[test]
    fn test_iterator_uses_buffer_config() {
        let mut config = BufferConfig::default();
        config.lines.scratch_capacity = 2;
        config.lines.overflow = LineOverflow::Error;
        let mut buf = GapBuffer::with_config(config).unwrap();
        buf.insert_str("abcd").unwrap();
        buf.set_cursor(2);
        let mut iter = buf.lines();
        assert!(matches!(iter.next_line(), Some(Err(BufferError::LineTooLong { .. }))));
    }

    #[test]
    fn test_lines_with_rejects_invalid_config() {
        let buf = GapBuffer::from("abcd");
        let huge = IterConfig {
            scratch_capacity: usize::MAX / 2,
            overflow: LineOverflow::Error,
        };
        assert!(matches!(buf.lines_with(huge), Err(BufferError::Config(_))));

        let empty_truncate = IterConfig {
            scratch_capacity: 0,
            overflow: LineOverflow::Truncate,
        };
        assert!(matches!(buf.lines_with(empty_truncate), Err(BufferError::Config(_))));
    }

    #[test]
    fn test_scratch_reserved_only_when_stitching() {
        let mut buf = GapBuffer::from("ab\ncd");
        let config = IterConfig {
            scratch_capacity: crate::config::MAX_SCRATCH_CAPACITY,
            overflow: LineOverflow::Error,
        };
        {
            let mut iter = buf.lines_with(config.clone()).unwrap();
            assert_eq!(iter.scratch.capacity(), 0);
            while iter.skip_line() {}
            assert_eq!(iter.scratch.capacity(), 0);
        }

        buf.set_cursor(1);
        let mut iter = buf.lines_with(config).unwrap();
        assert_eq!(iter.next_line().unwrap().unwrap().as_bytes(), b"ab");
        assert!(iter.scratch.capacity() >= 2);
        assert!(iter.scratch.capacity() < 1024);
    }

    #[test]
    fn test_truncation_point_across_seam() {
        // head ends with the first byte of "€", tail holds the rest
        let euro = "€".as_bytes();
        let head = [b'a', euro[0]];
        let tail = [euro[1], euro[2], b'b'];
        assert_eq!(truncation_point(&head, &tail, 2), 1);
        assert_eq!(truncation_point(&head, &tail, 3), 1);
        assert_eq!(truncation_point(&head, &tail, 4), 4);
    }
}
