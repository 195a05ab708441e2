// Chunk: docs/chunks/gap_buffer - Byte gap buffer and line iterator for snbpad

//! Gap buffer implementation for efficient text editing.
//!
//! A gap buffer is a byte array with a movable gap at the edit cursor.
//! Insertions and deletions at the cursor are O(1) amortized; moving the
//! cursor is O(distance) but amortizes well for typical editing patterns
//! (locality of edits).
//!
//! Storage layout: `[pre-gap content | gap | post-gap content]`. The logical
//! content is the two content halves concatenated, and every offset this type
//! accepts or returns is a logical offset. The cursor *is* the gap start.

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use log::{debug, trace};

use crate::boundary::CursorUnit;
use crate::config::BufferConfig;
use crate::error::{BufferError, Result};
use crate::types::{LineCol, Selection};
use crate::utf8;

/// Growth multiplier applied to the whole storage when the gap runs out.
const GAP_GROWTH_FACTOR: usize = 2;

/// A byte gap buffer with a cached line count.
///
/// The buffer stores raw bytes with a "gap" (unused capacity) that follows the
/// edit cursor. Text is normally UTF-8; cursor motion and single-character
/// deletion respect the configured [`CursorUnit`], while range operations work
/// on whatever bytes they are given.
///
/// The line count is maintained incrementally from the bytes each mutation
/// touches. A buffer always has at least one line.
#[derive(Debug)]
pub struct GapBuffer {
    /// The underlying storage. `data.len()` is the capacity.
    data: Vec<u8>,
    /// Index where the gap starts (the cursor).
    gap_start: usize,
    /// Index where the gap ends (first used position after the gap).
    gap_end: usize,
    /// Number of `'\n'` bytes in the logical content.
    newlines: usize,
    config: BufferConfig,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl GapBuffer {
    /// Creates a new empty buffer. No storage is allocated until the first
    /// insertion.
    pub fn new() -> Self {
        Self::from_config(BufferConfig::default())
    }

    /// Creates an empty buffer with custom settings.
    pub fn with_config(config: BufferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: BufferConfig) -> Self {
        Self {
            data: Vec::new(),
            gap_start: 0,
            gap_end: 0,
            newlines: 0,
            config,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    /// Creates a buffer holding `bytes`, with the cursor at offset 0.
    ///
    /// Like any `Vec` construction this aborts if memory is exhausted; use
    /// [`GapBuffer::insert_bytes`] on an empty buffer for a recoverable
    /// failure.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        let capacity = buffer.config.initial_capacity.max(bytes.len());
        let gap = capacity - bytes.len();

        let mut data = Vec::with_capacity(capacity);
        data.resize(gap, 0);
        data.extend_from_slice(bytes);

        buffer.data = data;
        buffer.gap_end = gap;
        buffer.newlines = count_newlines(bytes);
        buffer
    }

    /// Loads the file at `path` into a new buffer with the cursor at 0.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.load_file(path)?;
        Ok(buffer)
    }

    /// Loads an entire byte stream into a new buffer with the cursor at 0.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.insert_reader(reader)?;
        buffer.set_cursor(0);
        Ok(buffer)
    }

    // ==================== Accessors ====================

    /// Returns the number of logical bytes stored (`capacity - gap_len`).
    pub fn usage(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Alias for [`GapBuffer::usage`].
    pub fn len(&self) -> usize {
        self.usage()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.usage() == 0
    }

    /// Returns the number of lines.
    ///
    /// Always at least 1: an empty buffer is one empty line, and every
    /// `'\n'` starts another.
    pub fn line_count(&self) -> usize {
        self.newlines + 1
    }

    /// Returns the number of `'\n'` bytes in the content.
    pub fn newline_count(&self) -> usize {
        self.newlines
    }

    /// Returns the cursor, a logical offset equal to the gap start.
    pub fn cursor(&self) -> usize {
        self.gap_start
    }

    /// Returns the size of the underlying storage.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the current gap size.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Returns the active settings.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Selects the unit that cursor motion and single deletions step over.
    pub fn set_cursor_unit(&mut self, unit: CursorUnit) {
        self.config.cursor_unit = unit;
    }

    /// Returns the byte at the given logical offset.
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        if offset >= self.usage() {
            return None;
        }
        Some(self.data[self.physical(offset)])
    }

    /// Returns the logical content as its two halves: before and after the gap.
    pub fn slices(&self) -> (&[u8], &[u8]) {
        (&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    /// Returns an iterator over all logical bytes.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let (before, after) = self.slices();
        before.iter().chain(after.iter()).copied()
    }

    /// Raw storage and gap bounds, for the line iterator.
    pub(crate) fn layout(&self) -> (&[u8], usize, usize) {
        (&self.data, self.gap_start, self.gap_end)
    }

    fn physical(&self, offset: usize) -> usize {
        if offset < self.gap_start {
            offset
        } else {
            offset + self.gap_len()
        }
    }

    // ==================== Line/column mapping ====================

    /// Maps a logical offset to its (line, byte column). The offset is clamped
    /// to the content length.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.usage());
        let mut line = 0;
        let mut line_start = 0;
        for (i, byte) in self.bytes().take(offset).enumerate() {
            if byte == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        LineCol::new(line, offset - line_start)
    }

    /// Maps a (line, byte column) to a logical offset.
    ///
    /// A line past the end maps to the end of the buffer; a column past the end
    /// of its line maps to the end of that line. A column inside a multi-byte
    /// sequence snaps back to the sequence start.
    pub fn offset_of(&self, pos: LineCol) -> usize {
        let len = self.usage();
        let mut line_start = 0;
        if pos.line > 0 {
            let mut seen = 0;
            let found = self.bytes().position(|b| {
                if b == b'\n' {
                    seen += 1;
                }
                seen == pos.line
            });
            match found {
                Some(newline) => line_start = newline + 1,
                None => return len,
            }
        }

        let line_end = (line_start..len)
            .find(|&i| self.byte_at(i) == Some(b'\n'))
            .unwrap_or(len);
        let mut offset = (line_start + pos.col).min(line_end);
        while offset > line_start && self.byte_at(offset).is_some_and(utf8::is_continuation) {
            offset -= 1;
        }
        offset
    }

    // ==================== Cursor Movement ====================

    /// Shifts up to `num` bytes from just before the gap to just after it,
    /// moving the gap left.
    fn move_bytes_after_gap(&mut self, num: usize) {
        let num = num.min(self.gap_start);
        if num == 0 {
            return;
        }
        self.data
            .copy_within(self.gap_start - num..self.gap_start, self.gap_end - num);
        self.gap_start -= num;
        self.gap_end -= num;
    }

    /// Shifts up to `num` bytes from just after the gap to just before it,
    /// moving the gap right.
    fn move_bytes_before_gap(&mut self, num: usize) {
        let num = num.min(self.data.len() - self.gap_end);
        if num == 0 {
            return;
        }
        self.data
            .copy_within(self.gap_end..self.gap_end + num, self.gap_start);
        self.gap_start += num;
        self.gap_end += num;
    }

    /// Moves the cursor to the logical offset `target`, clamped to
    /// `[0, usage()]`.
    ///
    /// This is O(distance): only the bytes between the old and new cursor move.
    pub fn set_cursor(&mut self, target: usize) {
        let target = target.min(self.usage());
        trace!("gap move {} -> {}", self.gap_start, target);
        if target < self.gap_start {
            self.move_bytes_after_gap(self.gap_start - target);
        } else {
            self.move_bytes_before_gap(target - self.gap_start);
        }
        self.check_layout();
    }

    /// Moves the cursor back by one unit.
    ///
    /// Returns false (and does nothing) at the start of the buffer.
    pub fn move_cursor_backward(&mut self) -> bool {
        if self.gap_start == 0 {
            return false;
        }
        let prev = self
            .config
            .cursor_unit
            .prev_boundary(&self.data[..self.gap_start], self.gap_start);
        assert!(prev < self.gap_start, "boundary oracle did not move backward");
        self.move_bytes_after_gap(self.gap_start - prev);
        true
    }

    /// Moves the cursor forward by one unit.
    ///
    /// Returns false (and does nothing) at the end of the buffer.
    pub fn move_cursor_forward(&mut self) -> bool {
        if self.gap_end == self.data.len() {
            return false;
        }
        let step = self
            .config
            .cursor_unit
            .next_boundary(&self.data[self.gap_end..], 0);
        assert!(step > 0, "boundary oracle did not move forward");
        self.move_bytes_before_gap(step);
        true
    }

    // ==================== Mutations ====================

    /// Grows the storage so the gap holds at least `min` bytes.
    ///
    /// An unallocated buffer gets `max(initial_capacity, min)` bytes. Otherwise
    /// the storage becomes `max(2 * size, size + min)` bytes, with the pre-gap
    /// content at the start and the post-gap content at the end. On allocation
    /// failure the buffer is unchanged.
    fn grow(&mut self, min: usize) -> Result<()> {
        let old_size = self.data.len();

        if old_size == 0 {
            let size = self.config.initial_capacity.max(min);
            let mut data = Vec::new();
            data.try_reserve_exact(size)
                .map_err(|_| BufferError::Alloc { requested: size })?;
            data.resize(size, 0);

            debug!("gap buffer allocated {} bytes", size);
            self.data = data;
            self.gap_start = 0;
            self.gap_end = size;
            return Ok(());
        }

        let new_size = old_size
            .checked_mul(GAP_GROWTH_FACTOR)
            .and_then(|doubled| old_size.checked_add(min).map(|fit| doubled.max(fit)))
            .ok_or(BufferError::Alloc {
                requested: usize::MAX,
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(new_size)
            .map_err(|_| BufferError::Alloc {
                requested: new_size,
            })?;

        let tail_len = old_size - self.gap_end;
        data.extend_from_slice(&self.data[..self.gap_start]);
        data.resize(new_size - tail_len, 0);
        data.extend_from_slice(&self.data[self.gap_end..]);

        debug!(
            "gap buffer grew {} -> {} bytes ({} in use)",
            old_size,
            new_size,
            self.usage()
        );
        self.data = data;
        self.gap_end = new_size - tail_len;
        self.check_layout();
        Ok(())
    }

    /// Inserts bytes at the cursor. The cursor ends up after the inserted text.
    ///
    /// Fails only if the storage needs to grow and the allocation fails, in
    /// which case the buffer is unchanged.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.gap_len() < bytes.len() {
            self.grow(bytes.len())?;
        }

        self.data[self.gap_start..self.gap_start + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();
        self.newlines += count_newlines(bytes);

        self.check_layout();
        self.assert_line_count_consistent();
        Ok(())
    }

    /// Inserts a string at the cursor.
    pub fn insert_str(&mut self, s: &str) -> Result<()> {
        self.insert_bytes(s.as_bytes())
    }

    /// Inserts a single character at the cursor.
    pub fn insert_char(&mut self, ch: char) -> Result<()> {
        let mut encoded = [0u8; 4];
        let len = utf8::encode(ch as u32, &mut encoded);
        self.insert_bytes(&encoded[..len])
    }

    /// Streams `reader` into the buffer at the cursor in bounded chunks.
    ///
    /// Returns the number of bytes inserted. On a read or allocation error the
    /// chunks inserted so far stay in the buffer.
    pub fn insert_reader<R: Read>(&mut self, mut reader: R) -> Result<usize> {
        let mut chunk = vec![0u8; self.config.read_chunk_size];
        let mut total = 0;
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.insert_bytes(&chunk[..n])?;
            total += n;
        }
        Ok(total)
    }

    /// Inserts the contents of the file at `path` at the cursor.
    pub fn insert_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.insert_reader(file)
    }

    /// Replaces the whole content with the file at `path`, cursor at 0.
    ///
    /// On any failure the buffer is left empty.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.clear();
        match self.insert_file(path) {
            Ok(n) => {
                self.set_cursor(0);
                debug!("loaded {} bytes ({} lines) from {}", n, self.line_count(), path.display());
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Releases the storage and resets to an empty buffer.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.gap_start = 0;
        self.gap_end = 0;
        self.newlines = 0;
    }

    /// Deletes the logical range `[offset, offset + length)` and leaves the
    /// cursor at `offset`.
    ///
    /// Both values are clamped to the content. The gap is first moved so that
    /// it touches the range, then widened to swallow it.
    pub fn remove_range_and_set_cursor(&mut self, offset: usize, length: usize) {
        let usage = self.usage();
        let offset = offset.min(usage);
        let end = offset + length.min(usage - offset);

        if end <= self.gap_start {
            self.move_bytes_after_gap(self.gap_start - end);
        } else if offset >= self.gap_start {
            self.move_bytes_before_gap(offset - self.gap_start);
        }

        // The gap now starts somewhere in [offset, end].
        let after = end - self.gap_start;
        let removed = count_newlines(&self.data[offset..self.gap_start])
            + count_newlines(&self.data[self.gap_end..self.gap_end + after]);
        self.newlines -= removed;
        self.gap_start = offset;
        self.gap_end += after;

        self.check_layout();
        self.assert_line_count_consistent();
    }

    /// Deletes the text covered by `selection` and leaves the cursor at its start.
    pub fn remove_selection(&mut self, selection: Selection) {
        let (offset, length) = selection.slice();
        self.remove_range_and_set_cursor(offset, length);
    }

    /// Replaces `[offset, offset + length)` with `bytes`; the cursor ends after
    /// the new text.
    pub fn replace_range(&mut self, offset: usize, length: usize, bytes: &[u8]) -> Result<()> {
        self.remove_range_and_set_cursor(offset, length);
        self.insert_bytes(bytes)
    }

    /// Deletes the unit before the cursor (Backspace).
    ///
    /// Returns false at the start of the buffer.
    pub fn remove_backwards(&mut self) -> bool {
        if self.gap_start == 0 {
            return false;
        }
        let prev = self
            .config
            .cursor_unit
            .prev_boundary(&self.data[..self.gap_start], self.gap_start);
        assert!(prev < self.gap_start, "boundary oracle did not move backward");

        self.newlines -= count_newlines(&self.data[prev..self.gap_start]);
        self.gap_start = prev;

        self.check_layout();
        self.assert_line_count_consistent();
        true
    }

    /// Deletes the unit after the cursor (Delete key).
    ///
    /// Returns false at the end of the buffer.
    pub fn remove_forwards(&mut self) -> bool {
        if self.gap_end == self.data.len() {
            return false;
        }
        let step = self
            .config
            .cursor_unit
            .next_boundary(&self.data[self.gap_end..], 0);
        assert!(step > 0, "boundary oracle did not move forward");

        self.newlines -= count_newlines(&self.data[self.gap_end..self.gap_end + step]);
        self.gap_end += step;

        self.check_layout();
        self.assert_line_count_consistent();
        true
    }

    // ==================== Copy / Save ====================

    /// Returns an owned copy of the logical range `[offset, offset + length)`,
    /// clamped to the content.
    pub fn copy_range(&self, offset: usize, length: usize) -> Result<Vec<u8>> {
        let usage = self.usage();
        let offset = offset.min(usage);
        let end = offset + length.min(usage - offset);

        let mut out = Vec::new();
        out.try_reserve_exact(end - offset)
            .map_err(|_| BufferError::Alloc {
                requested: end - offset,
            })?;

        if offset < self.gap_start {
            out.extend_from_slice(&self.data[offset..end.min(self.gap_start)]);
        }
        if end > self.gap_start {
            let from = self.physical(offset.max(self.gap_start));
            let to = end + self.gap_len();
            out.extend_from_slice(&self.data[from..to]);
        }
        Ok(out)
    }

    /// Like [`GapBuffer::copy_range`], decoding the bytes as UTF-8 (lossy).
    pub fn copy_range_string(&self, offset: usize, length: usize) -> Result<String> {
        let bytes = self.copy_range(offset, length)?;
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Copies the text covered by `selection`.
    pub fn copy_selection(&self, selection: Selection) -> Result<Vec<u8>> {
        let (offset, length) = selection.slice();
        self.copy_range(offset, length)
    }

    /// Writes the content to `writer` verbatim: the pre-gap half, then the
    /// post-gap half.
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let (before, after) = self.slices();
        writer.write_all(before)?;
        writer.write_all(after)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the content to the file at `path`, replacing it.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.save_to_writer(file)?;
        debug!("saved {} bytes to {}", self.usage(), path.display());
        Ok(())
    }

    // ==================== Validation ====================

    /// Fails fast if the gap no longer lies inside the storage.
    fn check_layout(&self) {
        assert!(
            self.gap_start <= self.gap_end && self.gap_end <= self.data.len(),
            "gap buffer layout corrupted: gap {}..{} in {} bytes",
            self.gap_start,
            self.gap_end,
            self.data.len(),
        );
    }

    /// Debug assertion: verifies that the incremental newline count matches a
    /// fresh count of the content.
    ///
    /// Uses a mutation counter so the O(n) recount doesn't tank perf in tight
    /// loops: checks every 64th mutation.
    #[cfg(debug_assertions)]
    fn assert_line_count_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let (before, after) = self.slices();
        let expected = count_newlines(before) + count_newlines(after);
        assert_eq!(
            self.newlines, expected,
            "newline count drift detected after {} mutations (cursor {}, len {})",
            self.debug_mutation_count,
            self.gap_start,
            self.usage(),
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_line_count_consistent(&mut self) {}
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GapBuffer {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Join the halves first so a codepoint split by the gap decodes as one.
        let joined: Vec<u8> = self.bytes().collect();
        f.write_str(&String::from_utf8_lossy(&joined))
    }
}
