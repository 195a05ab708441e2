// Chunk: docs/chunks/buffer_config - Tunables for storage growth and line iteration

//! Buffer and iterator settings.
//!
//! Both structs deserialize with every field optional, so a host can embed a
//! partial `[buffer]` table in its own settings file and get defaults for the
//! rest.

use serde::Deserialize;

use crate::boundary::CursorUnit;
use crate::error::{BufferError, Result};

/// Storage allocated on the first insertion into an empty buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4096;
/// Bytes requested per `read` when streaming a file into the buffer.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;
/// Initial scratch capacity for lines that straddle the gap.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 256;
/// Largest accepted scratch capacity.
pub const MAX_SCRATCH_CAPACITY: usize = 1 << 30;

/// What the line iterator does with a gap-straddling line longer than its
/// scratch capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOverflow {
    /// Grow the scratch buffer to fit; the capacity is not a limit.
    #[default]
    Grow,
    /// Cut the line at the last codepoint boundary within capacity.
    Truncate,
    /// Yield [`BufferError::LineTooLong`] for that line.
    Error,
}

/// Settings for [`GapBufferIter`](crate::GapBufferIter).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IterConfig {
    /// Byte limit for a stitched line. Ignored under `LineOverflow::Grow`.
    pub scratch_capacity: usize,
    /// What to do with a straddling line over `scratch_capacity`.
    pub overflow: LineOverflow,
}

impl Default for IterConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            overflow: LineOverflow::Grow,
        }
    }
}

/// Settings for [`GapBuffer`](crate::GapBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Storage allocated by the first insertion.
    pub initial_capacity: usize,
    /// Bytes requested per read when streaming input.
    pub read_chunk_size: usize,
    /// Unit stepped over by cursor motion and single deletes.
    pub cursor_unit: CursorUnit,
    /// Used by [`GapBuffer::lines`](crate::GapBuffer::lines).
    pub lines: IterConfig,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            cursor_unit: CursorUnit::Codepoint,
            lines: IterConfig::default(),
        }
    }
}

impl IterConfig {
    /// Rejects settings the line iterator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.scratch_capacity > MAX_SCRATCH_CAPACITY {
            return Err(BufferError::Config(format!(
                "scratch_capacity {} exceeds the {} byte maximum",
                self.scratch_capacity, MAX_SCRATCH_CAPACITY
            )));
        }
        if self.overflow != LineOverflow::Grow && self.scratch_capacity == 0 {
            return Err(BufferError::Config(
                "scratch_capacity must be at least 1 unless overflow is \"grow\"".to_string(),
            ));
        }
        Ok(())
    }
}

impl BufferConfig {
    /// Rejects settings the buffer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            return Err(BufferError::Config(
                "read_chunk_size must be at least 1".to_string(),
            ));
        }
        self.lines.validate()
    }
}
