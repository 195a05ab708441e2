// Chunk: docs/chunks/gap_buffer - Recoverable buffer failures

use std::path::PathBuf;

/// Recoverable failures reported by [`GapBuffer`](crate::GapBuffer) and
/// [`GapBufferIter`](crate::GapBufferIter).
///
/// Out-of-range offsets are not errors; they are clamped. Layout corruption
/// is not an error either; it panics.
#[derive(thiserror::Error, Debug)]
pub enum BufferError {
    #[error("failed to allocate {requested} bytes of buffer storage")]
    Alloc { requested: usize },
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line at offset {offset} is {len} bytes, over the {limit} byte scratch limit")]
    LineTooLong {
        offset: usize,
        len: usize,
        limit: usize,
    },
    #[error("invalid buffer configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BufferError>;
