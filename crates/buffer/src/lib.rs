// Chunk: docs/chunks/gap_buffer - Byte gap buffer and line iterator for snbpad
// Chunk: docs/chunks/codepoint_boundaries - UTF-8 codepoint boundary oracle

//! snbpad-buffer: the text storage core of the snbpad editor.
//!
//! This crate provides a byte-addressed gap buffer with a moving edit cursor
//! and a line iterator that walks the buffer's content while hiding the gap.
//! Windowing, layout, rendering and clipboard integration live elsewhere and
//! talk to the buffer only through logical byte offsets.
//!
//! # Overview
//!
//! The main type is [`GapBuffer`], which provides:
//! - Insertion at the cursor, with amortized O(1) growth
//! - Range deletion and copying in logical offsets
//! - UTF-8 aware cursor motion and backspace
//! - An incrementally maintained line count
//! - Raw byte stream load and save
//!
//! # Example
//!
//! ```
//! use snbpad_buffer::GapBuffer;
//!
//! let mut buffer = GapBuffer::new();
//! buffer.insert_str("ab\ncd").unwrap();
//! assert_eq!(buffer.line_count(), 2);
//! assert_eq!(buffer.usage(), 5);
//!
//! // Backspace removes a whole codepoint
//! buffer.insert_str("€").unwrap();
//! assert!(buffer.remove_backwards());
//! assert_eq!(buffer.to_string(), "ab\ncd");
//!
//! let mut lines = buffer.lines();
//! while let Some(line) = lines.next_line() {
//!     let line = line.unwrap();
//!     println!("{}: {}", line.offset(), line.to_string_lossy());
//! }
//! ```
//!
//! # Line iteration
//!
//! [`GapBufferIter`] borrows the buffer, so the buffer cannot change while a
//! traversal is in progress. Lines that straddle the gap are stitched into a
//! reusable scratch buffer; what happens when such a line outgrows the
//! configured scratch capacity is chosen by [`LineOverflow`].

mod boundary;
mod config;
mod error;
mod gap_buffer;
pub mod grapheme;
mod line_iter;
mod types;
pub mod utf8;

pub use boundary::CursorUnit;
pub use config::{
    BufferConfig, IterConfig, LineOverflow, DEFAULT_INITIAL_CAPACITY, DEFAULT_READ_CHUNK_SIZE,
    DEFAULT_SCRATCH_CAPACITY, MAX_SCRATCH_CAPACITY,
};
pub use error::{BufferError, Result};
pub use gap_buffer::GapBuffer;
pub use line_iter::{GapBufferIter, Line};
pub use types::{LineCol, Selection};
