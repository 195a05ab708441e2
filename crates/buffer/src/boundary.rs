// Chunk: docs/chunks/codepoint_boundaries - Unit of cursor motion

//! The unit the gap buffer steps over when the cursor moves or a single
//! "character" is deleted.

use serde::Deserialize;

use crate::{grapheme, utf8};

/// What one step of cursor motion covers.
///
/// `Codepoint` is the default and never splits a UTF-8 sequence.
/// `Grapheme` additionally keeps user-perceived characters (emoji
/// sequences, combining marks, CR LF) together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorUnit {
    #[default]
    Codepoint,
    Grapheme,
}

impl CursorUnit {
    /// Returns the boundary immediately before `idx` in `bytes`.
    pub fn prev_boundary(self, bytes: &[u8], idx: usize) -> usize {
        match self {
            CursorUnit::Codepoint => utf8::prev_boundary(bytes, idx),
            CursorUnit::Grapheme => grapheme::grapheme_boundary_left(bytes, idx),
        }
    }

    /// Returns the boundary immediately after `idx` in `bytes`.
    pub fn next_boundary(self, bytes: &[u8], idx: usize) -> usize {
        match self {
            CursorUnit::Codepoint => utf8::next_boundary(bytes, idx),
            CursorUnit::Grapheme => grapheme::grapheme_boundary_right(bytes, idx),
        }
    }
}
