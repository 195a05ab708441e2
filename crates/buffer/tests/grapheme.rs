// Chunk: docs/chunks/grapheme_cluster_awareness - Grapheme cluster awareness integration tests

//! Integration tests for grapheme-aware editing operations.
//!
//! With `CursorUnit::Grapheme` selected, cursor movement and single-unit
//! deletion step over whole user-perceived characters instead of codepoints.

use snbpad_buffer::{BufferConfig, CursorUnit, GapBuffer};

const FAMILY: &str = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
const FLAG_US: &str = "\u{1F1FA}\u{1F1F8}";
const E_ACUTE: &str = "e\u{0301}";

fn grapheme_buffer(text: &str) -> GapBuffer {
    let mut buf = GapBuffer::from(text);
    buf.set_cursor_unit(CursorUnit::Grapheme);
    buf
}

// ==================== Backspace Tests ====================

#[test]
fn test_backspace_deletes_zwj_emoji_entirely() {
    let text = format!("a{}b", FAMILY);
    let mut buf = grapheme_buffer(&text);
    buf.set_cursor(1 + FAMILY.len());

    assert!(buf.remove_backwards());

    assert_eq!(buf.to_string(), "ab");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn test_backspace_deletes_combining_character_sequence() {
    let text = format!("a{}b", E_ACUTE);
    let mut buf = grapheme_buffer(&text);
    buf.set_cursor(1 + E_ACUTE.len());

    assert!(buf.remove_backwards());

    assert_eq!(buf.to_string(), "ab");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn test_backspace_deletes_regional_indicator_pair() {
    let text = format!("a{}b", FLAG_US);
    let mut buf = grapheme_buffer(&text);
    buf.set_cursor(1 + FLAG_US.len());

    assert!(buf.remove_backwards());

    assert_eq!(buf.to_string(), "ab");
}

#[test]
fn test_backspace_after_invalid_byte_on_same_line() {
    let mut bytes = b"x\xFFyz ".to_vec();
    bytes.extend_from_slice(E_ACUTE.as_bytes());
    let mut buf = GapBuffer::new();
    buf.set_cursor_unit(CursorUnit::Grapheme);
    buf.insert_bytes(&bytes).unwrap();

    assert!(buf.remove_backwards());

    assert_eq!(buf.copy_range(0, buf.usage()).unwrap(), b"x\xFFyz ");
    assert_eq!(buf.cursor(), 5);
}

#[test]
fn test_codepoint_backspace_splits_cluster() {
    let text = format!("a{}b", E_ACUTE);
    let mut buf = GapBuffer::from(text.as_str());
    buf.set_cursor(1 + E_ACUTE.len());

    // Default unit removes only the combining accent.
    assert!(buf.remove_backwards());

    assert_eq!(buf.to_string(), "aeb");
}

// ==================== Delete Forward Tests ====================

#[test]
fn test_delete_forward_zwj_emoji() {
    let text = format!("a{}b", FAMILY);
    let mut buf = grapheme_buffer(&text);
    buf.set_cursor(1);

    assert!(buf.remove_forwards());

    assert_eq!(buf.to_string(), "ab");
    assert_eq!(buf.cursor(), 1);
}

#[test]
fn test_delete_forward_crlf_as_one() {
    let mut buf = grapheme_buffer("a\r\nb");
    buf.set_cursor(1);
    assert_eq!(buf.line_count(), 2);

    assert!(buf.remove_forwards());

    assert_eq!(buf.to_string(), "ab");
    assert_eq!(buf.line_count(), 1);
}

// ==================== Cursor Movement Tests ====================

#[test]
fn test_move_right_over_clusters() {
    let text = format!("{}{}{}", FLAG_US, E_ACUTE, FAMILY);
    let mut buf = grapheme_buffer(&text);

    let mut stops = vec![buf.cursor()];
    while buf.move_cursor_forward() {
        stops.push(buf.cursor());
    }

    assert_eq!(
        stops,
        vec![
            0,
            FLAG_US.len(),
            FLAG_US.len() + E_ACUTE.len(),
            text.len()
        ]
    );
    assert_eq!(buf.to_string(), text);
}

#[test]
fn test_move_left_over_clusters() {
    let text = format!("{}x{}", FAMILY, FLAG_US);
    let mut buf = grapheme_buffer(&text);
    buf.set_cursor(text.len());

    let mut stops = vec![buf.cursor()];
    while buf.move_cursor_backward() {
        stops.push(buf.cursor());
    }

    assert_eq!(stops, vec![text.len(), FAMILY.len() + 1, FAMILY.len(), 0]);
}

#[test]
fn test_cluster_split_by_gap_is_still_one_unit() {
    let text = format!("a{}b", E_ACUTE);
    let mut buf = grapheme_buffer(&text);
    // Park the gap between the base letter and its accent.
    buf.set_cursor_unit(CursorUnit::Codepoint);
    buf.set_cursor(2);
    buf.set_cursor_unit(CursorUnit::Grapheme);

    // Only the pre-gap half is consulted going left, so the accent-less base
    // is its own cluster there.
    assert!(buf.move_cursor_backward());
    assert_eq!(buf.cursor(), 1);

    // Going right sees the whole cluster after the gap.
    assert!(buf.move_cursor_forward());
    assert_eq!(buf.cursor(), 1 + E_ACUTE.len());
}

// ==================== Configuration ====================

#[test]
fn test_grapheme_unit_from_config() {
    let config = BufferConfig {
        cursor_unit: CursorUnit::Grapheme,
        ..BufferConfig::default()
    };
    let mut buf = GapBuffer::with_config(config).unwrap();
    buf.insert_str(FLAG_US).unwrap();
    buf.insert_str(FLAG_US).unwrap();

    assert!(buf.remove_backwards());
    assert_eq!(buf.to_string(), FLAG_US);
    assert!(buf.remove_backwards());
    assert!(buf.is_empty());
}
