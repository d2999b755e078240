//! Hex transport encoding for message content.
//!
//! Outgoing text is lowercase hex of its UTF-8 bytes. Incoming hex is decoded
//! leniently: every pair that is not valid hex becomes `?` and a trailing odd
//! nibble is dropped. The decoded text is capped at the line limit in
//! characters, the same unit the editor and [`crate::Line`] count in.

use crate::line::{MAX_LINE_CHARS, truncate_chars};

const INVALID_PAIR: u8 = b'?';

/// Longest UTF-8 encoding of one character.
const MAX_CHAR_BYTES: usize = 4;

/// Longest hex string a full line can encode to.
pub const MAX_HEX_LEN: usize = MAX_LINE_CHARS * MAX_CHAR_BYTES * 2;

/// Lowercase hex of the UTF-8 bytes of `text`.
pub fn encode_hex(text: &str) -> String {
    hex::encode(text.as_bytes())
}

/// Decode `hex` into text without ever failing.
///
/// Decoded bytes that are not valid UTF-8 are replaced, never rejected.
/// Any text of at most [`MAX_LINE_CHARS`] characters round-trips exactly
/// through [`encode_hex`].
pub fn decode_hex_lossy(hex: &str) -> String {
    let bytes: Vec<u8> = hex
        .as_bytes()
        .chunks_exact(2)
        .take(MAX_LINE_CHARS * MAX_CHAR_BYTES)
        .map(|pair| {
            let mut byte = [0u8; 1];
            match hex::decode_to_slice(pair, &mut byte) {
                Ok(()) => byte[0],
                Err(_) => INVALID_PAIR,
            }
        })
        .collect();

    let text = String::from_utf8_lossy(&bytes);
    truncate_chars(&text, MAX_LINE_CHARS).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_utf8() {
        assert_eq!(encode_hex("Hi!"), "486921");
        assert_eq!(encode_hex("é"), "c3a9");
        assert_eq!(encode_hex(""), "");
    }

    #[test]
    fn decodes_both_cases() {
        assert_eq!(decode_hex_lossy("48656c6c6f"), "Hello");
        assert_eq!(decode_hex_lossy("48656C6C6F"), "Hello");
    }

    #[test]
    fn invalid_pairs_become_placeholder() {
        assert_eq!(decode_hex_lossy("48zz69"), "H?i");
    }

    #[test]
    fn odd_trailing_nibble_dropped() {
        assert_eq!(decode_hex_lossy("4869a"), "Hi");
    }

    #[test]
    fn output_is_capped() {
        let hex = "41".repeat(MAX_LINE_CHARS + 100);
        assert_eq!(decode_hex_lossy(&hex).len(), MAX_LINE_CHARS);
    }

    #[test]
    fn full_multibyte_line_round_trips() {
        let two_byte = "é".repeat(MAX_LINE_CHARS);
        assert_eq!(decode_hex_lossy(&encode_hex(&two_byte)), two_byte);

        let four_byte = "🦀".repeat(MAX_LINE_CHARS);
        let hex = encode_hex(&four_byte);
        assert_eq!(hex.len(), MAX_HEX_LEN);
        assert_eq!(decode_hex_lossy(&hex), four_byte);
    }

    #[test]
    fn multibyte_overflow_capped_in_chars() {
        let text = "é".repeat(MAX_LINE_CHARS + 10);
        let decoded = decode_hex_lossy(&encode_hex(&text));
        assert_eq!(decoded.chars().count(), MAX_LINE_CHARS);
        assert!(!decoded.contains('\u{fffd}'));
    }

    #[test]
    fn multibyte_text_round_trips() {
        let text = "grüße, 世界";
        assert_eq!(decode_hex_lossy(&encode_hex(text)), text);
    }
}
