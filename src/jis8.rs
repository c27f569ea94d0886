//! # JIS X 0201 8-bit text codec
//!
//! SECS-II permits a second text format alongside ASCII: single-byte
//! Japanese text per JIS X 0201. The mapping is small enough to express
//! directly:
//!
//! - `0x00–0x7F` follows ASCII, except `0x5C` (¥ instead of backslash)
//!   and `0x7E` (‾ instead of tilde).
//! - `0xA1–0xDF` are the halfwidth katakana `U+FF61–U+FF9F`.
//! - Everything else (`0x80–0xA0`, `0xE0–0xFF`) is undefined.
//!
//! Decoding maps undefined bytes to `U+FFFD`; encoding substitutes `?`
//! for characters outside the repertoire. Both directions are therefore
//! infallible, matching the lossy codepage conversion of typical
//! equipment stacks.

/// Decode JIS X 0201 bytes into a `String`.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x5C => '¥',
            0x7E => '‾',
            0x00..=0x7F => b as char,
            0xA1..=0xDF => {
                // Katakana block is contiguous in both encodings.
                char::from_u32(0xFF61 + (u32::from(b) - 0xA1)).unwrap_or('\u{FFFD}')
            }
            _ => '\u{FFFD}',
        })
        .collect()
}

/// Encode a string as JIS X 0201, one byte per character.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Number of bytes `text` occupies on the wire (one per character).
#[inline]
pub fn encoded_len(text: &str) -> usize {
    text.chars().count()
}

fn encode_char(c: char) -> u8 {
    match c {
        '¥' => 0x5C,
        '‾' => 0x7E,
        '\\' | '~' => b'?',
        '\u{FF61}'..='\u{FF9F}' => (c as u32 - 0xFF61) as u8 + 0xA1,
        c if c.is_ascii() => c as u8,
        _ => b'?',
    }
}
