//! Total decoders for the primitive field encodings.
//!
//! Every function here is defined for every possible input; none of them
//! can fail. Text bytes map one-to-one onto Latin-1 code points.

use std::ops::Range;

/// Read a little-endian `u16` from `bytes[range]`.
pub fn read_u16_le(bytes: &[u8], range: Range<usize>) -> u16 {
    u16::from_le_bytes([bytes[range.start], bytes[range.start + 1]])
}

/// Read a little-endian `i32` from `bytes[range]`.
pub fn read_i32_le(bytes: &[u8], range: Range<usize>) -> i32 {
    let at = range.start;
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Read a null-terminated string: everything up to the first zero byte.
///
/// The field is read from its first byte; a zero there yields `""`.
pub fn c_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    latin1(&field[..end])
}

/// Read a null-padded string: skip every leading zero byte, read up to the
/// next zero byte, then trim surrounding whitespace.
pub fn padded_string(field: &[u8]) -> String {
    let start = field.iter().position(|&b| b != 0).unwrap_or(field.len());
    let text = c_string(&field[start..]);
    text.trim_matches(is_field_whitespace).to_string()
}

/// Map each byte onto the code point of the same value.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Whitespace removed when trimming text fields.
///
/// Limited to what the device's tooling has always trimmed in the Latin-1
/// range; NEL (0x85) is kept.
pub fn is_field_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{A0}'
    )
}
