//! Character classes used by the scanners.

/// Whitespace as the wide-character classifier sees it (`iswspace`).
#[inline]
pub fn is_space(ch: char) -> bool {
    ch.is_whitespace()
}

/// Alphabetic characters (`iswalpha`). Digits and `_` are not included.
#[inline]
pub fn is_alpha(ch: char) -> bool {
    ch.is_alphabetic()
}

/// Byte width of a UTF-8 sequence given its leading byte; stray continuation
/// bytes count as one.
#[inline]
pub fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
