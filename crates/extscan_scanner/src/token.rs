//! Tokens committed by a successful scan.

use extscan_core::{Point, Symbol, TextRange};

/// A token recognised by an external scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedToken {
    /// The token type the scanner assigned.
    pub symbol: Symbol,
    /// Byte range from the token start to the marked end.
    pub range: TextRange,
    pub start_point: Point,
    pub end_point: Point,
}

impl ScannedToken {
    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.range.len()
    }

    /// Whether this token has zero length (inserted semicolons do).
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The token's text, given the source it was scanned from.
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.range.to_range()]
    }
}
