//! Text range and point types for source location tracking.
//!
//! Byte offsets locate tokens and nodes; points give the same location as a
//! 0-based row and a byte column within that row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A row/column position. Columns count bytes, not characters.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    #[inline]
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// The point reached after walking over `bytes` starting at `self`.
    pub fn advanced_by(self, bytes: &[u8]) -> Point {
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => Point {
                row: self.row + memchr::memchr_iter(b'\n', bytes).count() as u32,
                column: (bytes.len() - last - 1) as u32,
            },
            None => Point {
                row: self.row,
                column: self.column + bytes.len() as u32,
            },
        }
    }

    /// Translate `self` by a relative extent (`other` measured from the end of `self`).
    pub fn add(self, other: Point) -> Point {
        if other.row > 0 {
            Point::new(self.row + other.row, other.column)
        } else {
            Point::new(self.row, self.column + other.column)
        }
    }

    /// The extent from `other` to `self`. `other` must not be after `self`.
    pub fn sub(self, other: Point) -> Point {
        if self.row > other.row {
            Point::new(self.row - other.row, self.column)
        } else {
            Point::new(0, self.column.saturating_sub(other.column))
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// A text range with start and end positions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// The byte offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The byte offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    /// Create a new text range.
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        Self { pos, end }
    }

    /// Create an empty range at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    /// The length of this range in bytes.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    /// Whether this range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether this range contains a position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<Range<TextPos>> for TextRange {
    fn from(range: Range<TextPos>) -> Self {
        TextRange::new(range.start, range.end)
    }
}
