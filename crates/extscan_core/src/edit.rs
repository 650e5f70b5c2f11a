//! Edit descriptors for incremental tree edits.

use crate::text::{Point, TextPos};
use serde::{Deserialize, Serialize};

/// Describes a text replacement: the bytes `start_byte..old_end_byte` of the
/// old text became `start_byte..new_end_byte` of the new text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct InputEdit {
    pub start_byte: TextPos,
    pub old_end_byte: TextPos,
    pub new_end_byte: TextPos,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Build an edit from byte offsets and rows only; every column is 0.
    ///
    /// This is the shape in which line-oriented hosts report edits.
    pub fn from_lines(
        start_byte: TextPos,
        old_end_byte: TextPos,
        new_end_byte: TextPos,
        start_line: u32,
        old_end_line: u32,
        new_end_line: u32,
    ) -> Self {
        Self {
            start_byte,
            old_end_byte,
            new_end_byte,
            start_point: Point::new(start_line, 0),
            old_end_point: Point::new(old_end_line, 0),
            new_end_point: Point::new(new_end_line, 0),
        }
    }

    /// Signed byte shift applied to positions after the edited range.
    #[inline]
    pub fn byte_delta(&self) -> i64 {
        self.new_end_byte as i64 - self.old_end_byte as i64
    }

    /// Map a position of the old text onto the new text.
    ///
    /// Positions at or after the old end move with the replacement; positions
    /// strictly inside the replaced range collapse onto the new end.
    pub fn edit_position(&self, byte: TextPos, point: Point) -> (TextPos, Point) {
        let new_byte = self.edit_byte(byte);
        if byte >= self.old_end_byte {
            (new_byte, self.new_end_point.add(point.sub(self.old_end_point)))
        } else if byte > self.start_byte {
            (new_byte, self.new_end_point)
        } else {
            (new_byte, point)
        }
    }

    /// Map a byte offset of the old text onto the new text.
    pub fn edit_byte(&self, byte: TextPos) -> TextPos {
        if byte >= self.old_end_byte {
            self.new_end_byte + (byte - self.old_end_byte)
        } else if byte > self.start_byte {
            self.new_end_byte
        } else {
            byte
        }
    }

    /// Whether an old-text range `start..end` touches the replaced range.
    #[inline]
    pub fn touches(&self, start: TextPos, end: TextPos) -> bool {
        start <= self.old_end_byte && end >= self.start_byte
    }
}
