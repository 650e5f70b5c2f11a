//! The lexer cursor consumed by external scanners.
//!
//! Scanners only ever see the [`Lexer`] capability: the current lookahead,
//! an advance operation, end marking and result assignment. The parsing
//! engine owns the cursor; [`SourceLexer`] is the concrete cursor used by the
//! runtime and by tests.

use std::borrow::Cow;

use crate::char_codes::utf8_width;
use crate::token::ScannedToken;
use extscan_core::{Point, Symbol, TextPos, TextRange};

/// The cursor capability handed to [`ExternalScanner::scan`](crate::ExternalScanner::scan).
pub trait Lexer {
    /// The next unconsumed character, or `'\0'` at the end of input.
    fn lookahead(&self) -> char;

    /// Consume the lookahead. With `skip`, the character is treated as
    /// whitespace in front of the token and the token start moves past it.
    fn advance(&mut self, skip: bool);

    /// Commit the current position as the end of the token being scanned.
    fn mark_end(&mut self);

    /// Set the token type reported when the scan succeeds.
    fn set_result_symbol(&mut self, symbol: Symbol);

    /// Whether the cursor sits at the first byte of an included range.
    fn is_at_included_range_start(&self) -> bool {
        false
    }

    /// Whether the input is exhausted.
    fn eof(&self) -> bool {
        self.lookahead() == '\0'
    }
}

/// A source of input bytes pulled in chunks.
///
/// The reader is asked for the bytes starting at `byte_offset` (which sits at
/// `position`) and appends them to `buf`, returning how many it appended.
/// Returning 0 ends the input.
pub trait ReadSource {
    fn read_into(&mut self, byte_offset: TextPos, position: Point, buf: &mut Vec<u8>) -> usize;
}

impl<F, T> ReadSource for F
where
    F: FnMut(TextPos, Point) -> Option<T>,
    T: AsRef<[u8]>,
{
    fn read_into(&mut self, byte_offset: TextPos, position: Point, buf: &mut Vec<u8>) -> usize {
        match self(byte_offset, position) {
            Some(chunk) => {
                let chunk = chunk.as_ref();
                buf.extend_from_slice(chunk);
                chunk.len()
            }
            None => 0,
        }
    }
}

/// A byte offset together with its row/column point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerPosition {
    pub byte: TextPos,
    pub point: Point,
}

impl LexerPosition {
    pub fn new(byte: TextPos, point: Point) -> Self {
        Self { byte, point }
    }
}

/// Cursor over chunked or in-memory input.
///
/// Every byte read stays buffered, so the cursor can be reset to any earlier
/// position; the engine relies on this to retry a position after a scanner
/// declines it.
pub struct SourceLexer<'a> {
    text: Cow<'a, [u8]>,
    reader: Option<&'a mut dyn ReadSource>,
    /// Point at the end of the bytes read so far.
    text_end_point: Point,
    current: LexerPosition,
    lookahead: char,
    lookahead_len: usize,
    token_start: LexerPosition,
    token_end: Option<LexerPosition>,
    result_symbol: Option<Symbol>,
    /// One past the furthest byte decoded since the token started.
    lookahead_end: TextPos,
    included_ranges: Vec<TextRange>,
}

impl<'a> SourceLexer<'a> {
    /// Create a cursor that pulls its input from `reader` on demand.
    pub fn new(reader: &'a mut dyn ReadSource) -> Self {
        Self::build(Cow::Owned(Vec::new()), Some(reader))
    }

    /// Create a cursor over a complete in-memory buffer.
    pub fn from_bytes(text: &'a [u8]) -> Self {
        Self::build(Cow::Borrowed(text), None)
    }

    /// Create a cursor over a complete in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    fn build(text: Cow<'a, [u8]>, reader: Option<&'a mut dyn ReadSource>) -> Self {
        let text_end_point = Point::default().advanced_by(&text);
        let mut lexer = Self {
            text,
            reader,
            text_end_point,
            current: LexerPosition::default(),
            lookahead: '\0',
            lookahead_len: 0,
            token_start: LexerPosition::default(),
            token_end: None,
            result_symbol: None,
            lookahead_end: 0,
            included_ranges: Vec::new(),
        };
        lexer.decode_lookahead();
        lexer
    }

    /// Restrict [`Lexer::is_at_included_range_start`] to the given ranges.
    pub fn with_included_ranges(mut self, ranges: Vec<TextRange>) -> Self {
        self.included_ranges = ranges;
        self
    }

    /// The current position of the cursor.
    #[inline]
    pub fn position(&self) -> LexerPosition {
        self.current
    }

    /// Where the token being scanned starts.
    #[inline]
    pub fn token_start(&self) -> LexerPosition {
        self.token_start
    }

    /// One past the furthest byte examined since [`start_token`](Self::start_token).
    ///
    /// Reaching the end of input counts as examining one byte past it, so an
    /// edit that appends text invalidates tokens that saw the end.
    #[inline]
    pub fn lookahead_end(&self) -> TextPos {
        self.lookahead_end
    }

    /// All bytes read so far.
    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Whether the input is exhausted. Unlike [`Lexer::lookahead`], an
    /// embedded NUL byte does not count as the end.
    pub fn at_end(&self) -> bool {
        self.lookahead_len == 0
    }

    /// Begin a new token at the current position.
    pub fn start_token(&mut self) {
        self.token_start = self.current;
        self.token_end = None;
        self.result_symbol = None;
        self.lookahead_end = self.current.byte + self.lookahead_len.max(1) as TextPos;
    }

    /// Move the cursor back (or forward) to an already-read position.
    pub fn reset(&mut self, position: LexerPosition) {
        self.current = position;
        self.decode_lookahead();
    }

    /// The token committed by the last scan, if a result symbol was set.
    ///
    /// The token ends at the marked end, or at the current position when the
    /// scanner never marked one.
    pub fn finish_token(&self) -> Option<ScannedToken> {
        let symbol = self.result_symbol?;
        let end = self.token_end.unwrap_or(self.current);
        let start = if self.token_start.byte <= end.byte {
            self.token_start
        } else {
            end
        };
        Some(ScannedToken {
            symbol,
            range: TextRange::new(start.byte, end.byte),
            start_point: start.point,
            end_point: end.point,
        })
    }

    /// Pull one more chunk from the reader. Returns whether bytes arrived.
    fn pull(&mut self) -> bool {
        let Some(reader) = self.reader.as_mut() else {
            return false;
        };
        let offset = self.text.len();
        let buf = self.text.to_mut();
        let read = reader.read_into(offset as TextPos, self.text_end_point, buf);
        if read == 0 {
            tracing::trace!(offset, "input exhausted");
            self.reader = None;
            return false;
        }
        self.text_end_point = self.text_end_point.advanced_by(&self.text[offset..]);
        true
    }

    fn decode_lookahead(&mut self) {
        let pos = self.current.byte as usize;
        while self.text.len() < pos + 4 && self.pull() {}

        let Some(&lead) = self.text.get(pos) else {
            self.lookahead = '\0';
            self.lookahead_len = 0;
            self.lookahead_end = self.lookahead_end.max(self.current.byte + 1);
            return;
        };
        let width = utf8_width(lead);
        let end = (pos + width).min(self.text.len());
        match simdutf8::basic::from_utf8(&self.text[pos..end]) {
            Ok(s) => {
                self.lookahead = s.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                self.lookahead_len = end - pos;
            }
            Err(_) => {
                self.lookahead = char::REPLACEMENT_CHARACTER;
                self.lookahead_len = 1;
            }
        }
        self.lookahead_end = self
            .lookahead_end
            .max(self.current.byte + self.lookahead_len as TextPos);
    }
}

impl Lexer for SourceLexer<'_> {
    #[inline]
    fn lookahead(&self) -> char {
        self.lookahead
    }

    fn advance(&mut self, skip: bool) {
        if self.lookahead_len == 0 {
            return;
        }
        self.current.byte += self.lookahead_len as TextPos;
        if self.lookahead == '\n' {
            self.current.point = Point::new(self.current.point.row + 1, 0);
        } else {
            self.current.point.column += self.lookahead_len as u32;
        }
        if skip {
            self.token_start = self.current;
        }
        self.decode_lookahead();
    }

    #[inline]
    fn mark_end(&mut self) {
        self.token_end = Some(self.current);
    }

    #[inline]
    fn set_result_symbol(&mut self, symbol: Symbol) {
        self.result_symbol = Some(symbol);
    }

    fn is_at_included_range_start(&self) -> bool {
        self.included_ranges
            .iter()
            .any(|range| range.pos == self.current.byte)
    }

    fn eof(&self) -> bool {
        self.at_end()
    }
}
