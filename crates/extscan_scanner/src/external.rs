//! The external scanner capability and its serialization shim.

use crate::lexer::Lexer;

/// Largest state a scanner may serialize, in bytes.
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

/// A hand-written scanner the parsing engine consults before its own lexer.
///
/// Creating a scanner value corresponds to the engine's `create` hook and
/// dropping it to `destroy`. Between incremental reparses the engine calls
/// [`serialize`](Self::serialize) and later [`deserialize`](Self::deserialize)
/// with the same bytes, so every piece of state that influences scanning must
/// round-trip through them.
pub trait ExternalScanner {
    /// Names of the external tokens, indexed by symbol.
    fn token_names(&self) -> &'static [&'static str];

    /// Try to recognise a token at the cursor.
    ///
    /// `valid_symbols[s]` says whether the engine would accept token `s`
    /// here. On success the scanner has set the result symbol and the token
    /// ends at the marked end (or the final position). Returning `false` is
    /// not an error: the engine falls back to its own lexing.
    fn scan(&mut self, lexer: &mut dyn Lexer, valid_symbols: &[bool]) -> bool;

    /// Write the scanner state into `buffer` and return the byte count.
    fn serialize(&self, _buffer: &mut [u8]) -> usize {
        0
    }

    /// Restore state written by [`serialize`](Self::serialize). An empty
    /// buffer resets the scanner to its initial state.
    fn deserialize(&mut self, _buffer: &[u8]) {}
}

/// Whether `symbol` is flagged valid. Flags past the end of the slice are false.
#[inline]
pub(crate) fn is_valid(valid_symbols: &[bool], symbol: usize) -> bool {
    valid_symbols.get(symbol).copied().unwrap_or(false)
}

/// Serialized scanner state captured at a token boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScannerSnapshot {
    bytes: Vec<u8>,
}

impl ScannerSnapshot {
    /// Serialize the current state of `scanner`.
    pub fn capture(scanner: &dyn ExternalScanner) -> Self {
        let mut buffer = [0u8; SERIALIZATION_BUFFER_SIZE];
        let written = scanner.serialize(&mut buffer).min(SERIALIZATION_BUFFER_SIZE);
        Self {
            bytes: buffer[..written].to_vec(),
        }
    }

    /// Put `scanner` back into the captured state.
    pub fn restore(&self, scanner: &mut dyn ExternalScanner) {
        scanner.deserialize(&self.bytes);
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
