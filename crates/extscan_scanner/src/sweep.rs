//! Offer every position of a text to a scanner.

use extscan_core::TextRange;

use crate::external::ExternalScanner;
use crate::lexer::{Lexer, LexerPosition, SourceLexer};
use crate::token::ScannedToken;

/// Run `scanner` at each character offset of `text` and collect the tokens
/// it recognises.
///
/// After a token the sweep continues at the token's end; after a failure or
/// a zero-width token it moves one character on.
pub fn sweep(
    scanner: &mut dyn ExternalScanner,
    text: &[u8],
    valid_symbols: &[bool],
) -> Vec<ScannedToken> {
    sweep_with_ranges(scanner, text, valid_symbols, Vec::new())
}

/// [`sweep`], with `included_ranges` reported to the scanner as range starts.
pub fn sweep_with_ranges(
    scanner: &mut dyn ExternalScanner,
    text: &[u8],
    valid_symbols: &[bool],
    included_ranges: Vec<TextRange>,
) -> Vec<ScannedToken> {
    let mut lexer = SourceLexer::from_bytes(text).with_included_ranges(included_ranges);
    let mut tokens = Vec::new();

    while !lexer.at_end() {
        let start = lexer.position();
        lexer.start_token();
        let token = if scanner.scan(&mut lexer, valid_symbols) {
            lexer.finish_token()
        } else {
            None
        };

        match token {
            Some(token) if token.range.end > start.byte => {
                tracing::trace!(symbol = token.symbol, range = ?token.range, "token");
                tokens.push(token);
                lexer.reset(LexerPosition::new(token.range.end, token.end_point));
            }
            other => {
                tokens.extend(other);
                lexer.reset(start);
                lexer.advance(false);
            }
        }
    }

    tokens
}
