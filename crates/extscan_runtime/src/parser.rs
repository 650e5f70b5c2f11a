//! The parse loop.
//!
//! Every position is first offered to the language's external scanner with
//! all external tokens valid. When the scanner declines, whitespace is
//! skipped as trivia and any other character joins an `ERROR` run that ends
//! at the next token or whitespace. Parsing therefore never fails; malformed
//! input shows up as error nodes.

use std::sync::Arc;

use extscan_core::{TextPos, TextRange, ERROR_SYMBOL};
use extscan_scanner::{
    ExternalScanner, Lexer, LexerPosition, ReadSource, ScannerSnapshot, SourceLexer,
};

use crate::language::Language;
use crate::tree::{Leaf, Tree};

/// Parses source text with one language.
pub struct Parser {
    language: Arc<Language>,
    scanner: Box<dyn ExternalScanner>,
    included_ranges: Vec<TextRange>,
}

impl Parser {
    pub fn new(language: Arc<Language>) -> Self {
        let scanner = language.create_scanner();
        Self {
            language,
            scanner,
            included_ranges: Vec::new(),
        }
    }

    #[inline]
    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    /// Switch languages; the scanner is recreated.
    pub fn set_language(&mut self, language: Arc<Language>) {
        self.scanner = language.create_scanner();
        self.language = language;
    }

    /// Byte ranges reported to the scanner as included-range starts.
    pub fn set_included_ranges(&mut self, ranges: Vec<TextRange>) {
        self.included_ranges = ranges;
    }

    pub fn included_ranges(&self) -> &[TextRange] {
        &self.included_ranges
    }

    /// Parse an in-memory buffer.
    pub fn parse_string(&mut self, source: &[u8], old_tree: Option<&Tree>) -> Tree {
        let lexer = SourceLexer::from_bytes(source);
        self.run(lexer, old_tree)
    }

    /// Parse input pulled from `read`, chunk by chunk.
    ///
    /// With an `old_tree` that has been edited to match the new input, leaves
    /// before the first edit are kept and scanning resumes after them.
    pub fn parse_with(&mut self, read: &mut dyn ReadSource, old_tree: Option<&Tree>) -> Tree {
        let lexer = SourceLexer::new(read);
        self.run(lexer, old_tree)
    }

    fn run(&mut self, lexer: SourceLexer<'_>, old_tree: Option<&Tree>) -> Tree {
        let mut lexer = lexer.with_included_ranges(self.included_ranges.clone());
        let valid_symbols = vec![true; self.scanner.token_names().len()];

        let mut leaves = match old_tree {
            Some(old) if Arc::ptr_eq(old.language(), &self.language) => old.reusable_leaves(),
            _ => Vec::new(),
        };
        let reused = leaves.len();

        // Resume after the last kept leaf with the scanner state it recorded.
        let mut state = match leaves.last() {
            Some(last) => {
                lexer.reset(LexerPosition::new(last.range.end, last.end_point));
                last.scanner_state.clone()
            }
            None => ScannerSnapshot::default(),
        };
        state.restore(self.scanner.as_mut());

        let _span = tracing::debug_span!("parse", language = self.language.name()).entered();
        tracing::debug!(reused, resume = lexer.position().byte, "parse start");

        let mut error_start: Option<LexerPosition> = None;
        // Furthest byte examined since the last token was pushed.
        let mut furthest: TextPos = 0;

        while !lexer.at_end() {
            let start = lexer.position();
            lexer.start_token();
            let token = if self.scanner.scan(&mut lexer, &valid_symbols) {
                lexer.finish_token()
            } else {
                None
            };
            furthest = furthest.max(lexer.lookahead_end());

            match token {
                Some(token) if token.range.end > start.byte => {
                    if let Some(error) = error_start.take() {
                        leaves.push(error_leaf(error, start, furthest, &state));
                    }
                    tracing::trace!(symbol = token.symbol, range = ?token.range, "token");
                    state = ScannerSnapshot::capture(self.scanner.as_ref());
                    leaves.push(Leaf {
                        symbol: token.symbol,
                        range: token.range,
                        start_point: token.start_point,
                        end_point: token.end_point,
                        lookahead_end: furthest,
                        scanner_state: state.clone(),
                    });
                    furthest = 0;
                    lexer.reset(LexerPosition::new(token.range.end, token.end_point));
                }
                _ => {
                    // A declined scan must not leave partial state behind.
                    state.restore(self.scanner.as_mut());
                    lexer.reset(start);
                    if lexer.lookahead().is_whitespace() {
                        if let Some(error) = error_start.take() {
                            leaves.push(error_leaf(error, start, furthest, &state));
                        }
                    } else if error_start.is_none() {
                        error_start = Some(start);
                    }
                    lexer.advance(false);
                }
            }
        }

        let end = lexer.position();
        if let Some(error) = error_start.take() {
            furthest = furthest.max(end.byte + 1);
            leaves.push(error_leaf(error, end, furthest, &state));
        }

        let tree = Tree::from_leaves(self.language.clone(), leaves, end.byte, end.point);
        tracing::debug!(
            bytes = end.byte,
            nodes = tree.node_count(),
            reused,
            "parse finish"
        );
        tree
    }
}

/// An `ERROR` leaf for the unrecognised characters in `start..end`.
fn error_leaf(
    start: LexerPosition,
    end: LexerPosition,
    lookahead_end: TextPos,
    state: &ScannerSnapshot,
) -> Leaf {
    Leaf {
        symbol: ERROR_SYMBOL,
        range: TextRange::new(start.byte, end.byte),
        start_point: start.point,
        end_point: end.point,
        lookahead_end,
        scanner_state: state.clone(),
    }
}
