//! C++ raw string literal scanner.
//!
//! Recognises `(L|U|u|u8)?R"delim(...)delim"` as a single token. The body
//! may contain anything except the closing `)delim"` sequence.

use crate::char_codes::is_space;
use crate::external::ExternalScanner;
use crate::lexer::Lexer;
use extscan_core::Symbol;

/// External tokens of the C++ grammar.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    RawStringLiteral,
}

impl From<TokenType> for Symbol {
    fn from(token: TokenType) -> Symbol {
        token as Symbol
    }
}

pub const TOKEN_NAMES: &[&str] = &["raw_string_literal"];

/// Stateless scanner for C++ raw string literals.
#[derive(Debug, Default)]
pub struct CppScanner;

impl ExternalScanner for CppScanner {
    fn token_names(&self) -> &'static [&'static str] {
        TOKEN_NAMES
    }

    fn scan(&mut self, lexer: &mut dyn Lexer, _valid_symbols: &[bool]) -> bool {
        scan_raw_string_literal(lexer)
    }
}

fn scan_raw_string_literal(lexer: &mut dyn Lexer) -> bool {
    while is_space(lexer.lookahead()) {
        lexer.advance(true);
    }

    lexer.set_result_symbol(TokenType::RawStringLiteral.into());

    if !scan_prefix(lexer) {
        return false;
    }

    if lexer.lookahead() != '"' {
        return false;
    }
    lexer.advance(false);

    let Some(delimiter) = scan_delimiter(lexer) else {
        return false;
    };

    scan_body(lexer, &delimiter)
}

/// Consume the optional encoding prefix and the `R`.
fn scan_prefix(lexer: &mut dyn Lexer) -> bool {
    match lexer.lookahead() {
        'L' | 'U' => {
            lexer.advance(false);
            if lexer.lookahead() != 'R' {
                return false;
            }
        }
        'u' => {
            lexer.advance(false);
            if lexer.lookahead() == '8' {
                lexer.advance(false);
            }
            if lexer.lookahead() != 'R' {
                return false;
            }
        }
        'R' => {}
        _ => return false,
    }
    lexer.advance(false);
    true
}

/// Consume the delimiter and the opening `(`.
///
/// The language caps delimiters at 16 characters; that limit is left to the
/// compiler.
fn scan_delimiter(lexer: &mut dyn Lexer) -> Option<Vec<char>> {
    let mut delimiter = Vec::new();
    loop {
        match lexer.lookahead() {
            '\0' | '\\' => return None,
            c if is_space(c) => return None,
            '(' => {
                lexer.advance(false);
                return Some(delimiter);
            }
            c => {
                delimiter.push(c);
                lexer.advance(false);
            }
        }
    }
}

/// Consume the body up to and including `)delim"`.
///
/// `matched` counts delimiter characters seen after the latest `)`. A
/// mismatch drops the partial match; the mismatching character may itself
/// be a `)` that starts the next attempt.
fn scan_body(lexer: &mut dyn Lexer, delimiter: &[char]) -> bool {
    let mut matched: Option<usize> = None;
    loop {
        let c = lexer.lookahead();
        if c == '\0' {
            return false;
        }

        if let Some(count) = matched {
            if count == delimiter.len() {
                if c == '"' {
                    lexer.advance(false);
                    return true;
                }
                matched = None;
            } else if c == delimiter[count] {
                matched = Some(count + 1);
            } else {
                matched = None;
            }
        }

        if matched.is_none() && c == ')' {
            matched = Some(0);
        }

        lexer.advance(false);
    }
}
