//! Scanner for the toy `externals` grammar: `f`, newline and `b`, one
//! character each.

use crate::external::ExternalScanner;
use crate::lexer::Lexer;
use extscan_core::Symbol;

/// External tokens of the toy grammar.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    F,
    Newline,
    B,
}

impl From<TokenType> for Symbol {
    fn from(token: TokenType) -> Symbol {
        token as Symbol
    }
}

pub const TOKEN_NAMES: &[&str] = &["f", "newline", "b"];

#[derive(Debug, Default)]
pub struct ExternalsScanner;

impl ExternalScanner for ExternalsScanner {
    fn token_names(&self) -> &'static [&'static str] {
        TOKEN_NAMES
    }

    fn scan(&mut self, lexer: &mut dyn Lexer, _valid_symbols: &[bool]) -> bool {
        let token = match lexer.lookahead() {
            'f' => TokenType::F,
            '\n' => TokenType::Newline,
            'b' => TokenType::B,
            _ => return false,
        };
        lexer.advance(false);
        lexer.set_result_symbol(token.into());
        true
    }
}
