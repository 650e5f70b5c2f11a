//! TypeScript scanner: automatic semicolons, template characters, and the
//! binary-operator probe that tells expressions from types.

use crate::ecmascript::{scan_automatic_semicolon, scan_template_chars, Dialect, TemplateEscape};
use crate::external::{is_valid, ExternalScanner};
use crate::lexer::Lexer;
use extscan_core::Symbol;

/// External tokens of the TypeScript grammar.
///
/// `BinaryOperators` is never produced; the engine flags it valid exactly
/// when the parser is inside an expression.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    AutomaticSemicolon,
    TemplateChars,
    BinaryOperators,
}

impl From<TokenType> for Symbol {
    fn from(token: TokenType) -> Symbol {
        token as Symbol
    }
}

pub const TOKEN_NAMES: &[&str] = &["automatic_semicolon", "template_chars", "binary_operators"];

/// Stateless TypeScript scanner.
#[derive(Debug, Default)]
pub struct TypeScriptScanner;

impl ExternalScanner for TypeScriptScanner {
    fn token_names(&self) -> &'static [&'static str] {
        TOKEN_NAMES
    }

    fn scan(&mut self, lexer: &mut dyn Lexer, valid_symbols: &[bool]) -> bool {
        let semicolon_valid = is_valid(valid_symbols, TokenType::AutomaticSemicolon as usize);
        if is_valid(valid_symbols, TokenType::TemplateChars as usize) {
            if semicolon_valid {
                return false;
            }
            lexer.set_result_symbol(TokenType::TemplateChars.into());
            scan_template_chars(lexer, TemplateEscape::Consume)
        } else if semicolon_valid {
            lexer.set_result_symbol(TokenType::AutomaticSemicolon.into());
            let binary_operators_valid =
                is_valid(valid_symbols, TokenType::BinaryOperators as usize);
            scan_automatic_semicolon(
                lexer,
                Dialect::TypeScript {
                    binary_operators_valid,
                },
            )
        } else {
            false
        }
    }
}
