//! JavaScript scanner: automatic semicolons and template characters.

use crate::ecmascript::{scan_automatic_semicolon, scan_template_chars, Dialect, TemplateEscape};
use crate::external::{is_valid, ExternalScanner};
use crate::lexer::Lexer;
use extscan_core::Symbol;

/// External tokens of the JavaScript grammar.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    AutomaticSemicolon,
    TemplateChars,
}

impl From<TokenType> for Symbol {
    fn from(token: TokenType) -> Symbol {
        token as Symbol
    }
}

pub const TOKEN_NAMES: &[&str] = &["automatic_semicolon", "template_chars"];

/// Stateless JavaScript scanner.
#[derive(Debug, Default)]
pub struct JavaScriptScanner;

impl ExternalScanner for JavaScriptScanner {
    fn token_names(&self) -> &'static [&'static str] {
        TOKEN_NAMES
    }

    /// Template mode when template characters are valid (and a semicolon is
    /// not), otherwise semicolon mode. Semicolon mode runs even when the
    /// engine did not flag the semicolon as valid.
    fn scan(&mut self, lexer: &mut dyn Lexer, valid_symbols: &[bool]) -> bool {
        if is_valid(valid_symbols, TokenType::TemplateChars as usize) {
            if is_valid(valid_symbols, TokenType::AutomaticSemicolon as usize) {
                return false;
            }
            lexer.set_result_symbol(TokenType::TemplateChars.into());
            scan_template_chars(lexer, TemplateEscape::EndRun)
        } else {
            lexer.set_result_symbol(TokenType::AutomaticSemicolon.into());
            scan_automatic_semicolon(lexer, Dialect::JavaScript)
        }
    }
}
