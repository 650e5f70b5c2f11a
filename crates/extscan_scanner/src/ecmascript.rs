//! Automatic semicolon insertion and template character runs, shared by the
//! JavaScript and TypeScript scanners.

use crate::char_codes::{is_alpha, is_space};
use crate::lexer::Lexer;

/// The grammar-specific differences in automatic semicolon insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// `:`, `(` and `[` always continue the expression, and an included
    /// range boundary ends the statement.
    JavaScript,
    /// `(` and `[` continue the expression only where a binary operator is
    /// valid; in a type position they start a new statement.
    TypeScript { binary_operators_valid: bool },
}

/// How a backslash inside a template run is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TemplateEscape {
    /// The run ends before the backslash; the grammar lexes the escape.
    EndRun,
    /// The backslash and the escaped character stay in the run.
    Consume,
}

/// Consume template literal characters up to a backtick or `${`.
///
/// A run must contain at least one character; the token always ends before
/// the terminator.
pub(crate) fn scan_template_chars(lexer: &mut dyn Lexer, escape: TemplateEscape) -> bool {
    let mut has_content = false;
    loop {
        lexer.mark_end();
        match lexer.lookahead() {
            '`' => return has_content,
            '\0' => return false,
            '$' => {
                lexer.advance(false);
                if lexer.lookahead() == '{' {
                    return has_content;
                }
            }
            '\\' => match escape {
                TemplateEscape::EndRun => return has_content,
                TemplateEscape::Consume => {
                    lexer.advance(false);
                    lexer.advance(false);
                }
            },
            _ => lexer.advance(false),
        }
        has_content = true;
    }
}

/// Decide whether a semicolon is implied at the cursor.
///
/// The inserted token is zero-width: the end is marked before anything is
/// consumed.
pub(crate) fn scan_automatic_semicolon(lexer: &mut dyn Lexer, dialect: Dialect) -> bool {
    lexer.mark_end();

    loop {
        let c = lexer.lookahead();
        if c == '\0' || c == '}' {
            return true;
        }
        if dialect == Dialect::JavaScript && lexer.is_at_included_range_start() {
            return true;
        }
        if !is_space(c) {
            return false;
        }
        if c == '\n' {
            break;
        }
        lexer.advance(false);
    }

    lexer.advance(false);

    if !scan_whitespace_and_comments(lexer) {
        return false;
    }

    match lexer.lookahead() {
        ',' | '.' | ';' | '*' | '%' | '>' | '<' | '=' | '?' | '^' | '|' | '&' | '/' => false,

        ':' => dialect != Dialect::JavaScript,

        '(' | '[' => match dialect {
            Dialect::JavaScript => false,
            Dialect::TypeScript {
                binary_operators_valid,
            } => !binary_operators_valid,
        },

        // `++` and `--` start a new statement; binary `+` and `-` continue one.
        '+' => {
            lexer.advance(false);
            lexer.lookahead() == '+'
        }
        '-' => {
            lexer.advance(false);
            lexer.lookahead() == '-'
        }

        // Unary `!` starts a new statement; `!=` continues one.
        '!' => {
            lexer.advance(false);
            lexer.lookahead() != '='
        }

        'i' => scan_identifier_after_newline(lexer),

        _ => true,
    }
}

/// `in` and `instanceof` continue the expression; any other word starting
/// with `i` is an identifier that starts a new statement.
///
/// Only alphabetic characters count as identifier continuations here, so
/// `in2` and `instanceof_` are read as the operators.
fn scan_identifier_after_newline(lexer: &mut dyn Lexer) -> bool {
    lexer.advance(false);
    if lexer.lookahead() != 'n' {
        return true;
    }
    lexer.advance(false);

    if !is_alpha(lexer.lookahead()) {
        return false;
    }

    for expected in "stanceof".chars() {
        if lexer.lookahead() != expected {
            return true;
        }
        lexer.advance(false);
    }

    // `instanceof` followed by more letters is an identifier such as
    // `instanceofFoo`.
    is_alpha(lexer.lookahead())
}

/// Skip whitespace, `//` comments and `/* */` comments.
///
/// Returns `false` when a `/` does not start a comment. An unterminated block
/// comment runs to the end of input.
fn scan_whitespace_and_comments(lexer: &mut dyn Lexer) -> bool {
    loop {
        while is_space(lexer.lookahead()) {
            lexer.advance(false);
        }

        if lexer.lookahead() != '/' {
            return true;
        }
        lexer.advance(false);

        match lexer.lookahead() {
            '/' => {
                lexer.advance(false);
                while lexer.lookahead() != '\0' && lexer.lookahead() != '\n' {
                    lexer.advance(false);
                }
            }
            '*' => {
                lexer.advance(false);
                while lexer.lookahead() != '\0' {
                    if lexer.lookahead() == '*' {
                        lexer.advance(false);
                        if lexer.lookahead() == '/' {
                            lexer.advance(false);
                            break;
                        }
                    } else {
                        lexer.advance(false);
                    }
                }
            }
            _ => return false,
        }
    }
}
