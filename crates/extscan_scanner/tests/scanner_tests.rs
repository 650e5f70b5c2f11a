//! Scanner integration tests.
//!
//! Drives each grammar's scanner through a `SourceLexer` and checks the token
//! it commits (or that it declines).

use extscan_core::{Point, Symbol, TextRange};
use extscan_scanner::{sweep, sweep_with_ranges, Grammar, Lexer, SourceLexer};

const SEMI: Symbol = 0;
const TEMPLATE: Symbol = 1;

/// Helper: run one scan at the start of `source` and return the committed
/// token as (symbol, start, end).
fn scan(grammar: Grammar, valid: &[&str], source: &str) -> Option<(Symbol, u32, u32)> {
    scan_with(grammar, valid, SourceLexer::from_str(source))
}

fn scan_with(
    grammar: Grammar,
    valid: &[&str],
    mut lexer: SourceLexer<'_>,
) -> Option<(Symbol, u32, u32)> {
    let valid = grammar.valid_symbols(valid).unwrap();
    let mut scanner = grammar.create_scanner();
    lexer.start_token();
    if !scanner.scan(&mut lexer, &valid) {
        return None;
    }
    let token = lexer.finish_token()?;
    Some((token.symbol, token.range.pos, token.range.end))
}

/// Helper: whether the JavaScript scanner inserts a semicolon at the start of `source`.
fn js_asi(source: &str) -> bool {
    scan(Grammar::JavaScript, &["automatic_semicolon"], source).is_some()
}

fn ts_asi(source: &str, binary_operators_valid: bool) -> bool {
    let valid: &[&str] = if binary_operators_valid {
        &["automatic_semicolon", "binary_operators"]
    } else {
        &["automatic_semicolon"]
    };
    scan(Grammar::TypeScript, valid, source).is_some()
}

// ============================================================================
// C++ raw strings
// ============================================================================

#[test]
fn test_raw_string_consumes_through_closing_quote() {
    let source = r#"R"xyz(a "quoted" ) body)xyz" tail"#;
    let end = source.find(" tail").unwrap() as u32;
    assert_eq!(scan(Grammar::Cpp, &["raw_string_literal"], source), Some((0, 0, end)));
}

#[test]
fn test_raw_string_rejects_first_mismatched_close() {
    assert_eq!(
        scan(Grammar::Cpp, &["raw_string_literal"], r#"R"foo(bar)baz)foo""#),
        Some((0, 0, 18))
    );
}

#[test]
fn test_raw_string_empty_delimiter_and_body() {
    assert_eq!(scan(Grammar::Cpp, &[], r#"R"()""#), Some((0, 0, 5)));
}

#[test]
fn test_raw_string_missing_close_fails() {
    assert_eq!(scan(Grammar::Cpp, &[], r#"R"foo(bar)fo""#), None);
    assert_eq!(scan(Grammar::Cpp, &[], r#"R"foo(bar)foo"#), None);
    assert_eq!(scan(Grammar::Cpp, &[], "R\"("), None);
}

#[test]
fn test_raw_string_multiline_points() {
    let mut lexer = SourceLexer::from_str("R\"(a\nb)\"");
    let mut scanner = Grammar::Cpp.create_scanner();
    lexer.start_token();
    assert!(scanner.scan(&mut lexer, &[true]));
    let token = lexer.finish_token().unwrap();
    assert_eq!(token.start_point, Point::new(0, 0));
    assert_eq!(token.end_point, Point::new(1, 3));
}

#[test]
fn test_raw_string_sweep_finds_every_literal() {
    let source = br#"x = R"(a)"; y = u8R"d(b)d"; z = "plain";"#;
    let mut scanner = Grammar::Cpp.create_scanner();
    let tokens = sweep(scanner.as_mut(), source, &[true]);
    let texts: Vec<&[u8]> = tokens.iter().map(|t| t.text(source)).collect();
    assert_eq!(texts, vec![&br#"R"(a)""#[..], &br#"u8R"d(b)d""#[..]]);
}

// ============================================================================
// Template characters
// ============================================================================

#[test]
fn test_template_chars_stop_at_backtick() {
    assert_eq!(
        scan(Grammar::JavaScript, &["template_chars"], "abc`"),
        Some((TEMPLATE, 0, 3))
    );
}

#[test]
fn test_template_chars_stop_at_interpolation() {
    assert_eq!(
        scan(Grammar::JavaScript, &["template_chars"], "ab${x}`"),
        Some((TEMPLATE, 0, 2))
    );
}

#[test]
fn test_template_chars_lone_dollar_is_content() {
    assert_eq!(
        scan(Grammar::JavaScript, &["template_chars"], "a$b`"),
        Some((TEMPLATE, 0, 3))
    );
    assert_eq!(
        scan(Grammar::JavaScript, &["template_chars"], "$`"),
        Some((TEMPLATE, 0, 1))
    );
}

#[test]
fn test_template_chars_empty_run_fails() {
    assert_eq!(scan(Grammar::JavaScript, &["template_chars"], "`"), None);
    assert_eq!(scan(Grammar::JavaScript, &["template_chars"], "${x}"), None);
    assert_eq!(scan(Grammar::TypeScript, &["template_chars"], "`"), None);
}

#[test]
fn test_template_chars_end_of_input_fails() {
    assert_eq!(scan(Grammar::JavaScript, &["template_chars"], "abc"), None);
    assert_eq!(scan(Grammar::TypeScript, &["template_chars"], "abc"), None);
}

#[test]
fn test_javascript_template_run_ends_at_backslash() {
    assert_eq!(
        scan(Grammar::JavaScript, &["template_chars"], "ab\\`cd`"),
        Some((TEMPLATE, 0, 2))
    );
    assert_eq!(scan(Grammar::JavaScript, &["template_chars"], "\\n`"), None);
}

#[test]
fn test_typescript_template_run_consumes_escapes() {
    assert_eq!(
        scan(Grammar::TypeScript, &["template_chars"], "a\\`b`"),
        Some((TEMPLATE, 0, 4))
    );
    assert_eq!(
        scan(Grammar::TypeScript, &["template_chars"], "\\${x}`"),
        Some((TEMPLATE, 0, 5))
    );
}

#[test]
fn test_template_mode_declines_when_semicolon_also_valid() {
    let both = ["automatic_semicolon", "template_chars"];
    assert_eq!(scan(Grammar::JavaScript, &both, "abc`"), None);
    assert_eq!(scan(Grammar::TypeScript, &both, "abc`"), None);
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_asi_between_statements_on_separate_lines() {
    // `a\nb`: the scanner runs right after `a`.
    assert_eq!(
        scan(Grammar::JavaScript, &["automatic_semicolon"], "\nb"),
        Some((SEMI, 0, 0))
    );
}

#[test]
fn test_asi_token_is_zero_width_after_trailing_spaces() {
    assert_eq!(
        scan(Grammar::JavaScript, &["automatic_semicolon"], "  \n  b"),
        Some((SEMI, 0, 0))
    );
}

#[test]
fn test_asi_not_inserted_before_postfix_operator() {
    // `a++\nb`: after `a` the lookahead is `+`, which is not whitespace.
    assert!(!js_asi("++\nb"));
}

#[test]
fn test_asi_at_end_of_input_and_close_brace() {
    assert!(js_asi(""));
    assert!(js_asi("   "));
    assert!(js_asi("}"));
    assert!(js_asi("  }"));
    assert!(js_asi("\n}"));
}

#[test]
fn test_asi_same_line_token_declines() {
    assert!(!js_asi("b"));
    assert!(!js_asi("  b"));
}

#[test]
fn test_asi_continuation_punctuation() {
    for source in [
        "\n,", "\n.x", "\n:", "\n;", "\n*", "\n%", "\n>", "\n<", "\n=", "\n[0]", "\n(x)", "\n?",
        "\n^", "\n|", "\n&",
    ] {
        assert!(!js_asi(source), "expected no insertion before {:?}", source);
    }
}

#[test]
fn test_asi_increment_and_decrement() {
    assert!(js_asi("\n++x"));
    assert!(js_asi("\n--x"));
    assert!(!js_asi("\n+x"));
    assert!(!js_asi("\n-x"));
    assert!(!js_asi("\n+ +x"));
}

#[test]
fn test_asi_exclamation() {
    assert!(js_asi("\n!x"));
    assert!(!js_asi("\n!= y"));
}

#[test]
fn test_asi_in_and_instanceof() {
    assert!(!js_asi("\nin x"));
    assert!(!js_asi("\ninstanceof Foo"));
    assert!(!js_asi("\ninstanceof"));
    assert!(js_asi("\ninside"));
    assert!(js_asi("\ninstant"));
    assert!(js_asi("\ninstanceofFoo"));
    assert!(js_asi("\nif (x) {}"));
    assert!(js_asi("\ni"));
}

#[test]
fn test_asi_skips_comments_after_newline() {
    assert!(!js_asi("\n// note\n.then(f)"));
    assert!(js_asi("\n/* note */ b"));
    assert!(js_asi("\n// trailing comment"));
    assert!(js_asi("\n/* unterminated"));
    assert!(!js_asi("\n/ 2"));
}

#[test]
fn test_asi_comment_before_newline_declines() {
    // Only whitespace may separate the previous token from the newline.
    assert!(!js_asi(" // c\nb"));
}

#[test]
fn test_javascript_semicolon_mode_runs_without_valid_flag() {
    assert_eq!(scan(Grammar::JavaScript, &[], "\nb"), Some((SEMI, 0, 0)));
}

#[test]
fn test_javascript_included_range_boundary_inserts() {
    let lexer = SourceLexer::from_str("  b").with_included_ranges(vec![TextRange::new(2, 3)]);
    assert_eq!(
        scan_with(Grammar::JavaScript, &["automatic_semicolon"], lexer),
        Some((SEMI, 0, 0))
    );
}

#[test]
fn test_typescript_ignores_included_ranges() {
    let lexer = SourceLexer::from_str("  b").with_included_ranges(vec![TextRange::new(2, 3)]);
    assert_eq!(scan_with(Grammar::TypeScript, &["automatic_semicolon"], lexer), None);
}

#[test]
fn test_typescript_brackets_depend_on_binary_operators() {
    assert!(!ts_asi("\n(x)", true));
    assert!(!ts_asi("\n[0]", true));
    assert!(ts_asi("\n(x)", false));
    assert!(ts_asi("\n[0]", false));
}

#[test]
fn test_typescript_colon_starts_new_statement() {
    assert!(ts_asi("\n: x", false));
    assert!(!js_asi("\n: x"));
}

#[test]
fn test_typescript_shares_javascript_rules() {
    assert!(ts_asi("\nb", false));
    assert!(ts_asi("\n++x", false));
    assert!(!ts_asi("\ninstanceof y", false));
    assert!(!ts_asi("\n.x", false));
}

#[test]
fn test_typescript_declines_without_valid_symbols() {
    assert_eq!(scan(Grammar::TypeScript, &[], "\nb"), None);
    assert_eq!(scan(Grammar::TypeScript, &["binary_operators"], "\nb"), None);
}

// ============================================================================
// Toy externals grammar
// ============================================================================

#[test]
fn test_externals_single_characters() {
    assert_eq!(scan(Grammar::Externals, &[], "foo"), Some((0, 0, 1)));
    assert_eq!(scan(Grammar::Externals, &[], "\n"), Some((1, 0, 1)));
    assert_eq!(scan(Grammar::Externals, &[], "bar"), Some((2, 0, 1)));
    assert_eq!(scan(Grammar::Externals, &[], "x"), None);
    assert_eq!(scan(Grammar::Externals, &[], ""), None);
}

#[test]
fn test_externals_sweep() {
    let mut scanner = Grammar::Externals.create_scanner();
    let tokens = sweep(scanner.as_mut(), b"fxb\nf", &[true, true, true]);
    let symbols: Vec<Symbol> = tokens.iter().map(|t| t.symbol).collect();
    assert_eq!(symbols, vec![0, 2, 1, 0]);
    assert_eq!(tokens[3].start_point, Point::new(1, 0));
}

#[test]
fn test_sweep_reports_included_range_starts() {
    let valid = Grammar::JavaScript
        .valid_symbols(&["automatic_semicolon"])
        .unwrap();
    let mut scanner = Grammar::JavaScript.create_scanner();
    assert!(sweep(scanner.as_mut(), b"a  b", &valid).is_empty());

    let tokens = sweep_with_ranges(
        scanner.as_mut(),
        b"a  b",
        &valid,
        vec![TextRange::new(3, 4)],
    );
    let starts: Vec<u32> = tokens.iter().map(|t| t.range.pos).collect();
    assert_eq!(starts, vec![1, 2, 3]);
    assert!(tokens.iter().all(|t| t.is_empty() && t.symbol == SEMI));
}

#[test]
fn test_lexer_skip_then_scan_reports_token_start() {
    let mut lexer = SourceLexer::from_str(" f");
    lexer.start_token();
    lexer.advance(true);
    let mut scanner = Grammar::Externals.create_scanner();
    assert!(scanner.scan(&mut lexer, &[]));
    assert_eq!(lexer.finish_token().unwrap().range, TextRange::new(1, 2));
}
