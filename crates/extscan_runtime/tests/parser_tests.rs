//! Parser integration tests.
//!
//! Builds trees with the externals language (and small custom languages) and
//! checks node structure, tree edits and incremental reparsing.

use std::sync::Arc;

use extscan_core::{InputEdit, Point, Symbol, TextPos, ERROR_SYMBOL};
use extscan_runtime::{Language, Parser, SymbolMetadata, Tree};
use extscan_scanner::{ExternalScanner, Grammar, Lexer};

/// Helper: parse source text with the externals language.
fn parse(source: &str) -> Tree {
    Parser::new(Arc::new(Language::externals())).parse_string(source.as_bytes(), None)
}

fn kinds(tree: &Tree) -> Vec<&'static str> {
    tree.root_node().children().map(|n| n.kind()).collect()
}

fn ranges(tree: &Tree) -> Vec<(TextPos, TextPos)> {
    tree.root_node()
        .children()
        .map(|n| (n.start_byte(), n.end_byte()))
        .collect()
}

fn insertion(at: TextPos, len: TextPos, row: u32, column: u32) -> InputEdit {
    InputEdit {
        start_byte: at,
        old_end_byte: at,
        new_end_byte: at + len,
        start_point: Point::new(row, column),
        old_end_point: Point::new(row, column),
        new_end_point: Point::new(row, column + len),
    }
}

// ============================================================================
// Tree Structure
// ============================================================================

#[test]
fn test_parse_externals_tokens() {
    let tree = parse("f\nb");
    let root = tree.root_node();
    assert_eq!(root.kind(), "program");
    assert_eq!(kinds(&tree), vec!["foo", "\n", "bar"]);
    assert_eq!(ranges(&tree), vec![(0, 1), (1, 2), (2, 3)]);
    assert_eq!(root.to_sexp(), "(program (bar))");
    assert!(!root.has_error());
}

#[test]
fn test_points_follow_newlines() {
    let tree = parse("f\nb");
    let root = tree.root_node();
    let bar = root.child(2).unwrap();
    assert_eq!(bar.start_point(), Point::new(1, 0));
    assert_eq!(bar.end_point(), Point::new(1, 1));
    assert_eq!(root.end_point(), Point::new(1, 1));
    let newline = root.child(1).unwrap();
    assert_eq!(newline.start_point(), Point::new(0, 1));
    assert_eq!(newline.end_point(), Point::new(1, 0));
}

#[test]
fn test_unknown_characters_become_error_nodes() {
    let tree = parse("f\nbxx b");
    assert_eq!(kinds(&tree), vec!["foo", "\n", "bar", "ERROR", "bar"]);
    assert_eq!(ranges(&tree)[3], (3, 5));
    let root = tree.root_node();
    assert!(root.has_error());
    assert_eq!(root.to_sexp(), "(program (bar) (ERROR) (bar))");

    let error = root.child(3).unwrap();
    assert!(error.is_error());
    assert!(error.is_named());
    assert_eq!(error.symbol(), ERROR_SYMBOL);
}

#[test]
fn test_error_run_at_end_of_input() {
    let tree = parse("bzz");
    assert_eq!(ranges(&tree), vec![(0, 1), (1, 3)]);
    assert_eq!(tree.root_node().end_byte(), 3);
}

#[test]
fn test_empty_input() {
    let tree = parse("");
    let root = tree.root_node();
    assert_eq!(root.child_count(), 0);
    assert_eq!(root.end_byte(), 0);
    assert_eq!(root.to_sexp(), "(program)");
}

#[test]
fn test_root_covers_trailing_whitespace() {
    let tree = parse("b  ");
    assert_eq!(tree.root_node().end_byte(), 3);
    assert_eq!(tree.root_node().child_count(), 1);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_siblings_and_parent() {
    let tree = parse("fb");
    let root = tree.root_node();
    let foo = root.child(0).unwrap();
    let bar = foo.next_sibling().unwrap();
    assert_eq!(bar.kind(), "bar");
    assert_eq!(bar.prev_sibling(), Some(foo));
    assert_eq!(bar.next_sibling(), None);
    assert_eq!(foo.prev_sibling(), None);
    assert_eq!(bar.parent(), Some(root));
    assert_eq!(root.parent(), None);
    assert_eq!(root.next_sibling(), None);
}

#[test]
fn test_named_children() {
    let tree = parse("fbfb");
    let root = tree.root_node();
    assert_eq!(root.child_count(), 4);
    assert_eq!(root.named_child_count(), 2);
    assert_eq!(root.named_child(1).unwrap().start_byte(), 3);
    assert!(root.named_child(2).is_none());
    assert_eq!(
        root.child(0).unwrap().next_named_sibling().unwrap().start_byte(),
        1
    );
}

#[test]
fn test_sibling_indices() {
    let tree = parse("fbbbb");
    let root = tree.root_node();
    let indices: Vec<_> = root.children().map(|n| n.index()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    let named: Vec<_> = root.children().skip(1).map(|n| n.named_index()).collect();
    assert_eq!(named, vec![0, 1, 2, 3]);
    let bounded: Vec<_> = root
        .children()
        .skip(1)
        .map(|n| n.bounded_named_index())
        .collect();
    assert_eq!(bounded, vec![0, 1, 2, 2]);
    assert_eq!(root.index(), 0);
}

#[test]
fn test_descendant_for_point_range() {
    let tree = parse("f\nb");
    let root = tree.root_node();
    let bar = root
        .descendant_for_point_range(Point::new(1, 0), Point::new(1, 1))
        .unwrap();
    assert_eq!(bar.kind(), "bar");
    let foo = root
        .descendant_for_point_range(Point::new(0, 0), Point::new(0, 1))
        .unwrap();
    assert_eq!(foo.kind(), "foo");
    let whole = root
        .descendant_for_point_range(Point::new(0, 0), Point::new(1, 1))
        .unwrap();
    assert_eq!(whole, root);
}

#[test]
fn test_extra_symbols() {
    let language = Language::new(
        "lines",
        || Grammar::Externals.create_scanner(),
        vec![
            SymbolMetadata::anonymous("foo"),
            SymbolMetadata::anonymous("\n").extra(),
            SymbolMetadata::named("bar"),
            SymbolMetadata::named("program"),
        ],
        3,
    );
    let tree = Parser::new(Arc::new(language)).parse_string(b"b\nb", None);
    let newline = tree.root_node().child(1).unwrap();
    assert!(newline.is_extra());
    assert_eq!(newline.start_byte(), 1);
    assert_eq!(newline.end_byte(), 2);
    assert!(!tree.root_node().child(0).unwrap().is_extra());
}

#[test]
fn test_raw_string_language() {
    let language = Language::new(
        "cpp",
        || Grammar::Cpp.create_scanner(),
        vec![
            SymbolMetadata::named("raw_string_literal"),
            SymbolMetadata::named("translation_unit"),
        ],
        1,
    );
    let tree = Parser::new(Arc::new(language)).parse_string(br#"x = R"(a)";"#, None);
    assert_eq!(
        tree.root_node().to_sexp(),
        "(translation_unit (ERROR) (ERROR) (raw_string_literal) (ERROR))"
    );
    assert_eq!(ranges(&tree)[2], (4, 10));
}

// ============================================================================
// Chunked Input
// ============================================================================

#[test]
fn test_parse_with_chunked_reader() {
    let source = b"f\nbxx b\nfff";
    let mut calls = 0;
    let mut read = |offset: TextPos, _position: Point| -> Option<&'static [u8]> {
        calls += 1;
        let start = offset as usize;
        (start < source.len()).then(|| &source[start..(start + 3).min(source.len())])
    };
    let mut parser = Parser::new(Arc::new(Language::externals()));
    let chunked = parser.parse_with(&mut read, None);
    let whole = parser.parse_string(source, None);
    assert_eq!(chunked.snapshot(), whole.snapshot());
    assert!(calls > 1);
}

#[test]
fn test_reader_sees_point_of_offset() {
    let source = "f\nb\nf";
    let mut seen = Vec::new();
    let mut read = |offset: TextPos, position: Point| -> Option<Vec<u8>> {
        seen.push((offset, position));
        let start = offset as usize;
        (start < source.len()).then(|| source.as_bytes()[start..start + 1].to_vec())
    };
    Parser::new(Arc::new(Language::externals())).parse_with(&mut read, None);
    assert!(seen.contains(&(2, Point::new(1, 0))));
    assert!(seen.contains(&(4, Point::new(2, 0))));
}

// ============================================================================
// Edits
// ============================================================================

#[test]
fn test_edit_shifts_nodes_after_edit() {
    let original = parse("fb\nfb");
    let mut edited = original.clone();
    edited.edit(&insertion(2, 3, 0, 2));

    for (old, new) in original
        .root_node()
        .children()
        .zip(edited.root_node().children())
    {
        if old.start_byte() >= 2 {
            assert_eq!(new.start_byte(), old.start_byte() + 3);
            assert_eq!(new.end_byte(), old.end_byte() + 3);
        }
    }

    let newline = edited.root_node().child(2).unwrap();
    assert_eq!(newline.start_point(), Point::new(0, 5));
    assert_eq!(newline.end_point(), Point::new(1, 0));
    assert!(newline.has_changes());
    assert!(edited.root_node().has_changes());
    assert!(!edited.root_node().child(0).unwrap().has_changes());
    assert!(!edited.root_node().child(3).unwrap().has_changes());

    // the source tree is untouched
    assert_eq!(original.root_node().child(2).unwrap().start_byte(), 2);
    assert!(!original.root_node().has_changes());
}

#[test]
fn test_edit_collapses_deleted_positions() {
    let mut tree = parse("fbfb");
    tree.edit(&InputEdit {
        start_byte: 0,
        old_end_byte: 3,
        new_end_byte: 0,
        start_point: Point::new(0, 0),
        old_end_point: Point::new(0, 3),
        new_end_point: Point::new(0, 0),
    });
    assert_eq!(ranges(&tree), vec![(0, 0), (0, 0), (0, 0), (0, 1)]);
}

#[test]
fn test_edit_on_later_row_keeps_columns() {
    let mut tree = parse("f\nb");
    tree.edit(&insertion(0, 2, 0, 0));
    let bar = tree.root_node().child(2).unwrap();
    assert_eq!(bar.start_byte(), 4);
    assert_eq!(bar.start_point(), Point::new(1, 0));
}

// ============================================================================
// Incremental Reparse
// ============================================================================

#[test]
fn test_incremental_reparse_matches_fresh_parse() {
    let mut parser = Parser::new(Arc::new(Language::externals()));
    let mut old = parser.parse_string(b"fbfb", None);
    old.edit(&insertion(2, 1, 0, 2));
    let incremental = parser.parse_string(b"fbxfb", Some(&old));
    let fresh = parser.parse_string(b"fbxfb", None);
    assert_eq!(incremental.snapshot(), fresh.snapshot());
    assert!(!incremental.root_node().has_changes());
}

#[test]
fn test_incremental_reparse_after_deletion() {
    let mut parser = Parser::new(Arc::new(Language::externals()));
    let mut old = parser.parse_string(b"fb\nzzb", None);
    old.edit(&InputEdit {
        start_byte: 3,
        old_end_byte: 5,
        new_end_byte: 3,
        start_point: Point::new(1, 0),
        old_end_point: Point::new(1, 2),
        new_end_point: Point::new(1, 0),
    });
    let incremental = parser.parse_string(b"fb\nb", Some(&old));
    assert_eq!(incremental.snapshot(), parser.parse_string(b"fb\nb", None).snapshot());
    assert!(!incremental.root_node().has_error());
}

/// Alternates between two symbols; the parity must survive reparsing.
#[derive(Default)]
struct AlternatingScanner {
    odd: bool,
}

impl ExternalScanner for AlternatingScanner {
    fn token_names(&self) -> &'static [&'static str] {
        &["even", "odd"]
    }

    fn scan(&mut self, lexer: &mut dyn Lexer, _valid_symbols: &[bool]) -> bool {
        if lexer.lookahead() != 'a' {
            return false;
        }
        lexer.advance(false);
        lexer.set_result_symbol(self.odd as Symbol);
        self.odd = !self.odd;
        true
    }

    fn serialize(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.odd as u8;
        1
    }

    fn deserialize(&mut self, buffer: &[u8]) {
        self.odd = buffer.first() == Some(&1);
    }
}

fn alternating_scanner() -> Box<dyn ExternalScanner> {
    Box::new(AlternatingScanner::default())
}

#[test]
fn test_incremental_reparse_restores_scanner_state() {
    let language = Arc::new(Language::new(
        "alternating",
        alternating_scanner,
        vec![
            SymbolMetadata::named("even"),
            SymbolMetadata::named("odd"),
            SymbolMetadata::named("source"),
        ],
        2,
    ));
    let mut parser = Parser::new(language);
    let mut old = parser.parse_string(b"aaaa", None);
    assert_eq!(kinds(&old), vec!["even", "odd", "even", "odd"]);

    old.edit(&insertion(4, 1, 0, 4));
    let incremental = parser.parse_string(b"aaaaa", Some(&old));
    assert_eq!(kinds(&incremental), vec!["even", "odd", "even", "odd", "even"]);
    assert_eq!(
        incremental.snapshot(),
        parser.parse_string(b"aaaaa", None).snapshot()
    );
}

#[test]
fn test_error_runs_between_stateful_tokens() {
    let language = Arc::new(Language::new(
        "alternating",
        alternating_scanner,
        vec![
            SymbolMetadata::named("even"),
            SymbolMetadata::named("odd"),
            SymbolMetadata::named("source"),
        ],
        2,
    ));
    let tree = Parser::new(language).parse_string(b"a a?a", None);
    assert_eq!(kinds(&tree), vec!["even", "odd", "ERROR", "even"]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_reads_of_one_tree() {
    let tree = parse("fbxfb\nb");
    let expected = tree.root_node().to_sexp();
    let tree = &tree;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || tree.root_node().to_sexp()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
