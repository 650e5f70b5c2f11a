//! Grammar tables consumed by the parser.

use extscan_core::symbol::ERROR_KIND;
use extscan_core::{Symbol, ERROR_SYMBOL};
use extscan_scanner::{ExternalScanner, Grammar, ScannerFactory};

/// Display metadata for one grammar symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolMetadata {
    pub name: &'static str,
    pub named: bool,
    /// Extra symbols may appear anywhere, like comments.
    pub extra: bool,
}

impl SymbolMetadata {
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            named: true,
            extra: false,
        }
    }

    pub const fn anonymous(name: &'static str) -> Self {
        Self {
            name,
            named: false,
            extra: false,
        }
    }

    pub const fn extra(mut self) -> Self {
        self.extra = true;
        self
    }
}

const ERROR_METADATA: SymbolMetadata = SymbolMetadata::named(ERROR_KIND);

/// A grammar: its external scanner and its symbol table.
///
/// The first symbols are the external tokens, in the order of the scanner's
/// token names, so the scanner's result symbol is also the node symbol.
#[derive(Debug)]
pub struct Language {
    name: &'static str,
    scanner: ScannerFactory,
    symbols: Vec<SymbolMetadata>,
    root_symbol: Symbol,
}

impl Language {
    pub fn new(
        name: &'static str,
        scanner: ScannerFactory,
        symbols: Vec<SymbolMetadata>,
        root_symbol: Symbol,
    ) -> Self {
        Self {
            name,
            scanner,
            symbols,
            root_symbol,
        }
    }

    /// The toy grammar whose program is any sequence of `foo`, newlines and
    /// `bar`, each produced by the externals scanner.
    pub fn externals() -> Self {
        Self::new(
            Grammar::Externals.name(),
            || Grammar::Externals.create_scanner(),
            vec![
                SymbolMetadata::anonymous("foo"),
                SymbolMetadata::anonymous("\n"),
                SymbolMetadata::named("bar"),
                SymbolMetadata::named("program"),
            ],
            3,
        )
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn root_symbol(&self) -> Symbol {
        self.root_symbol
    }

    /// Number of symbols, not counting the error symbol.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Metadata for `symbol`; the error symbol is a named `ERROR`.
    pub fn symbol_metadata(&self, symbol: Symbol) -> Option<SymbolMetadata> {
        if symbol == ERROR_SYMBOL {
            return Some(ERROR_METADATA);
        }
        self.symbols.get(symbol as usize).copied()
    }

    /// The kind name of `symbol`, or `""` for an unknown symbol.
    pub fn symbol_name(&self, symbol: Symbol) -> &'static str {
        self.symbol_metadata(symbol)
            .map(|metadata| metadata.name)
            .unwrap_or("")
    }

    /// Look up a symbol by kind name and namedness.
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        if named && name == ERROR_KIND {
            return Some(ERROR_SYMBOL);
        }
        self.symbols
            .iter()
            .position(|metadata| metadata.name == name && metadata.named == named)
            .map(|index| index as Symbol)
    }

    /// A fresh scanner for one parser.
    pub fn create_scanner(&self) -> Box<dyn ExternalScanner> {
        (self.scanner)()
    }
}
