//! Subcommand bodies, kept free of process state so they can be tested.

use std::path::PathBuf;
use std::sync::Arc;

use extscan_core::TextRange;
use extscan_runtime::{Language, Parser, TreeSnapshot};
use extscan_scanner::{
    sweep_with_ranges, ExternalScanner, Grammar, ScannedToken, ScannerRegistry,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::CliError;

/// One token as printed by `extscan scan --json`.
#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    symbol: &'a str,
    start: u32,
    end: u32,
    text: String,
}

/// Resolve a grammar name (aliases such as `js` included) and create its
/// scanner from `registry`.
pub fn create_scanner(
    registry: &ScannerRegistry,
    name: &str,
) -> Result<Box<dyn ExternalScanner>, CliError> {
    let grammar: Grammar = name.parse()?;
    Ok(registry.create(grammar.name())?)
}

/// Sweep `source` with `scanner`.
pub fn scan_source(
    scanner: &mut dyn ExternalScanner,
    valid_symbols: &[bool],
    included_ranges: Vec<TextRange>,
    source: &[u8],
) -> Vec<ScannedToken> {
    sweep_with_ranges(scanner, source, valid_symbols, included_ranges)
}

/// Token listing, one `symbol start..end "text"` line per token.
pub fn render_tokens(
    token_names: &[&str],
    tokens: &[ScannedToken],
    source: &[u8],
    format: OutputFormat,
) -> Result<String, CliError> {
    let symbol_name = |token: &ScannedToken| {
        token_names.get(token.symbol as usize).copied().unwrap_or("?")
    };

    match format {
        OutputFormat::Sexp => {
            let mut out = String::new();
            for token in tokens {
                let text = String::from_utf8_lossy(token.text(source));
                out.push_str(&format!(
                    "{} {}..{} {:?}\n",
                    symbol_name(token),
                    token.range.pos,
                    token.range.end,
                    text
                ));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let records: Vec<TokenRecord<'_>> = tokens
                .iter()
                .map(|token| TokenRecord {
                    symbol: symbol_name(token),
                    start: token.range.pos,
                    end: token.range.end,
                    text: String::from_utf8_lossy(token.text(source)).into_owned(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}

/// Parse each source with its own parser and render the trees.
///
/// Output order follows input order.
pub fn parse_sources(
    language: Arc<Language>,
    sources: &[(PathBuf, Vec<u8>)],
    included_ranges: &[TextRange],
    format: OutputFormat,
) -> Result<Vec<String>, CliError> {
    sources
        .par_iter()
        .map(|(path, source)| -> Result<String, CliError> {
            let mut parser = Parser::new(language.clone());
            parser.set_included_ranges(included_ranges.to_vec());
            let tree = parser.parse_string(source, None);
            tracing::debug!(path = %path.display(), nodes = tree.node_count(), "parsed");
            match format {
                OutputFormat::Sexp => Ok(tree.root_node().to_sexp()),
                OutputFormat::Json => Ok(TreeSnapshot::of(&tree).to_json()?),
            }
        })
        .collect()
}
