//! Errors reported by the `extscan` binary.

use std::path::PathBuf;

use extscan_scanner::RegistryError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read `{path}`")]
    #[diagnostic(code(extscan::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file `{path}`")]
    #[diagnostic(
        code(extscan::config),
        help("expected keys: grammar, validSymbols, output, includedRanges")
    )]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(extscan::grammar),
        help("known grammars: cpp, javascript, typescript, externals")
    )]
    Registry(#[from] RegistryError),

    #[error("no grammar selected")]
    #[diagnostic(
        code(extscan::no_grammar),
        help("pass --grammar or set `grammar` in extscan.json")
    )]
    MissingGrammar,

    #[error("failed to render JSON output")]
    #[diagnostic(code(extscan::output))]
    Output(#[from] serde_json::Error),
}
