//! extscan: run external scanners and the scanner-driven parser from the
//! command line.
//!
//! Usage:
//!   extscan scan --grammar <name> [--valid token,...] FILE
//!   extscan parse [--json] FILE...

mod commands;
mod config;
mod error;
mod tracing_config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser as ClapParser, Subcommand};
use extscan_runtime::Language;
use extscan_scanner::{Grammar, ScannerRegistry};

use crate::config::{Config, OutputFormat};
use crate::error::CliError;

#[derive(ClapParser, Debug)]
#[command(name = "extscan", about = "Drive hand-written external scanners over source files")]
struct Cli {
    /// Path to extscan.json. Defaults to ./extscan.json when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Offer every character offset of a file to a grammar's scanner.
    Scan {
        /// Grammar whose scanner to run (cpp, javascript, typescript, externals).
        #[arg(short, long)]
        grammar: Option<String>,

        /// External token names to mark valid. All of them when omitted.
        #[arg(long, value_delimiter = ',')]
        valid: Vec<String>,

        /// Print tokens as JSON.
        #[arg(long)]
        json: bool,

        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse files with the externals grammar and print their trees.
    Parse {
        /// Print trees as JSON instead of S-expressions.
        #[arg(long)]
        json: bool,

        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> miette::Result<()> {
    tracing_config::init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), Path::new("."))?;

    match cli.command {
        Command::Scan {
            grammar,
            valid,
            json,
            file,
        } => run_scan(&config, grammar, valid, json, &file)?,
        Command::Parse { json, files } => run_parse(&config, json, &files)?,
    }
    Ok(())
}

fn output_format(config: &Config, json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        config.output
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run_scan(
    config: &Config,
    grammar: Option<String>,
    valid: Vec<String>,
    json: bool,
    file: &Path,
) -> Result<(), CliError> {
    // Flags override config values
    let name = grammar
        .or_else(|| config.grammar.clone())
        .ok_or(CliError::MissingGrammar)?;
    let grammar: Grammar = name.parse()?;
    let registry = ScannerRegistry::with_builtins();
    let mut scanner = commands::create_scanner(&registry, &name)?;
    let valid = if valid.is_empty() {
        config.valid_symbols.clone()
    } else {
        valid
    };
    let valid_symbols = if valid.is_empty() {
        vec![true; scanner.token_names().len()]
    } else {
        grammar.valid_symbols(&valid)?
    };

    let source = read_file(file)?;
    let tokens = commands::scan_source(
        scanner.as_mut(),
        &valid_symbols,
        config.included_ranges.clone(),
        &source,
    );
    tracing::debug!(grammar = %grammar, tokens = tokens.len(), "scan finished");
    let format = output_format(config, json);
    let out = commands::render_tokens(scanner.token_names(), &tokens, &source, format)?;
    print!("{out}");
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn run_parse(config: &Config, json: bool, files: &[PathBuf]) -> Result<(), CliError> {
    let sources = files
        .iter()
        .map(|path| Ok((path.clone(), read_file(path)?)))
        .collect::<Result<Vec<_>, CliError>>()?;

    let language = Arc::new(Language::externals());
    let trees = commands::parse_sources(
        language,
        &sources,
        &config.included_ranges,
        output_format(config, json),
    )?;
    for ((path, _), tree) in sources.iter().zip(trees) {
        if files.len() > 1 {
            println!("{}:", path.display());
        }
        println!("{tree}");
    }
    Ok(())
}
