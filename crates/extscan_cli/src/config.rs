//! `extscan.json` loading.

use std::path::Path;

use extscan_core::TextRange;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// The file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "extscan.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Sexp,
    Json,
}

/// Settings shared by every subcommand. Command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub grammar: Option<String>,
    /// External token names offered to the scanner. Empty means all of them.
    pub valid_symbols: Vec<String>,
    pub output: OutputFormat,
    pub included_ranges: Vec<TextRange>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit`, else `extscan.json` in `dir` if present, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = read_to_string(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::parse(&text, &path)
    }
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
