//! Tracing setup for the `extscan` binary.
//!
//! `EXTSCAN_LOG` (or `RUST_LOG`) selects what is logged, with the usual
//! filter syntax:
//!
//! ```bash
//! EXTSCAN_LOG=debug extscan parse input.txt
//! EXTSCAN_LOG=extscan_runtime=trace EXTSCAN_LOG_FORMAT=json extscan parse input.txt
//! ```
//!
//! Nothing is installed unless one of the two variables is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("EXTSCAN_LOG_FORMAT").unwrap_or_default())
    }
}

/// `EXTSCAN_LOG` wins over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    match std::env::var("EXTSCAN_LOG") {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for tokens and trees.
pub fn init_tracing() {
    if std::env::var_os("EXTSCAN_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
