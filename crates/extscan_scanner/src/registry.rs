//! Grammar identifiers and the scanner registry.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cpp::{self, CppScanner};
use crate::external::ExternalScanner;
use crate::externals::{self, ExternalsScanner};
use crate::javascript::{self, JavaScriptScanner};
use crate::typescript::{self, TypeScriptScanner};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown grammar `{0}`")]
    UnknownGrammar(String),
    #[error("grammar `{grammar}` has no external token `{token}`")]
    UnknownToken { grammar: String, token: String },
}

/// The grammars that ship a scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Cpp,
    JavaScript,
    TypeScript,
    Externals,
}

impl Grammar {
    pub const ALL: [Grammar; 4] = [
        Grammar::Cpp,
        Grammar::JavaScript,
        Grammar::TypeScript,
        Grammar::Externals,
    ];

    /// The name used in exported symbols and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Grammar::Cpp => "cpp",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Externals => "externals",
        }
    }

    pub fn token_names(self) -> &'static [&'static str] {
        match self {
            Grammar::Cpp => cpp::TOKEN_NAMES,
            Grammar::JavaScript => javascript::TOKEN_NAMES,
            Grammar::TypeScript => typescript::TOKEN_NAMES,
            Grammar::Externals => externals::TOKEN_NAMES,
        }
    }

    pub fn create_scanner(self) -> Box<dyn ExternalScanner> {
        match self {
            Grammar::Cpp => Box::new(CppScanner),
            Grammar::JavaScript => Box::new(JavaScriptScanner),
            Grammar::TypeScript => Box::new(TypeScriptScanner),
            Grammar::Externals => Box::new(ExternalsScanner),
        }
    }

    /// Build a valid-symbol mask from token names.
    pub fn valid_symbols<S: AsRef<str>>(self, tokens: &[S]) -> Result<Vec<bool>, RegistryError> {
        let names = self.token_names();
        let mut valid = vec![false; names.len()];
        for token in tokens {
            let token = token.as_ref();
            let index = names.iter().position(|name| *name == token).ok_or_else(|| {
                RegistryError::UnknownToken {
                    grammar: self.name().to_string(),
                    token: token.to_string(),
                }
            })?;
            valid[index] = true;
        }
        Ok(valid)
    }
}

impl FromStr for Grammar {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Ok(Grammar::Cpp),
            "javascript" | "js" => Ok(Grammar::JavaScript),
            "typescript" | "ts" => Ok(Grammar::TypeScript),
            "externals" => Ok(Grammar::Externals),
            _ => Err(RegistryError::UnknownGrammar(s.to_string())),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates a fresh scanner for one parse session.
pub type ScannerFactory = fn() -> Box<dyn ExternalScanner>;

/// Maps grammar names to scanner factories.
pub struct ScannerRegistry {
    factories: FxHashMap<String, ScannerFactory>,
}

impl ScannerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// A registry holding every built-in grammar.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Grammar::Cpp.name(), || Grammar::Cpp.create_scanner());
        registry.register(Grammar::JavaScript.name(), || {
            Grammar::JavaScript.create_scanner()
        });
        registry.register(Grammar::TypeScript.name(), || {
            Grammar::TypeScript.create_scanner()
        });
        registry.register(Grammar::Externals.name(), || {
            Grammar::Externals.create_scanner()
        });
        registry
    }

    /// Register (or replace) the factory for `name`.
    pub fn register(&mut self, name: &str, factory: ScannerFactory) -> Option<ScannerFactory> {
        self.factories.insert(name.to_string(), factory)
    }

    /// Create a scanner for `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn ExternalScanner>, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::UnknownGrammar(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
