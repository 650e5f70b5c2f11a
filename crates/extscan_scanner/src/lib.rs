//! extscan_scanner: Hand-written external scanners for grammar-driven parsers.
//!
//! Each scanner is a small state machine over the [`Lexer`] cursor capability
//! and recognises the tokens a context-free grammar cannot express cleanly:
//! - C++ raw string literals with custom delimiters
//! - JavaScript/TypeScript automatic semicolon insertion
//! - Template literal character runs
//! - Three single-character tokens of a toy grammar

mod char_codes;
pub mod cpp;
mod ecmascript;
pub mod external;
pub mod externals;
pub mod javascript;
pub mod lexer;
pub mod registry;
mod sweep;
mod token;
pub mod typescript;

pub use external::{ExternalScanner, ScannerSnapshot, SERIALIZATION_BUFFER_SIZE};
pub use lexer::{Lexer, LexerPosition, ReadSource, SourceLexer};
pub use registry::{Grammar, RegistryError, ScannerFactory, ScannerRegistry};
pub use sweep::{sweep, sweep_with_ranges};
pub use token::ScannedToken;
