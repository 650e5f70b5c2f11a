//! extscan_runtime: Parse trees built from external scanner tokens.
//!
//! The runtime drives a grammar's external scanner over a source, builds an
//! immutable [`Tree`] of [`Node`] views, applies [`InputEdit`]s to copies of
//! trees, and reparses incrementally. [`Session`] exposes all of this through
//! generation-checked handles for hosts that cannot hold Rust references.

pub mod binding;
pub mod error;
pub mod language;
pub mod node;
pub mod parser;
pub mod snapshot;
pub mod tree;

pub use binding::{NodeHandle, ParserHandle, Session, TreeHandle};
pub use error::BindingError;
pub use extscan_core::InputEdit;
pub use language::{Language, SymbolMetadata};
pub use node::Node;
pub use parser::Parser;
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use tree::Tree;
