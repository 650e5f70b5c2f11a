//! Errors reported at the handle boundary.

use thiserror::Error;

use crate::binding::{ParserHandle, TreeHandle};

/// A handle could not be resolved.
///
/// Syntax errors are never reported here; they are `ERROR` nodes inside an
/// otherwise valid tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("tree {0} has been deleted")]
    StaleTree(TreeHandle),
    #[error("parser {0} has been deleted")]
    UnknownParser(ParserHandle),
    #[error("node is null")]
    NullNode,
}
