//! Symbol identifiers.

/// A grammar symbol. External scanners assign one of their token types to a
/// token through this id, and every tree node carries one.
pub type Symbol = u16;

/// Reserved symbol of nodes that wrap input the grammar could not recognise.
///
/// An accessor returning this symbol has succeeded; the node itself is a
/// syntax error.
pub const ERROR_SYMBOL: Symbol = Symbol::MAX;

/// Node type name reported for [`ERROR_SYMBOL`] nodes.
pub const ERROR_KIND: &str = "ERROR";
