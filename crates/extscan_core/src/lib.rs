//! extscan_core: Core position and edit types shared by the scanners and the
//! tree runtime.
//!
//! Provides byte ranges, row/column points, edit descriptors and
//! the symbol identifiers that scanners assign to tokens.

pub mod edit;
pub mod symbol;
pub mod text;

// Re-export commonly used types
pub use edit::InputEdit;
pub use symbol::{Symbol, ERROR_SYMBOL};
pub use text::{Point, TextPos, TextRange};
