//! Foundation types shared by every layer.
//!
//! - [`Position`], [`Span`] - Source locations for tokens and output nodes
//!
//! This module has NO dependencies on other grammatic modules.

mod position;

pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
