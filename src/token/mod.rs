//! Tokens and the stream abstraction the engine consumes.
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos, optional) → Vec<Token>
//!     ↓
//! BuildOptions::elide / map → preprocessed tokens
//!     ↓
//! TokenBuffer (TokenStream) → engine
//! ```
//!
//! The lexer is a convenience; any [`TokenStream`] implementation can drive
//! a parse.

mod lexer;
pub mod mappers;
mod stream;

pub use lexer::{LexError, Lexer, TokenKind, tokenize};
pub use stream::{Cursor, TokenBuffer, TokenStream};

use smol_str::SmolStr;

use crate::base::Position;

/// A token with its kind, text, and position
///
/// The end position is fixed when the token is created, so it still
/// covers the source text after a mapper rewrites `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub kind: SmolStr,
    pub text: SmolStr,
    pub pos: Position,
    end: Position,
}

impl Token {
    pub fn new(kind: impl Into<SmolStr>, text: impl Into<SmolStr>, pos: Position) -> Self {
        let text = text.into();
        Self {
            kind: kind.into(),
            end: pos.advance(&text),
            text,
            pos,
        }
    }

    /// Position just past this token in the source
    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}
