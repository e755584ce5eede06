//! Token stream boundary consumed by the parser engine.
//!
//! The engine never mutates tokens; it only moves a cursor over them. Any
//! source that can peek ahead and rewind cheaply can drive a parse by
//! implementing [`TokenStream`]. [`TokenBuffer`] is the in-memory
//! implementation used by the default lexer path.

use super::Token;
use crate::base::Position;

/// An opaque, copyable snapshot of a stream's read position
///
/// Cursors order by how much input has been consumed: a stream must hand
/// out non-decreasing cursors as it advances, and two snapshots taken at the
/// same logical point must compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Number of tokens consumed before this point
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A sequential, peekable, rewindable source of tokens
pub trait TokenStream {
    /// Look `offset` tokens ahead without consuming; `None` past the end
    fn peek(&self, offset: usize) -> Option<&Token>;

    /// Consume and return the next token
    fn next(&mut self) -> Option<Token>;

    /// Position of the next token, or the end of input when exhausted
    fn position(&self) -> Position;

    /// Capture the current read position in O(1)
    fn snapshot(&self) -> Cursor;

    /// Rewind to a previously captured snapshot
    fn restore(&mut self, cursor: Cursor);

    fn at_eof(&self) -> bool {
        self.peek(0).is_none()
    }
}

impl<S: TokenStream + ?Sized> TokenStream for &mut S {
    fn peek(&self, offset: usize) -> Option<&Token> {
        (**self).peek(offset)
    }

    fn next(&mut self) -> Option<Token> {
        (**self).next()
    }

    fn position(&self) -> Position {
        (**self).position()
    }

    fn snapshot(&self) -> Cursor {
        (**self).snapshot()
    }

    fn restore(&mut self, cursor: Cursor) {
        (**self).restore(cursor)
    }
}

/// A fully materialized token sequence with an index cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    pos: usize,
    eof: Position,
}

impl TokenBuffer {
    /// Create a buffer whose end-of-input position is `eof`
    pub fn new(tokens: Vec<Token>, eof: Position) -> Self {
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Create a buffer, deriving the end-of-input position from the last token
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let eof = tokens
            .last()
            .map(Token::end)
            .unwrap_or_else(Position::start);
        Self::new(tokens, eof)
    }

    /// Tokens not yet consumed
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn eof_position(&self) -> Position {
        self.eof
    }
}

impl TokenStream for TokenBuffer {
    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn position(&self) -> Position {
        self.tokens
            .get(self.pos)
            .map(|t| t.pos)
            .unwrap_or(self.eof)
    }

    fn snapshot(&self) -> Cursor {
        Cursor::new(self.pos)
    }

    fn restore(&mut self, cursor: Cursor) {
        self.pos = cursor.index().min(self.tokens.len());
    }
}

impl FromIterator<Token> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::from_tokens(iter.into_iter().collect())
    }
}
