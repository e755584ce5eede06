//! Token stream wrapper used for the duration of one parse
//!
//! Forwards to the caller's stream and keeps a log of consumed tokens so
//! text captures can read back what their subtree matched. Restoring the
//! stream drops log entries at or past the restore point, so the log always
//! mirrors the tokens between the parse start and the current position.

use smol_str::SmolStr;

use crate::base::Position;
use crate::token::{Cursor, Token, TokenStream};

pub(crate) struct Input<'s, S: TokenStream + ?Sized> {
    inner: &'s mut S,
    consumed: Vec<(Cursor, Token)>,
}

impl<'s, S: TokenStream + ?Sized> Input<'s, S> {
    pub(crate) fn new(inner: &'s mut S) -> Self {
        Self {
            inner,
            consumed: Vec::new(),
        }
    }

    /// Number of tokens consumed so far in this parse
    pub(crate) fn consumed_len(&self) -> usize {
        self.consumed.len()
    }

    /// Tokens consumed after the log had `mark` entries
    pub(crate) fn consumed_since(&self, mark: usize) -> impl Iterator<Item = &Token> {
        self.consumed[mark.min(self.consumed.len())..]
            .iter()
            .map(|(_, token)| token)
    }

    /// End of the last token consumed after `mark`, if any
    pub(crate) fn end_since(&self, mark: usize) -> Option<Position> {
        if self.consumed.len() > mark {
            self.consumed.last().map(|(_, token)| token.end())
        } else {
            None
        }
    }

    /// Text of the next token, `None` at end of input
    pub(crate) fn found(&self, offset: usize) -> Option<SmolStr> {
        self.inner.peek(offset).map(|token| token.text.clone())
    }
}

impl<S: TokenStream + ?Sized> TokenStream for Input<'_, S> {
    fn peek(&self, offset: usize) -> Option<&Token> {
        self.inner.peek(offset)
    }

    fn next(&mut self) -> Option<Token> {
        let cursor = self.inner.snapshot();
        let token = self.inner.next()?;
        self.consumed.push((cursor, token.clone()));
        Some(token)
    }

    fn position(&self) -> Position {
        self.inner.position()
    }

    fn snapshot(&self) -> Cursor {
        self.inner.snapshot()
    }

    fn restore(&mut self, cursor: Cursor) {
        self.inner.restore(cursor);
        while self
            .consumed
            .last()
            .is_some_and(|(at, _)| *at >= cursor)
        {
            self.consumed.pop();
        }
    }
}
