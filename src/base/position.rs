//! Position tracking for tokens and output nodes
//!
//! Stores the source location (byte offset plus line/column) of tokens so
//! that parse failures and captured nodes can point back into the input.

use std::fmt;

use text_size::TextSize;

/// A position in source text
///
/// `line` and `column` are 1-based; `offset` is the 0-based byte offset.
/// Ordering follows the byte offset first, so comparing positions from the
/// same input compares how far into it they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub offset: TextSize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset: TextSize::new(offset),
            line,
            column,
        }
    }

    /// The position of the first character of an input
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance this position over `text`, tracking newlines
    pub fn advance(mut self, text: &str) -> Self {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += TextSize::of(text);
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty span at a single position
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        self.start.offset <= position.offset && position.offset < self.end.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}
