//! Logos-based default lexer
//!
//! Produces a small, general-purpose set of token kinds, modelled on a
//! C-like scanner: identifiers, numbers, quoted strings, comments and
//! single-character punctuation. Whitespace is skipped.

use logos::Logos;
use smol_str::SmolStr;
use thiserror::Error;

use super::{Token, TokenBuffer};
use crate::base::Position;
use crate::errors::ErrorCode;

/// Kinds produced by the default lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[regex(r"//[^\n]*")]
    #[token("/*", block_comment)]
    Comment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)'")]
    Char,

    #[regex(r"`[^`]*`")]
    RawString,

    // Anything else is a single character of punctuation
    #[regex(r#"[^ \t\r\n\fa-zA-Z0-9_"'`]"#)]
    Punct,
}

impl TokenKind {
    pub const ALL: [TokenKind; 8] = [
        Self::Comment,
        Self::Ident,
        Self::Int,
        Self::Float,
        Self::String,
        Self::Char,
        Self::RawString,
        Self::Punct,
    ];

    /// The kind name carried by emitted tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::Ident => "Ident",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Char => "Char",
            Self::RawString => "RawString",
            Self::Punct => "Punct",
        }
    }

    /// Names of every kind, for validating grammar options against
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|k| k.as_str())
    }
}

/// Extend a `/*` match through the closing `*/`; unterminated comments
/// are lexical errors
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Input the default lexer could not tokenize
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: invalid character {text:?}")]
pub struct LexError {
    pub pos: Position,
    pub text: SmolStr,
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E0101
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    input: &'a str,
    offset: usize,
    pos: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            input,
            offset: 0,
            pos: Position::start(),
        }
    }

    /// Move the line/column tracker forward to a byte offset
    fn position_at(&mut self, offset: usize) -> Position {
        if offset > self.offset {
            self.pos = self.pos.advance(&self.input[self.offset..offset]);
            self.offset = offset;
        }
        self.pos
    }

    /// Position just past the end of the input
    pub fn end_position(&mut self) -> Position {
        self.position_at(self.input.len())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let text = self.inner.slice();
        let pos = self.position_at(span.start);

        Some(match result {
            Ok(kind) => Ok(Token::new(kind.as_str(), text, pos)),
            Err(()) => Err(LexError {
                pos,
                text: text.into(),
            }),
        })
    }
}

/// Tokenize an entire string into a [`TokenBuffer`]
pub fn tokenize(input: &str) -> Result<TokenBuffer, LexError> {
    let mut lexer = Lexer::new(input);
    let tokens = lexer.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok(TokenBuffer::new(tokens, lexer.end_position()))
}
