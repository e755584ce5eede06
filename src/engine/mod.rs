//! Parser engine
//!
//! ```text
//! TokenStream ──► Input (consumed-token log)
//!                   │
//!   CompiledGrammar ─► Interpreter ──► Journal (captures) ──► Node
//!                   │
//!                   └─► FailureTracker (deepest failure) ──► ParseError
//! ```
//!
//! All mutable state belongs to one parse call, so a [`CompiledGrammar`]
//! can serve any number of concurrent parses. A failed parse rewinds the
//! caller's stream to where it started.

mod failure;
mod input;
mod interpreter;
mod journal;

use smol_str::SmolStr;

use crate::base::Position;
use crate::compiler::{CompiledGrammar, ProductionId};
use crate::errors::{ErrorCode, ParseError, ParseErrorKind};
use crate::options::ParseOptions;
use crate::output::Node;
use crate::token::{LexError, Lexer, Token, TokenBuffer, TokenStream};

use interpreter::Interpreter;

impl CompiledGrammar {
    /// Parse the entry production from `stream`
    pub fn parse<S: TokenStream + ?Sized>(
        &self,
        stream: &mut S,
        options: &ParseOptions,
    ) -> Result<Node, ParseError> {
        self.run(self.entry, stream, options)
    }

    /// Parse the entry production into `target`
    ///
    /// `target` is only written when the parse succeeds.
    pub fn parse_into<S: TokenStream + ?Sized>(
        &self,
        stream: &mut S,
        target: &mut Node,
        options: &ParseOptions,
    ) -> Result<(), ParseError> {
        *target = self.parse(stream, options)?;
        Ok(())
    }

    /// Parse a production other than the entry point
    pub fn parse_production<S: TokenStream + ?Sized>(
        &self,
        name: &str,
        stream: &mut S,
        options: &ParseOptions,
    ) -> Result<Node, ParseError> {
        match self.production_id(name) {
            Some(id) => self.run(id, stream, options),
            None => Err(ParseError::builder(ParseErrorKind::StructuralMismatch)
                .at(stream.position())
                .message(format!("grammar has no production named `{}`", name))
                .code(ErrorCode::E0513)
                .build()),
        }
    }

    /// Apply elision and token mappers configured at build time
    pub fn prepare(&self, tokens: Vec<Token>) -> Vec<Token> {
        let preprocess = &self.preprocess;
        tokens
            .into_iter()
            .filter(|token| !preprocess.elide.contains(&token.kind))
            .map(|token| {
                preprocess.mappers.iter().fold(token, |token, (kinds, map)| {
                    if kinds.is_empty() || kinds.contains(&token.kind) {
                        map(token)
                    } else {
                        token
                    }
                })
            })
            .collect()
    }

    /// Parse an already tokenized input after preprocessing it
    pub fn parse_tokens(
        &self,
        tokens: Vec<Token>,
        eof: Position,
        options: &ParseOptions,
    ) -> Result<Node, ParseError> {
        let mut buffer = TokenBuffer::new(self.prepare(tokens), eof);
        self.parse(&mut buffer, options)
    }

    /// Tokenize `input` with the built-in lexer, preprocess and parse it
    pub fn parse_str(&self, input: &str, options: &ParseOptions) -> Result<Node, ParseError> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .map_err(ParseError::from)?;
        let eof = lexer.end_position();
        self.parse_tokens(tokens, eof, options)
    }

    fn run<S: TokenStream + ?Sized>(
        &self,
        entry: ProductionId,
        stream: &mut S,
        options: &ParseOptions,
    ) -> Result<Node, ParseError> {
        let start = stream.snapshot();
        let start_position = stream.position();
        let mut interpreter = Interpreter::new(self, stream);
        let result = interpreter.production(entry);
        let name = &self.production(entry).name;

        let error = match result {
            Ok(node) if options.allows_trailing() || interpreter.input.at_eof() => {
                tracing::trace!(production = %name, "parse succeeded");
                return Ok(node);
            }
            Ok(_) => {
                let end = interpreter.input.snapshot();
                match interpreter.failures.deepest() {
                    // A deeper failure explains the leftover input better
                    Some(failure) if failure.depth > end => failure.clone().into_error(),
                    _ => trailing_error(&interpreter.input, name),
                }
            }
            Err(_) => match interpreter.failures.clone().into_deepest() {
                Some(failure) => failure.into_error(),
                None => ParseError::builder(ParseErrorKind::StructuralMismatch)
                    .at(start_position)
                    .production(Some(name.clone()))
                    .found(interpreter.input.found(0))
                    .build(),
            },
        };

        tracing::trace!(
            production = %name,
            position = %error.position,
            code = %error.code(),
            "parse failed"
        );
        interpreter.input.restore(start);
        Err(error)
    }
}

fn trailing_error<S: TokenStream + ?Sized>(stream: &S, production: &SmolStr) -> ParseError {
    let (position, found) = match stream.peek(0) {
        Some(token) => (token.pos, Some(token.text.clone())),
        None => (stream.position(), None),
    };
    let message = match &found {
        Some(text) => format!("unexpected trailing input {:?}", text.as_str()),
        None => "unexpected trailing input".to_string(),
    };
    ParseError::builder(ParseErrorKind::UnexpectedTrailing)
        .at(position)
        .message(message)
        .production(Some(production.clone()))
        .found(found)
        .hint(format!(
            "`{}` matched completely before this point; allow trailing input to ignore the rest",
            production
        ))
        .build()
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::builder(ParseErrorKind::Lexical)
            .at(err.pos)
            .message(format!("invalid character {:?}", err.text.as_str()))
            .found(Some(err.text))
            .build()
    }
}
