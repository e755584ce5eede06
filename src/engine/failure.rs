//! Furthest-progress failure tracking
//!
//! Every failed leaf reports here. The failure that got furthest into the
//! input wins; failures at the same depth merge their expected lists and
//! keep the first reported context, so declaration order breaks ties.

use smol_str::SmolStr;

use crate::base::Position;
use crate::errors::{ErrorCode, ParseError, ParseErrorKind};
use crate::token::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    /// Input did not match the grammar
    Mismatch,
    /// Input matched but a captured value could not be converted
    Conversion,
    /// A custom parser rejected the input
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub(crate) kind: FailureKind,
    /// How far into the input the failure happened
    pub(crate) depth: Cursor,
    pub(crate) position: Position,
    pub(crate) found: Option<SmolStr>,
    pub(crate) expected: Vec<SmolStr>,
    pub(crate) production: Option<SmolStr>,
    pub(crate) message: Option<String>,
}

impl Failure {
    pub(crate) fn mismatch(depth: Cursor, position: Position, found: Option<SmolStr>) -> Self {
        Self {
            kind: FailureKind::Mismatch,
            depth,
            position,
            found,
            expected: Vec::new(),
            production: None,
            message: None,
        }
    }

    pub(crate) fn expecting(mut self, expected: impl IntoIterator<Item = SmolStr>) -> Self {
        self.expected.extend(expected);
        self
    }

    pub(crate) fn with_kind(mut self, kind: FailureKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn in_production(mut self, production: Option<SmolStr>) -> Self {
        self.production = production;
        self
    }

    pub(crate) fn into_error(self) -> ParseError {
        let kind = match self.kind {
            FailureKind::Mismatch | FailureKind::Conversion => ParseErrorKind::StructuralMismatch,
            FailureKind::Custom => ParseErrorKind::CustomParseFailure,
        };
        let mut builder = ParseError::builder(kind)
            .at(self.position)
            .production(self.production)
            .expected(self.expected)
            .found(self.found);
        if let Some(message) = self.message {
            builder = builder.message(message);
        }
        if self.kind == FailureKind::Conversion {
            builder = builder.code(ErrorCode::E0204);
        }
        builder.build()
    }
}

/// The deepest failure seen so far in one parse
#[derive(Debug, Clone, Default)]
pub(crate) struct FailureTracker {
    deepest: Option<Failure>,
}

impl FailureTracker {
    pub(crate) fn record(&mut self, failure: Failure) {
        match &mut self.deepest {
            Some(deepest) if failure.depth < deepest.depth => {}
            Some(deepest) if failure.depth == deepest.depth => {
                for expected in failure.expected {
                    if !deepest.expected.contains(&expected) {
                        deepest.expected.push(expected);
                    }
                }
            }
            _ => self.deepest = Some(failure),
        }
    }

    pub(crate) fn deepest(&self) -> Option<&Failure> {
        self.deepest.as_ref()
    }

    pub(crate) fn into_deepest(self) -> Option<Failure> {
        self.deepest
    }
}
