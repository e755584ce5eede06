//! Error types for grammar construction and parsing
//!
//! - [`CompileError`]: fatal to `Grammar::build`, never partially succeeds
//! - [`ParseError`]: the single terminal error of a failed parse, carrying
//!   position, production context and the expected/found tokens
//! - [`CustomParseError`]: returned by registered custom parsers

use smol_str::SmolStr;
use thiserror::Error;

use super::codes::ErrorCode;
use crate::base::Position;

/// Errors that can occur while compiling a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The grammar declares no productions.
    #[error("grammar declares no productions")]
    EmptyGrammar,

    /// The requested entry production does not exist.
    #[error("entry production `{0}` is not declared")]
    UnknownEntry(SmolStr),

    /// A production name was declared twice.
    #[error("production `{0}` is declared more than once")]
    DuplicateProduction(SmolStr),

    /// A shape name was declared twice.
    #[error("shape `{0}` is declared more than once")]
    DuplicateShape(SmolStr),

    /// A production or field refers to an undeclared shape.
    #[error("`{context}` refers to undeclared shape `{shape}`")]
    UnknownShape { context: SmolStr, shape: SmolStr },

    /// Reference to an undeclared production.
    #[error("production `{production}` references undeclared production `{name}`")]
    UnresolvedReference { production: SmolStr, name: SmolStr },

    /// Capture into a field the production's shape does not declare.
    #[error("production `{production}` captures into unknown field `{field}` of shape `{shape}`")]
    UnknownField {
        production: SmolStr,
        shape: SmolStr,
        field: SmolStr,
    },

    /// Capture whose subtree cannot produce the field's type.
    #[error("production `{production}` captures {found} into field `{field}` of type {expected}")]
    CaptureTypeMismatch {
        production: SmolStr,
        field: SmolStr,
        expected: String,
        found: String,
    },

    /// Node capture whose shape has neither a production nor a custom parser.
    #[error("field `{field}` of production `{production}` needs a production for shape `{shape}`")]
    MissingNodeProduction {
        production: SmolStr,
        field: SmolStr,
        shape: SmolStr,
    },

    /// Node capture whose shape is bound to several productions.
    #[error("shape `{shape}` is produced by several productions ({candidates}); capture `{field}` in `{production}` must name one")]
    AmbiguousNodeProduction {
        production: SmolStr,
        field: SmolStr,
        shape: SmolStr,
        candidates: String,
    },

    /// Literal with empty text.
    #[error("production `{0}` contains an empty literal")]
    EmptyLiteral(SmolStr),

    /// Left recursion that recursive descent can never terminate.
    #[error("left recursion: {}", .cycle.join(" -> "))]
    LeftRecursion { cycle: Vec<SmolStr> },

    /// Production that can never finish matching.
    #[error("production `{0}` has no base case and can never match")]
    NoBaseCase(SmolStr),

    /// Lookahead depth out of range.
    #[error("lookahead depth must be between 1 and {max} (got {depth})")]
    InvalidLookahead { depth: usize, max: usize },

    /// Malformed or unknown token kind name.
    #[error("invalid token kind `{0}`")]
    InvalidTokenKind(SmolStr),
}

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyGrammar | Self::UnknownEntry(_) => ErrorCode::E0513,
            Self::DuplicateProduction(_) | Self::DuplicateShape(_) => ErrorCode::E0509,
            Self::UnknownShape { .. } => ErrorCode::E0508,
            Self::UnresolvedReference { .. } => ErrorCode::E0501,
            Self::UnknownField { .. } => ErrorCode::E0502,
            Self::CaptureTypeMismatch { .. } => ErrorCode::E0503,
            Self::MissingNodeProduction { .. } => ErrorCode::E0510,
            Self::AmbiguousNodeProduction { .. } => ErrorCode::E0511,
            Self::EmptyLiteral(_) => ErrorCode::E0512,
            Self::LeftRecursion { .. } => ErrorCode::E0504,
            Self::NoBaseCase(_) => ErrorCode::E0505,
            Self::InvalidLookahead { .. } => ErrorCode::E0506,
            Self::InvalidTokenKind(_) => ErrorCode::E0507,
        }
    }
}

/// Failure reported by a registered custom parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CustomParseError {
    pub message: String,
}

impl CustomParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Distinguishes why a parse failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// No alternative or sequence matched
    StructuralMismatch,
    /// The grammar matched but input remains and trailing is disallowed
    UnexpectedTrailing,
    /// A registered custom parser reported failure
    CustomParseFailure,
    /// The default lexer could not tokenize the input
    Lexical,
}

/// The terminal error of a failed parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Position of the failing token, or end of input
    pub position: Position,
    /// Human-readable error message
    pub message: String,
    /// Production being matched when the failure occurred
    pub production: Option<SmolStr>,
    /// Descriptions of what would have been accepted
    pub expected: Vec<SmolStr>,
    /// Text of the offending token; `None` at end of input
    pub found: Option<SmolStr>,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
    /// Code overriding the one derived from `kind`
    explicit_code: Option<ErrorCode>,
}

impl ParseError {
    /// Create a builder for constructing an error of `kind`
    pub fn builder(kind: ParseErrorKind) -> ParseErrorBuilder {
        ParseErrorBuilder::new(kind)
    }

    /// Categorized error code
    pub fn code(&self) -> ErrorCode {
        if let Some(code) = self.explicit_code {
            return code;
        }
        match self.kind {
            ParseErrorKind::StructuralMismatch if self.found.is_none() => ErrorCode::E0202,
            ParseErrorKind::StructuralMismatch => ErrorCode::E0201,
            ParseErrorKind::UnexpectedTrailing => ErrorCode::E0203,
            ParseErrorKind::CustomParseFailure => ErrorCode::E0301,
            ParseErrorKind::Lexical => ErrorCode::E0101,
        }
    }

    pub fn is_trailing(&self) -> bool {
        self.kind == ParseErrorKind::UnexpectedTrailing
    }

    /// Format the error for display, including code and hint
    pub fn format(&self) -> String {
        let mut result = format!("{} at {}: {}", self.code(), self.position, self.message);
        if let Some(production) = &self.production {
            result.push_str(&format!("\n  while parsing {}", production));
        }
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        result
    }
}

/// Builder for parse errors; the message defaults to one derived from
/// `found`/`expected`
pub struct ParseErrorBuilder {
    kind: ParseErrorKind,
    position: Position,
    message: Option<String>,
    production: Option<SmolStr>,
    expected: Vec<SmolStr>,
    found: Option<SmolStr>,
    hint: Option<String>,
    code: Option<ErrorCode>,
}

impl ParseErrorBuilder {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            position: Position::start(),
            message: None,
            production: None,
            expected: Vec::new(),
            found: None,
            hint: None,
            code: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn production(mut self, production: Option<SmolStr>) -> Self {
        self.production = production;
        self
    }

    pub fn expected(mut self, expected: impl IntoIterator<Item = SmolStr>) -> Self {
        self.expected.extend(expected);
        self
    }

    pub fn found(mut self, found: Option<SmolStr>) -> Self {
        self.found = found;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Use a specific code instead of the one implied by the kind
    pub fn code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn build(self) -> ParseError {
        let message = self
            .message
            .unwrap_or_else(|| describe_mismatch(self.found.as_deref(), &self.expected));
        ParseError {
            kind: self.kind,
            position: self.position,
            message,
            production: self.production,
            expected: self.expected,
            found: self.found,
            hint: self.hint,
            explicit_code: self.code,
        }
    }
}

/// `unexpected "x" (expected "+" or <Int>)`
fn describe_mismatch(found: Option<&str>, expected: &[SmolStr]) -> String {
    let mut message = match found {
        Some(text) => format!("unexpected {:?}", text),
        None => "unexpected end of input".to_string(),
    };
    match expected {
        [] => {}
        [only] => message.push_str(&format!(" (expected {})", only)),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(SmolStr::as_str).collect();
            message.push_str(&format!(" (expected {} or {})", init.join(", "), last));
        }
    }
    message
}
