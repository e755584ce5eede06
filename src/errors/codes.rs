//! Error code definitions for grammar and parse diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (grammar mismatch, trailing input)
//! - E03xx: Custom parser errors
//! - E05xx: Grammar compilation errors

use std::fmt;

/// Error codes for compile and parse diagnostics
///
/// Each error code represents a specific category of failure,
/// enabling filtering and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Token did not match any viable alternative
    E0201,
    /// Input ended while the grammar expected more
    E0202,
    /// Grammar matched but input remains
    E0203,
    /// Captured text could not be converted to the field type
    E0204,

    // =========================================================================
    // E03xx: Custom parser errors
    // =========================================================================
    /// A registered custom parser reported failure
    E0301,

    // =========================================================================
    // E05xx: Grammar compilation errors
    // =========================================================================
    /// Reference to an undeclared production
    E0501,
    /// Capture into a field the shape does not declare
    E0502,
    /// Capture whose subtree cannot produce the field's type
    E0503,
    /// Left recursion that recursive descent cannot terminate
    E0504,
    /// Production with no terminating derivation
    E0505,
    /// Lookahead depth out of range
    E0506,
    /// Malformed or unknown token kind name
    E0507,
    /// Reference to an undeclared shape
    E0508,
    /// Production or shape declared twice
    E0509,
    /// Node capture whose shape has no production or custom parser
    E0510,
    /// Node capture whose shape is bound to several productions
    E0511,
    /// Literal with empty text
    E0512,
    /// Grammar has no usable entry production
    E0513,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0301 => "E0301",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0504 => "E0504",
            Self::E0505 => "E0505",
            Self::E0506 => "E0506",
            Self::E0507 => "E0507",
            Self::E0508 => "E0508",
            Self::E0509 => "E0509",
            Self::E0510 => "E0510",
            Self::E0511 => "E0511",
            Self::E0512 => "E0512",
            Self::E0513 => "E0513",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 => "syntax error",
            Self::E0301 => "custom parser error",
            Self::E0501
            | Self::E0502
            | Self::E0503
            | Self::E0504
            | Self::E0505
            | Self::E0506
            | Self::E0507
            | Self::E0508
            | Self::E0509
            | Self::E0510
            | Self::E0511
            | Self::E0512
            | Self::E0513 => "grammar error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0201 => "unexpected token",
            Self::E0202 => "unexpected end of input",
            Self::E0203 => "unexpected trailing input",
            Self::E0204 => "invalid capture value",
            Self::E0301 => "custom parser failed",
            Self::E0501 => "unresolved reference",
            Self::E0502 => "unknown capture field",
            Self::E0503 => "capture type mismatch",
            Self::E0504 => "left recursion",
            Self::E0505 => "production has no base case",
            Self::E0506 => "invalid lookahead depth",
            Self::E0507 => "invalid token kind",
            Self::E0508 => "unknown shape",
            Self::E0509 => "duplicate declaration",
            Self::E0510 => "no production for node capture",
            Self::E0511 => "ambiguous production for node capture",
            Self::E0512 => "empty literal",
            Self::E0513 => "no entry production",
        }
    }

    /// Check if this code is reported while building a grammar
    pub fn is_compile_time(&self) -> bool {
        matches!(
            self,
            Self::E0501
                | Self::E0502
                | Self::E0503
                | Self::E0504
                | Self::E0505
                | Self::E0506
                | Self::E0507
                | Self::E0508
                | Self::E0509
                | Self::E0510
                | Self::E0511
                | Self::E0512
                | Self::E0513
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
