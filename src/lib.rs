//! # grammatic
//!
//! Grammar compiler and backtracking parser engine driven by declarative
//! output shapes.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine    → Speculative interpreter, capture journal, furthest failure
//!   ↓
//! compiler  → Node arena, reference resolution, analysis, lookahead
//!   ↓
//! grammar   → Declarative productions, expressions, output shapes
//!   ↓
//! options / output → Build and parse options, populated output tree
//!   ↓
//! token     → Token, TokenStream, default Logos lexer, mappers
//!   ↓
//! errors    → Error codes, CompileError, ParseError
//!   ↓
//! base      → Primitives (Position, Span, TextSize)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use grammatic::grammar::expr::*;
//! use grammatic::{BuildOptions, Grammar, ParseOptions, Shape};
//!
//! let grammar = Grammar::new()
//!     .shape(Shape::new("Expr").nodes("terms", "Term").texts("ops"))
//!     .shape(Shape::new("Term").int("value"))
//!     .production("Expr", seq([
//!         capture_node("terms"),
//!         many(seq([capture("ops", alt([lit("+"), lit("-")])), capture_node("terms")])),
//!     ]))
//!     .production("Term", capture("value", token("Int")))
//!     .build(BuildOptions::for_default_lexer())?;
//!
//! let expr = grammar.parse_str("1 + 2 - 3", &ParseOptions::default())?;
//! assert_eq!(expr.texts("ops"), ["+", "-"]);
//! ```

// ============================================================================
// MODULES (dependency order: base → errors → token → grammar → compiler → engine)
// ============================================================================

/// Foundation types: Position, Span, TextSize
pub mod base;

/// Error codes, compile errors and parse errors
pub mod errors;

/// Tokens, the token stream boundary and the default lexer
pub mod token;

/// Declarative grammar description
pub mod grammar;

/// Grammar compiler producing the executable node graph
pub mod compiler;

/// Parser engine entry points on `CompiledGrammar`
mod engine;

/// Build-time and per-parse options
pub mod options;

/// Populated output tree
pub mod output;

// Re-export the types most callers need
pub use compiler::CompiledGrammar;
pub use errors::{CompileError, CustomParseError, ErrorCode, ParseError, ParseErrorKind};
pub use grammar::{Cardinality, Expr, Field, FieldType, Grammar, Shape};
pub use options::{BuildOptions, ParseOptions};
pub use output::{Node, Value};

// Re-export foundation types
pub use base::{Position, Span, TextRange, TextSize};
pub use token::{Cursor, Token, TokenBuffer, TokenStream};
