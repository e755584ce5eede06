//! Error handling for grammar construction and parsing
//!
//! - Categorized error codes for filtering and documentation
//! - Compile errors that reject a grammar before any parse runs
//! - Parse errors carrying the furthest-progress failure position

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{
    CompileError, CustomParseError, ParseError, ParseErrorBuilder, ParseErrorKind,
};
