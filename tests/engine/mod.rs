//! Engine integration tests
//!
//! Parses driven end to end through `CompiledGrammar`:
//! - Behavioural properties (determinism, backtracking, furthest failure)
//! - Arithmetic expressions
//! - Parsing EBNF with a grammar of EBNF
//! - Sharing one compiled grammar across threads

pub mod tests_arithmetic;
pub mod tests_concurrency;
pub mod tests_ebnf;
pub mod tests_properties;
#[cfg(feature = "serde")]
pub mod tests_serde;
