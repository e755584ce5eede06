//! Shared grammars and parse helpers for integration tests

pub mod grammars;

use grammatic::{CompiledGrammar, Node, ParseError, ParseOptions};

/// Parse with default options
pub fn parse(grammar: &CompiledGrammar, input: &str) -> Result<Node, ParseError> {
    grammar.parse_str(input, &ParseOptions::default())
}

/// Parse and panic with the formatted error on failure
pub fn parse_ok(grammar: &CompiledGrammar, input: &str) -> Node {
    match parse(grammar, input) {
        Ok(node) => node,
        Err(err) => panic!("failed to parse {:?}:\n{}", input, err.format()),
    }
}
