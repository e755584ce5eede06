//! One compiled grammar shared by concurrent parses

use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::helpers::grammars::*;
use grammatic::{CompiledGrammar, Node, ParseError, ParseOptions};

static ARITHMETIC: Lazy<CompiledGrammar> = Lazy::new(|| arithmetic_with_lookahead(2));

fn inputs() -> Vec<String> {
    (0..200)
        .map(|i| match i % 4 {
            0 => format!("{} + {}", i, i + 1),
            1 => format!("({} - {}) + ({})", i, i, i * 3),
            2 => format!("{} + (", i),
            _ => format!("{} {}", i, i),
        })
        .collect()
}

#[test]
fn test_parallel_parses_match_sequential() {
    let options = ParseOptions::default();
    let inputs = inputs();

    let sequential: Vec<Result<Node, ParseError>> =
        inputs.iter().map(|i| ARITHMETIC.parse_str(i, &options)).collect();
    let parallel: Vec<Result<Node, ParseError>> =
        inputs.par_iter().map(|i| ARITHMETIC.parse_str(i, &options)).collect();

    assert_eq!(parallel, sequential);
    assert_eq!(sequential.iter().filter(|r| r.is_ok()).count(), 100);
}

#[test]
fn test_compiled_grammar_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledGrammar>();
}
