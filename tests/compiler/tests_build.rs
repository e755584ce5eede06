//! Building grammars through the public API

use rstest::rstest;

use crate::helpers::grammars::*;
use grammatic::grammar::expr::*;
use grammatic::{BuildOptions, CompileError, ErrorCode, Grammar, Shape};

#[test]
fn test_arithmetic_renders_as_ebnf() {
    let grammar = arithmetic_with_lookahead(1);
    assert_eq!(
        grammar.to_string(),
        "Expr = @terms=Term { @ops=( \"+\" | \"-\" ) @terms=Term } .\n\
         Term = @value=<Int> | \"(\" @sub=Expr \")\" ."
    );
}

#[test]
fn test_ebnf_grammar_builds() {
    let grammar = compiled_ebnf();
    let names: Vec<_> = grammar.productions().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["EBNF", "Production", "Expression", "Sequence", "Term"]);
    assert_eq!(grammar.production(grammar.entry()).name, "EBNF");
}

#[test]
fn test_build_is_repeatable() {
    let grammar = arithmetic();
    let a = grammar.build(BuildOptions::for_default_lexer()).unwrap();
    let b = grammar.build(BuildOptions::for_default_lexer()).unwrap();
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.node_count(), b.node_count());
}

#[rstest]
#[case::left_recursive(
    Grammar::new().production("E", alt([seq([reference("E"), lit("+")]), lit("x")])),
    ErrorCode::E0504
)]
#[case::unknown_token_kind(Grammar::new().production("A", token("Keyword")), ErrorCode::E0507)]
#[case::bare_capture_of_int(
    Grammar::new()
        .shape(Shape::new("A").int("n"))
        .production("A", capture_node("n")),
    ErrorCode::E0503
)]
fn test_rejected_grammars(#[case] grammar: Grammar, #[case] code: ErrorCode) {
    let err = grammar.build(BuildOptions::for_default_lexer()).unwrap_err();
    assert_eq!(err.code(), code, "{}", err);
}

#[test]
fn test_left_recursion_names_the_cycle() {
    let err = Grammar::new()
        .production("E", alt([seq([reference("T"), lit("+")]), lit("x")]))
        .production("T", reference("E"))
        .build(BuildOptions::for_default_lexer())
        .unwrap_err();
    assert_eq!(err.to_string(), "left recursion: E -> T -> E");
    assert!(matches!(err, CompileError::LeftRecursion { .. }));
}
