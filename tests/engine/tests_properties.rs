//! Behavioural properties of the parser engine

use rstest::rstest;

use crate::helpers::grammars::*;
use crate::helpers::{parse, parse_ok};
use grammatic::grammar::expr::*;
use grammatic::token::tokenize;
use grammatic::{
    BuildOptions, CompileError, Grammar, ParseErrorKind, ParseOptions, Position, Shape, TokenStream,
};

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn test_repeated_parses_are_identical() {
    let grammar = arithmetic_with_lookahead(1);
    let first = parse(&grammar, "1 + (2 - 3) - 4");
    for _ in 0..10 {
        assert_eq!(parse(&grammar, "1 + (2 - 3) - 4"), first);
    }

    let failure = parse(&grammar, "1 + (2 -");
    assert!(failure.is_err());
    assert_eq!(parse(&grammar, "1 + (2 -"), failure);
}

#[rstest]
#[case("1 + 2 - 3")]
#[case("(1) - ((2 + 3) - 4)")]
fn test_lookahead_depth_does_not_change_result(#[case] input: &str) {
    let expected = parse_ok(&arithmetic_with_lookahead(1), input);
    for depth in [2, 4] {
        let node = parse_ok(&arithmetic_with_lookahead(depth), input);
        assert_eq!(node, expected, "lookahead {}", depth);
    }
}

// =============================================================================
// BACKTRACKING
// =============================================================================

#[rstest]
#[case::lookahead_one(1)]
#[case::lookahead_three(3)]
fn test_failed_branch_leaves_no_captures(#[case] depth: usize) {
    let grammar = Grammar::new()
        .shape(Shape::new("Decl").text("name").texts("parts").text("kind"))
        .production(
            "Decl",
            alt([
                seq([
                    capture("name", token("Ident")),
                    capture("parts", token("Ident")),
                    lit(":"),
                    capture("kind", lit("fn")),
                ]),
                seq([
                    capture("name", token("Ident")),
                    capture("parts", token("Ident")),
                    lit(";"),
                ]),
            ]),
        )
        .build(BuildOptions::for_default_lexer().lookahead(depth))
        .unwrap();

    let node = parse_ok(&grammar, "a b ;");
    assert_eq!(node.text("name"), Some("a"));
    assert_eq!(node.texts("parts"), ["b"]);
    assert_eq!(node.text("kind"), None);
}

// =============================================================================
// FURTHEST FAILURE
// =============================================================================

#[rstest]
#[case::long_branch_first(false)]
#[case::long_branch_last(true)]
fn test_error_reports_furthest_progress(
    #[case] reversed: bool,
    #[values(1, 2, 4)] depth: usize,
) {
    let mut branches = vec![
        seq([lit("a"), lit("b"), lit("c"), lit("d")]),
        seq([lit("a"), lit("e")]),
    ];
    if reversed {
        branches.reverse();
    }
    let grammar = Grammar::new()
        .production("P", alt(branches))
        .build(BuildOptions::for_default_lexer().lookahead(depth))
        .unwrap();

    // At depth 4 both branches are turned away by lookahead alone
    let err = parse(&grammar, "a b c z").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::StructuralMismatch);
    assert_eq!(err.position, Position::new(6, 1, 7));
    assert_eq!(err.found.as_deref(), Some("z"));
    assert_eq!(err.expected, ["\"d\""]);
    assert_eq!(err.production.as_deref(), Some("P"));
}

#[test]
fn test_failure_inside_nested_production_names_it() {
    let grammar = Grammar::new()
        .production("Outer", seq([lit("begin"), reference("Inner"), lit("end")]))
        .production("Inner", seq([lit("x"), lit("y")]))
        .build(BuildOptions::for_default_lexer())
        .unwrap();

    let err = parse(&grammar, "begin x z end").unwrap_err();
    assert_eq!(err.production.as_deref(), Some("Inner"));
    assert_eq!(err.expected, ["\"y\""]);
    assert!(err.format().contains("while parsing Inner"));
}

// =============================================================================
// TRAILING INPUT
// =============================================================================

fn pair() -> grammatic::CompiledGrammar {
    Grammar::new()
        .production("Pair", seq([lit("A"), lit("B")]))
        .build(BuildOptions::for_default_lexer())
        .unwrap()
}

#[test]
fn test_trailing_input_is_rejected() {
    let err = parse(&pair(), "A B EXTRA").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedTrailing);
    assert!(err.is_trailing());
    assert_eq!(err.position, Position::new(4, 1, 5));
    assert_eq!(err.found.as_deref(), Some("EXTRA"));
    assert!(err.hint.is_some());
}

#[test]
fn test_trailing_input_allowed_stays_unconsumed() {
    let grammar = pair();
    let mut tokens = tokenize("A B EXTRA").unwrap();
    let options = ParseOptions::new().allow_trailing(true);

    grammar.parse(&mut tokens, &options).unwrap();
    let rest: Vec<_> = tokens.remaining().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rest, ["EXTRA"]);
    assert!(!tokens.at_eof());
}

// =============================================================================
// REPETITION
// =============================================================================

#[test]
fn test_nested_repetition_of_nullable_terminates() {
    let grammar = Grammar::new()
        .shape(Shape::new("List").texts("items"))
        .production("List", many(many(opt(capture("items", token("Ident"))))))
        .build(BuildOptions::for_default_lexer())
        .unwrap();

    assert_eq!(parse_ok(&grammar, "a b c").texts("items"), ["a", "b", "c"]);
    assert!(parse_ok(&grammar, "").texts("items").is_empty());
    assert!(parse(&grammar, "a 1").is_err());
}

#[test]
fn test_repetition_backs_off_a_partial_iteration() {
    let grammar = Grammar::new()
        .shape(Shape::new("Args").texts("items"))
        .production(
            "Args",
            seq([
                capture("items", token("Ident")),
                many(seq([lit(","), capture("items", token("Ident"))])),
                opt(lit(",")),
            ]),
        )
        .build(BuildOptions::for_default_lexer())
        .unwrap();

    let node = parse_ok(&grammar, "a, b, c,");
    assert_eq!(node.texts("items"), ["a", "b", "c"]);
}

// =============================================================================
// CASE INSENSITIVITY
// =============================================================================

#[rstest]
#[case::exact("Foo", true, true)]
#[case::lower("foo", true, false)]
#[case::upper("FOO", true, false)]
fn test_case_insensitive_literals(
    #[case] input: &str,
    #[case] insensitive_ok: bool,
    #[case] sensitive_ok: bool,
) {
    let grammar = Grammar::new().production("Kw", lit("Foo"));

    let insensitive = grammar
        .build(BuildOptions::for_default_lexer().case_insensitive(["Ident"]))
        .unwrap();
    let sensitive = grammar.build(BuildOptions::for_default_lexer()).unwrap();

    assert_eq!(parse(&insensitive, input).is_ok(), insensitive_ok);
    assert_eq!(parse(&sensitive, input).is_ok(), sensitive_ok);
}

// =============================================================================
// COMPILE-TIME REJECTION
// =============================================================================

#[test]
fn test_unresolved_reference_fails_to_build() {
    let err = Grammar::new()
        .production("A", seq([lit("x"), reference("Missing")]))
        .build(BuildOptions::for_default_lexer())
        .unwrap_err();

    assert_eq!(
        err,
        CompileError::UnresolvedReference {
            production: "A".into(),
            name: "Missing".into(),
        }
    );
}
