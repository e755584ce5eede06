//! Arithmetic expression parsing

use rstest::rstest;

use crate::helpers::grammars::*;
use crate::helpers::parse_ok;
use grammatic::{Node, ParseErrorKind, Position};

fn values(expr: &Node) -> Vec<Option<i64>> {
    expr.children("terms").map(|term| term.int("value")).collect()
}

#[test]
fn test_flat_expression() {
    let grammar = arithmetic_with_lookahead(1);
    let expr = parse_ok(&grammar, "1 + 2 - 3");

    assert_eq!(expr.shape, "Expr");
    assert_eq!(values(&expr), [Some(1), Some(2), Some(3)]);
    assert_eq!(expr.texts("ops"), ["+", "-"]);
}

#[test]
fn test_single_term_has_empty_ops() {
    let grammar = arithmetic_with_lookahead(1);
    let expr = parse_ok(&grammar, "42");

    assert_eq!(values(&expr), [Some(42)]);
    // Sequence fields are present even when nothing was captured
    assert!(expr.get("ops").is_some());
    assert!(expr.texts("ops").is_empty());
}

#[test]
fn test_parenthesized_sub_expression() {
    let grammar = arithmetic_with_lookahead(1);
    let expr = parse_ok(&grammar, "2 - (3 + 4)");

    assert_eq!(expr.texts("ops"), ["-"]);
    let terms: Vec<_> = expr.children("terms").collect();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0].int("value"), Some(2));
    assert_eq!(terms[1].int("value"), None);

    let sub = terms[1].child("sub").unwrap();
    assert_eq!(sub.shape, "Expr");
    assert_eq!(values(sub), [Some(3), Some(4)]);
    assert_eq!(sub.texts("ops"), ["+"]);
    assert_eq!(sub.span.start, Position::new(5, 1, 6));
    assert_eq!(sub.span.end, Position::new(10, 1, 11));
}

#[test]
fn test_deep_nesting() {
    let grammar = arithmetic_with_lookahead(1);
    let expr = parse_ok(&grammar, "((((1))))");

    let mut depth = 0;
    let mut current = &expr;
    while let Some(sub) = current.children("terms").next().and_then(|t| t.child("sub")) {
        depth += 1;
        current = sub;
    }
    assert_eq!(depth, 4);
    assert_eq!(values(current), [Some(1)]);
}

#[rstest]
#[case::dangling_operator("1 +", Position::new(3, 1, 4), None)]
#[case::unclosed_paren("(1 + 2", Position::new(6, 1, 7), None)]
#[case::bad_term("1 + *", Position::new(4, 1, 5), Some("*"))]
fn test_malformed_expressions(
    #[case] input: &str,
    #[case] position: Position,
    #[case] found: Option<&str>,
) {
    let grammar = arithmetic_with_lookahead(1);
    let err = grammar.parse_str(input, &Default::default()).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::StructuralMismatch, "{}", err.format());
    assert_eq!(err.position, position);
    assert_eq!(err.found.as_deref(), found);
}

#[test]
fn test_unclosed_paren_expects_operator_or_close() {
    let grammar = arithmetic_with_lookahead(1);
    let err = grammar.parse_str("(1 + 2", &Default::default()).unwrap_err();

    for expected in ["\"+\"", "\"-\"", "\")\""] {
        assert!(
            err.expected.iter().any(|e| e == expected),
            "missing {} in {:?}",
            expected,
            err.expected
        );
    }
}
