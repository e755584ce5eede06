//! Parsing EBNF with a grammar of EBNF

use crate::helpers::grammars::*;
use crate::helpers::{parse, parse_ok};
use grammatic::{Node, ParseErrorKind};

fn productions(ebnf: &Node) -> Vec<&Node> {
    ebnf.children("productions").collect()
}

fn alternatives(production: &Node) -> Vec<&Node> {
    production
        .child("expression")
        .map(|expr| expr.children("alternatives").collect())
        .unwrap_or_default()
}

#[test]
fn test_parses_all_productions() {
    let grammar = compiled_ebnf();
    let ebnf = parse_ok(&grammar, EBNF_SOURCE);

    let names: Vec<_> = productions(&ebnf)
        .iter()
        .map(|p| p.text("name").unwrap_or_default())
        .collect();
    assert_eq!(
        names,
        ["Production", "Expression", "Alternative", "Term", "Group", "Option", "Repetition"]
    );
}

#[test]
fn test_first_production_structure() {
    let grammar = compiled_ebnf();
    let ebnf = parse_ok(&grammar, EBNF_SOURCE);
    let first = productions(&ebnf)[0];

    let alts = alternatives(first);
    assert_eq!(alts.len(), 1);
    let terms: Vec<_> = alts[0].children("terms").collect();
    assert_eq!(terms.len(), 4);

    assert_eq!(terms[0].text("name"), Some("name"));
    // Quoted literals arrive unquoted
    assert_eq!(terms[1].text("literal"), Some("="));
    let optional = terms[2].child("optional").unwrap();
    assert_eq!(alternatives_of(optional), [vec![Some("Expression")]]);
    assert_eq!(terms[3].text("literal"), Some("."));
}

fn alternatives_of(expression: &Node) -> Vec<Vec<Option<&str>>> {
    expression
        .children("alternatives")
        .map(|alt| alt.children("terms").map(|t| t.text("name")).collect())
        .collect()
}

#[test]
fn test_term_production_has_five_alternatives() {
    let grammar = compiled_ebnf();
    let ebnf = parse_ok(&grammar, EBNF_SOURCE);
    let term = productions(&ebnf)[3];
    assert_eq!(term.text("name"), Some("Term"));

    let alts = alternatives(term);
    assert_eq!(alts.len(), 5);

    let token_alt: Vec<_> = alts[1].children("terms").collect();
    assert_eq!(token_alt.len(), 2);
    assert_eq!(token_alt[0].text("name"), Some("token"));
    let range = token_alt[1].child("optional").unwrap();
    let inner: Vec<_> = range
        .children("alternatives")
        .flat_map(|alt| alt.children("terms"))
        .collect();
    assert_eq!(inner[0].text("literal"), Some("…"));
    assert_eq!(inner[1].text("name"), Some("token"));
}

#[test]
fn test_repetition_and_group() {
    let grammar = compiled_ebnf();
    let ebnf = parse_ok(&grammar, EBNF_SOURCE);

    let expression = productions(&ebnf)[1];
    let terms: Vec<_> = alternatives(expression)[0].children("terms").collect();
    let repeated = terms[1].child("repetition").unwrap();
    let inner: Vec<_> = repeated
        .children("alternatives")
        .flat_map(|alt| alt.children("terms"))
        .collect();
    assert_eq!(inner[0].text("literal"), Some("|"));
    assert_eq!(inner[1].text("name"), Some("Alternative"));

    let group = productions(&ebnf)[4];
    let terms: Vec<_> = alternatives(group)[0].children("terms").collect();
    assert_eq!(terms.len(), 3);
    assert!(terms[1].child("group").is_none());
    assert_eq!(terms[1].text("name"), Some("Expression"));
}

#[test]
fn test_empty_production_body() {
    let grammar = compiled_ebnf();
    let ebnf = parse_ok(&grammar, "Empty = .");
    let empty = productions(&ebnf)[0];
    assert_eq!(empty.text("name"), Some("Empty"));
    assert!(empty.child("expression").is_none());
}

#[test]
fn test_missing_terminator() {
    let grammar = compiled_ebnf();
    let err = parse(&grammar, "A = b \"c\"\nB = d .").unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::StructuralMismatch);
    assert_eq!(err.position.line, 2);
    assert_eq!(err.found.as_deref(), Some("="));
    // `B` was taken as another term, so the terminator is missing before `=`
    assert!(err.expected.iter().any(|e| e == "\".\""), "{:?}", err.expected);
    assert!(err.expected.iter().any(|e| e == "\"|\""), "{:?}", err.expected);
}
