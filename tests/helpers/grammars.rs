//! Grammars used across the integration suites

use grammatic::grammar::expr::*;
use grammatic::token::mappers;
use grammatic::{BuildOptions, CompiledGrammar, Grammar, Shape};

/// Additive arithmetic with parenthesized sub-expressions
///
/// ```text
/// Expr = @terms=Term { @ops=( "+" | "-" ) @terms=Term } .
/// Term = @value=<Int> | "(" @sub=Expr ")" .
/// ```
pub fn arithmetic() -> Grammar {
    Grammar::new()
        .shape(Shape::new("Expr").nodes("terms", "Term").texts("ops"))
        .shape(Shape::new("Term").int("value").node("sub", "Expr"))
        .production(
            "Expr",
            seq([
                capture_node("terms"),
                many(seq([
                    capture("ops", alt([lit("+"), lit("-")])),
                    capture_node("terms"),
                ])),
            ]),
        )
        .production(
            "Term",
            alt([
                capture("value", token("Int")),
                seq([lit("("), capture_node("sub"), lit(")")]),
            ]),
        )
}

pub fn arithmetic_with_lookahead(depth: usize) -> CompiledGrammar {
    arithmetic()
        .build(BuildOptions::for_default_lexer().lookahead(depth))
        .unwrap()
}

/// Grammar of EBNF itself, producing one `Production` node per rule
pub fn ebnf() -> Grammar {
    Grammar::new()
        .shape(Shape::new("EBNF").nodes("productions", "Production"))
        .shape(Shape::new("Production").text("name").node("expression", "Expression"))
        .shape(Shape::new("Expression").nodes("alternatives", "Sequence"))
        .shape(Shape::new("Sequence").nodes("terms", "Term"))
        .shape(
            Shape::new("Term")
                .text("name")
                .text("literal")
                .text("to")
                .node("group", "Expression")
                .node("optional", "Expression")
                .node("repetition", "Expression"),
        )
        .production("EBNF", many(capture_node("productions")))
        .production(
            "Production",
            seq([
                capture("name", token("Ident")),
                lit_of("=", "Punct"),
                opt(capture_node("expression")),
                lit_of(".", "Punct"),
            ]),
        )
        .production(
            "Expression",
            seq([
                capture_node("alternatives"),
                many(seq([lit_of("|", "Punct"), capture_node("alternatives")])),
            ]),
        )
        .production("Sequence", some(capture_node("terms")))
        .production(
            "Term",
            alt([
                capture("name", token("Ident")),
                seq([
                    capture("literal", token("String")),
                    opt(seq([lit_of("…", "String"), capture("to", token("String"))])),
                ]),
                seq([lit_of("(", "Punct"), capture("group", reference("Expression")), lit_of(")", "Punct")]),
                seq([lit_of("[", "Punct"), capture("optional", reference("Expression")), lit_of("]", "Punct")]),
                seq([lit_of("{", "Punct"), capture("repetition", reference("Expression")), lit_of("}", "Punct")]),
            ]),
        )
}

pub fn compiled_ebnf() -> CompiledGrammar {
    ebnf()
        .build(BuildOptions::for_default_lexer().map(["String"], mappers::unquote))
        .unwrap()
}

pub const EBNF_SOURCE: &str = r#"
Production  = name "=" [ Expression ] "." .
  Expression  = Alternative { "|" Alternative } .
  Alternative = Term { Term } .
  Term        = name | token [ "…" token ] | Group | Option | Repetition .
  Group       = "(" Expression ")" .
  Option      = "[" Expression "]" .
  Repetition  = "{" Expression "}" .
"#;
