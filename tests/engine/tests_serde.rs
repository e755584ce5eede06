//! JSON form of parse output

use crate::helpers::grammars::*;
use crate::helpers::parse_ok;

#[test]
fn test_node_serializes_fields_in_declaration_order() {
    let grammar = arithmetic_with_lookahead(1);
    let expr = parse_ok(&grammar, "1 + 2");

    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(json["shape"], "Expr");
    assert_eq!(json["fields"]["ops"], serde_json::json!(["+"]));
    assert_eq!(json["fields"]["terms"][1]["fields"]["value"], 2);
    assert_eq!(json["span"]["start"]["line"], 1);

    let text = serde_json::to_string(&expr).unwrap();
    let terms = text.find("\"terms\"").unwrap();
    let ops = text.find("\"ops\"").unwrap();
    assert!(terms < ops, "{}", text);
}
