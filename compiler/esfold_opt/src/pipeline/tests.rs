#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use esfold_ir::{estree, source};

/// `x = true;`
fn assign_true() -> esfold_ir::Ast {
    let program = json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "AssignmentExpression",
                "operator": "=",
                "left": { "type": "Identifier", "name": "x" },
                "right": { "type": "Literal", "value": true },
            },
        }],
    });
    estree::from_json(&program).unwrap()
}

#[test]
fn test_default_options() {
    let options = FoldOptions::default();
    assert_eq!(options.max_rounds, 16);
    assert!(options.minify_booleans);
    assert_eq!(FoldOptions::from_json("{}").unwrap(), options);
}

#[test]
fn test_options_from_json() {
    let text = r#"{ "max_rounds": 3, "minify_booleans": false }"#;
    let options = FoldOptions::from_json(text).unwrap();
    assert_eq!(
        options,
        FoldOptions::default()
            .with_max_rounds(3)
            .with_minify_booleans(false)
    );
    assert!(FoldOptions::from_json(r#"{ "rounds": 3 }"#).is_err());
    assert!(FoldOptions::from_json(r#"{ "max_rounds": -1 }"#).is_err());
}

#[test]
fn test_stats_serialize() {
    let mut stats = FoldStats {
        rounds: 2,
        ..FoldStats::default()
    };
    stats.record("loops");
    stats.record("binary-expr");
    stats.record("loops");
    assert_eq!(stats.hits("loops"), 2);
    assert_eq!(stats.hits("unary-expr"), 0);
    assert_eq!(
        serde_json::to_value(&stats).unwrap(),
        json!({ "rounds": 2, "rewrites": 3, "rules": { "binary-expr": 1, "loops": 2 } })
    );
}

#[test]
fn test_empty_program_converges_in_one_round() {
    let mut ast = esfold_ir::Ast::new();
    let stats = fold(&mut ast).unwrap();
    assert_eq!(stats.rounds, 1);
    assert_eq!(stats.rewrites, 0);
}

#[test]
fn test_minify_pass_is_optional() {
    let mut ast = assign_true();
    let optimizer = Optimizer::new(FoldOptions::default().with_minify_booleans(false));
    optimizer.run(&mut ast).unwrap();
    assert_eq!(source::render(&ast), "x = true;");

    let mut ast = assign_true();
    let stats = fold(&mut ast).unwrap();
    assert_eq!(source::render(&ast), "x = !0;");
    assert_eq!(stats.hits("boolean-literals"), 1);
    assert_eq!(stats.rounds, 2);
}

#[test]
fn test_round_limit() {
    let mut ast = assign_true();
    let stats = Optimizer::new(FoldOptions::default().with_max_rounds(0))
        .run(&mut ast)
        .unwrap();
    assert_eq!(stats.rounds, 0);
    assert_eq!(source::render(&ast), "x = true;");
}
