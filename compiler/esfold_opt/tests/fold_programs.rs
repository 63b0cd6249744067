//! Whole programs through the ESTree JSON boundary and the default optimizer.

#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use esfold_ir::{estree, source, Ast};
use esfold_opt::{fold, FoldOptions, FoldStats, Optimizer};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value as Json};

fn ident(name: &str) -> Json {
    json!({ "type": "Identifier", "name": name })
}

fn lit(value: Json) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn statement(expression: Json) -> Json {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

fn call(name: &str, arguments: Vec<Json>) -> Json {
    json!({ "type": "CallExpression", "callee": ident(name), "arguments": arguments })
}

fn binary(operator: &str, left: Json, right: Json) -> Json {
    json!({ "type": "BinaryExpression", "operator": operator, "left": left, "right": right })
}

fn block(body: Vec<Json>) -> Json {
    json!({ "type": "BlockStatement", "body": body })
}

fn parse(body: Vec<Json>) -> Ast {
    let ast = estree::from_json(&json!({ "type": "Program", "body": body })).unwrap();
    esfold_opt::init_tracing();
    ast
}

/// Fold with default options; returns the rendered program and the stats.
fn optimize(body: Vec<Json>) -> (String, FoldStats) {
    let mut ast = parse(body);
    let stats = fold(&mut ast).unwrap();
    (source::render(&ast), stats)
}

#[test]
fn test_arithmetic() {
    let (text, stats) = optimize(vec![statement(binary("+", lit(json!(1)), lit(json!(2))))]);
    assert_eq!(text, "3;");
    assert_eq!(stats.hits("binary-expr"), 1);
    assert_eq!(stats.rounds, 2);
}

#[test]
fn test_constant_if_with_empty_branch_vanishes() {
    let log = json!({
        "type": "CallExpression",
        "callee": {
            "type": "MemberExpression",
            "object": ident("console"),
            "property": ident("log"),
            "computed": false,
        },
        "arguments": [lit(json!(1))],
    });
    let (text, _) = optimize(vec![json!({
        "type": "IfStatement",
        "test": lit(json!(true)),
        "consequent": block(vec![]),
        "alternate": block(vec![statement(log)]),
    })]);
    assert_eq!(text, "");
}

#[test]
fn test_dead_loop_vanishes() {
    let (text, stats) = optimize(vec![json!({
        "type": "WhileStatement",
        "test": lit(json!(false)),
        "body": block(vec![statement(call("x", vec![]))]),
    })]);
    assert_eq!(text, "");
    assert_eq!(stats.hits("loops"), 1);
    assert_eq!(stats.hits("empty-statements"), 1);
}

#[test]
fn test_string_index_in_prologue_is_kept() {
    let index = json!({
        "type": "MemberExpression",
        "object": lit(json!("_")),
        "property": lit(json!(0)),
        "computed": true,
    });
    let (text, stats) = optimize(vec![statement(index.clone())]);
    assert_eq!(text, r#""_"[0];"#);
    assert_eq!(stats.rewrites, 0);

    let assignment = json!({
        "type": "AssignmentExpression",
        "operator": "=",
        "left": ident("x"),
        "right": index,
    });
    let (text, _) = optimize(vec![statement(assignment)]);
    assert_eq!(text, r#"x = "_";"#);
}

#[test]
fn test_labeled_loop_drops_unreachable_code() {
    let (text, _) = optimize(vec![json!({
        "type": "LabeledStatement",
        "label": ident("a"),
        "body": {
            "type": "WhileStatement",
            "test": lit(json!(true)),
            "body": block(vec![
                json!({ "type": "BreakStatement", "label": ident("a") }),
                statement(call("f", vec![])),
            ]),
        },
    })]);
    assert_eq!(text, "a: while (!0) { break a; }");
}

#[test]
fn test_declarations_and_branches() {
    let declarators = vec![
        json!({
            "type": "VariableDeclarator",
            "id": ident("x"),
            "init": binary("+", lit(json!(1)), lit(json!(2))),
        }),
        json!({
            "type": "VariableDeclarator",
            "id": ident("y"),
            "init": {
                "type": "MemberExpression",
                "object": lit(json!("abc")),
                "property": ident("length"),
                "computed": false,
            },
        }),
    ];
    let (text, stats) = optimize(vec![
        json!({ "type": "VariableDeclaration", "kind": "var", "declarations": declarators }),
        json!({
            "type": "IfStatement",
            "test": binary(">", ident("x"), lit(json!(2))),
            "consequent": statement(call("f", vec![])),
            "alternate": null,
        }),
        statement(call("g", vec![])),
    ]);
    assert_eq!(text, "var x = 3, y = 3; x > 2 && f(), g();");
    assert_eq!(stats.hits("if-statement"), 1);
    assert_eq!(stats.hits("expression-statements"), 1);
}

#[test]
fn test_function_body_cleanup() {
    let guard = json!({
        "type": "LogicalExpression",
        "operator": "&&",
        "left": lit(json!(false)),
        "right": ident("DEBUG"),
    });
    let (text, _) = optimize(vec![json!({
        "type": "FunctionDeclaration",
        "id": ident("f"),
        "params": [],
        "body": block(vec![
            json!({
                "type": "IfStatement",
                "test": guard,
                "consequent": block(vec![statement(call("log", vec![]))]),
            }),
            json!({ "type": "ReturnStatement", "argument": lit(json!(1)) }),
            statement(call("log", vec![])),
        ]),
    })]);
    assert_eq!(text, "function f() { return 1; }");
}

/// `function f() { <head>; return this; }`
fn returns_this(head: Vec<Json>) -> Json {
    let mut body = head;
    body.push(json!({ "type": "ReturnStatement", "argument": { "type": "ThisExpression" } }));
    json!({ "type": "FunctionDeclaration", "id": ident("f"), "params": [], "body": block(body) })
}

#[test]
fn test_folding_never_makes_a_function_strict() {
    let concatenated = statement(binary("+", lit(json!("use")), lit(json!(" strict"))));
    let (text, _) = optimize(vec![returns_this(vec![concatenated])]);
    assert_eq!(text, "function f() { return this; }");

    let merged = vec![statement(lit(json!(1))), statement(lit(json!("use strict")))];
    let (text, _) = optimize(vec![returns_this(merged)]);
    assert_eq!(text, "function f() { return this; }");

    let (text, _) = optimize(vec![
        statement(binary("+", lit(json!("use")), lit(json!(" strict")))),
        statement(call("f", vec![])),
    ]);
    assert_eq!(text, "f();");
}

#[test]
fn test_source_directives_survive() {
    let strict = json!({
        "type": "ExpressionStatement",
        "expression": lit(json!("use strict")),
        "directive": "use strict",
    });
    let (text, stats) = optimize(vec![returns_this(vec![strict])]);
    assert_eq!(text, r#"function f() { "use strict"; return this; }"#);
    assert_eq!(stats.rewrites, 0);
}

#[test]
fn test_exported_json_spells_sentinels() {
    let negate = json!({
        "type": "UnaryExpression",
        "operator": "-",
        "prefix": true,
        "argument": lit(json!("0")),
    });
    let body = vec![statement(json!({
        "type": "AssignmentExpression",
        "operator": "=",
        "left": ident("x"),
        "right": negate,
    }))];
    let mut ast = parse(body);
    fold(&mut ast).unwrap();
    let exported = estree::to_json(&ast);
    let right = exported.pointer("/body/0/expression/right").unwrap();
    assert_eq!(right["type"], "UnaryExpression");
    assert_eq!(right["operator"], "-");
    assert_eq!(right["argument"]["value"], 0);
    assert_eq!(source::render(&ast), "x = -0;");
}

#[test]
fn test_options_from_config() {
    let options = FoldOptions::from_json(r#"{ "minify_booleans": false }"#).unwrap();
    let mut ast = parse(vec![statement(binary("<", lit(json!(1)), lit(json!(2))))]);
    let stats = Optimizer::new(options).run(&mut ast).unwrap();
    assert_eq!(source::render(&ast), "true;");
    assert_eq!(stats.hits("boolean-literals"), 0);
}

// Idempotence

fn leaf() -> impl Strategy<Value = Json> {
    prop_oneof![
        (0..10_i32).prop_map(|n| lit(json!(n))),
        prop::sample::select(vec!["", "a", "ab", "10"]).prop_map(|s| lit(json!(s))),
        any::<bool>().prop_map(|b| lit(json!(b))),
        Just(ident("y")),
    ]
}

fn expression() -> impl Strategy<Value = Json> {
    leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (
                prop::sample::select(vec!["+", "-", "*", "<", "==", "===", "!=", "|"]),
                inner.clone(),
                inner.clone(),
            )
                .prop_map(|(op, left, right)| binary(op, left, right)),
            (prop::sample::select(vec!["&&", "||"]), inner.clone(), inner.clone()).prop_map(
                |(op, left, right)| json!({
                    "type": "LogicalExpression", "operator": op, "left": left, "right": right,
                })
            ),
            (prop::sample::select(vec!["!", "-", "typeof", "void"]), inner.clone()).prop_map(
                |(op, argument)| json!({
                    "type": "UnaryExpression", "operator": op, "prefix": true, "argument": argument,
                })
            ),
            (inner.clone(), inner.clone(), inner).prop_map(|(test, consequent, alternate)| json!({
                "type": "ConditionalExpression",
                "test": test,
                "consequent": consequent,
                "alternate": alternate,
            })),
        ]
    })
}

fn program_statement() -> impl Strategy<Value = Json> {
    prop_oneof![
        expression().prop_map(|value| statement(json!({
            "type": "AssignmentExpression",
            "operator": "=",
            "left": ident("x"),
            "right": value,
        }))),
        expression().prop_map(|test| json!({
            "type": "IfStatement",
            "test": test,
            "consequent": statement(call("f", vec![])),
            "alternate": statement(call("g", vec![])),
        })),
    ]
}

proptest! {
    #[test]
    fn prop_fold_is_idempotent(body in prop::collection::vec(program_statement(), 1..4)) {
        let mut ast = parse(body);
        let first = fold(&mut ast).unwrap();
        prop_assert!(first.rounds < FoldOptions::default().max_rounds);
        let once = source::render(&ast);

        let mut again = estree::from_json(&estree::to_json(&ast)).unwrap();
        fold(&mut again).unwrap();
        prop_assert_eq!(source::render(&again), once);
    }
}
