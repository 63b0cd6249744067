#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use super::*;
use crate::{minify_pass, FoldStats};
use esfold_ir::source::render;
use esfold_ir::{estree, Ast, Field, Key};
use esfold_walk::{DepthFirst, NodesOnly, Pipe};

// Builders

fn ident(name: &str) -> Json {
    json!({ "type": "Identifier", "name": name })
}

fn num(value: f64) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn string(value: &str) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn boolean(value: bool) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn statement(expression: Json) -> Json {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

fn directive(text: &str) -> Json {
    json!({ "type": "ExpressionStatement", "expression": string(text), "directive": text })
}

fn binary(operator: &str, left: Json, right: Json) -> Json {
    json!({ "type": "BinaryExpression", "operator": operator, "left": left, "right": right })
}

fn logical(operator: &str, left: Json, right: Json) -> Json {
    json!({ "type": "LogicalExpression", "operator": operator, "left": left, "right": right })
}

fn unary(operator: &str, argument: Json) -> Json {
    json!({ "type": "UnaryExpression", "operator": operator, "prefix": true, "argument": argument })
}

fn assign(left: Json, right: Json) -> Json {
    json!({ "type": "AssignmentExpression", "operator": "=", "left": left, "right": right })
}

/// `x = <value>;`
fn set_x(value: Json) -> Json {
    statement(assign(ident("x"), value))
}

fn member(object: Json, property: Json) -> Json {
    json!({ "type": "MemberExpression", "object": object, "property": property, "computed": true })
}

fn dot(object: Json, name: &str) -> Json {
    json!({ "type": "MemberExpression", "object": object, "property": ident(name), "computed": false })
}

fn call(callee: Json, arguments: Vec<Json>) -> Json {
    json!({ "type": "CallExpression", "callee": callee, "arguments": arguments })
}

fn sequence(expressions: Vec<Json>) -> Json {
    json!({ "type": "SequenceExpression", "expressions": expressions })
}

fn array(elements: Vec<Json>) -> Json {
    json!({ "type": "ArrayExpression", "elements": elements })
}

fn block(body: Vec<Json>) -> Json {
    json!({ "type": "BlockStatement", "body": body })
}

fn empty() -> Json {
    json!({ "type": "EmptyStatement" })
}

fn if_statement(test: Json, consequent: Json, alternate: Option<Json>) -> Json {
    json!({ "type": "IfStatement", "test": test, "consequent": consequent, "alternate": alternate })
}

fn declaration(kind: &str, name: &str, init: Option<Json>) -> Json {
    json!({
        "type": "VariableDeclaration",
        "kind": kind,
        "declarations": [{ "type": "VariableDeclarator", "id": ident(name), "init": init }],
    })
}

fn function(name: &str, body: Vec<Json>) -> Json {
    json!({
        "type": "FunctionDeclaration",
        "id": ident(name),
        "params": [],
        "body": block(body),
    })
}

fn for_statement(init: Option<Json>, test: Option<Json>, update: Option<Json>, body: Json) -> Json {
    json!({ "type": "ForStatement", "init": init, "test": test, "update": update, "body": body })
}

fn parse(body: Vec<Json>) -> Ast {
    estree::from_json(&json!({ "type": "Program", "body": body })).unwrap()
}

fn walk<'a>(ast: &'a mut Ast, pass: &Pipe<FoldCx<'a>>) -> FoldStats {
    let mut cx = FoldCx::new(ast);
    let root = PathNode::root(cx.ast.root());
    pass.walk(&mut cx, root).unwrap();
    cx.into_stats()
}

/// Walk `body` once, depth-first, with the given rules and render the result.
macro_rules! apply {
    ($body:expr, $($rule:expr),+ $(,)?) => {{
        let mut ast = parse($body);
        let stats = {
            let pass = Pipe::new().then(DepthFirst).then(NodesOnly)$(.then(RuleStage($rule)))+;
            walk(&mut ast, &pass)
        };
        (render(&ast), stats)
    }};
}

// Conditional and logical

/// `<test> ? a : b`
fn conditional(test: Json) -> Json {
    json!({
        "type": "ConditionalExpression",
        "test": test,
        "consequent": ident("a"),
        "alternate": ident("b"),
    })
}

#[test]
fn test_conditional_picks_branch() {
    let body = vec![
        set_x(conditional(boolean(true))),
        set_x(conditional(num(0.0))),
        set_x(conditional(ident("c"))),
    ];
    let (text, stats) = apply!(body, ConditionalExpr);
    assert_eq!(text, "x = a; x = b; x = c ? a : b;");
    assert_eq!(stats.hits("conditional-expr"), 2);
}

#[test]
fn test_logical_short_circuits() {
    let body = vec![
        set_x(logical("&&", num(0.0), call(ident("f"), vec![]))),
        set_x(logical("&&", num(1.0), call(ident("f"), vec![]))),
        set_x(logical("||", string(""), ident("w"))),
        set_x(logical("||", ident("w"), num(1.0))),
    ];
    let (text, _) = apply!(body, LogicalExpr);
    assert_eq!(text, "x = 0; x = f(); x = w; x = w || 1;");
}

// Operators

#[test]
fn test_binary_arithmetic() {
    let body = vec![
        set_x(binary("+", num(1.0), binary("*", num(2.0), num(3.0)))),
        set_x(binary("+", string("a"), num(1.0))),
        set_x(binary("/", num(1.0), num(0.0))),
        set_x(binary("/", num(0.0), num(0.0))),
        set_x(binary("+", ident("a"), num(1.0))),
        set_x(binary("**", num(2.0), num(3.0))),
    ];
    let (text, stats) = apply!(body, BinaryExpr);
    assert_eq!(
        text,
        r#"x = 7; x = "a1"; x = 1 / 0; x = 0 / 0; x = a + 1; x = 2 ** 3;"#
    );
    assert_eq!(stats.hits("binary-expr"), 3);
}

#[test]
fn test_binary_comparisons() {
    let body = vec![
        set_x(binary("<", num(1.0), num(2.0))),
        set_x(binary("==", string("10"), num(10.0))),
        set_x(binary(">", string("b"), string("a"))),
        set_x(binary("===", num(1.0), string("1"))),
        set_x(binary("!=", json!({ "type": "Literal", "value": null }), num(0.0))),
    ];
    let (text, _) = apply!(body, BinaryExpr);
    assert_eq!(text, "x = true; x = true; x = true; x = false; x = true;");
}

#[test]
fn test_loose_equality_with_undefined_compares_to_null() {
    let body = vec![
        statement(binary("==", ident("x"), unary("void", num(0.0)))),
        statement(binary("!=", unary("void", num(0.0)), ident("x"))),
        statement(binary("===", unary("void", num(0.0)), ident("x"))),
    ];
    let (text, _) = apply!(body, UnaryExpr, BinaryExpr);
    assert_eq!(text, "x == null; null != x; void 0 === x;");
}

#[test]
fn test_unary_operators() {
    let body = vec![
        set_x(unary("-", unary("-", num(1.0)))),
        set_x(unary("!", num(0.0))),
        set_x(unary("typeof", string("s"))),
        set_x(unary("+", string("abc"))),
        set_x(unary("-", num(0.0))),
        set_x(unary("+", string("1e400"))),
        set_x(unary("~", num(5.0))),
    ];
    let (text, _) = apply!(body, UnaryExpr);
    assert_eq!(
        text,
        r#"x = 1; x = true; x = "string"; x = 0 / 0; x = -0; x = +"1e400"; x = -6;"#
    );
}

// Sequences

#[test]
fn test_sequence_drops_constant_elements() {
    let body = vec![
        statement(sequence(vec![num(1.0), ident("a"), num(2.0), ident("b")])),
        set_x(sequence(vec![num(1.0), num(2.0), ident("c")])),
        statement(call(sequence(vec![num(1.0), ident("f")]), vec![])),
    ];
    let (text, _) = apply!(body, SequenceExpr);
    assert_eq!(text, "a, b; x = c; f();");
}

#[test]
fn test_sequence_keeps_detached_receiver() {
    let method = || dot(ident("a"), "b");
    let body = vec![
        statement(call(sequence(vec![num(1.0), method()]), vec![])),
        statement(call(sequence(vec![num(1.0), num(2.0), method()]), vec![])),
        statement(call(sequence(vec![num(1.0), ident("eval")]), vec![ident("s")])),
        statement(unary("delete", sequence(vec![num(1.0), ident("x")]))),
    ];
    let (text, _) = apply!(body, SequenceExpr);
    assert_eq!(
        text,
        "(1, a.b)(); (0, a.b)(); (1, eval)(s); delete (1, x);"
    );
}

// Member access

#[test]
fn test_member_access_on_constants() {
    let body = vec![
        set_x(member(ident("o"), string("key"))),
        set_x(member(ident("o"), string("not-ident"))),
        statement(assign(member(ident("o"), string("key")), num(1.0))),
        set_x(dot(string("abc"), "length")),
        set_x(member(string("abc"), num(1.0))),
        set_x(member(array(vec![num(1.0), num(2.0)]), num(0.0))),
        set_x(member(array(vec![num(1.0), Json::Null, num(3.0)]), num(1.0))),
        set_x(member(string("abc"), num(5.0))),
        set_x(member(string("abc"), string("1"))),
        set_x(member(string("abc"), num(1.5))),
    ];
    let (text, _) = apply!(body, MemberExpr);
    assert_eq!(
        text,
        r#"x = o.key; x = o["not-ident"]; o.key = 1; x = 3; x = "b"; x = 1; x = [1, , 3][1]; x = "abc"[5]; x = "b"; x = "abc"[1.5];"#
    );
}

#[test]
fn test_member_targets_are_not_folded() {
    let update = json!({
        "type": "UpdateExpression",
        "operator": "++",
        "prefix": false,
        "argument": member(array(vec![num(1.0), num(2.0)]), num(0.0)),
    });
    let body = vec![
        statement(update),
        statement(unary("delete", member(string("ab"), num(0.0)))),
    ];
    let (text, stats) = apply!(body, MemberExpr);
    assert_eq!(text, r#"[1, 2][0]++; delete "ab"[0];"#);
    assert_eq!(stats.rewrites, 0);
}

#[test]
fn test_member_lone_surrogate_is_not_folded() {
    let body = vec![set_x(member(string("\u{1F600}"), num(0.0)))];
    let (_, stats) = apply!(body, MemberExpr);
    assert_eq!(stats.rewrites, 0);
}

#[test]
fn test_member_never_creates_a_directive() {
    let (text, _) = apply!(vec![statement(member(string("_"), num(0.0)))], MemberExpr);
    assert_eq!(text, r#""_"[0];"#);

    let body = vec![
        directive("use strict"),
        statement(member(string("ab"), num(1.0))),
    ];
    let (text, _) = apply!(body, MemberExpr);
    assert_eq!(text, r#""use strict"; "b"[0];"#);

    let body = vec![function("f", vec![statement(member(string("ab"), num(0.0)))])];
    let (text, _) = apply!(body, MemberExpr);
    assert_eq!(text, r#"function f() { "a"[0]; }"#);

    let body = vec![
        statement(call(ident("f"), vec![])),
        statement(member(string("ab"), num(1.0))),
        statement(dot(string("abc"), "length")),
    ];
    let (text, _) = apply!(body, MemberExpr);
    assert_eq!(text, r#"f(); "b"; 3;"#);
}

/// `function f() { <head>; return this; }`
fn returns_this(head: Vec<Json>) -> Vec<Json> {
    let mut body = head;
    body.push(json!({ "type": "ReturnStatement", "argument": { "type": "ThisExpression" } }));
    vec![function("f", body)]
}

#[test]
fn test_folded_strings_are_not_directives() {
    let folds_to_use_strict = [
        binary("+", string("use"), string(" strict")),
        json!({
            "type": "ConditionalExpression",
            "test": num(1.0),
            "consequent": string("use strict"),
            "alternate": ident("a"),
        }),
        logical("||", num(0.0), string("use strict")),
        sequence(vec![num(0.0), string("use strict")]),
    ];
    for expression in folds_to_use_strict {
        let (text, stats) = apply!(
            returns_this(vec![statement(expression)]),
            ConditionalExpr,
            LogicalExpr,
            BinaryExpr,
            SequenceExpr,
            ExpressionStatements,
        );
        assert_eq!(text, "function f() { return this; }");
        assert_eq!(stats.hits("expression-statements"), 1);
    }
}

#[test]
fn test_merged_string_is_not_a_directive() {
    let head = vec![statement(num(1.0)), statement(string("use strict"))];
    let (text, stats) = apply!(returns_this(head), SequenceExpr, ExpressionStatements);
    assert_eq!(text, "function f() { return this; }");
    assert_eq!(stats.hits("expression-statements"), 2);
    assert_eq!(stats.hits("sequence-expr"), 1);

    let body = vec![
        statement(binary("+", string("use"), string(" strict"))),
        statement(call(ident("f"), vec![])),
    ];
    let (text, _) = apply!(body, BinaryExpr, SequenceExpr, ExpressionStatements);
    assert_eq!(text, "f();");
}

// Statements

#[test]
fn test_unreachable_tail_keeps_hoisted_declarations() {
    let body = vec![function(
        "f",
        vec![
            json!({ "type": "ReturnStatement", "argument": num(1.0) }),
            statement(call(ident("g"), vec![])),
            declaration("var", "v", None),
            function("h", vec![]),
            declaration("let", "w", None),
        ],
    )];
    let (text, stats) = apply!(body, UnreachableTail);
    assert_eq!(text, "function f() { return 1; var v; function h() {} }");
    assert_eq!(stats.hits("unreachable-tail"), 1);
}

#[test]
fn test_expression_statements_merge() {
    let body = vec![
        statement(call(ident("a"), vec![])),
        statement(call(ident("b"), vec![])),
        statement(sequence(vec![ident("c"), ident("d")])),
        statement(call(ident("e"), vec![])),
    ];
    let (text, stats) = apply!(body, ExpressionStatements);
    assert_eq!(text, "a(), b(), c, d, e();");
    assert_eq!(stats.rewrites, 1);
}

#[test]
fn test_expression_statements_drop_unobservable_constants() {
    let body = vec![
        statement(num(1.0)),
        if_statement(ident("a"), statement(num(2.0)), None),
        declaration("var", "x", None),
        statement(num(3.0)),
    ];
    let (text, _) = apply!(body, ExpressionStatements);
    assert_eq!(text, "if (a) ; var x; 3;");
}

#[test]
fn test_expression_statements_leave_directives() {
    let body = vec![
        directive("use strict"),
        directive("x"),
        statement(call(ident("f"), vec![])),
    ];
    let (text, stats) = apply!(body, ExpressionStatements);
    assert_eq!(text, r#""use strict"; "x"; f();"#);
    assert_eq!(stats.rewrites, 0);
}

#[test]
fn test_empty_statements_removed_from_lists() {
    let body = vec![
        empty(),
        block(vec![]),
        statement(call(ident("f"), vec![])),
        block(vec![empty()]),
    ];
    let (text, _) = apply!(body, EmptyStatements);
    assert_eq!(text, "f();");
}

#[test]
fn test_if_statement_rewrites() {
    let call_b = || statement(call(ident("b"), vec![]));
    let call_f = || block(vec![statement(call(ident("f"), vec![]))]);
    let body = vec![
        if_statement(ident("a"), block(vec![]), None),
        if_statement(ident("a"), call_b(), Some(statement(call(ident("c"), vec![])))),
        if_statement(ident("a"), call_b(), None),
        if_statement(
            boolean(true),
            call_f(),
            Some(block(vec![statement(call(ident("g"), vec![]))])),
        ),
        if_statement(num(0.0), call_f(), None),
        if_statement(ident("a"), call_f(), Some(block(vec![]))),
        if_statement(ident("a"), call_b(), None),
    ];
    let (text, _) = apply!(body, IfStatement);
    assert_eq!(
        text,
        "a; a ? b() : c(); a && b(); { f(); } ; if (a) { f(); } if (a) b();"
    );
}

#[test]
fn test_loops() {
    let call_f = || statement(call(ident("f"), vec![]));
    let counter = json!({
        "type": "UpdateExpression",
        "operator": "++",
        "prefix": false,
        "argument": ident("i"),
    });
    let body = vec![
        json!({ "type": "WhileStatement", "test": num(0.0), "body": block(vec![call_f()]) }),
        json!({ "type": "WhileStatement", "test": ident("a"), "body": block(vec![]) }),
        json!({ "type": "DoWhileStatement", "test": ident("a"), "body": block(vec![]) }),
        for_statement(None, Some(boolean(false)), None, call_f()),
        for_statement(
            Some(declaration("var", "i", Some(num(0.0)))),
            Some(num(0.0)),
            Some(counter),
            call_f(),
        ),
        for_statement(
            Some(assign(ident("i"), num(0.0))),
            Some(string("")),
            None,
            call_f(),
        ),
        for_statement(
            Some(declaration("let", "i", Some(num(0.0)))),
            Some(num(0.0)),
            None,
            call_f(),
        ),
        for_statement(Some(num(1.0)), Some(boolean(true)), Some(num(2.0)), block(vec![])),
    ];
    let (text, _) = apply!(body, Loops);
    assert_eq!(
        text,
        "; while (a) ; do ; while (a); ; var i = 0; i = 0; for (let i = 0; false;) f(); for (;;) ;"
    );
}

// Minify

#[test]
fn test_boolean_literals_minify_once() {
    let body = vec![
        set_x(boolean(true)),
        set_x(boolean(false)),
        set_x(unary("!", num(0.0))),
    ];
    let mut ast = parse(body);
    let stats = walk(&mut ast, &minify_pass());
    assert_eq!(render(&ast), "x = !0; x = !1; x = !0;");
    assert_eq!(stats.hits("boolean-literals"), 2);
}

#[test]
fn test_shared_constants_are_not_rewritten() {
    // The folded `[true]` is a frozen pool array; its element stays put.
    let body = vec![set_x(member(array(vec![array(vec![boolean(true)])]), num(0.0)))];
    let (text, _) = apply!(body, MemberExpr, BooleanLiterals);
    assert_eq!(text, "x = [true];");
}

// Analyses

#[test]
fn test_positional_analyses() {
    let ast = parse(vec![
        directive("use strict"),
        statement(call(ident("f"), vec![])),
        block(vec![directive("x")]),
        function("g", vec![directive("use asm"), json!({ "type": "ReturnStatement" })]),
    ]);
    let root = PathNode::root(ast.root());
    let top = |index: usize| root.get(&ast, &[Key::Field(Field::Body), Key::Index(index)]);

    assert!(is_directive(&ast, &top(0)));
    assert!(is_not_completion(&ast, &top(0)));

    assert!(!is_directive(&ast, &top(1)));
    assert!(in_directive_position(&ast, &top(1)));

    let in_block = top(2).get(&ast, &[Key::Field(Field::Body), Key::Index(0)]);
    assert!(!is_directive(&ast, &in_block));
    assert!(!in_directive_position(&ast, &top(3)));

    assert!(!is_not_completion(&ast, &top(3)));
    let asm = top(3).get(
        &ast,
        &[Key::Field(Field::Body), Key::Field(Field::Body), Key::Index(0)],
    );
    assert!(is_directive(&ast, &asm));
    assert!(is_not_completion(&ast, &asm));

    let ast = parse(vec![statement(string("use strict"))]);
    let unmarked = PathNode::root(ast.root()).get(&ast, &[Key::Field(Field::Body), Key::Index(0)]);
    assert!(in_directive_position(&ast, &unmarked));
    assert!(!is_directive(&ast, &unmarked));
}
