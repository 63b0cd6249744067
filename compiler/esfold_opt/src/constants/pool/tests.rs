#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn setup() -> (Ast, ConstantPool) {
    (Ast::new(), ConstantPool::new())
}

#[test]
fn test_primitives_are_interned_and_frozen() {
    let (mut ast, mut pool) = setup();
    let three = pool.to_const_node(&mut ast, &JsValue::Number(3.0)).unwrap();
    let again = pool.to_const_node(&mut ast, &JsValue::Number(3.0)).unwrap();
    assert_eq!(three, again);
    assert!(ast.is_frozen(three));
    assert_eq!(ast.node(three), &Node::Literal(Literal::Number(3.0)));

    let text = JsValue::String("abc".to_owned());
    let a = pool.to_const_node(&mut ast, &text).unwrap();
    assert_eq!(a, pool.to_const_node(&mut ast, &text).unwrap());
    assert_eq!(pool.value_of(&ast, a).unwrap(), text);
}

#[test]
fn test_negative_zero_is_distinct_from_zero() {
    let (mut ast, mut pool) = setup();
    let zero = pool.to_const_node(&mut ast, &JsValue::Number(0.0)).unwrap();
    let neg_zero = pool.to_const_node(&mut ast, &JsValue::Number(-0.0)).unwrap();
    assert_ne!(zero, neg_zero);
    assert_eq!(neg_zero, pool.neg_zero(&mut ast));
    let JsValue::Number(value) = pool.value_of(&ast, neg_zero).unwrap() else {
        panic!("expected a number");
    };
    assert!(value == 0.0 && value.is_sign_negative());
}

#[test]
fn test_negative_numbers_wrap_an_interned_literal() {
    let (mut ast, mut pool) = setup();
    let minus_five = pool.to_const_node(&mut ast, &JsValue::Number(-5.0)).unwrap();
    let five = pool.to_const_node(&mut ast, &JsValue::Number(5.0)).unwrap();
    assert_eq!(
        ast.node(minus_five),
        &Node::UnaryExpression {
            operator: UnaryOp::Minus,
            argument: five,
        }
    );
    assert_eq!(pool.value_of(&ast, minus_five).unwrap(), JsValue::Number(-5.0));
}

#[test]
fn test_nan_and_undefined_sentinels() {
    let (mut ast, mut pool) = setup();
    let nan = pool.to_const_node(&mut ast, &JsValue::Number(f64::NAN)).unwrap();
    assert!(pool.is_nan(nan));
    assert_eq!(nan, pool.nan(&mut ast));
    assert!(matches!(
        ast.node(nan),
        Node::BinaryExpression {
            operator: BinaryOp::Div,
            ..
        }
    ));

    let undefined = pool.to_const_node(&mut ast, &JsValue::Undefined).unwrap();
    assert!(pool.is_undefined(undefined));
    assert!(pool.is_constant(&ast, undefined));
    assert_eq!(pool.value_of(&ast, undefined).unwrap(), JsValue::Undefined);
}

#[test]
fn test_source_shapes_of_sentinels_are_not_constant() {
    let (mut ast, pool) = setup();
    let zero = ast.alloc(Node::Literal(Literal::Number(0.0)));
    let void = ast.alloc(Node::UnaryExpression {
        operator: UnaryOp::Void,
        argument: zero,
    });
    let nan = ast.alloc(Node::BinaryExpression {
        operator: BinaryOp::Div,
        left: zero,
        right: zero,
    });
    assert!(pool.is_constant(&ast, zero));
    assert!(!pool.is_constant(&ast, void));
    assert!(!pool.is_constant(&ast, nan));
    assert_eq!(pool.value_of(&ast, void), Err(FoldError::NotConstant(void)));
}

#[test]
fn test_regex_literals_are_not_constant() {
    let (mut ast, pool) = setup();
    let regex = ast.alloc(Node::Literal(Literal::RegExp {
        pattern: "a+".to_owned(),
        flags: "g".to_owned(),
    }));
    assert!(!pool.is_constant(&ast, regex));
    assert_eq!(pool.value_of(&ast, regex), Err(FoldError::NotConstant(regex)));
}

#[test]
fn test_infinity_is_not_representable() {
    let (mut ast, mut pool) = setup();
    assert_eq!(
        pool.to_const_node(&mut ast, &JsValue::Number(f64::NEG_INFINITY)),
        Err(FoldError::NotRepresentable("-Infinity".to_owned()))
    );
}

#[test]
fn test_arrays_are_fresh_frozen_nodes() {
    let (mut ast, mut pool) = setup();
    let value = JsValue::Array(vec![
        Some(JsValue::Number(1.0)),
        None,
        Some(JsValue::String("a".to_owned())),
    ]);
    let first = pool.to_const_node(&mut ast, &value).unwrap();
    let second = pool.to_const_node(&mut ast, &value).unwrap();
    assert_ne!(first, second);
    assert!(ast.is_frozen(first));
    assert_eq!(pool.value_of(&ast, first).unwrap(), value);
}

#[test]
fn test_source_arrays_of_constants_are_constant() {
    let (mut ast, pool) = setup();
    let one = ast.alloc(Node::Literal(Literal::Number(1.0)));
    let name = ast.alloc(Node::Identifier {
        name: "x".to_owned(),
    });
    let constant = ast.alloc(Node::ArrayExpression {
        elements: vec![Some(one), None],
    });
    let dynamic = ast.alloc(Node::ArrayExpression {
        elements: vec![Some(one), Some(name)],
    });
    assert!(pool.is_constant(&ast, constant));
    assert!(!pool.is_constant(&ast, dynamic));
    assert_eq!(
        pool.value_of(&ast, constant).unwrap(),
        JsValue::Array(vec![Some(JsValue::Number(1.0)), None])
    );
}

#[test]
fn test_minified_booleans() {
    let (mut ast, mut pool) = setup();
    let yes = pool.minified_bool(&mut ast, true);
    let no = pool.minified_bool(&mut ast, false);
    assert_ne!(yes, no);
    assert_eq!(yes, pool.minified_bool(&mut ast, true));
    assert!(ast.flags(yes).contains(NodeFlags::MINIFIED | NodeFlags::FROZEN));
    assert_eq!(pool.value_of(&ast, yes).unwrap(), JsValue::Bool(true));
    assert_eq!(pool.value_of(&ast, no).unwrap(), JsValue::Bool(false));
}

#[test]
fn test_empty_statement_is_shared() {
    let (mut ast, mut pool) = setup();
    let empty = pool.empty_statement(&mut ast);
    assert_eq!(empty, pool.empty_statement(&mut ast));
    assert!(pool.is_empty_statement(empty));
    assert!(ast.is_frozen(empty));
    assert!(!pool.is_constant(&ast, empty));
}

proptest! {
    #[test]
    fn prop_numbers_round_trip_through_nodes(value in any::<f64>()) {
        prop_assume!(value.is_finite());
        let (mut ast, mut pool) = setup();
        let id = pool.to_const_node(&mut ast, &JsValue::Number(value)).unwrap();
        prop_assert_eq!(id, pool.to_const_node(&mut ast, &JsValue::Number(value)).unwrap());
        let JsValue::Number(back) = pool.value_of(&ast, id).unwrap() else {
            return Err(TestCaseError::fail("expected a number"));
        };
        prop_assert_eq!(back.to_bits(), value.to_bits());
    }
}
