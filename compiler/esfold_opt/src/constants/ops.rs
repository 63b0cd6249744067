//! Operator evaluation over [`JsValue`]s.

use esfold_ir::{BinaryOp, UnaryOp};

use super::number::{to_int32, to_uint32};
use super::JsValue;

/// Evaluate `left <op> right`.
///
/// `None` for operators whose result depends on objects or the runtime
/// (`in`, `instanceof`) and for `**`, which is left to the engine.
pub fn binary(op: BinaryOp, left: &JsValue, right: &JsValue) -> Option<JsValue> {
    let number = |f: fn(f64, f64) -> f64| JsValue::Number(f(left.to_number(), right.to_number()));
    let int32 = |f: fn(i32, i32) -> i32| {
        JsValue::Number(f64::from(f(
            to_int32(left.to_number()),
            to_int32(right.to_number()),
        )))
    };
    let shift = || to_uint32(right.to_number()) & 31;

    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => number(|a, b| a - b),
        BinaryOp::Mul => number(|a, b| a * b),
        BinaryOp::Div => number(|a, b| a / b),
        // `%` on f64 truncates like ECMAScript's remainder.
        BinaryOp::Mod => number(|a, b| a % b),
        BinaryOp::Eq => JsValue::Bool(left.loose_equals(right)),
        BinaryOp::NotEq => JsValue::Bool(!left.loose_equals(right)),
        BinaryOp::StrictEq => JsValue::Bool(left.strict_equals(right)),
        BinaryOp::StrictNotEq => JsValue::Bool(!left.strict_equals(right)),
        BinaryOp::Lt => JsValue::Bool(left.less_than(right) == Some(true)),
        BinaryOp::Gt => JsValue::Bool(right.less_than(left) == Some(true)),
        BinaryOp::LtEq => JsValue::Bool(right.less_than(left) == Some(false)),
        BinaryOp::GtEq => JsValue::Bool(left.less_than(right) == Some(false)),
        BinaryOp::Shl => {
            JsValue::Number(f64::from(to_int32(left.to_number()).wrapping_shl(shift())))
        }
        BinaryOp::Shr => JsValue::Number(f64::from(to_int32(left.to_number()) >> shift())),
        BinaryOp::UShr => JsValue::Number(f64::from(to_uint32(left.to_number()) >> shift())),
        BinaryOp::BitAnd => int32(|a, b| a & b),
        BinaryOp::BitOr => int32(|a, b| a | b),
        BinaryOp::BitXor => int32(|a, b| a ^ b),
        BinaryOp::Exp | BinaryOp::In | BinaryOp::InstanceOf => return None,
    };
    Some(value)
}

/// `+`: string concatenation when either primitive is a string.
fn add(left: &JsValue, right: &JsValue) -> JsValue {
    let (left, right) = (left.to_primitive(), right.to_primitive());
    if matches!(left, JsValue::String(_)) || matches!(right, JsValue::String(_)) {
        return JsValue::String(left.to_js_string() + &right.to_js_string());
    }
    JsValue::Number(left.to_number() + right.to_number())
}

/// Evaluate `<op> operand`. `delete` of a value is always `true`.
pub fn unary(op: UnaryOp, operand: &JsValue) -> JsValue {
    match op {
        UnaryOp::Minus => JsValue::Number(-operand.to_number()),
        UnaryOp::Plus => JsValue::Number(operand.to_number()),
        UnaryOp::BitNot => JsValue::Number(f64::from(!to_int32(operand.to_number()))),
        UnaryOp::Not => JsValue::Bool(!operand.to_boolean()),
        UnaryOp::Typeof => JsValue::String(operand.type_of().to_owned()),
        UnaryOp::Void => JsValue::Undefined,
        UnaryOp::Delete => JsValue::Bool(true),
    }
}
