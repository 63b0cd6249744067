//! Host-side JavaScript values and the abstract operations on them.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use super::number::{number_to_string, string_to_number};

/// A compile-time JavaScript value.
///
/// Arrays are always fresh objects: two array values are never strictly
/// equal, even with the same elements. `None` elements are holes.
#[derive(Clone, Debug, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Option<JsValue>>),
}

impl JsValue {
    /// `ToBoolean`.
    pub fn to_boolean(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Bool(value) => *value,
            JsValue::Number(value) => !(value.is_nan() || *value == 0.0),
            JsValue::String(value) => !value.is_empty(),
            JsValue::Array(_) => true,
        }
    }

    /// `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            JsValue::Undefined => f64::NAN,
            JsValue::Null => 0.0,
            JsValue::Bool(value) => f64::from(u8::from(*value)),
            JsValue::Number(value) => *value,
            JsValue::String(value) => string_to_number(value),
            JsValue::Array(_) => string_to_number(&self.to_js_string()),
        }
    }

    /// `ToString`. Arrays join their elements with `,`; holes, `null` and
    /// `undefined` elements print as nothing.
    pub fn to_js_string(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_owned(),
            JsValue::Null => "null".to_owned(),
            JsValue::Bool(value) => value.to_string(),
            JsValue::Number(value) => number_to_string(*value),
            JsValue::String(value) => value.clone(),
            JsValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    None | Some(JsValue::Undefined | JsValue::Null) => String::new(),
                    Some(value) => value.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// `ToPrimitive`. An array's `valueOf` is itself, so it falls back to
    /// its string form.
    pub fn to_primitive(&self) -> JsValue {
        match self {
            JsValue::Array(_) => JsValue::String(self.to_js_string()),
            other => other.clone(),
        }
    }

    /// The `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null | JsValue::Array(_) => "object",
            JsValue::Bool(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
        }
    }

    /// `===`.
    pub fn strict_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) | (JsValue::Null, JsValue::Null) => true,
            (JsValue::Bool(a), JsValue::Bool(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "IEEE equality is the JS semantics")]
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            _ => false,
        }
    }

    /// `==`.
    pub fn loose_equals(&self, other: &JsValue) -> bool {
        if mem::discriminant(self) == mem::discriminant(other) {
            return self.strict_equals(other);
        }
        match (self, other) {
            (JsValue::Undefined | JsValue::Null, JsValue::Undefined | JsValue::Null) => true,
            (JsValue::Undefined | JsValue::Null, _) | (_, JsValue::Undefined | JsValue::Null) => {
                false
            }
            (JsValue::Number(_), JsValue::String(_)) | (JsValue::String(_), JsValue::Number(_)) => {
                JsValue::Number(self.to_number()).strict_equals(&JsValue::Number(other.to_number()))
            }
            (JsValue::Bool(_), _) => JsValue::Number(self.to_number()).loose_equals(other),
            (_, JsValue::Bool(_)) => self.loose_equals(&JsValue::Number(other.to_number())),
            (JsValue::Array(_), _) => self.to_primitive().loose_equals(other),
            (_, JsValue::Array(_)) => self.loose_equals(&other.to_primitive()),
            _ => false,
        }
    }

    /// Abstract relational comparison `self < other`. `None` is the
    /// "undefined" outcome a `NaN` operand produces.
    pub fn less_than(&self, other: &JsValue) -> Option<bool> {
        let (left, right) = (self.to_primitive(), other.to_primitive());
        if let (JsValue::String(a), JsValue::String(b)) = (&left, &right) {
            return Some(a.encode_utf16().cmp(b.encode_utf16()) == Ordering::Less);
        }
        let (a, b) = (left.to_number(), right.to_number());
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(a < b)
    }

    /// Length in UTF-16 code units for strings, slots for arrays.
    pub fn length(&self) -> Option<usize> {
        match self {
            JsValue::String(value) => Some(value.encode_utf16().count()),
            JsValue::Array(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::String(value) => write!(f, "{value:?}"),
            JsValue::Array(_) => write!(f, "[{}]", self.to_js_string()),
            other => f.write_str(&other.to_js_string()),
        }
    }
}
