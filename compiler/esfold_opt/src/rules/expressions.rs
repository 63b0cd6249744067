//! Expression-level rules.

use esfold_ir::{Ast, BinaryOp, Field, Key, LogicalOp, Node, NodeId, PathNode, UnaryOp};

use super::analysis::in_directive_position;
use super::FoldRule;
use crate::constants::{self, number_to_string, string_to_number, JsValue};
use crate::{FoldCx, FoldError};

// Conditional and logical

/// `true ? a : b` → `a`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConditionalExpr;

impl FoldRule for ConditionalExpr {
    fn name(&self) -> &'static str {
        "conditional-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::ConditionalExpression {
            test,
            consequent,
            alternate,
        } = cx.node(id)
        else {
            return Ok(None);
        };
        let Some(value) = cx.constant(test)? else {
            return Ok(None);
        };
        let branch = if value.to_boolean() {
            consequent
        } else {
            alternate
        };
        Ok(Some(cx.replace(path, branch)?))
    }
}

/// Short-circuits `&&` and `||` on a constant left operand.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogicalExpr;

impl FoldRule for LogicalExpr {
    fn name(&self) -> &'static str {
        "logical-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::LogicalExpression {
            operator,
            left,
            right,
        } = cx.node(id)
        else {
            return Ok(None);
        };
        let Some(value) = cx.constant(left)? else {
            return Ok(None);
        };
        let short_circuits = match operator {
            LogicalOp::Or => value.to_boolean(),
            LogicalOp::And => !value.to_boolean(),
        };
        let replacement = if short_circuits { left } else { right };
        Ok(Some(cx.replace(path, replacement)?))
    }
}

// Operators

/// Evaluates binary operators over constant operands.
///
/// Results must be finite when numeric; `NaN` and infinities are left to
/// the engine. `x == void 0` is first rewritten to `x == null`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryExpr;

impl FoldRule for BinaryExpr {
    fn name(&self) -> &'static str {
        "binary-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::BinaryExpression {
            operator,
            left,
            right,
        } = cx.node(id)
        else {
            return Ok(None);
        };
        // The `0 / 0` sentinel.
        if cx.ast.is_frozen(id) {
            return Ok(None);
        }

        if matches!(operator, BinaryOp::Eq | BinaryOp::NotEq) {
            let mut updated = false;
            for (field, operand) in [(Field::Left, left), (Field::Right, right)] {
                if cx.pool.is_undefined(operand) {
                    let null = cx.pool.null(cx.ast);
                    updated |= cx.ast.write(path.value(), Key::Field(field), Some(null))?;
                }
            }
            if updated {
                return Ok(Some(path.clone()));
            }
        }

        let (Some(left), Some(right)) = (cx.constant(left)?, cx.constant(right)?) else {
            return Ok(None);
        };
        let Some(result) = constants::binary(operator, &left, &right) else {
            return Ok(None);
        };
        if matches!(result, JsValue::Number(value) if !value.is_finite()) {
            return Ok(None);
        }
        let folded = cx.to_const(&result)?;
        Ok(Some(cx.replace(path, folded)?))
    }
}

/// Evaluates unary operators over a constant operand.
///
/// `NaN` results become the `0 / 0` sentinel; infinities are left alone.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnaryExpr;

impl FoldRule for UnaryExpr {
    fn name(&self) -> &'static str {
        "unary-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::UnaryExpression { operator, argument } = cx.node(id) else {
            return Ok(None);
        };
        // `-1`, `void 0` and `!0` are already in canonical form.
        if cx.is_constant(id) {
            return Ok(None);
        }
        let Some(value) = cx.constant(argument)? else {
            return Ok(None);
        };
        let result = constants::unary(operator, &value);
        if matches!(result, JsValue::Number(value) if value.is_infinite()) {
            return Ok(None);
        }
        let folded = cx.to_const(&result)?;
        Ok(Some(cx.replace(path, folded)?))
    }
}

// Sequences

/// Drops constant, non-final elements of a sequence and unwraps a
/// sequence left with one element.
///
/// `(0, obj.method)()` and `(0, eval)(src)` keep their leading constant:
/// the sequence detaches `this` and makes `eval` indirect.
#[derive(Copy, Clone, Debug, Default)]
pub struct SequenceExpr;

impl FoldRule for SequenceExpr {
    fn name(&self) -> &'static str {
        "sequence-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let Node::SequenceExpression { expressions } = cx.node(id) else {
            return Ok(None);
        };
        let Some((&last, init)) = expressions.split_last() else {
            return Ok(None);
        };
        if init.is_empty() {
            return Ok(Some(cx.replace(path, last)?));
        }
        let total = expressions.len();
        let mut kept: Vec<NodeId> = init
            .iter()
            .copied()
            .filter(|&expression| !cx.is_constant(expression))
            .collect();
        if kept.is_empty() && detaches_reference(cx.ast, path, last) {
            if total == 2 {
                return Ok(None);
            }
            kept.push(cx.to_const(&JsValue::Number(0.0))?);
        }
        kept.push(last);

        if kept.len() == total {
            return Ok(None);
        }
        if kept.len() == 1 {
            return Ok(Some(cx.replace(path, last)?));
        }
        if let Node::SequenceExpression { expressions } = cx.ast.node_mut(id)? {
            *expressions = kept;
        }
        Ok(Some(path.clone()))
    }
}

/// Whether collapsing the sequence at `path` to `last` would turn a plain
/// value back into a reference: a method call, a direct `eval`, or a
/// `delete` that actually deletes.
fn detaches_reference(ast: &Ast, path: &PathNode, last: NodeId) -> bool {
    let Some(owner) = path.parent().and_then(|parent| ast.node_at(parent)) else {
        return false;
    };
    let callee = path.key() == Some(Key::Field(Field::Callee))
        && matches!(owner, Node::CallExpression { .. });
    let deleted = path.key() == Some(Key::Field(Field::Argument))
        && matches!(
            owner,
            Node::UnaryExpression {
                operator: UnaryOp::Delete,
                ..
            }
        );
    match ast.node(last) {
        Node::MemberExpression { .. } => callee || deleted,
        Node::Identifier { name } => deleted || (callee && name == "eval"),
        _ => false,
    }
}

// Member access

/// Member access on constants.
///
/// - `o["name"]` → `o.name` for identifier-like keys
/// - `"abc".length` → `3`, `[1, 2].length` → `2`
/// - `"abc"[1]` → `"b"`, `[1, 2][0]` → `1`
///
/// Assignment, update and `delete` targets are never folded. A string
/// index that is the whole statement in directive position is kept as
/// `"c"[0]` so it cannot turn into a directive.
#[derive(Copy, Clone, Debug, Default)]
pub struct MemberExpr;

impl FoldRule for MemberExpr {
    fn name(&self) -> &'static str {
        "member-expr"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        let &Node::MemberExpression {
            object,
            property,
            computed,
        } = cx.node(id)
        else {
            return Ok(None);
        };

        if computed {
            if let Some(name) = identifier_key(cx, property) {
                let name = cx.alloc(Node::Identifier { name })?;
                if let Node::MemberExpression {
                    property, computed, ..
                } = cx.ast.node_mut(id)?
                {
                    *property = name;
                    *computed = false;
                }
                return Ok(Some(path.clone()));
            }
        }

        if is_reference_target(cx.ast, path) {
            return Ok(None);
        }
        let Some(value) = cx.constant(object)? else {
            return Ok(None);
        };
        let folded = if computed {
            match cx.constant(property)? {
                Some(key) => element(&value, &key),
                None => None,
            }
        } else {
            length(cx, &value, property)
        };
        let Some(folded) = folded else {
            return Ok(None);
        };

        if whole_directive_statement(cx.ast, path) {
            return keep_out_of_prologue(cx, path, &value, &folded);
        }
        let folded = cx.to_const(&folded)?;
        Ok(Some(cx.replace(path, folded)?))
    }
}

/// The dot-access name for a computed string key, if it has one.
fn identifier_key(cx: &FoldCx<'_>, property: NodeId) -> Option<String> {
    let name = cx.node(property).as_str_literal()?;
    is_identifier_name(name).then(|| name.to_owned())
}

/// `^[$_a-zA-Z][$_a-zA-Z0-9]*$`
fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '$' || c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '$' || c == '_' || c.is_ascii_alphanumeric())
}

/// Places where a member expression is a reference, not a value.
fn is_reference_target(ast: &Ast, path: &PathNode) -> bool {
    let Some(owner) = path.parent().and_then(|parent| ast.node_at(parent)) else {
        return false;
    };
    match path.key() {
        Some(Key::Field(Field::Left)) => matches!(
            owner,
            Node::AssignmentExpression { .. } | Node::ForInStatement { .. }
        ),
        Some(Key::Field(Field::Argument)) => matches!(
            owner,
            Node::UpdateExpression { .. }
                | Node::UnaryExpression {
                    operator: UnaryOp::Delete,
                    ..
                }
        ),
        _ => false,
    }
}

fn length(cx: &FoldCx<'_>, object: &JsValue, property: NodeId) -> Option<JsValue> {
    match cx.node(property) {
        Node::Identifier { name } if name == "length" => {
            let length = object.length()?;
            #[expect(
                clippy::cast_precision_loss,
                reason = "constant strings and arrays are far below 2^53"
            )]
            let length = length as f64;
            Some(JsValue::Number(length))
        }
        _ => None,
    }
}

/// `object[key]` for an own indexed element of a constant string or array.
fn element(object: &JsValue, key: &JsValue) -> Option<JsValue> {
    let index = array_index(key)?;
    match object {
        JsValue::String(text) => {
            let unit = text.encode_utf16().nth(index)?;
            // Lone surrogates have no `String` form.
            char::from_u32(u32::from(unit)).map(|c| JsValue::String(c.to_string()))
        }
        JsValue::Array(items) => items.get(index)?.clone(),
        _ => None,
    }
}

/// The index a property key names, if it is a canonical array index.
fn array_index(key: &JsValue) -> Option<usize> {
    let text = key.to_js_string();
    let number = string_to_number(&text);
    if number_to_string(number) != text || number.fract() != 0.0 || number < 0.0 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "non-negative integral, and any index past usize::MAX is out of range anyway"
    )]
    let index = number as usize;
    Some(index)
}

/// `true` when the member expression at `path` is the entire expression of
/// a statement in directive position.
fn whole_directive_statement(ast: &Ast, path: &PathNode) -> bool {
    path.key() == Some(Key::Field(Field::Expression))
        && path.parent().is_some_and(|statement| {
            matches!(ast.node_at(statement), Some(Node::ExpressionStatement { .. }))
                && in_directive_position(ast, statement)
        })
}

/// Fold in directive position without producing a string statement: a
/// one-character result is reduced to `"c"[0]`, anything else stays.
fn keep_out_of_prologue(
    cx: &mut FoldCx<'_>,
    path: &PathNode,
    object: &JsValue,
    folded: &JsValue,
) -> Result<Option<PathNode>, FoldError> {
    let JsValue::String(text) = folded else {
        let folded = cx.to_const(folded)?;
        return Ok(Some(cx.replace(path, folded)?));
    };
    if object.length() <= Some(1) || text.encode_utf16().count() != 1 {
        return Ok(None);
    }
    let object = cx.to_const(folded)?;
    let index = cx.to_const(&JsValue::Number(0.0))?;
    let member = cx.alloc(Node::MemberExpression {
        object,
        property: index,
        computed: true,
    })?;
    Ok(Some(cx.replace(path, member)?))
}
