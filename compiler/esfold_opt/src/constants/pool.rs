//! Canonical constant nodes.
//!
//! Every node the pool creates is `FROZEN` and shared: the same literal can
//! sit in any number of slots. The pool also remembers the host value of
//! each node it made, which is how sentinels such as `void 0` and `0 / 0`
//! are told apart from the same shapes written in the source.

use esfold_ir::{Ast, BinaryOp, Literal, Node, NodeFlags, NodeId, UnaryOp};
use rustc_hash::FxHashMap;

use super::number::number_to_string;
use super::JsValue;
use crate::FoldError;

/// Dedup key for interned constants. Numbers are keyed by bit pattern so
/// `0` and `-0` stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ConstKey {
    Null,
    Bool(bool),
    Number(u64),
    /// `-(n)` for the positive number with these bits.
    Negated(u64),
    String(String),
}

/// Interning context for one optimizer run.
#[derive(Debug, Default)]
pub struct ConstantPool {
    interned: FxHashMap<ConstKey, NodeId>,
    values: FxHashMap<NodeId, JsValue>,
    undefined: Option<NodeId>,
    nan: Option<NodeId>,
    empty: Option<NodeId>,
    minified: [Option<NodeId>; 2],
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn freeze(
        &mut self,
        ast: &mut Ast,
        node: Node,
        flags: NodeFlags,
        value: Option<JsValue>,
    ) -> NodeId {
        let id = ast.alloc_with_flags(node, flags | NodeFlags::FROZEN);
        if let Some(value) = value {
            self.values.insert(id, value);
        }
        id
    }

    fn intern(&mut self, ast: &mut Ast, key: ConstKey) -> NodeId {
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let (node, value) = match &key {
            ConstKey::Null => (Node::Literal(Literal::Null), JsValue::Null),
            ConstKey::Bool(value) => (Node::Literal(Literal::Bool(*value)), JsValue::Bool(*value)),
            ConstKey::Number(bits) => {
                let value = f64::from_bits(*bits);
                (Node::Literal(Literal::Number(value)), JsValue::Number(value))
            }
            ConstKey::Negated(bits) => {
                let argument = self.intern(ast, ConstKey::Number(*bits));
                let node = Node::UnaryExpression {
                    operator: UnaryOp::Minus,
                    argument,
                };
                (node, JsValue::Number(-f64::from_bits(*bits)))
            }
            ConstKey::String(value) => (
                Node::Literal(Literal::String(value.clone())),
                JsValue::String(value.clone()),
            ),
        };
        let id = self.freeze(ast, node, NodeFlags::empty(), Some(value));
        self.interned.insert(key, id);
        id
    }

    fn zero(&mut self, ast: &mut Ast) -> NodeId {
        self.intern(ast, ConstKey::Number(0.0_f64.to_bits()))
    }

    // Sentinels

    /// `void 0`, the constant form of `undefined`.
    pub fn undefined(&mut self, ast: &mut Ast) -> NodeId {
        if let Some(id) = self.undefined {
            return id;
        }
        let argument = self.zero(ast);
        let node = Node::UnaryExpression {
            operator: UnaryOp::Void,
            argument,
        };
        let id = self.freeze(ast, node, NodeFlags::empty(), Some(JsValue::Undefined));
        self.undefined = Some(id);
        id
    }

    /// `0 / 0`, the constant form of `NaN`.
    pub fn nan(&mut self, ast: &mut Ast) -> NodeId {
        if let Some(id) = self.nan {
            return id;
        }
        let zero = self.zero(ast);
        let node = Node::BinaryExpression {
            operator: BinaryOp::Div,
            left: zero,
            right: zero,
        };
        let id = self.freeze(ast, node, NodeFlags::empty(), Some(JsValue::Number(f64::NAN)));
        self.nan = Some(id);
        id
    }

    /// `-0`.
    pub fn neg_zero(&mut self, ast: &mut Ast) -> NodeId {
        self.intern(ast, ConstKey::Negated(0.0_f64.to_bits()))
    }

    pub fn null(&mut self, ast: &mut Ast) -> NodeId {
        self.intern(ast, ConstKey::Null)
    }

    /// The shared `EmptyStatement` dead statements are replaced with.
    pub fn empty_statement(&mut self, ast: &mut Ast) -> NodeId {
        if let Some(id) = self.empty {
            return id;
        }
        let id = self.freeze(ast, Node::EmptyStatement, NodeFlags::empty(), None);
        self.empty = Some(id);
        id
    }

    /// `!0` for `true`, `!1` for `false`. Marked `MINIFIED`.
    pub fn minified_bool(&mut self, ast: &mut Ast, value: bool) -> NodeId {
        let slot = usize::from(value);
        if let Some(id) = self.minified[slot] {
            return id;
        }
        let argument = self.intern(ast, ConstKey::Number(f64::from(u8::from(!value)).to_bits()));
        let node = Node::UnaryExpression {
            operator: UnaryOp::Not,
            argument,
        };
        let id = self.freeze(ast, node, NodeFlags::MINIFIED, Some(JsValue::Bool(value)));
        self.minified[slot] = Some(id);
        id
    }

    pub fn is_undefined(&self, id: NodeId) -> bool {
        self.undefined == Some(id)
    }

    pub fn is_nan(&self, id: NodeId) -> bool {
        self.nan == Some(id)
    }

    pub fn is_empty_statement(&self, id: NodeId) -> bool {
        self.empty == Some(id)
    }

    // Constant Values

    /// Whether `id` has a compile-time value: non-regex literals, numeric
    /// negation of a number literal, arrays of constants (holes allowed) and
    /// every valued node the pool made.
    pub fn is_constant(&self, ast: &Ast, id: NodeId) -> bool {
        if self.values.contains_key(&id) {
            return true;
        }
        match ast.node(id) {
            Node::Literal(Literal::RegExp { .. }) => false,
            Node::Literal(_) => true,
            Node::UnaryExpression {
                operator: UnaryOp::Minus,
                argument,
            } => matches!(ast.node(*argument), Node::Literal(Literal::Number(_))),
            Node::ArrayExpression { elements } => elements
                .iter()
                .flatten()
                .all(|&element| self.is_constant(ast, element)),
            _ => false,
        }
    }

    /// The host value of a constant node.
    pub fn value_of(&self, ast: &Ast, id: NodeId) -> Result<JsValue, FoldError> {
        if let Some(value) = self.values.get(&id) {
            return Ok(value.clone());
        }
        match ast.node(id) {
            Node::Literal(Literal::Null) => Ok(JsValue::Null),
            Node::Literal(Literal::Bool(value)) => Ok(JsValue::Bool(*value)),
            Node::Literal(Literal::Number(value)) => Ok(JsValue::Number(*value)),
            Node::Literal(Literal::String(value)) => Ok(JsValue::String(value.clone())),
            Node::UnaryExpression {
                operator: UnaryOp::Minus,
                argument,
            } => match ast.node(*argument) {
                Node::Literal(Literal::Number(value)) => Ok(JsValue::Number(-value)),
                _ => Err(FoldError::NotConstant(id)),
            },
            Node::ArrayExpression { elements } => elements
                .iter()
                .map(|element| element.map(|e| self.value_of(ast, e)).transpose())
                .collect::<Result<_, _>>()
                .map(JsValue::Array),
            _ => Err(FoldError::NotConstant(id)),
        }
    }

    /// The canonical node for `value`.
    ///
    /// Primitives are interned; arrays become a fresh frozen
    /// `ArrayExpression`. Infinite numbers have no literal form.
    pub fn to_const_node(&mut self, ast: &mut Ast, value: &JsValue) -> Result<NodeId, FoldError> {
        let id = match value {
            JsValue::Undefined => self.undefined(ast),
            JsValue::Null => self.null(ast),
            JsValue::Bool(value) => self.intern(ast, ConstKey::Bool(*value)),
            JsValue::String(value) => self.intern(ast, ConstKey::String(value.clone())),
            JsValue::Number(number) if number.is_nan() => self.nan(ast),
            JsValue::Number(number) if number.is_infinite() => {
                return Err(FoldError::NotRepresentable(number_to_string(*number)));
            }
            JsValue::Number(number) if number.is_sign_negative() => {
                self.intern(ast, ConstKey::Negated((-number).to_bits()))
            }
            JsValue::Number(number) => self.intern(ast, ConstKey::Number(number.to_bits())),
            JsValue::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| {
                        item.as_ref()
                            .map(|item| self.to_const_node(ast, item))
                            .transpose()
                    })
                    .collect::<Result<_, _>>()?;
                let node = Node::ArrayExpression { elements };
                self.freeze(ast, node, NodeFlags::empty(), Some(value.clone()))
            }
        };
        Ok(id)
    }
}

#[cfg(test)]
mod tests;
