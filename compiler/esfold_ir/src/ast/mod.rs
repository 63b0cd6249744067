//! ESTree node definitions.
//!
//! One [`Node`] variant per supported ESTree node type. Children are
//! [`NodeId`] handles into the owning [`Ast`](crate::Ast); a node never owns
//! another node directly, so the same canonical node may sit in several
//! slots at once.
//!
//! # Supported grammar
//!
//! ES5 statements and expressions plus arrow functions. Node types outside
//! this set are rejected at the ESTree boundary.
//!
//! # Traversal order
//!
//! [`Node::child_fields`] lists the child-bearing fields sorted by ESTree
//! name. Walkers descend in exactly this order, which keeps rewrites
//! reproducible across runs.

mod field;
mod operators;

pub use field::{Field, Key};
pub use operators::{AssignOp, BinaryOp, LogicalOp, PropertyKind, UnaryOp, UpdateOp, VarKind};

use crate::NodeId;

/// Value of a `Literal` node.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Always finite and non-negative when produced by a parser.
    Number(f64),
    String(String),
    RegExp {
        pattern: String,
        flags: String,
    },
}

/// An ESTree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program {
        body: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
        /// Raw directive text when the statement is part of a prologue.
        directive: Option<String>,
    },
    BlockStatement {
        body: Vec<NodeId>,
    },
    EmptyStatement,
    DebuggerStatement,
    WithStatement {
        object: NodeId,
        body: NodeId,
    },
    ReturnStatement {
        argument: Option<NodeId>,
    },
    LabeledStatement {
        label: NodeId,
        body: NodeId,
    },
    BreakStatement {
        label: Option<NodeId>,
    },
    ContinueStatement {
        label: Option<NodeId>,
    },
    IfStatement {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    SwitchStatement {
        discriminant: NodeId,
        cases: Vec<NodeId>,
    },
    SwitchCase {
        test: Option<NodeId>,
        consequent: Vec<NodeId>,
    },
    ThrowStatement {
        argument: NodeId,
    },
    TryStatement {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    CatchClause {
        param: Option<NodeId>,
        body: NodeId,
    },
    WhileStatement {
        test: NodeId,
        body: NodeId,
    },
    DoWhileStatement {
        body: NodeId,
        test: NodeId,
    },
    ForStatement {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForInStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
    },
    FunctionDeclaration {
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
        generator: bool,
        is_async: bool,
    },
    VariableDeclaration {
        declarations: Vec<NodeId>,
        kind: VarKind,
    },
    VariableDeclarator {
        id: NodeId,
        init: Option<NodeId>,
    },
    Identifier {
        name: String,
    },
    Literal(Literal),
    ThisExpression,
    ArrayExpression {
        /// `None` is a hole (`[1, , 3]`).
        elements: Vec<Option<NodeId>>,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        method: bool,
        shorthand: bool,
    },
    FunctionExpression {
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
        generator: bool,
        is_async: bool,
    },
    ArrowFunctionExpression {
        params: Vec<NodeId>,
        body: NodeId,
        /// `true` when the body is an expression rather than a block.
        expression: bool,
        is_async: bool,
    },
    UnaryExpression {
        operator: UnaryOp,
        argument: NodeId,
    },
    UpdateExpression {
        operator: UpdateOp,
        argument: NodeId,
        prefix: bool,
    },
    BinaryExpression {
        operator: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    LogicalExpression {
        operator: LogicalOp,
        left: NodeId,
        right: NodeId,
    },
    AssignmentExpression {
        operator: AssignOp,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpression {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    CallExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    NewExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpression {
        object: NodeId,
        property: NodeId,
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<NodeId>,
    },
}

/// Shared borrow of a child slot.
#[derive(Copy, Clone, Debug)]
pub(crate) enum SlotRef<'a> {
    Required(&'a NodeId),
    Optional(&'a Option<NodeId>),
    Dense(&'a Vec<NodeId>),
    Holey(&'a Vec<Option<NodeId>>),
}

/// Mutable borrow of a child slot.
#[derive(Debug)]
pub(crate) enum SlotMut<'a> {
    Required(&'a mut NodeId),
    Optional(&'a mut Option<NodeId>),
    Dense(&'a mut Vec<NodeId>),
    Holey(&'a mut Vec<Option<NodeId>>),
}

/// Maps `(node, field)` to a slot borrow. Expanded once for shared and once
/// for mutable borrows; binding modes pick the reference kind.
macro_rules! slot_table {
    ($node:expr, $field:expr, $Slot:ident) => {
        match ($node, $field) {
            (Node::Program { body }, Field::Body)
            | (Node::BlockStatement { body }, Field::Body) => Some($Slot::Dense(body)),
            (Node::ExpressionStatement { expression, .. }, Field::Expression) => {
                Some($Slot::Required(expression))
            }
            (Node::WithStatement { object, .. }, Field::Object) => Some($Slot::Required(object)),
            (Node::WithStatement { body, .. }, Field::Body)
            | (Node::LabeledStatement { body, .. }, Field::Body)
            | (Node::CatchClause { body, .. }, Field::Body)
            | (Node::WhileStatement { body, .. }, Field::Body)
            | (Node::DoWhileStatement { body, .. }, Field::Body)
            | (Node::ForStatement { body, .. }, Field::Body)
            | (Node::ForInStatement { body, .. }, Field::Body)
            | (Node::FunctionDeclaration { body, .. }, Field::Body)
            | (Node::FunctionExpression { body, .. }, Field::Body)
            | (Node::ArrowFunctionExpression { body, .. }, Field::Body) => {
                Some($Slot::Required(body))
            }
            (Node::ReturnStatement { argument }, Field::Argument) => {
                Some($Slot::Optional(argument))
            }
            (Node::ThrowStatement { argument }, Field::Argument)
            | (Node::UnaryExpression { argument, .. }, Field::Argument)
            | (Node::UpdateExpression { argument, .. }, Field::Argument) => {
                Some($Slot::Required(argument))
            }
            (Node::LabeledStatement { label, .. }, Field::Label) => Some($Slot::Required(label)),
            (Node::BreakStatement { label }, Field::Label)
            | (Node::ContinueStatement { label }, Field::Label) => Some($Slot::Optional(label)),
            (Node::IfStatement { test, .. }, Field::Test)
            | (Node::WhileStatement { test, .. }, Field::Test)
            | (Node::DoWhileStatement { test, .. }, Field::Test)
            | (Node::ConditionalExpression { test, .. }, Field::Test) => {
                Some($Slot::Required(test))
            }
            (Node::IfStatement { consequent, .. }, Field::Consequent)
            | (Node::ConditionalExpression { consequent, .. }, Field::Consequent) => {
                Some($Slot::Required(consequent))
            }
            (Node::IfStatement { alternate, .. }, Field::Alternate) => {
                Some($Slot::Optional(alternate))
            }
            (Node::ConditionalExpression { alternate, .. }, Field::Alternate) => {
                Some($Slot::Required(alternate))
            }
            (Node::SwitchStatement { discriminant, .. }, Field::Discriminant) => {
                Some($Slot::Required(discriminant))
            }
            (Node::SwitchStatement { cases, .. }, Field::Cases) => Some($Slot::Dense(cases)),
            (Node::SwitchCase { test, .. }, Field::Test)
            | (Node::ForStatement { test, .. }, Field::Test) => Some($Slot::Optional(test)),
            (Node::SwitchCase { consequent, .. }, Field::Consequent) => {
                Some($Slot::Dense(consequent))
            }
            (Node::TryStatement { block, .. }, Field::Block) => Some($Slot::Required(block)),
            (Node::TryStatement { handler, .. }, Field::Handler) => Some($Slot::Optional(handler)),
            (Node::TryStatement { finalizer, .. }, Field::Finalizer) => {
                Some($Slot::Optional(finalizer))
            }
            (Node::CatchClause { param, .. }, Field::Param) => Some($Slot::Optional(param)),
            (Node::ForStatement { init, .. }, Field::Init)
            | (Node::VariableDeclarator { init, .. }, Field::Init) => Some($Slot::Optional(init)),
            (Node::ForStatement { update, .. }, Field::Update) => Some($Slot::Optional(update)),
            (Node::ForInStatement { left, .. }, Field::Left)
            | (Node::BinaryExpression { left, .. }, Field::Left)
            | (Node::LogicalExpression { left, .. }, Field::Left)
            | (Node::AssignmentExpression { left, .. }, Field::Left) => {
                Some($Slot::Required(left))
            }
            (Node::ForInStatement { right, .. }, Field::Right)
            | (Node::BinaryExpression { right, .. }, Field::Right)
            | (Node::LogicalExpression { right, .. }, Field::Right)
            | (Node::AssignmentExpression { right, .. }, Field::Right) => {
                Some($Slot::Required(right))
            }
            (Node::FunctionDeclaration { id, .. }, Field::Id)
            | (Node::FunctionExpression { id, .. }, Field::Id) => Some($Slot::Optional(id)),
            (Node::VariableDeclarator { id, .. }, Field::Id) => Some($Slot::Required(id)),
            (Node::FunctionDeclaration { params, .. }, Field::Params)
            | (Node::FunctionExpression { params, .. }, Field::Params)
            | (Node::ArrowFunctionExpression { params, .. }, Field::Params) => {
                Some($Slot::Dense(params))
            }
            (Node::VariableDeclaration { declarations, .. }, Field::Declarations) => {
                Some($Slot::Dense(declarations))
            }
            (Node::ArrayExpression { elements }, Field::Elements) => Some($Slot::Holey(elements)),
            (Node::ObjectExpression { properties }, Field::Properties) => {
                Some($Slot::Dense(properties))
            }
            (Node::Property { key, .. }, Field::Key) => Some($Slot::Required(key)),
            (Node::Property { value, .. }, Field::Value) => Some($Slot::Required(value)),
            (Node::CallExpression { callee, .. }, Field::Callee)
            | (Node::NewExpression { callee, .. }, Field::Callee) => Some($Slot::Required(callee)),
            (Node::CallExpression { arguments, .. }, Field::Arguments)
            | (Node::NewExpression { arguments, .. }, Field::Arguments) => {
                Some($Slot::Dense(arguments))
            }
            (Node::MemberExpression { object, .. }, Field::Object) => Some($Slot::Required(object)),
            (Node::MemberExpression { property, .. }, Field::Property) => {
                Some($Slot::Required(property))
            }
            (Node::SequenceExpression { expressions }, Field::Expressions) => {
                Some($Slot::Dense(expressions))
            }
            _ => None,
        }
    };
}

impl Node {
    /// The ESTree `type` discriminator.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::ExpressionStatement { .. } => "ExpressionStatement",
            Node::BlockStatement { .. } => "BlockStatement",
            Node::EmptyStatement => "EmptyStatement",
            Node::DebuggerStatement => "DebuggerStatement",
            Node::WithStatement { .. } => "WithStatement",
            Node::ReturnStatement { .. } => "ReturnStatement",
            Node::LabeledStatement { .. } => "LabeledStatement",
            Node::BreakStatement { .. } => "BreakStatement",
            Node::ContinueStatement { .. } => "ContinueStatement",
            Node::IfStatement { .. } => "IfStatement",
            Node::SwitchStatement { .. } => "SwitchStatement",
            Node::SwitchCase { .. } => "SwitchCase",
            Node::ThrowStatement { .. } => "ThrowStatement",
            Node::TryStatement { .. } => "TryStatement",
            Node::CatchClause { .. } => "CatchClause",
            Node::WhileStatement { .. } => "WhileStatement",
            Node::DoWhileStatement { .. } => "DoWhileStatement",
            Node::ForStatement { .. } => "ForStatement",
            Node::ForInStatement { .. } => "ForInStatement",
            Node::FunctionDeclaration { .. } => "FunctionDeclaration",
            Node::VariableDeclaration { .. } => "VariableDeclaration",
            Node::VariableDeclarator { .. } => "VariableDeclarator",
            Node::Identifier { .. } => "Identifier",
            Node::Literal(_) => "Literal",
            Node::ThisExpression => "ThisExpression",
            Node::ArrayExpression { .. } => "ArrayExpression",
            Node::ObjectExpression { .. } => "ObjectExpression",
            Node::Property { .. } => "Property",
            Node::FunctionExpression { .. } => "FunctionExpression",
            Node::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::UpdateExpression { .. } => "UpdateExpression",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::LogicalExpression { .. } => "LogicalExpression",
            Node::AssignmentExpression { .. } => "AssignmentExpression",
            Node::ConditionalExpression { .. } => "ConditionalExpression",
            Node::CallExpression { .. } => "CallExpression",
            Node::NewExpression { .. } => "NewExpression",
            Node::MemberExpression { .. } => "MemberExpression",
            Node::SequenceExpression { .. } => "SequenceExpression",
        }
    }

    /// Child-bearing fields, sorted by ESTree name.
    pub const fn child_fields(&self) -> &'static [Field] {
        match self {
            Node::Program { .. } | Node::BlockStatement { .. } => &[Field::Body],
            Node::ExpressionStatement { .. } => &[Field::Expression],
            Node::EmptyStatement
            | Node::DebuggerStatement
            | Node::Identifier { .. }
            | Node::Literal(_)
            | Node::ThisExpression => &[],
            Node::WithStatement { .. } => &[Field::Body, Field::Object],
            Node::ReturnStatement { .. }
            | Node::ThrowStatement { .. }
            | Node::UnaryExpression { .. }
            | Node::UpdateExpression { .. } => &[Field::Argument],
            Node::LabeledStatement { .. } => &[Field::Body, Field::Label],
            Node::BreakStatement { .. } | Node::ContinueStatement { .. } => &[Field::Label],
            Node::IfStatement { .. } | Node::ConditionalExpression { .. } => {
                &[Field::Alternate, Field::Consequent, Field::Test]
            }
            Node::SwitchStatement { .. } => &[Field::Cases, Field::Discriminant],
            Node::SwitchCase { .. } => &[Field::Consequent, Field::Test],
            Node::TryStatement { .. } => &[Field::Block, Field::Finalizer, Field::Handler],
            Node::CatchClause { .. } => &[Field::Body, Field::Param],
            Node::WhileStatement { .. } | Node::DoWhileStatement { .. } => {
                &[Field::Body, Field::Test]
            }
            Node::ForStatement { .. } => &[Field::Body, Field::Init, Field::Test, Field::Update],
            Node::ForInStatement { .. } => &[Field::Body, Field::Left, Field::Right],
            Node::FunctionDeclaration { .. } | Node::FunctionExpression { .. } => {
                &[Field::Body, Field::Id, Field::Params]
            }
            Node::ArrowFunctionExpression { .. } => &[Field::Body, Field::Params],
            Node::VariableDeclaration { .. } => &[Field::Declarations],
            Node::VariableDeclarator { .. } => &[Field::Id, Field::Init],
            Node::ArrayExpression { .. } => &[Field::Elements],
            Node::ObjectExpression { .. } => &[Field::Properties],
            Node::Property { .. } => &[Field::Key, Field::Value],
            Node::BinaryExpression { .. }
            | Node::LogicalExpression { .. }
            | Node::AssignmentExpression { .. } => &[Field::Left, Field::Right],
            Node::CallExpression { .. } | Node::NewExpression { .. } => {
                &[Field::Arguments, Field::Callee]
            }
            Node::MemberExpression { .. } => &[Field::Object, Field::Property],
            Node::SequenceExpression { .. } => &[Field::Expressions],
        }
    }

    pub(crate) fn slot(&self, field: Field) -> Option<SlotRef<'_>> {
        slot_table!(self, field, SlotRef)
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> Option<SlotMut<'_>> {
        slot_table!(self, field, SlotMut)
    }

    /// `true` for function declarations, expressions and arrows.
    pub const fn is_function(&self) -> bool {
        matches!(
            self,
            Node::FunctionDeclaration { .. }
                | Node::FunctionExpression { .. }
                | Node::ArrowFunctionExpression { .. }
        )
    }

    /// `true` for an empty block or an empty statement.
    pub fn is_empty_statement(&self) -> bool {
        match self {
            Node::EmptyStatement => true,
            Node::BlockStatement { body } => body.is_empty(),
            _ => false,
        }
    }

    /// The string value of a string literal.
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Node::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }
}
